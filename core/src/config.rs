//! Client configuration.

/// Environment variable that overrides the collection endpoint.
pub const ENDPOINT_ENV: &str = "TODO_API_URL";

/// Collection endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/todos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL of the todo collection resource.
    pub endpoint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Defaults with `TODO_API_URL` applied on top.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var(ENDPOINT_ENV) {
            self.apply_endpoint(&raw);
        }
    }

    fn apply_endpoint(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            tracing::warn!("{ENDPOINT_ENV} is blank, keeping {}", self.endpoint);
            return;
        }
        self.endpoint = trimmed.to_string();
    }
}
