//! Local todo collection kept in step with the remote API.
//!
//! # Design
//! `TodoStore` is confirm-then-apply: every operation performs exactly one
//! round-trip through its `Transport` and touches local state only after the
//! server answered with a 2xx. A failed operation leaves the collection as it
//! was and reports the failure as a `StoreError`.
//!
//! Mutating operations take `&mut self`, so a store never has two requests in
//! flight and responses are applied in the order they were issued.
//!
//! The collection is private. Callers read it through `todos()` /
//! `snapshot()` and change it only through `load`, `create`, `toggle`,
//! `rename` and `remove`.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{is_blank, CreateTodo, Todo, TodoId, UpdateTodo};

/// The store operations that talk to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Toggle,
    Rename,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Toggle => "toggle",
            Operation::Rename => "rename",
            Operation::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Why a store operation did not change local state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The round-trip failed: no response, a non-2xx status, or a body that
    /// could not be decoded. All of these are treated alike.
    #[error("{operation} failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: ApiError,
    },

    /// `toggle` needs the store's own record of the item and there is none.
    /// No request was sent.
    #[error("todo {0} is not in the local collection")]
    UnknownItem(TodoId),
}

impl StoreError {
    pub fn operation(&self) -> Operation {
        match self {
            StoreError::Transport { operation, .. } => *operation,
            StoreError::UnknownItem(_) => Operation::Toggle,
        }
    }
}

/// The item currently being renamed and the title typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCursor {
    id: TodoId,
    draft: String,
}

impl EditCursor {
    pub fn id(&self) -> &TodoId {
        &self.id
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }
}

/// In-memory todo list synchronized with the collection at `client`'s
/// endpoint.
#[derive(Debug)]
pub struct TodoStore<T> {
    client: TodoClient,
    transport: T,
    todos: Vec<Todo>,
    editing: Option<EditCursor>,
}

impl<T: Transport> TodoStore<T> {
    /// An empty store. Call `load` before anything else.
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            todos: Vec::new(),
            editing: None,
        }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self::new(TodoClient::new(&config.endpoint), transport)
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn snapshot(&self) -> Vec<Todo> {
        self.todos.clone()
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    pub fn editing(&self) -> Option<&EditCursor> {
        self.editing.as_ref()
    }

    /// Replace the local collection with the server's, in server order.
    ///
    /// On failure the previous collection is kept.
    pub fn load(&mut self) -> Result<&[Todo], StoreError> {
        let request = Ok(self.client.build_list_todos());
        let todos = self.round_trip(Operation::Load, request, TodoClient::parse_list_todos)?;
        self.todos = dedupe(todos);
        debug!(count = self.todos.len(), "loaded todos");
        Ok(&self.todos)
    }

    /// Create a todo and append the server's copy.
    ///
    /// The title is sent as given; rejecting blank input is the caller's job
    /// (see `is_blank`).
    pub fn create(&mut self, title: &str) -> Result<Todo, StoreError> {
        let request = self.client.build_create_todo(&CreateTodo::new(title));
        let created = self.round_trip(Operation::Create, request, TodoClient::parse_create_todo)?;
        match self.position(&created.id) {
            Some(index) => {
                warn!(id = %created.id, "server reused an existing id on create");
                self.todos[index] = created.clone();
            }
            None => self.todos.push(created.clone()),
        }
        debug!(id = %created.id, "created todo");
        Ok(created)
    }

    /// Flip `completed` on the item with `id`.
    ///
    /// The new value is computed from this store's last confirmed copy of the
    /// item, not from whatever the caller last rendered.
    pub fn toggle(&mut self, id: &TodoId) -> Result<Todo, StoreError> {
        let completed = match self.get(id) {
            Some(todo) => !todo.completed,
            None => {
                warn!(%id, "toggle on unknown todo");
                return Err(StoreError::UnknownItem(id.clone()));
            }
        };
        let request = self
            .client
            .build_update_todo(id, &UpdateTodo::completed(completed));
        let updated = self.round_trip(Operation::Toggle, request, TodoClient::parse_update_todo)?;
        self.replace(id, updated.clone());
        debug!(%id, completed = updated.completed, "toggled todo");
        Ok(updated)
    }

    /// Set a new title on the item with `id`.
    ///
    /// On success an edit cursor pointing at `id` is cleared. On failure the
    /// cursor, draft included, is left for the user to retry.
    pub fn rename(&mut self, id: &TodoId, title: &str) -> Result<Todo, StoreError> {
        let request = self.client.build_update_todo(id, &UpdateTodo::title(title));
        let updated = self.round_trip(Operation::Rename, request, TodoClient::parse_update_todo)?;
        self.replace(id, updated.clone());
        if self.editing.as_ref().is_some_and(|cursor| &cursor.id == id) {
            self.editing = None;
        }
        debug!(%id, "renamed todo");
        Ok(updated)
    }

    /// Delete the item with `id`, locally only once the server confirmed.
    pub fn remove(&mut self, id: &TodoId) -> Result<(), StoreError> {
        let request = Ok(self.client.build_delete_todo(id));
        self.round_trip(Operation::Remove, request, TodoClient::parse_delete_todo)?;
        self.todos.retain(|todo| &todo.id != id);
        if self.editing.as_ref().is_some_and(|cursor| &cursor.id == id) {
            self.editing = None;
        }
        debug!(%id, "removed todo");
        Ok(())
    }

    /// Start editing `id` with its current title as the draft. Replaces any
    /// edit already in progress. Returns `false` if `id` is unknown.
    pub fn begin_edit(&mut self, id: &TodoId) -> bool {
        let Some(todo) = self.get(id) else {
            return false;
        };
        self.editing = Some(EditCursor {
            id: todo.id.clone(),
            draft: todo.title.clone(),
        });
        true
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        if let Some(cursor) = self.editing.as_mut() {
            cursor.draft = draft.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Rename the item under edit to the draft.
    ///
    /// Does nothing and returns `Ok(None)` when no edit is in progress or the
    /// draft is blank.
    pub fn save_edit(&mut self) -> Result<Option<Todo>, StoreError> {
        let Some(cursor) = self.editing.as_ref() else {
            return Ok(None);
        };
        if is_blank(&cursor.draft) {
            return Ok(None);
        }
        let id = cursor.id.clone();
        let draft = cursor.draft.clone();
        self.rename(&id, &draft).map(Some)
    }

    fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| &todo.id == id)
    }

    // Replace-by-identifier; a missing id is a no-op.
    fn replace(&mut self, id: &TodoId, todo: Todo) {
        if let Some(index) = self.position(id) {
            self.todos[index] = todo;
        }
    }

    fn round_trip<R>(
        &self,
        operation: Operation,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, StoreError> {
        request
            .and_then(|request| self.transport.execute(request))
            .and_then(|response| parse(&self.client, response))
            .map_err(|source| {
                warn!(%operation, error = %source, "todo sync failed");
                StoreError::Transport { operation, source }
            })
    }
}

/// Keep one entry per id: first position, last value.
fn dedupe(todos: Vec<Todo>) -> Vec<Todo> {
    let mut seen: HashMap<TodoId, usize> = HashMap::with_capacity(todos.len());
    let mut out: Vec<Todo> = Vec::with_capacity(todos.len());
    for todo in todos {
        match seen.get(&todo.id) {
            Some(&index) => {
                warn!(id = %todo.id, "server listed a todo twice");
                out[index] = todo;
            }
            None => {
                seen.insert(todo.id.clone(), out.len());
                out.push(todo);
            }
        }
    }
    out
}
