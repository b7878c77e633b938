//! Client core for a todo list kept in sync with a REST collection.
//!
//! # Overview
//! `TodoStore` owns the local list and changes it only after the server
//! confirmed a request (confirm-then-apply). Underneath, `TodoClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching
//! the network, and a `Transport` performs the round-trip in between.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only the collection endpoint.
//! - Each wire operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `Transport` is the single I/O seam; `UreqTransport` is the blocking
//!   implementation and tests substitute scripted ones.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{EditCursor, Operation, StoreError, TodoStore};
pub use transport::{Transport, UreqTransport};
pub use types::{is_blank, CreateTodo, EmptyTodoId, Todo, TodoId, UpdateTodo};
