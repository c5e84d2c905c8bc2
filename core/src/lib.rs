//! Client core for a todo list backed by a REST collection resource.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sits a list
//! store that folds server responses into local state, and a pure projection
//! of that state into a view.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `TodoStore` applies only server-confirmed changes and drops stale
//!   responses for an id that has a newer request outstanding.
//! - `TodoListClient` drives the store through any `Transport`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod list_client;
pub mod store;
pub mod transport;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list_client::TodoListClient;
pub use store::{Effect, Pending, PendingOp, Ticket, TodoListState, TodoStore};
pub use transport::Transport;
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo};
pub use view::{render, TodoRow, TodoView, ViewBody};
