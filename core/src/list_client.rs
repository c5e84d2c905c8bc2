//! Blocking driver that runs each store operation as one round-trip.

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::store::{Effect, TodoListState, TodoStore};
use crate::transport::Transport;
use crate::types::{Todo, TodoId};

/// A todo list kept in sync with the server through a [`Transport`].
///
/// Each call issues exactly one request (or none, for a blank title) and
/// returns once its effect is applied. Failures are returned and also left
/// in `state().error`.
#[derive(Debug)]
pub struct TodoListClient<T> {
    store: TodoStore,
    transport: T,
}

impl<T: Transport> TodoListClient<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            store: TodoStore::new(client),
            transport,
        }
    }

    pub fn state(&self) -> &TodoListState {
        self.store.state()
    }

    pub fn store_mut(&mut self) -> &mut TodoStore {
        &mut self.store
    }

    pub fn load(&mut self) -> Result<(), ApiError> {
        let (pending, request) = self.store.begin_load();
        // The outcome goes to `complete` whatever it is, so the loading flag
        // is released on every path.
        let outcome = self.transport.execute(&request);
        self.store.complete(pending, outcome).map(drop)
    }

    /// Returns `Ok(false)` when the title is blank and nothing was sent.
    pub fn add(&mut self, title: &str) -> Result<bool, ApiError> {
        let Some((pending, request)) = self.store.begin_add(title)? else {
            return Ok(false);
        };
        let outcome = self.transport.execute(&request);
        self.store.complete(pending, outcome)?;
        Ok(true)
    }

    pub fn set_draft(&mut self, text: &str) {
        self.store.set_draft(text);
    }

    /// Add the current draft title.
    pub fn submit_draft(&mut self) -> Result<bool, ApiError> {
        let title = self.store.state().draft_title.clone();
        self.add(&title)
    }

    pub fn toggle(&mut self, todo: &Todo) -> Result<Effect, ApiError> {
        let (pending, request) = self.store.begin_toggle(todo)?;
        let outcome = self.transport.execute(&request);
        self.store.complete(pending, outcome)
    }

    pub fn remove(&mut self, id: &TodoId) -> Result<(), ApiError> {
        let (pending, request) = self.store.begin_remove(id);
        let outcome = self.transport.execute(&request);
        self.store.complete(pending, outcome).map(drop)
    }
}
