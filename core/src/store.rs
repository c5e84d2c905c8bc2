//! Local list state and the rules for folding server responses into it.
//!
//! # Design
//! Every operation is two-phase. `begin_*` returns a [`Pending`] ticket plus
//! the `HttpRequest` to execute; the host runs the round-trip and passes the
//! outcome to [`TodoStore::complete`], which applies the effect. Nothing is
//! applied optimistically: `items` only changes once the server has answered.
//!
//! Several requests may be in flight at once and may complete in any order.
//! Effects are keyed by id, so completions for different todos never clobber
//! each other. For the same id, a completion is stale only once a newer
//! request for that id has already been applied; a newer request that fails
//! or is still in flight never hides an older success. A confirmed delete is
//! always applied. Loads follow the same rule against newer applied loads,
//! and every load completion releases the loading flag. Stale failures are
//! logged but leave `error` alone.
//!
//! Subscribers are called with the new state after every change.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Everything the view needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListState {
    /// Server order on load, newest-first for todos added since.
    pub items: Vec<Todo>,
    pub draft_title: String,
    pub is_loading: bool,
    /// Last failed operation, cleared by the next successful one.
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    Load,
    Add,
    Toggle(TodoId),
    Remove(TodoId),
}

/// An operation waiting for its response.
#[must_use = "a pending operation must be passed to TodoStore::complete"]
#[derive(Debug, PartialEq, Eq)]
pub struct Pending {
    ticket: Ticket,
    op: PendingOp,
}

impl Pending {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn op(&self) -> &PendingOp {
        &self.op
    }
}

/// What a successful completion did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Applied,
    /// A newer request superseded this one; the state was left alone.
    Stale,
}

type Subscriber = Box<dyn FnMut(&TodoListState)>;

/// Requests for one id that have not settled yet, and the newest one whose
/// result reached `items`.
#[derive(Debug, Default)]
struct IdSequence {
    in_flight: usize,
    applied: Option<Ticket>,
}

pub struct TodoStore {
    client: TodoClient,
    state: TodoListState,
    next_ticket: u64,
    sequences: HashMap<TodoId, IdSequence>,
    applied_load: Option<Ticket>,
    loads_in_flight: usize,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoStore")
            .field("client", &self.client)
            .field("state", &self.state)
            .field("loads_in_flight", &self.loads_in_flight)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TodoStore {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            state: TodoListState::default(),
            next_ticket: 0,
            sequences: HashMap::new(),
            applied_load: None,
            loads_in_flight: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &TodoListState {
        &self.state
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// Register a callback that runs after every state change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&TodoListState) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn set_draft(&mut self, text: &str) {
        if self.state.draft_title != text {
            self.state.draft_title = text.to_string();
            self.notify();
        }
    }

    pub fn dismiss_error(&mut self) {
        if self.state.error.take().is_some() {
            self.notify();
        }
    }

    pub fn begin_load(&mut self) -> (Pending, HttpRequest) {
        let ticket = self.issue_ticket();
        self.loads_in_flight += 1;
        self.state.is_loading = true;
        let request = self.client.build_list_todos();
        debug!(method = %request.method, path = %request.path, "load started");
        self.notify();
        (Pending { ticket, op: PendingOp::Load }, request)
    }

    /// `Ok(None)` when `title` is blank: nothing to send.
    pub fn begin_add(&mut self, title: &str) -> Result<Option<(Pending, HttpRequest)>, ApiError> {
        if title.trim().is_empty() {
            return Ok(None);
        }
        let input = CreateTodo {
            title: title.to_string(),
            completed: false,
        };
        let request = self.client.build_create_todo(&input).inspect_err(|e| self.record_failure("add", e, false))?;
        debug!(method = %request.method, path = %request.path, "add started");
        let ticket = self.issue_ticket();
        Ok(Some((Pending { ticket, op: PendingOp::Add }, request)))
    }

    pub fn begin_toggle(&mut self, todo: &Todo) -> Result<(Pending, HttpRequest), ApiError> {
        let input = UpdateTodo {
            completed: !todo.completed,
        };
        let request = self
            .client
            .build_update_todo(&todo.id, &input)
            .inspect_err(|e| self.record_failure("toggle", e, false))?;
        debug!(method = %request.method, path = %request.path, "toggle started");
        let ticket = self.issue_ticket();
        self.sequences.entry(todo.id.clone()).or_default().in_flight += 1;
        Ok((
            Pending {
                ticket,
                op: PendingOp::Toggle(todo.id.clone()),
            },
            request,
        ))
    }

    pub fn begin_remove(&mut self, id: &TodoId) -> (Pending, HttpRequest) {
        let request = self.client.build_delete_todo(id);
        debug!(method = %request.method, path = %request.path, "remove started");
        let ticket = self.issue_ticket();
        self.sequences.entry(id.clone()).or_default().in_flight += 1;
        (
            Pending {
                ticket,
                op: PendingOp::Remove(id.clone()),
            },
            request,
        )
    }

    /// Fold the outcome of a round-trip into the state.
    ///
    /// On failure the list and draft are left untouched and the error is
    /// returned. It is also stored in `state.error` unless a newer request of
    /// the same kind has already been applied.
    pub fn complete(
        &mut self,
        pending: Pending,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<Effect, ApiError> {
        let Pending { ticket, op } = pending;
        let result = match op {
            PendingOp::Load => self.complete_load(ticket, outcome),
            PendingOp::Add => self.complete_add(outcome),
            PendingOp::Toggle(id) => self.complete_toggle(ticket, &id, outcome),
            PendingOp::Remove(id) => self.complete_remove(ticket, &id, outcome),
        };
        self.notify();
        result
    }

    fn complete_load(&mut self, ticket: Ticket, outcome: Result<HttpResponse, ApiError>) -> Result<Effect, ApiError> {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        self.state.is_loading = self.loads_in_flight > 0;

        let superseded = self.applied_load.is_some_and(|applied| applied > ticket);
        let items = outcome
            .and_then(|response| self.client.parse_list_todos(response))
            .inspect_err(|e| self.record_failure("load", e, superseded))?;
        if superseded {
            debug!(?ticket, "dropping stale load result");
            return Ok(Effect::Stale);
        }
        debug!(count = items.len(), "load finished");
        self.applied_load = Some(ticket);
        self.state.items = items;
        self.state.error = None;
        Ok(Effect::Applied)
    }

    fn complete_add(&mut self, outcome: Result<HttpResponse, ApiError>) -> Result<Effect, ApiError> {
        let created = outcome
            .and_then(|response| self.client.parse_create_todo(response))
            .inspect_err(|e| self.record_failure("add", e, false))?;
        debug!(id = %created.id, "add finished");
        self.state.items.insert(0, created);
        self.state.draft_title.clear();
        self.state.error = None;
        Ok(Effect::Applied)
    }

    fn complete_toggle(
        &mut self,
        ticket: Ticket,
        id: &TodoId,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<Effect, ApiError> {
        let superseded = self.superseded(ticket, id);
        let result = outcome.and_then(|response| self.client.parse_update_todo(response));
        let effect = match result {
            Err(e) => {
                self.record_failure("toggle", &e, superseded);
                Err(e)
            }
            Ok(_) if superseded => {
                debug!(%id, ?ticket, "dropping stale toggle result");
                Ok(Effect::Stale)
            }
            Ok(updated) => {
                match self.state.items.iter_mut().find(|t| t.id == updated.id) {
                    Some(slot) => *slot = updated,
                    None => debug!(%id, "toggled todo is no longer listed"),
                }
                self.mark_applied(ticket, id);
                self.state.error = None;
                Ok(Effect::Applied)
            }
        };
        self.settle(id);
        effect
    }

    fn complete_remove(
        &mut self,
        ticket: Ticket,
        id: &TodoId,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<Effect, ApiError> {
        let superseded = self.superseded(ticket, id);
        let result = outcome.and_then(|response| self.client.parse_delete_todo(response));
        let effect = match result {
            Err(e) => {
                self.record_failure("remove", &e, superseded);
                Err(e)
            }
            Ok(()) => {
                debug!(%id, "remove finished");
                self.state.items.retain(|t| &t.id != id);
                self.mark_applied(ticket, id);
                self.state.error = None;
                Ok(Effect::Applied)
            }
        };
        self.settle(id);
        effect
    }

    /// Whether a newer request for `id` has already been applied.
    fn superseded(&self, ticket: Ticket, id: &TodoId) -> bool {
        self.sequences
            .get(id)
            .and_then(|seq| seq.applied)
            .is_some_and(|applied| applied > ticket)
    }

    fn mark_applied(&mut self, ticket: Ticket, id: &TodoId) {
        if let Some(seq) = self.sequences.get_mut(id) {
            seq.applied = Some(seq.applied.map_or(ticket, |applied| applied.max(ticket)));
        }
    }

    /// One request for `id` is done; forget the id once none are left.
    fn settle(&mut self, id: &TodoId) {
        if let Some(seq) = self.sequences.get_mut(id) {
            seq.in_flight = seq.in_flight.saturating_sub(1);
            if seq.in_flight == 0 {
                self.sequences.remove(id);
            }
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// A superseded failure is only logged: a newer result already stands.
    fn record_failure(&mut self, operation: &str, error: &ApiError, superseded: bool) {
        if superseded {
            debug!(operation, %error, "superseded request failed");
            return;
        }
        warn!(operation, %error, "todo operation failed");
        self.state.error = Some(error.clone());
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.state);
        }
    }
}
