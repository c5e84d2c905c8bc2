//! Projection of list state into what gets drawn.
//!
//! `render` is pure and cheap; hosts call it from a store subscriber and
//! redraw the whole thing on every change.

use std::fmt;

use crate::store::TodoListState;
use crate::types::{Todo, TodoId};

pub const HEADING: &str = "Todo List";
pub const INPUT_PLACEHOLDER: &str = "Add a task...";
pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No todos yet.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    pub heading: &'static str,
    pub placeholder: &'static str,
    pub draft: String,
    pub error: Option<String>,
    pub body: ViewBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    Loading,
    Empty,
    Rows(Vec<TodoRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    /// Accessible label of the row's delete button.
    pub delete_label: String,
}

impl From<&Todo> for TodoRow {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.clone(),
            title: todo.title.clone(),
            completed: todo.completed,
            delete_label: format!("Delete {}", todo.title),
        }
    }
}

pub fn render(state: &TodoListState) -> TodoView {
    let body = if state.is_loading {
        ViewBody::Loading
    } else if state.items.is_empty() {
        ViewBody::Empty
    } else {
        ViewBody::Rows(state.items.iter().map(TodoRow::from).collect())
    };
    TodoView {
        heading: HEADING,
        placeholder: INPUT_PLACEHOLDER,
        draft: state.draft_title.clone(),
        error: state.error.as_ref().map(ToString::to_string),
        body,
    }
}

impl fmt::Display for TodoView {
    /// Plain-text rendering: rows are numbered from 1 so a terminal user can
    /// refer to them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        if self.draft.is_empty() {
            writeln!(f, "> ({})", self.placeholder)?;
        } else {
            writeln!(f, "> {}", self.draft)?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "! {error}")?;
        }
        match &self.body {
            ViewBody::Loading => writeln!(f, "{LOADING_TEXT}"),
            ViewBody::Empty => writeln!(f, "{EMPTY_TEXT}"),
            ViewBody::Rows(rows) => {
                for (n, row) in rows.iter().enumerate() {
                    if row.completed {
                        writeln!(f, "{:>3}. [x] ~~{}~~", n + 1, row.title)?;
                    } else {
                        writeln!(f, "{:>3}. [ ] {}", n + 1, row.title)?;
                    }
                }
                Ok(())
            }
        }
    }
}
