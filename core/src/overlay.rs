//! Local-only todo completion overlay.
//!
//! The overlay is a set of todo ids the user has ticked in this process.
//! Effective completion is `remote.completed || overlay.contains(id)`, so the
//! overlay can only add completion; it never un-completes a todo the server
//! reports as done. Nothing here is sent to the server.

use std::collections::HashSet;
use std::str::FromStr;

use crate::types::Todo;

#[derive(Debug, Clone, Default)]
pub struct TodoOverlay {
    completed: HashSet<u64>,
}

impl TodoOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether `id` is now in the set.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.completed.remove(&id) {
            false
        } else {
            self.completed.insert(id);
            true
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.completed.contains(&id)
    }

    pub fn is_completed(&self, todo: &Todo) -> bool {
        todo.completed || self.contains(todo.id)
    }

    /// A copy of `todo` with effective completion applied.
    pub fn apply(&self, todo: &Todo) -> Todo {
        Todo {
            completed: self.is_completed(todo),
            ..todo.clone()
        }
    }

    pub fn apply_all(&self, todos: &[Todo]) -> Vec<Todo> {
        todos.iter().map(|t| self.apply(t)).collect()
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn clear(&mut self) {
        self.completed.clear();
    }
}

/// Which effective todos a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TodoFilter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Pending => !todo.completed,
            TodoFilter::Completed => todo.completed,
        }
    }
}

impl FromStr for TodoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TodoFilter::All),
            "pending" => Ok(TodoFilter::Pending),
            "completed" => Ok(TodoFilter::Completed),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// Completed and pending counts over effective completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoSummary {
    pub completed: usize,
    pub pending: usize,
    pub total: usize,
}

impl TodoSummary {
    pub fn of(todos: &[Todo], overlay: &TodoOverlay) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|t| overlay.is_completed(t)).count();
        Self {
            completed,
            pending: total - completed,
            total,
        }
    }
}
