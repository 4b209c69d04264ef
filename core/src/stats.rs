//! Admin dashboard summary over the four top-level collections.

use serde::Serialize;

use crate::types::Todo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub posts: usize,
    pub albums: usize,
    pub todos: usize,
    pub users: usize,
    pub completed_todos: usize,
    /// Whole percent, rounded half up. Zero when there are no todos.
    pub completion_rate: u32,
}

impl DashboardStats {
    /// Completion uses the server's flag only; the local overlay is ignored.
    pub fn new(posts: usize, albums: usize, todos: &[Todo], users: usize) -> Self {
        let completed_todos = todos.iter().filter(|t| t.completed).count();
        Self {
            posts,
            albums,
            todos: todos.len(),
            users,
            completed_todos,
            completion_rate: completion_rate(completed_todos, todos.len()),
        }
    }
}

fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u32
}
