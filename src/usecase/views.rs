use crate::domain::todo::{Filter, Todo};

/// Counts over the full, unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Project the collection through the filter, preserving insertion order.
pub fn filtered(todos: &[Todo], filter: Filter) -> Vec<&Todo> {
    todos.iter().filter(|t| filter.matches(t)).collect()
}

pub fn stats(todos: &[Todo]) -> Stats {
    let completed = todos.iter().filter(|t| t.completed).count();
    Stats {
        total: todos.len(),
        active: todos.len() - completed,
        completed,
    }
}
