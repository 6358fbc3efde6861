use tracing::debug;

use crate::domain::todo::{Filter, Priority, Todo, TodoId};
use crate::storage::TodoStorage;
use crate::usecase::views::{self, Stats};

/// The canonical todo collection plus the process-wide filter selector.
///
/// Mutations update the in-memory list first, then write the whole collection
/// through the storage adapter. Reads never go back to storage, so the views
/// can never lag behind a completed mutation.
pub struct TodoStore {
    storage: Box<dyn TodoStorage>,
    todos: Vec<Todo>,
    filter: Filter,
}

impl TodoStore {
    pub fn open(storage: Box<dyn TodoStorage>) -> Self {
        let todos = storage.load();
        debug!(count = todos.len(), "hydrated todo store");
        Self {
            storage,
            todos,
            filter: Filter::All,
        }
    }

    pub fn all(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// The collection as seen through the current filter.
    pub fn visible(&self) -> Vec<&Todo> {
        views::filtered(&self.todos, self.filter)
    }

    pub fn stats(&self) -> Stats {
        views::stats(&self.todos)
    }

    /// Appends a new task. Whitespace-only text is rejected without error.
    pub fn add(&mut self, text: &str, priority: Priority) -> Option<TodoId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let todo = Todo::new(text, priority);
        let id = todo.id;
        self.todos.push(todo);
        self.persist();
        Some(id)
    }

    pub fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let pos = self.todos.iter().position(|t| t.id == id)?;
        let removed = self.todos.remove(pos);
        self.persist();
        Some(removed)
    }

    pub fn toggle(&mut self, id: TodoId) -> Option<bool> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        todo.touch();
        let completed = todo.completed;
        self.persist();
        Some(completed)
    }

    /// Replaces a task's text. An edit that trims to empty is ignored; it
    /// neither deletes the task nor errors.
    pub fn update_text(&mut self, id: TodoId, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        todo.text = text.to_owned();
        todo.touch();
        self.persist();
        true
    }

    /// Drops every completed task, keeping the rest in order.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|t| !t.completed);
        let removed = before - self.todos.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// One global toggle: when everything is done, reopen everything;
    /// otherwise complete everything. Empty collection is a no-op.
    pub fn toggle_all(&mut self) {
        if self.todos.is_empty() {
            return;
        }
        let all_done = self.todos.iter().all(|t| t.completed);
        for todo in &mut self.todos {
            todo.completed = !all_done;
            todo.touch();
        }
        self.persist();
    }

    fn persist(&mut self) {
        self.storage.save(&self.todos);
    }
}
