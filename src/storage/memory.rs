use super::TodoStorage;
use crate::domain::todo::Todo;

/// Ephemeral storage for `--memory`, `--demo`, and tests.
#[derive(Default)]
pub struct MemoryStorage {
    items: Vec<Todo>,
}

impl MemoryStorage {
    pub fn with_seed(seed: impl IntoIterator<Item = Todo>) -> Self {
        Self {
            items: seed.into_iter().collect(),
        }
    }
}

impl TodoStorage for MemoryStorage {
    fn load(&self) -> Vec<Todo> {
        self.items.clone()
    }

    fn save(&mut self, todos: &[Todo]) {
        self.items = todos.to_vec();
    }
}
