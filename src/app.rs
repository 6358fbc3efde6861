use crate::domain::todo::{Filter, Priority, TodoId};
use crate::store::TodoStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing(TodoId),
}

pub struct App {
    pub store: TodoStore,
    pub selected: usize,
    pub mode: InputMode,
    pub input: String,
    pub pending_priority: Priority,
    pub status: Option<String>,
}

impl App {
    pub fn new(store: TodoStore) -> Self {
        Self {
            store,
            selected: 0,
            mode: InputMode::Normal,
            input: String::new(),
            pending_priority: Priority::default(),
            status: None,
        }
    }

    /// Selection indexes the filtered view, so it has to be re-clamped after
    /// anything that can shrink that view.
    fn clamp_selection(&mut self) {
        let len = self.store.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.store.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn selected_id(&self) -> Option<TodoId> {
        self.store.visible().get(self.selected).map(|t| t.id)
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle(id);
            self.clamp_selection();
            self.set_status("Toggled completion");
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.remove(id);
            if self.selected > 0 {
                self.selected -= 1;
            }
            self.clamp_selection();
            self.set_status("Deleted");
        }
    }

    pub fn begin_add(&mut self) {
        self.mode = InputMode::Adding;
        self.input.clear();
        self.pending_priority = Priority::default();
        self.set_status("Type new task and press Enter (Tab cycles priority)");
    }

    pub fn begin_edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Some(todo) = self.store.get(id) {
            self.input = todo.text.clone();
            self.mode = InputMode::Editing(id);
            self.set_status("Edit text and press Enter");
        }
    }

    pub fn cycle_pending_priority(&mut self) {
        self.pending_priority = self.pending_priority.cycled();
    }

    pub fn submit_input(&mut self) {
        match self.mode {
            InputMode::Adding => self.add_todo(),
            InputMode::Editing(id) => self.submit_edit(id),
            InputMode::Normal => {}
        }
    }

    fn add_todo(&mut self) {
        if self.store.add(&self.input, self.pending_priority).is_none() {
            self.set_status("Cannot add an empty task");
            return;
        }
        self.input.clear();
        self.mode = InputMode::Normal;
        let visible = self.store.visible().len();
        if visible > 0 {
            self.selected = visible - 1;
        }
        self.set_status("Added");
    }

    fn submit_edit(&mut self, id: TodoId) {
        if self.store.update_text(id, &self.input) {
            self.set_status("Updated");
        } else {
            self.set_status("Kept previous text");
        }
        self.input.clear();
        self.mode = InputMode::Normal;
    }

    pub fn cancel_input(&mut self) {
        self.mode = InputMode::Normal;
        self.input.clear();
        self.set_status("Canceled");
    }

    pub fn clear_completed(&mut self) {
        let removed = self.store.clear_completed();
        self.clamp_selection();
        if removed > 0 {
            self.set_status(&format!("Cleared {removed} completed"));
        } else {
            self.set_status("No completed items");
        }
    }

    pub fn toggle_all(&mut self) {
        let stats = self.store.stats();
        if stats.total == 0 {
            self.set_status("Nothing to toggle");
            return;
        }
        self.store.toggle_all();
        self.clamp_selection();
        if stats.active == 0 {
            self.set_status("Reopened all");
        } else {
            self.set_status("Completed all");
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
        self.clamp_selection();
        self.set_status(&format!("Filter: {}", filter.label()));
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.store.filter().cycled());
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status = Some(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    fn app() -> App {
        App::new(TodoStore::open(Box::new(MemoryStorage::default())))
    }

    fn app_with(texts: &[&str]) -> App {
        let mut app = app();
        for text in texts {
            app.store.add(text, Priority::Medium);
        }
        app
    }

    #[test]
    fn empty_submit_keeps_adding_mode() {
        let mut app = app();
        app.begin_add();
        app.input = "   ".to_string();
        app.submit_input();
        assert_eq!(app.mode, InputMode::Adding);
        assert_eq!(app.status.as_deref(), Some("Cannot add an empty task"));
        assert!(app.store.all().is_empty());
    }

    #[test]
    fn submit_adds_with_pending_priority() {
        let mut app = app();
        app.begin_add();
        app.cycle_pending_priority(); // medium -> high
        app.input = "Walk dog".to_string();
        app.submit_input();
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.store.all()[0].priority, Priority::High);
    }

    #[test]
    fn edit_submit_rewrites_selected_task() {
        let mut app = app_with(&["tpyo"]);
        app.begin_edit_selected();
        assert_eq!(app.input, "tpyo");
        app.input = "typo".to_string();
        app.submit_input();
        assert_eq!(app.store.all()[0].text, "typo");
    }

    #[test]
    fn empty_edit_keeps_task_and_text() {
        let mut app = app_with(&["original"]);
        app.begin_edit_selected();
        app.input.clear();
        app.submit_input();
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.store.all()[0].text, "original");
    }

    #[test]
    fn selection_clamps_when_filter_shrinks_view() {
        let mut app = app_with(&["a", "b", "c"]);
        app.selected = 2;
        let id = app.store.all()[0].id;
        app.store.toggle(id);
        app.set_filter(Filter::Completed);
        assert_eq!(app.selected, 0);
        assert_eq!(app.store.visible().len(), 1);
    }

    #[test]
    fn delete_moves_selection_up() {
        let mut app = app_with(&["a", "b"]);
        app.selected = 1;
        app.delete_selected();
        assert_eq!(app.selected, 0);
        assert_eq!(app.store.all().len(), 1);
    }

    #[test]
    fn toggle_all_status_reflects_direction() {
        let mut app = app_with(&["a", "b"]);
        app.toggle_all();
        assert_eq!(app.status.as_deref(), Some("Completed all"));
        app.toggle_all();
        assert_eq!(app.status.as_deref(), Some("Reopened all"));
    }
}
