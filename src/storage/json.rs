use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{error, warn};

use super::TodoStorage;
use crate::domain::todo::Todo;

/// File-backed storage: one JSON array holding the whole collection,
/// rewritten wholesale on every save.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn open_default() -> Result<Self> {
        Self::open(default_data_path()?)
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data dir {}", parent.display()))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<Vec<Todo>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let doc: Value = serde_json::from_str(&raw).context("stored todos are not valid JSON")?;
        let Value::Array(records) = doc else {
            bail!("stored todos are not a JSON array");
        };
        let mut todos = Vec::with_capacity(records.len());
        for record in records {
            match decode_record(record) {
                Ok(todo) => todos.push(todo),
                Err(err) => warn!("skipping malformed todo record: {err:#}"),
            }
        }
        Ok(todos)
    }

    fn try_save(&self, todos: &[Todo]) -> Result<()> {
        let body = serde_json::to_string_pretty(todos).context("failed to encode todos")?;
        // Write to a sibling and rename, so a failed write never clobbers
        // the previous snapshot.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl TodoStorage for JsonFileStorage {
    fn load(&self) -> Vec<Todo> {
        if !self.path.exists() {
            return Vec::new();
        }
        match self.try_load() {
            Ok(todos) => todos,
            Err(err) => {
                warn!("discarding stored todos: {err:#}");
                Vec::new()
            }
        }
    }

    fn save(&mut self, todos: &[Todo]) {
        if let Err(err) = self.try_save(todos) {
            error!("failed to persist todos: {err:#}");
        }
    }
}

/// Strict per-record decode: a bad record is dropped instead of taking the
/// whole file down with it.
fn decode_record(record: Value) -> Result<Todo> {
    let mut todo: Todo = serde_json::from_value(record).context("record does not decode")?;
    if todo.text.trim().is_empty() {
        bail!("record {} has empty text", todo.id);
    }
    if todo.updated_at < todo.created_at {
        todo.updated_at = todo.created_at;
    }
    Ok(todo)
}

fn default_data_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data dir")?;
    Ok(base.join("tsugi").join("todos.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::todo::Priority;

    fn storage_in(dir: &tempfile::TempDir) -> JsonFileStorage {
        JsonFileStorage::open(dir.path().join("todos.json")).unwrap()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = storage_in(&dir);

        let mut todos = vec![
            Todo::new("Buy milk", Priority::Medium),
            Todo::new("Walk dog", Priority::High),
        ];
        todos[1].completed = true;
        todos[1].touch();

        storage.save(&todos);
        assert_eq!(storage.load(), todos);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        assert!(storage.load().is_empty());
    }

    #[test]
    fn load_garbage_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        fs::write(storage.path(), "not json {").unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn load_non_array_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        fs::write(storage.path(), "{\"todos\": []}").unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn bad_records_are_dropped_individually() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = storage_in(&dir);

        let keeper = Todo::new("Keep me", Priority::Low);
        storage.save(std::slice::from_ref(&keeper));

        // Splice in a record with a bogus priority and one with blank text.
        let mut doc: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
        let mut bad_priority = doc[0].clone();
        bad_priority["id"] = Value::String(uuid::Uuid::new_v4().to_string());
        bad_priority["priority"] = Value::String("urgent".into());
        let mut blank_text = doc[0].clone();
        blank_text["id"] = Value::String(uuid::Uuid::new_v4().to_string());
        blank_text["text"] = Value::String("   ".into());
        doc.push(bad_priority);
        doc.push(blank_text);
        fs::write(storage.path(), serde_json::to_string(&doc).unwrap()).unwrap();

        assert_eq!(storage.load(), vec![keeper]);
    }

    #[test]
    fn backwards_timestamps_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = storage_in(&dir);

        let mut todo = Todo::new("Time travel", Priority::Medium);
        todo.updated_at = todo.created_at - time::Duration::hours(1);
        storage.save(std::slice::from_ref(&todo));

        let loaded = storage.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].updated_at, loaded[0].created_at);
    }
}
