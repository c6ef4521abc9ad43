// Task store: an ordered task list persisted as a JSON file

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::filter::SearchQuery;
use crate::json_file;
use crate::models::{NewTask, SortKey, Task, TaskEdit};

/// Options controlling how a [`TaskStore`] persists its tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Write through a temporary file and rename it into place
    pub atomic_writes: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { atomic_writes: true }
    }
}

/// Ordered task list backed by a JSON file
///
/// Tasks are addressed by their 1-based display index, which is their
/// current position plus one. Indices shift whenever a task is deleted or
/// the list is sorted. Every mutating operation writes the whole list back
/// to the file before returning.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    options: StoreOptions,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Open the store backed by `path`, loading any tasks already there
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::open_with(path, StoreOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: StoreOptions) -> Self {
        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            options,
            tasks: Vec::new(),
        };
        store.load();
        store
    }

    /// Get the path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get the task at a 1-based display index
    pub fn get(&self, index: usize) -> Option<&Task> {
        index.checked_sub(1).and_then(|pos| self.tasks.get(pos))
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Replace the in-memory list with the contents of the backing file.
    ///
    /// A missing file gives an empty list. A file that cannot be read or
    /// parsed is logged and also gives an empty list; this never fails.
    pub fn load(&mut self) {
        self.tasks = match json_file::read_tasks(&self.path) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(file = ?self.path, error = %e, "Failed to load tasks, starting with an empty list");
                Vec::new()
            }
        };
    }

    /// Write the full list to the backing file
    pub fn save(&self) -> Result<()> {
        json_file::write_tasks(&self.path, &self.tasks, self.options.atomic_writes)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Append a new pending task and persist.
    ///
    /// Returns the display index assigned to the task. If the save fails the
    /// task is not kept.
    pub fn add(&mut self, new_task: NewTask) -> Result<(usize, &Task)> {
        let task = Task::from(new_task);
        info!(name = %task.name, category = %task.category, "Adding task");
        self.tasks.push(task);
        self.save_or_revert(|tasks| {
            tasks.pop();
        })?;

        let index = self.tasks.len();
        Ok((index, &self.tasks[index - 1]))
    }

    /// Iterate over `(display index, task)` pairs in current order
    pub fn view(&self) -> impl Iterator<Item = (usize, &Task)> + '_ {
        self.tasks.iter().enumerate().map(|(pos, task)| (pos + 1, task))
    }

    /// Mark the task at `index` completed and persist
    pub fn complete(&mut self, index: usize) -> Result<&Task> {
        let pos = self.position(index)?;
        let previous = self.tasks[pos].clone();
        self.tasks[pos].mark_completed();
        self.save_or_revert(|tasks| tasks[pos] = previous)?;

        debug!(index, "Task completed");
        Ok(&self.tasks[pos])
    }

    /// Remove the task at `index` and persist, returning the removed task.
    ///
    /// If the save fails the task is put back where it was.
    pub fn delete(&mut self, index: usize) -> Result<Task> {
        let pos = self.position(index)?;
        let removed = self.tasks.remove(pos);
        self.save_or_revert(|tasks| tasks.insert(pos, removed.clone()))?;

        info!(index, name = %removed.name, "Task deleted");
        Ok(removed)
    }

    /// Tasks matching `query`, in current order, with their display indices
    pub fn search(&self, query: &SearchQuery) -> Vec<(usize, &Task)> {
        if query.is_empty() {
            return Vec::new();
        }
        self.view().filter(|(_, task)| query.matches(task)).collect()
    }

    /// Overwrite the supplied fields of the task at `index` and persist
    pub fn edit(&mut self, index: usize, changes: &TaskEdit) -> Result<&Task> {
        let pos = self.position(index)?;
        let previous = self.tasks[pos].clone();
        let changed = changes.apply(&mut self.tasks[pos]);
        self.save_or_revert(|tasks| tasks[pos] = previous)?;

        debug!(index, changed, "Task edited");
        Ok(&self.tasks[pos])
    }

    /// Reorder tasks by the key named `by` and persist.
    ///
    /// An unknown key returns [`StoreError::InvalidOption`] and leaves the
    /// order as it was.
    pub fn sort(&mut self, by: &str) -> Result<SortKey> {
        let key: SortKey = by.parse()?;
        self.sort_by(key)?;
        Ok(key)
    }

    /// Stable sort by `key`, then persist. A failed save restores the old order.
    pub fn sort_by(&mut self, key: SortKey) -> Result<()> {
        let previous = self.tasks.clone();
        match key {
            SortKey::Deadline => self.tasks.sort_by(|a, b| a.deadline.cmp(&b.deadline)),
            SortKey::Priority => self.tasks.sort_by_key(Task::priority_rank),
            SortKey::Name => self.tasks.sort_by_cached_key(|task| task.name.to_lowercase()),
        }
        self.save_or_revert(|tasks| *tasks = previous)?;

        info!(by = %key, "Tasks sorted");
        Ok(())
    }

    // Persist, undoing the in-memory change if the write fails
    fn save_or_revert(&mut self, revert: impl FnOnce(&mut Vec<Task>)) -> Result<()> {
        if let Err(e) = self.save() {
            warn!(file = ?self.path, error = %e, "Save failed, reverting in-memory change");
            revert(&mut self.tasks);
            return Err(e);
        }
        Ok(())
    }

    fn position(&self, index: usize) -> Result<usize> {
        match index.checked_sub(1) {
            Some(pos) if pos < self.tasks.len() => Ok(pos),
            _ => Err(StoreError::NotFound {
                index,
                len: self.tasks.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(temp: &TempDir, tasks: &[(&str, &str, &str)]) -> TaskStore {
        let mut store = TaskStore::open(temp.path().join("tasks.json"));
        for (name, priority, deadline) in tasks {
            store.add(NewTask::new(*name, *priority, *deadline)).unwrap();
        }
        store
    }

    fn names(store: &TaskStore) -> Vec<&str> {
        store.view().map(|(_, task)| task.name.as_str()).collect()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path().join("tasks.json"));

        assert!(store.is_empty());
        assert_eq!(store.view().count(), 0);
        assert!(!temp.path().join("tasks.json").exists());
    }

    #[test]
    fn test_open_malformed_file_resets_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        fs::write(&path, "[{\"name\": \"half written\"").unwrap();

        let store = TaskStore::open(&path);
        assert!(store.is_empty());
        // The bad file is left alone until the next save
        assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"name\": \"half written\"");
    }

    #[test]
    fn test_add_persists_and_returns_index() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(&temp, &[("First", "high", "2025-01-01")]);

        let (index, task) = store
            .add(NewTask::new("Second", "low", "2025-02-01").category("Home"))
            .unwrap();
        assert_eq!(index, 2);
        assert_eq!(task.category, "Home");
        assert!(!task.completed);

        let reopened = TaskStore::open(store.path());
        assert_eq!(names(&reopened), vec!["First", "Second"]);
    }

    #[test]
    fn test_add_allows_duplicate_names() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &[("Same", "low", "2025-01-01"), ("Same", "low", "2025-01-01")]);

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_view_is_one_based() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &[("a", "low", "2025-01-01"), ("b", "low", "2025-01-02")]);

        let indices: Vec<usize> = store.view().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(store.get(1).unwrap().name, "a");
        assert!(store.get(0).is_none());
        assert!(store.get(3).is_none());
    }

    #[test]
    fn test_complete_only_touches_target() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(
            &temp,
            &[("a", "low", "2025-01-01"), ("b", "high", "2025-01-02"), ("c", "medium", "2025-01-03")],
        );
        let before: Vec<Task> = store.view().map(|(_, t)| t.clone()).collect();

        let task = store.complete(2).unwrap();
        assert_eq!(task.name, "b");
        assert!(task.completed);

        let reopened = TaskStore::open(store.path());
        for (i, task) in reopened.view() {
            if i == 2 {
                let mut expected = before[1].clone();
                expected.completed = true;
                assert_eq!(task, &expected);
            } else {
                assert_eq!(task, &before[i - 1]);
            }
        }
    }

    #[test]
    fn test_complete_out_of_range() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(
            &temp,
            &[("a", "low", "2025-01-01"), ("b", "low", "2025-01-02"), ("c", "low", "2025-01-03")],
        );

        assert!(matches!(
            store.complete(99),
            Err(StoreError::NotFound { index: 99, len: 3 })
        ));
        assert!(matches!(store.complete(0), Err(StoreError::NotFound { index: 0, .. })));
        assert!(store.view().all(|(_, t)| !t.completed));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_delete_shifts_following_tasks() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(
            &temp,
            &[("a", "low", "2025-01-01"), ("b", "low", "2025-01-02"), ("c", "low", "2025-01-03")],
        );

        let removed = store.delete(2).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap().name, "c");

        let reopened = TaskStore::open(store.path());
        assert_eq!(names(&reopened), vec!["a", "c"]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(&temp, &[("a", "low", "2025-01-01")]);

        assert!(matches!(store.delete(2), Err(StoreError::NotFound { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_search_by_keyword() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &[("Design doc", "high", "2025-01-01"), ("Deploy script", "low", "2025-01-02")]);

        let results = store.search(&SearchQuery::keyword("design"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 1);
        assert_eq!(results[0].1.name, "Design doc");
    }

    #[test]
    fn test_search_keyword_or_priority_without_duplicates() {
        let temp = TempDir::new().unwrap();
        let store = store_with(
            &temp,
            &[
                ("Design doc", "high", "2025-01-01"),
                ("Deploy script", "low", "2025-01-02"),
                ("Fix bug", "HIGH", "2025-01-03"),
            ],
        );

        let results = store.search(&SearchQuery::keyword("design").with_priority("high"));
        let indices: Vec<usize> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_search_without_criteria_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_with(&temp, &[("a", "low", "2025-01-01")]);

        assert!(store.search(&SearchQuery::default()).is_empty());
    }

    #[test]
    fn test_edit_supplied_fields_only() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(&temp, &[("Draft", "low", "2025-01-01")]);

        let task = store
            .edit(1, &TaskEdit::default().name("Final draft").deadline("2025-06-30"))
            .unwrap();
        assert_eq!(task.name, "Final draft");
        assert_eq!(task.priority, "low");
        assert_eq!(task.deadline, "2025-06-30");

        let reopened = TaskStore::open(store.path());
        assert_eq!(reopened.get(1).unwrap().name, "Final draft");
    }

    #[test]
    fn test_edit_out_of_range() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(&temp, &[("Draft", "low", "2025-01-01")]);

        let result = store.edit(5, &TaskEdit::default().name("x"));
        assert!(matches!(result, Err(StoreError::NotFound { index: 5, len: 1 })));
        assert_eq!(store.get(1).unwrap().name, "Draft");
    }

    #[test]
    fn test_sort_by_priority_is_stable() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(
            &temp,
            &[
                ("one", "low", "2025-01-01"),
                ("two", "high", "2025-01-01"),
                ("three", "medium", "2025-01-01"),
                ("four", "high", "2025-01-01"),
                ("five", "someday", "2025-01-01"),
            ],
        );

        store.sort("priority").unwrap();
        assert_eq!(names(&store), vec!["two", "four", "three", "one", "five"]);
    }

    #[test]
    fn test_sort_by_deadline() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(
            &temp,
            &[("late", "low", "2025-12-01"), ("early", "low", "2025-01-15"), ("mid", "low", "2025-06-01")],
        );

        store.sort("deadline").unwrap();
        assert_eq!(names(&store), vec!["early", "mid", "late"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(
            &temp,
            &[("banana", "low", "2025-01-01"), ("Apple", "low", "2025-01-01"), ("cherry", "low", "2025-01-01")],
        );

        store.sort("name").unwrap();
        assert_eq!(names(&store), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_persists_order() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(&temp, &[("b", "low", "2025-02-01"), ("a", "low", "2025-01-01")]);

        store.sort_by(SortKey::Deadline).unwrap();

        let reopened = TaskStore::open(store.path());
        assert_eq!(names(&reopened), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_invalid_option_keeps_order() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(&temp, &[("b", "low", "2025-02-01"), ("a", "high", "2025-01-01")]);

        let result = store.sort("category");
        assert!(matches!(result, Err(StoreError::InvalidOption(_))));
        assert_eq!(names(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_save_failure_propagates() {
        let temp = TempDir::new().unwrap();
        let mut store = TaskStore::open(temp.path().join("missing-dir/tasks.json"));

        let result = store.add(NewTask::new("a", "low", "2025-01-01"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_save_leaves_memory_unchanged() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("data");
        fs::create_dir(&dir).unwrap();
        let mut store = TaskStore::open(dir.join("tasks.json"));
        store.add(NewTask::new("keep", "low", "2025-02-01")).unwrap();
        store.add(NewTask::new("also keep", "high", "2025-01-01")).unwrap();
        let before: Vec<Task> = store.view().map(|(_, t)| t.clone()).collect();

        fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(
            store.add(NewTask::new("ghost", "low", "2025-01-01")),
            Err(StoreError::Io { .. })
        ));
        assert_eq!(store.len(), 2);

        assert!(matches!(store.delete(1), Err(StoreError::Io { .. })));
        assert_eq!(names(&store), vec!["keep", "also keep"]);

        assert!(matches!(store.complete(1), Err(StoreError::Io { .. })));
        assert!(matches!(
            store.edit(2, &TaskEdit::default().name("renamed")),
            Err(StoreError::Io { .. })
        ));
        assert!(matches!(store.sort("deadline"), Err(StoreError::Io { .. })));

        let after: Vec<Task> = store.view().map(|(_, t)| t.clone()).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_sort_by_deadline_keeps_ties_in_order() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(
            &temp,
            &[
                ("first", "low", "2025-05-01"),
                ("second", "high", "2025-03-01"),
                ("third", "medium", "2025-05-01"),
                ("fourth", "low", "2025-03-01"),
            ],
        );

        store.sort("deadline").unwrap();
        assert_eq!(names(&store), vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn test_sort_by_name_keeps_case_variants_in_order() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with(
            &temp,
            &[
                ("report", "low", "2025-01-01"),
                ("Budget", "low", "2025-01-02"),
                ("REPORT", "high", "2025-01-03"),
                ("Report", "medium", "2025-01-04"),
            ],
        );

        store.sort("name").unwrap();
        assert_eq!(names(&store), vec!["Budget", "report", "REPORT", "Report"]);
    }

    #[test]
    fn test_non_atomic_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        let options = StoreOptions { atomic_writes: false };

        let mut store = TaskStore::open_with(&path, options);
        store.add(NewTask::new("a", "low", "2025-01-01")).unwrap();

        let reopened = TaskStore::open_with(&path, options);
        assert_eq!(names(&reopened), vec!["a"]);
    }
}
