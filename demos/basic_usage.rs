//! Demo: Basic task list operations
//!
//! This demo walks through adding, completing, searching, sorting and
//! deleting tasks with `TaskStore`.
//!
//! Run with: cargo run --example basic_usage

use eyre::Result;
use tasklist::{NewTask, SearchQuery, SortKey, TaskEdit, TaskStore};

fn main() -> Result<()> {
    // Create a temporary directory for this demo
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("tasks.json");

    println!("Task List Basic Usage Demo");
    println!("==========================\n");
    println!("Task file: {}\n", path.display());

    let mut store = TaskStore::open(&path);

    // ADD
    println!("1. ADD - Adding three tasks...");
    store.add(NewTask::new("Write design doc", "medium", "2025-03-15").category("Work"))?;
    store.add(NewTask::new("Buy milk", "low", "2025-01-02"))?;
    let (index, task) = store.add(NewTask::new("File taxes", "high", "2025-04-15").category("Personal"))?;
    println!("   Last task is #{}: {}\n", index, task);

    // COMPLETE
    println!("2. COMPLETE - Completing task #2...");
    let task = store.complete(2)?;
    println!("   '{}' completed = {}\n", task.name, task.completed);

    // SEARCH
    println!("3. SEARCH - Tasks mentioning 'design'...");
    for (index, task) in store.search(&SearchQuery::keyword("design")) {
        println!("   #{} {}", index, task.name);
    }
    println!();

    // EDIT
    println!("4. EDIT - Moving the deadline of task #1...");
    let task = store.edit(1, &TaskEdit::default().deadline("2025-03-01"))?;
    println!("   {}\n", task);

    // SORT
    println!("5. SORT - Ordering by priority...");
    store.sort_by(SortKey::Priority)?;
    for (index, task) in store.view() {
        println!("   #{} [{}] {}", index, task.priority, task.name);
    }
    println!();

    // DELETE
    println!("6. DELETE - Removing task #3...");
    let removed = store.delete(3)?;
    println!("   Removed '{}', {} tasks left\n", removed.name, store.len());

    // Reopen to show everything was persisted
    let reopened = TaskStore::open(&path);
    println!("Reopened store holds {} tasks", reopened.len());

    println!("\nDemo complete!");
    Ok(())
}
