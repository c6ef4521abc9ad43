// tasklist - personal task list persisted to a JSON file

pub mod config;
pub mod error;
pub mod filter;
pub mod json_file;
pub mod models;
pub mod report;
pub mod shell;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use error::{Result, StoreError};
pub use filter::SearchQuery;
pub use models::{DEFAULT_CATEGORY, NewTask, SortKey, Task, TaskEdit, priority_rank};
pub use report::{Reporter, TermReporter};
pub use shell::Shell;
pub use store::{StoreOptions, TaskStore};
