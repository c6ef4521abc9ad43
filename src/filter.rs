// Search predicates over tasks

use crate::models::Task;

/// Search criteria for [`TaskStore::search`](crate::TaskStore::search).
///
/// A task matches when the keyword is a case-insensitive substring of its
/// name, or when its priority equals `priority` ignoring case. A query with
/// neither field set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub priority: Option<String>,
}

impl SearchQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            priority: None,
        }
    }

    pub fn priority(priority: impl Into<String>) -> Self {
        Self {
            keyword: None,
            priority: Some(priority.into()),
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keyword_filter().is_none() && self.priority_filter().is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        let keyword_match = self
            .keyword_filter()
            .is_some_and(|keyword| task.name.to_lowercase().contains(&keyword.to_lowercase()));
        keyword_match
            || self
                .priority_filter()
                .is_some_and(|priority| task.priority.to_lowercase() == priority.to_lowercase())
    }

    // Empty strings count as "not supplied"
    fn keyword_filter(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }

    fn priority_filter(&self) -> Option<&str> {
        self.priority.as_deref().filter(|p| !p.is_empty())
    }
}
