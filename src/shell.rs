// Interactive numbered-menu front end

use std::io::BufRead;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::filter::SearchQuery;
use crate::models::{NewTask, TaskEdit};
use crate::report::Reporter;
use crate::store::TaskStore;

const MENU: &str = "
Options:
[1] Add Task
[2] View Tasks
[3] Complete Task
[4] Delete Task
[5] Search Tasks
[6] Edit Task
[7] Sort Tasks
[8] Exit
";

/// Menu loop reading commands from `input` and reporting through `reporter`
pub struct Shell<R, P> {
    input: R,
    reporter: P,
    /// Set once a command has asked the store to change something
    touched: bool,
}

impl<R: BufRead, P: Reporter> Shell<R, P> {
    pub fn new(input: R, reporter: P) -> Self {
        Self {
            input,
            reporter,
            touched: false,
        }
    }

    pub fn into_reporter(self) -> P {
        self.reporter
    }

    /// Run until the user picks Exit or input ends.
    ///
    /// Errors from individual commands are reported and the loop goes on.
    /// On the way out the tasks are saved once more, but only if a command
    /// changed (or tried to change) the store this session. The only error
    /// returned is a failure of that final save.
    pub fn run(&mut self, store: &mut TaskStore) -> Result<()> {
        self.reporter.heading("Welcome to the Task Manager!");

        loop {
            self.reporter.info(MENU);
            let Some(choice) = self.ask("Choose an option [1/2/3/4/5/6/7/8] (1): ") else {
                break;
            };

            let outcome = match choice.as_str() {
                "" | "1" => self.add(store),
                "2" => {
                    self.view(store);
                    Some(())
                }
                "3" => self.complete(store),
                "4" => self.delete(store),
                "5" => self.search(store),
                "6" => self.edit(store),
                "7" => self.sort(store),
                "8" => break,
                _ => {
                    self.reporter.error("Invalid option. Please choose a valid number (1-8).");
                    Some(())
                }
            };

            if outcome.is_none() {
                debug!("Input closed");
                break;
            }
        }

        self.reporter.info("Exiting Task Manager. Goodbye!");
        if !self.touched {
            debug!("Nothing changed, skipping exit save");
            return Ok(());
        }
        store.save()
    }

    /// Prompt and read one trimmed line; `None` once input is exhausted
    fn ask(&mut self, prompt: &str) -> Option<String> {
        self.reporter.prompt(prompt);
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!(error = ?e, "Failed to read input");
                None
            }
        }
    }

    /// Ask for a task number; `Some(None)` when the answer is not a number
    fn ask_index(&mut self, prompt: &str) -> Option<Option<usize>> {
        let answer = self.ask(prompt)?;
        match answer.parse::<usize>() {
            Ok(index) => Some(Some(index)),
            Err(_) => {
                self.reporter.error("Invalid input!");
                Some(None)
            }
        }
    }

    fn report_failure(&mut self, err: &StoreError) {
        self.reporter.error(&err.to_string());
    }

    fn add(&mut self, store: &mut TaskStore) -> Option<()> {
        self.reporter.heading("Add New Task:");

        let name = loop {
            let name = self.ask("Enter task name: ")?;
            if !name.is_empty() {
                break name;
            }
            self.reporter.error("Task name cannot be empty.");
        };
        let priority = self.ask("Enter priority (high, medium, low): ")?;
        let deadline = self.ask("Enter deadline (YYYY-MM-DD): ")?;
        let category = self.ask("Enter category (e.g., Work, Personal, Study, or press Enter to skip): ")?;

        let mut new_task = NewTask::new(name, priority, deadline);
        if !category.is_empty() {
            new_task = new_task.category(category);
        }

        self.touched = true;
        match store.add(new_task) {
            Ok((_, task)) => {
                let message = format!(
                    "Task '{}' added successfully under category '{}'!",
                    task.name, task.category
                );
                self.reporter.success(&message);
            }
            Err(e) => self.report_failure(&e),
        }
        Some(())
    }

    fn view(&mut self, store: &TaskStore) {
        self.reporter.heading("View Tasks:");
        if store.is_empty() {
            self.reporter.error("No tasks available.");
            return;
        }
        let rows: Vec<_> = store.view().collect();
        self.reporter.tasks(&rows);
    }

    fn complete(&mut self, store: &mut TaskStore) -> Option<()> {
        self.view(store);
        if let Some(index) = self.ask_index("Enter the task number to complete: ")? {
            self.touched = true;
            match store.complete(index) {
                Ok(task) => {
                    let message = format!("Task '{}' marked as completed.", task.name);
                    self.reporter.success(&message);
                }
                Err(e) => self.report_failure(&e),
            }
        }
        Some(())
    }

    fn delete(&mut self, store: &mut TaskStore) -> Option<()> {
        self.view(store);
        if let Some(index) = self.ask_index("Enter the task number to delete: ")? {
            self.touched = true;
            match store.delete(index) {
                Ok(task) => self.reporter.success(&format!("Task '{}' deleted successfully.", task.name)),
                Err(e) => self.report_failure(&e),
            }
        }
        Some(())
    }

    fn search(&mut self, store: &TaskStore) -> Option<()> {
        self.reporter.heading("Search Tasks:");
        let query = match self.ask("Search by [1] Keyword or [2] Priority: ")?.as_str() {
            "1" => SearchQuery::keyword(self.ask("Enter keyword to search: ")?),
            "2" => SearchQuery::priority(self.ask("Enter priority (high, medium, low): ")?),
            _ => {
                self.reporter.error("Invalid choice!");
                return Some(());
            }
        };

        let results = store.search(&query);
        if results.is_empty() {
            self.reporter.error("No matching tasks found.");
        } else {
            self.reporter.heading("Search Results:");
            self.reporter.tasks(&results);
        }
        Some(())
    }

    fn edit(&mut self, store: &mut TaskStore) -> Option<()> {
        self.view(store);
        let Some(index) = self.ask_index("Enter the task number to edit: ")? else {
            return Some(());
        };
        let changes = TaskEdit {
            name: Some(self.ask("Enter new task name (or press Enter to skip): ")?),
            priority: Some(self.ask("Enter new priority (high, medium, low, or press Enter to skip): ")?),
            deadline: Some(self.ask("Enter new deadline (YYYY-MM-DD, or press Enter to skip): ")?),
        };

        self.touched = true;
        match store.edit(index, &changes) {
            Ok(_) => self.reporter.success("Task updated successfully!"),
            Err(e) => self.report_failure(&e),
        }
        Some(())
    }

    fn sort(&mut self, store: &mut TaskStore) -> Option<()> {
        self.reporter.heading("Sort Tasks:");
        let answer = self.ask("Choose [1] by Deadline, [2] by Priority, [3] by Name: ")?;
        let by = match answer.as_str() {
            "1" => "deadline",
            "2" => "priority",
            "3" => "name",
            other => other,
        };

        self.touched = true;
        match store.sort(by) {
            Ok(key) => self.reporter.success(&format!("Tasks sorted by {}.", key)),
            Err(e) => self.report_failure(&e),
        }
        Some(())
    }
}
