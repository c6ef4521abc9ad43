use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use std::io;
use std::path::PathBuf;
use tasklist::{Config, NewTask, Reporter, SearchQuery, Shell, TaskEdit, TaskStore, TermReporter};
use tracing::Level;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Personal task list kept in a JSON file")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Task file (default: data_file from the config, else ./tasks.json)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Config file (default: <config dir>/tasklist/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        name: String,
        #[arg(short, long)]
        priority: String,
        /// Deadline as YYYY-MM-DD
        #[arg(short, long)]
        deadline: String,
        /// Category (default: General)
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// List all tasks
    List,

    /// Mark a task completed
    Complete { number: usize },

    /// Delete a task
    Delete { number: usize },

    /// Search by keyword in the name, or by priority
    Search {
        #[arg(short, long, required_unless_present = "priority")]
        keyword: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Change a task's name, priority or deadline
    Edit {
        number: usize,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(short, long)]
        deadline: Option<String>,
    },

    /// Reorder tasks by deadline, priority or name
    Sort {
        #[arg(default_value = "deadline")]
        by: String,
    },

    /// Interactive menu (the default)
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Setup tracing
    let level = if cli.verbose { Level::DEBUG } else { config.level()? };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let data_file = cli.file.unwrap_or_else(|| config.data_file.clone());
    let mut store = TaskStore::open_with(&data_file, config.store_options());
    let mut reporter = TermReporter::stdout();

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Add {
            name,
            priority,
            deadline,
            category,
        } => {
            if name.trim().is_empty() {
                eyre::bail!("Task name cannot be empty");
            }
            let mut new_task = NewTask::new(name, priority, deadline);
            new_task.category = category;
            let (index, task) = store.add(new_task)?;
            reporter.success(&format!(
                "Task #{} '{}' added successfully under category '{}'!",
                index, task.name, task.category
            ));
        }
        Commands::List => {
            if store.is_empty() {
                reporter.error("No tasks available.");
            } else {
                let rows: Vec<_> = store.view().collect();
                reporter.tasks(&rows);
            }
        }
        Commands::Complete { number } => {
            let task = store.complete(number)?;
            reporter.success(&format!("Task '{}' marked as completed.", task.name));
        }
        Commands::Delete { number } => {
            let task = store.delete(number)?;
            reporter.success(&format!("Task '{}' deleted successfully.", task.name));
        }
        Commands::Search { keyword, priority } => {
            let results = store.search(&SearchQuery { keyword, priority });
            if results.is_empty() {
                reporter.error("No matching tasks found.");
            } else {
                reporter.tasks(&results);
            }
        }
        Commands::Edit {
            number,
            name,
            priority,
            deadline,
        } => {
            let task = store.edit(number, &TaskEdit { name, priority, deadline })?;
            reporter.success(&format!("Task updated successfully: {}", task));
        }
        Commands::Sort { by } => {
            let key = store.sort(&by)?;
            reporter.success(&format!("Tasks sorted by {}.", key));
        }
        Commands::Shell => {
            let stdin = io::stdin();
            let mut shell = Shell::new(stdin.lock(), reporter);
            shell
                .run(&mut store)
                .wrap_err_with(|| format!("Failed to save tasks to {}", data_file.display()))?;
        }
    }

    Ok(())
}
