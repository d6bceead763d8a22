//! Waypoint CLI - edit a saved workflow from the command line.
//!
//! Opens the workflow stored under the configured key, applies JSON
//! commands or queries, and writes every committed change back.

mod logger;

use anyhow::{Context, Result};
use api::{execute_command, execute_query, Command, Query};
use builder::{Settings, WorkflowBuilder};
use clap::{Parser, Subcommand};
use interchange::FileSlot;
use log::LevelFilter;
use logger::WaypointLogger;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Waypoint CLI - inspect and edit workflow diagrams
#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Command-line interface for the Waypoint workflow builder")]
struct Cli {
    /// Settings file (JSON). Missing keys take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding saved workflows (default: ~/.waypoint/store)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the render snapshot of the workflow
    Show,

    /// List tasks waiting in the pool
    Pool,

    /// Print the node count
    Count,

    /// Execute a single JSON command
    Command {
        /// JSON command to execute
        json: String,
    },

    /// Execute a single JSON query
    Query {
        /// JSON query to execute
        json: String,
    },

    /// Interactive mode: one JSON command or query per line
    Repl,

    /// Discard the saved workflow and start over from the default graph
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_level != LevelFilter::Off {
        if let Err(e) = WaypointLogger::init(cli.log_level) {
            eprintln!("Logging disabled: {e:#}");
        }
    }

    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let store_dir = match cli.store {
        Some(dir) => dir,
        None => default_store_dir()?,
    };
    log::info!("Using workflow store at {}", store_dir.display());

    let mut builder = WorkflowBuilder::open(settings, Box::new(FileSlot::new(store_dir)));

    match cli.command {
        Commands::Show => run_query(&builder, Query::GetSnapshot),
        Commands::Pool => run_query(&builder, Query::GetPool),
        Commands::Count => run_query(&builder, Query::GetNodeCount),
        Commands::Command { json } => {
            let command: Command =
                serde_json::from_str(&json).with_context(|| "Invalid command JSON")?;
            print_json(&execute_command(&mut builder, command))
        }
        Commands::Query { json } => {
            let query: Query = serde_json::from_str(&json).with_context(|| "Invalid query JSON")?;
            run_query(&builder, query)
        }
        Commands::Repl => repl(&mut builder),
        Commands::Reset => {
            builder.reset();
            println!("Workflow reset to the default graph.");
            Ok(())
        }
    }
}

fn default_store_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find home directory; pass --store"))?;
    Ok(home.join(".waypoint").join("store"))
}

fn run_query(builder: &WorkflowBuilder, query: Query) -> Result<()> {
    print_json(&execute_query(builder, query))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read JSON lines from stdin until EOF or `quit`.
fn repl(builder: &mut WorkflowBuilder) -> Result<()> {
    println!("Enter commands (JSON) or 'help' for usage. Ctrl+D to exit.\n");
    let stdin = std::io::stdin();

    loop {
        print!("waypoint> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "help" | "?" => print_help(),
            "quit" | "exit" => break,
            "show" => run_query(builder, Query::GetSnapshot)?,
            "pool" => run_query(builder, Query::GetPool)?,
            "count" => run_query(builder, Query::GetNodeCount)?,
            _ => match api::execute_json(builder, input) {
                Ok(response) => println!("{}", response),
                Err(e) => println!("Invalid input: {}", e),
            },
        }
    }

    Ok(())
}

fn print_help() {
    println!("Waypoint Interactive Mode");
    println!("=========================");
    println!();
    println!("Built-in commands:");
    println!("  show        - Print the render snapshot");
    println!("  pool        - List tasks waiting in the pool");
    println!("  count       - Print the node count");
    println!("  help, ?     - Show this help");
    println!("  quit, exit  - Exit interactive mode");
    println!();
    println!("JSON Commands (examples):");
    println!("  {{\"type\": \"add_stage\", \"label\": \"Intake\", \"position\": [100, 100]}}");
    println!("  {{\"type\": \"drop_task\", \"entry_id\": \"task-verify-invoice\", \"pointer\": [120, 130]}}");
    println!("  {{\"type\": \"connect\", \"source\": \"branch-approved\", \"target\": \"stage-fulfilment\", \"source_handle\": \"true\"}}");
    println!("  {{\"type\": \"delete\", \"target\": {{\"node\": \"stage-review\"}}}}");
    println!();
    println!("JSON Queries:");
    println!("  {{\"type\": \"get_node\", \"id\": \"stage-intake\"}}");
    println!("  {{\"type\": \"get_nodes\", \"target\": {{\"query\": {{\"by_kind\": \"stage\"}}}}}}");
    println!("  {{\"type\": \"get_edit_session\"}}");
}
