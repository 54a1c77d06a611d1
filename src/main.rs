//! # Brock
//!
//! A chatty personal task assistant for the terminal. Tell Brock what you need
//! to do and it keeps the list for you, saved as plain text between sessions.
//!
//! ## Usage
//!
//! Run without arguments to open the chat window:
//!
//! ```bash
//! brock
//! # or explicitly
//! brock ui
//! ```
//!
//! Other front ends:
//!
//! ```bash
//! # Line-based conversation on stdin/stdout
//! brock console
//!
//! # A single command
//! brock run deadline return book /by 2030-12-01 1800
//!
//! # Saved tasks as a table
//! brock list
//! ```
//!
//! ## Commands
//!
//! *   `todo <description>`
//! *   `deadline <description> /by <yyyy-mm-dd> [HHMM]`
//! *   `event <description> /from <yyyy-mm-dd> [HHMM] /to <yyyy-mm-dd> [HHMM]`
//! *   `mark <n>`, `unmark <n>`, `delete <n>`
//! *   `list`, `bye`
//!
//! ## Data Storage
//!
//! Tasks are saved in your local data directory:
//! *   Linux: `~/.local/share/brock/tasks.txt`
//! *   macOS: `~/Library/Application Support/brock/tasks.txt`
//! *   Windows: `%LOCALAPPDATA%\brock\tasks.txt`
//!
//! You can override this with `--file`, the `BROCK_SAVE_FILE` environment
//! variable, or `save_file` in `~/.config/brock/config.json`. A `brock.log`
//! is written next to the save file.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brock::commands::{cmd_console, cmd_list, cmd_run};
use brock::config::{resolve_save_path, Config};
use brock::storage::Storage;
use brock::tui::run_tui;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use log::LevelFilter;
use simplelog::WriteLogger;

#[derive(Parser)]
#[command(name = "brock")]
#[command(about = "Personal task assistant", long_about = None)]
struct Cli {
    /// Save file to use instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat window
    Ui,
    /// Chat on stdin/stdout
    Console,
    /// Run a single command, e.g. `brock run todo read book`
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        words: Vec<String>,
    },
    /// Show saved tasks as a table
    List,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let shell_enum = match shell.as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            "powershell" => Shell::PowerShell,
            "elvish" => Shell::Elvish,
            _ => anyhow::bail!("Unsupported shell: {}", shell),
        };
        let mut cmd = Cli::command();
        generate(shell_enum, &mut cmd, "brock", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load()?;
    let save_path = resolve_save_path(cli.file, &config);
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level()?
    };
    init_logging(&save_path, level)?;
    log::info!("Using save file {}", save_path.display());

    let storage = Storage::new(save_path);
    match cli.command {
        Some(Commands::Console) => cmd_console(storage),
        Some(Commands::Run { words }) => cmd_run(storage, words),
        Some(Commands::List) => cmd_list(storage),
        Some(Commands::Ui) | None => run_tui(storage).context("Error running TUI"),
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// Sends log records to `brock.log` beside the save file.
fn init_logging(save_path: &Path, level: LevelFilter) -> Result<()> {
    let log_path = save_path.with_file_name("brock.log");
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    WriteLogger::init(level, simplelog::Config::default(), file)
        .context("Failed to initialise logging")?;
    Ok(())
}
