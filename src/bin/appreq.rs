//! Binary entry point for the appreq CLI.
//!
//! ## Usage
//!
//! ```bash
//! # List the modules offered for a file
//! appreq list --file src/server.js
//!
//! # Require a module in the file header (asks when --module is omitted)
//! appreq require --file src/server.js --module lodash
//!
//! # Insert at a byte offset instead, previewing only
//! appreq require --file src/server.js --module ./lib/db.js --cursor 120 --dry-run
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use appreq::cli::{run_derive, run_export, run_header, run_list, run_require, CliResponse};
use appreq::config::SettingsLoader;
use appreq::error::{AppreqError, OutputErrorCode};
use appreq::interaction::InteractionAdapter;
use appreq::output::{emit_response, ErrorResponse};
use appreq::terminal::{PresetAdapter, TerminalAdapter};

// ============================================================================
// CLI Structure
// ============================================================================

/// Keep require blocks sorted and grouped in JavaScript files.
///
/// All output on stdout is JSON; prompts and logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "appreq", version, about = "Require-statement bookkeeping")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Settings file applied over all other layers.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Fallback project root when no package.json is found above the file.
    ///
    /// Can be given several times; the first one is used.
    #[arg(long = "project-folder", global = true)]
    project_folders: Vec<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List local files, dependencies and core modules for a file.
    List {
        /// The active file.
        #[arg(long)]
        file: PathBuf,
    },
    /// Require a module (apply-by-default).
    Require {
        /// The file to edit.
        #[arg(long)]
        file: PathBuf,
        /// Module id or name to require (default: ask on the terminal).
        #[arg(long)]
        module: Option<String>,
        /// Insert at this byte offset instead of the header.
        #[arg(long)]
        cursor: Option<usize>,
        /// Preview changes without writing the file.
        #[arg(long)]
        dry_run: bool,
    },
    /// Export a top-level declaration.
    Export {
        /// The file to edit.
        #[arg(long)]
        file: PathBuf,
        /// Name to export (default: ask on the terminal).
        #[arg(long)]
        name: Option<String>,
        /// Byte offset used to preselect the declaration.
        #[arg(long)]
        cursor: Option<usize>,
        /// Preview changes without writing the file.
        #[arg(long)]
        dry_run: bool,
    },
    /// Insert the copyright header.
    Header {
        /// The file to edit.
        #[arg(long)]
        file: PathBuf,
        /// Preview changes without writing the file.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the identifier a module would be bound to.
    Derive {
        /// Module id, e.g. `./lib/foo-bar.js` or `child_process`.
        module: String,
        /// Treat the module as core.
        #[arg(long)]
        core: bool,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(response) => {
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();
            ExitCode::SUCCESS
        }
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON too
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Adapter answering with `preset` when given, else prompting.
fn adapter(preset: Option<String>) -> Box<dyn InteractionAdapter> {
    match preset {
        Some(value) => Box::new(PresetAdapter::new(value)),
        None => Box::new(TerminalAdapter::stdio()),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<CliResponse, AppreqError> {
    let loader = SettingsLoader::from_env()
        .with_cli_file(cli.global.settings)
        .with_project_folders(cli.global.project_folders);

    match cli.command {
        Command::List { file } => run_list(&loader, adapter(None).as_ref(), &file),
        Command::Require {
            file,
            module,
            cursor,
            dry_run,
        } => run_require(&loader, adapter(module).as_ref(), &file, cursor, dry_run),
        Command::Export {
            file,
            name,
            cursor,
            dry_run,
        } => run_export(adapter(name).as_ref(), &file, cursor, dry_run),
        Command::Header { file, dry_run } => run_header(&loader, &file, dry_run),
        Command::Derive { module, core } => run_derive(&loader, &module, core),
    }
}
