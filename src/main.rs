//! gitquery - query a git repository's history with SQL

use anyhow::Result;
use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use gitquery::expression::FunctionRegistry;
use gitquery::output::{format_result, OutputFormat};
use gitquery::{Session, SessionConfig};
use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

const PROMPT: &str = "gitquery> ";

/// gitquery - run SQL queries against a git repository
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Query to run, e.g. "select hash, message from commits limit 5"
    query: Option<String>,

    /// Start an interactive shell
    #[arg(short, long)]
    interactive: bool,

    /// Path to the repository
    #[arg(short, long, default_value = ".", global = true)]
    path: PathBuf,

    /// Output format
    #[arg(
        short,
        long,
        alias = "type",
        value_enum,
        default_value_t = OutputFormat::Table,
        global = true
    )]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    // Older spellings of the subcommands
    #[arg(short = 'v', hide = true)]
    show_version: bool,

    #[arg(long, hide = true)]
    show_tables: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    /// The subcommand to run, also honoring the hidden flag spellings
    fn requested_command(&self) -> Option<Command> {
        if self.show_version {
            return Some(Command::Version);
        }
        if self.show_tables {
            return Some(Command::ShowTables);
        }
        self.command
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// List the tables and their fields
    #[command(alias = "s")]
    ShowTables,

    /// Print the version
    #[command(alias = "v")]
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut session = Session::new(
        SessionConfig::new(&args.path),
        FunctionRegistry::with_builtins(),
    );
    debug!("repository path: {}", args.path.display());

    match args.requested_command() {
        Some(Command::Version) => {
            println!("gitquery {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(Command::ShowTables) => {
            print_tables(&session);
            return Ok(());
        }
        None => {}
    }

    if args.interactive {
        return run_interactive(&mut session, args.format);
    }

    match args.query {
        Some(query) => {
            let table = session.execute(&query)?;
            println!("{}", format_result(&table, args.format)?);
        }
        None => Args::command().print_help()?,
    }

    Ok(())
}

fn print_tables(session: &Session) {
    println!("Tables:");
    println!();
    for table in session.catalog().list_tables() {
        println!("{}: {}", table.name, table.fields.join(", "));
    }
}

/// Read queries line by line until `exit`, `quit` or end of input
fn run_interactive(session: &mut Session, format: OutputFormat) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(line);

                if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                    break;
                }

                match session
                    .execute(line)
                    .and_then(|table| format_result(&table, format))
                {
                    Ok(text) => println!("{}", text),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            // Ctrl-C drops the current line only
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
