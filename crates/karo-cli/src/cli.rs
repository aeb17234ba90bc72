use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use karo_core::models::Field;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Karo: a personal task tracker backed by your Supabase project
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to read instead of ./karo.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in with email and password
    Login(LoginCommand),
    /// Create an account
    Signup(SignupCommand),
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Status,
    /// Show the task table
    List,
    /// Add a row to the task table
    Add(AddCommand),
    /// Edit one cell of the task table
    Edit(EditCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginCommand {
    #[arg(short, long)]
    pub email: Option<String>,
    /// Prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SignupCommand {
    #[arg(short, long)]
    pub username: String,
    #[arg(short, long)]
    pub email: String,
    /// Prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// Time range; defaults to an open range starting now (HH:MM - ∞)
    #[arg(long)]
    pub time: Option<String>,
    /// What the task is
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Comma-separated tags, e.g. "work, deep focus"
    #[arg(short, long)]
    pub tag: Option<String>,
}

impl AddCommand {
    /// Values given on the command line, in new-row cell order.
    pub fn values(&self) -> Vec<(Field, &str)> {
        Field::DRAFT_ORDER
            .iter()
            .filter_map(|field| {
                let value = match field {
                    Field::Time => self.time.as_deref(),
                    Field::Name => self.name.as_deref(),
                    Field::Notes => self.notes.as_deref(),
                    Field::Tag => self.tag.as_deref(),
                };
                value.map(|v| (*field, v))
            })
            .collect()
    }
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// Row number as shown by `karo list`
    pub row: usize,
    /// Column to edit: tag, time, name or notes
    pub field: Field,
    /// New cell text; tags are comma-separated
    pub value: String,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
