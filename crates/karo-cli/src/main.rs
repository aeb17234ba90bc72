use anyhow::{Context, Result};
use clap::Parser;
use karo_core::app::App;
use karo_core::error::CoreError;
use karo_core::supabase::SupabaseClient;
use owo_colors::{OwoColorize, Style};

mod cli;
mod commands;
mod config;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    if let Err(e) = cli::init_tracing(cli.verbose, cli.quiet) {
        eprintln!("{} {}", "Error:".red().bold(), e);
    }

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    let config = config::Config::new(cli.config.as_deref()).context(
        "failed to load configuration; set KARO_SUPABASE_URL and KARO_SUPABASE_ANON_KEY or write karo.toml",
    )?;
    let client = SupabaseClient::new(config.supabase())?;
    let mut app = App::new(client);

    match cli.command {
        cli::Commands::Login(command) => commands::auth::login(&mut app, command).await,
        cli::Commands::Signup(command) => commands::auth::signup(&mut app, command).await,
        cli::Commands::Logout => commands::auth::logout(&mut app).await,
        cli::Commands::Status => commands::status::show_status(&app).await,
        cli::Commands::List => commands::list::list_tasks(&mut app).await,
        cli::Commands::Add(command) => commands::add::add_task(&mut app, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_task(&mut app, command).await,
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::NotSignedIn) => {
            eprintln!(
                "{} Not signed in. Run {} first.",
                "Error:".style(error_style),
                "karo login".yellow()
            );
        }
        Some(CoreError::NotFound(s)) => {
            eprintln!("{} {}", "Error:".style(error_style), s);
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        Some(CoreError::Backend(s)) => {
            views::table::display_error_banner(s);
        }
        _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
