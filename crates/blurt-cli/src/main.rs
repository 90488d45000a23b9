//! `blurt`: post short thoughts from the command line.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let global_profile = cli.profile.as_deref();

    match cli.command {
        Some(Commands::Add { title, content }) => {
            commands::add::run_add(&title, &content, global_profile).await
        }
        Some(Commands::List { limit, json }) => {
            commands::list::run_list(limit, json, global_profile).await
        }
        Some(Commands::Edit { id, title }) => {
            commands::edit::run_edit(&id, title.as_deref(), global_profile).await
        }
        Some(Commands::Delete { id }) => commands::delete::run_delete(&id, global_profile).await,
        Some(Commands::Completions { shell, output }) => {
            commands::completions::run_completions(shell, output)
        }
        Some(Commands::Config { command }) => commands::config::run_config(command, global_profile),
        Some(Commands::Auth { command }) => {
            commands::auth_cmd::run_auth(command, global_profile).await
        }
        None => {
            if cli.post.is_empty() {
                Cli::command().print_help()?;
                println!();
                return Ok(());
            }
            // Quick capture: the bare args become the title and the
            // content comes from stdin or the editor.
            let title = cli.post.join(" ");
            commands::add::run_add(&title, &[], global_profile).await
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive("blurt=info".parse().unwrap()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
