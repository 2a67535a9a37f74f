//! # Yeelight Remote Entry Point

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use yeelight_remote::{
    app::App,
    config::ConfigLoader,
    error::AppError,
    models::EntryForm,
    shell::run_shell,
    telemetry::{init_tracing, redact_secret},
};

#[derive(Debug, Parser)]
#[command(name = "yeelight-remote", version, about = "Store and fire webhook actions")]
struct Cli {
    /// Overrides YEELIGHT_DATA_DIR.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print saved actions.
    List,
    /// Create an action, or update the one with the same name.
    Save {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        key: String,
        #[arg(long, default_value = "")]
        action: String,
    },
    /// Delete the action matching all three values.
    Delete {
        #[arg(long)]
        name: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        action: String,
    },
    /// Fire the webhook of the named action.
    Run { name: String },
    /// Clear all stored actions.
    Reset,
    /// Interactive session (default).
    Shell,
}

fn user_error(err: AppError) -> anyhow::Error {
    tracing::debug!(error = ?err, "Command failed");
    anyhow!(err.user_message())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    init_tracing(&config).context("initializing telemetry")?;
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(profile = %config.profile, config = %redacted_json, "Loaded configuration");
    }

    let app = App::from_config(&config).context("initializing application")?;

    match cli.command.unwrap_or(Command::Shell) {
        Command::List => {
            let entries = app.list().map_err(user_error)?;
            if entries.is_empty() {
                println!("No actions saved.");
            }
            for entry in entries {
                println!("{}\t{}\t{}", entry.name, entry.action, redact_secret(&entry.key));
            }
        }
        Command::Save { name, key, action } => {
            let form = EntryForm { name, key, action };
            app.save(&form).map_err(user_error)?;
            println!("Saved successfully!");
        }
        Command::Delete { name, key, action } => {
            let removed = app.delete(&name, &key, &action).map_err(user_error)?;
            if removed == 0 {
                println!("No matching action.");
            } else {
                println!("Deleted '{name}'.");
            }
        }
        Command::Run { name } => {
            // One-shot process: wait for the request task so it is not cut off.
            if let Some(request) = app.run(&name).map_err(user_error)? {
                let _ = request.await;
            }
            println!("Triggered '{name}'.");
        }
        Command::Reset => {
            app.reset().map_err(user_error)?;
            println!("Cleared stored actions.");
        }
        Command::Shell => {
            let mut controller = app.into_controller();
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            run_shell(&mut controller, stdin, &mut stdout)
                .await
                .context("running shell")?;
        }
    }

    Ok(())
}
