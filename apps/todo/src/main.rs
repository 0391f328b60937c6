//! Terminal front end for the to-do list.
//!
//! Reads commands from stdin, one per line, and prints the screen after
//! each. Type `help` for the command list.

use anyhow::Context;
use recall_todo::shell::{Command, HELP};
use recall_todo::{Config, HttpUserDirectory, TodoAction, TodoApp, TodoEnvironment};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recall_todo=info,recall_runtime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("Invalid configuration")?;
    tracing::info!(
        base_url = %config.user_api_base_url,
        user_id = config.user_id,
        "Starting to-do shell"
    );

    let users = Arc::new(HttpUserDirectory::new(config.user_api_base_url.clone()));
    let app = TodoApp::new(TodoEnvironment::new(users, config.user_id));

    // Print a fresh screen whenever the user name resolves in the background
    let mut changes = app.store().changes();
    let printer = app.clone();
    let announcer = tokio::spawn(async move {
        let mut resolved = false;
        while changes.changed().await.is_ok() {
            let now = printer.store().state(|s| s.user_name.is_resolved()).await;
            if now && !resolved {
                println!("\n{}", printer.render().await);
            }
            resolved = now;
        }
    });

    app.send_all([TodoAction::LoadUserName]).await?;
    println!("{}", app.render().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                println!("{error}");
                continue;
            },
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Show(section) => print!("{}", app.render_section(section).await),
            other => {
                app.send_all(other.actions()).await?;
                println!("{}", app.render().await);
            },
        }
    }

    announcer.abort();
    if let Err(error) = app.store().shutdown(config.shutdown_timeout).await {
        tracing::warn!(%error, "Exiting with effects still running");
    }

    Ok(())
}
