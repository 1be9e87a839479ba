//! `aniwheel` -- interactive anime picker.
//!
//! Browse a catalog of shows, put some on a wheel together with free-text
//! entries, and spin it. Reads one command per line from stdin; type `help`
//! for the command list. Configuration is read from the environment (see
//! [`config::AppConfig::from_env`]).

mod command;
mod config;
mod shell;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aniwheel_core::catalog::Catalog;
use aniwheel_core::session::SpinSession;
use aniwheel_lookup::detail::DetailResolver;
use aniwheel_lookup::jikan::JikanApi;
use aniwheel_lookup::youtube::YouTubeApi;

use crate::command::parse_command;
use crate::config::AppConfig;
use crate::shell::{describe_event, Reply, Shell};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aniwheel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env();

    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("loading catalog from {}", config.catalog_path.display()))?;

    let youtube = YouTubeApi::new(&config.youtube_url, config.youtube_api_key.clone());

    tracing::info!(
        catalog = %config.catalog_path.display(),
        entries = catalog.len(),
        settle_ms = config.settle_delay.as_millis() as u64,
        seeded = config.seed.is_some(),
        trailer_search = youtube.has_api_key(),
        "Starting aniwheel",
    );

    let session = Arc::new(SpinSession::from_config(catalog, &config.session_config()));
    let resolver = DetailResolver::new(
        Some(Arc::new(JikanApi::new(&config.jikan_url))),
        Some(Arc::new(youtube)),
    );

    let mut notifications = session.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                Ok(event) => println!("{}", describe_event(&event)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification printer lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let shell = Shell::new(Arc::clone(&session), resolver);
    println!("aniwheel ready. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match shell.execute(command).await {
            Reply::Print(text) => println!("{text}"),
            Reply::Quiet => {}
            Reply::Quit => break,
        }
    }

    printer.abort();
    tracing::info!("Goodbye");
    Ok(())
}
