//! Alumni session client - command-line entry point.

mod cli;
mod commands;

use std::sync::Arc;

use alumni_infrastructure::{ChannelEventSink, ClientConfig, SessionRuntime};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    tracing::debug!(?config, "configuration loaded");

    let (sink, mut events) = ChannelEventSink::new();
    let sink = Arc::new(sink);
    let runtime = SessionRuntime::open(config, sink.clone(), sink).await?;

    commands::run(&runtime, &mut events, cli.command).await
}
