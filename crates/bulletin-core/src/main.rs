//! `bulletin`: run one handler or print a stored collection from the command line

use anyhow::Context;
use bulletin_core::prelude::*;
use bulletin_notify::{LogMailer, LogTopic};
use bulletin_store::{Collection, FsBlobStore};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bulletin", version, about = "Campus bulletin: events, registrations and newsletter")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one handler against a single request
    Invoke {
        #[arg(value_enum)]
        target: Target,

        /// HTTP method of the simulated request
        #[arg(long, default_value = "POST")]
        method: String,

        /// JSON request body; `-` or absent reads stdin
        #[arg(long)]
        body: Option<String>,
    },
    /// Print a stored collection
    Show {
        #[arg(value_enum)]
        collection: CollectionArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    Events,
    Registrations,
    Subscribe,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CollectionArg {
    Events,
    Subscribers,
    Registrations,
}

impl From<CollectionArg> for Collection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Events => Collection::Events,
            CollectionArg::Subscribers => Collection::Subscribers,
            CollectionArg::Registrations => Collection::Registrations,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_body(body: Option<String>, method: &str) -> anyhow::Result<Option<String>> {
    match body.as_deref() {
        Some("-") => {}
        Some(_) => return Ok(body),
        None if method == "OPTIONS" => return Ok(None),
        None => {}
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading request body from stdin")?;
    Ok(Some(text))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = BulletinConfig::from_env().context("loading configuration")?;
    tracing::debug!(?config, version = bulletin_core::VERSION, "configuration loaded");

    let transports = Transports::new()
        .with_topic(Arc::new(LogTopic::new(config.topic.clone().unwrap_or_default())))
        .with_mailer(Arc::new(LogMailer));
    let blobs = Arc::new(FsBlobStore::new(config.data_dir.clone()));
    let services = Arc::new(Services::from_config(&config, blobs, transports));

    match cli.command {
        Command::Invoke {
            target,
            method,
            body,
        } => {
            let request = ApiRequest {
                body: read_body(body, &method)?,
                http_method: method,
            };
            let handlers = Handlers::new(services);
            let response = match target {
                Target::Events => handlers.events.handle(&request).await,
                Target::Registrations => handlers.registrations.handle(&request).await,
                Target::Subscribe => handlers.subscriptions.handle(&request).await,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Show { collection } => {
            let records: Vec<Value> = services
                .store()
                .load(collection.into())
                .await
                .with_context(|| format!("loading {}", Collection::from(collection)))?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
