//! CLI entry point for the REST client.
//!
//! Issues a single authenticated call against the configured endpoint and
//! prints the JSON result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rest_client::{ClientOptions, RestClient};
use serde_json::{Value, json};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "rest_client")]
#[command(about = "Call a REST API with OAuth 1.0a, Basic or bearer auth", long_about = None)]
struct Cli {
    /// JSON options file; falls back to REST_CLIENT_* environment variables
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a resource
    Get {
        /// Resource path relative to the base URL
        path: String,
        /// Bearer token to use instead of the configured auth
        #[arg(short, long, default_value = "")]
        token: String,
    },
    /// POST a JSON body to a resource
    Post {
        path: String,
        /// JSON request body
        #[arg(short, long)]
        data: String,
        #[arg(short, long, default_value = "")]
        token: String,
    },
    /// PUT a JSON body to a resource
    Put {
        path: String,
        #[arg(short, long)]
        data: String,
        #[arg(short, long, default_value = "")]
        token: String,
    },
    /// PATCH a resource with a JSON body
    Patch {
        path: String,
        #[arg(short, long)]
        data: String,
        #[arg(short, long, default_value = "")]
        token: String,
    },
    /// DELETE a resource
    Delete {
        path: String,
        #[arg(short, long, default_value = "")]
        token: String,
    },
    /// Exchange customer credentials for a bearer token
    ConsumerToken {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rest_client.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rest_client.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => ClientOptions::load(path)?,
        None => ClientOptions::from_env()?,
    };
    let client = RestClient::new(options).context("Failed to configure REST client")?;

    let result = match cli.command {
        Commands::Get { path, token } => client.get(&path, &token).await?,
        Commands::Post { path, data, token } => client.post(&path, parse_data(&data)?, &token).await?,
        Commands::Put { path, data, token } => client.put(&path, parse_data(&data)?, &token).await?,
        Commands::Patch { path, data, token } => {
            client.patch(&path, parse_data(&data)?, &token).await?
        }
        Commands::Delete { path, token } => client.delete(&path, &token).await?,
        Commands::ConsumerToken { username, password } => {
            client
                .consumer_token(json!({ "username": username, "password": password }))
                .await?
        }
    };

    info!("API call succeeded");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Parses a `--data` argument as JSON.
fn parse_data(data: &str) -> Result<Value> {
    serde_json::from_str(data).with_context(|| format!("--data is not valid JSON: {data}"))
}
