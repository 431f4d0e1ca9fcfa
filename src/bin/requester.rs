//! Command-line entry point.
//!
//! Executes a single request descriptor read from a JSON file and prints the
//! decoded response, the extracted values and (with `--debug`) the equivalent
//! curl command as one JSON document on stdout. Logs go to stderr.
//!
//! ```text
//! requester login.json --debug --set tenant=acme
//! ```

use clap::Parser;
use requester::config::{get_config, load_config_file};
use requester::{build_client, ExecutionError, RequestContext, Requester};
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "requester", version, about = "Execute a JSON request descriptor")]
struct Args {
    /// Path to the request descriptor (JSON)
    descriptor: PathBuf,

    /// Capture the equivalent curl command
    #[arg(long)]
    debug: bool,

    /// Request deadline in milliseconds (overrides the config)
    #[arg(long, value_name = "N")]
    timeout_ms: Option<u64>,

    /// Configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Placeholder value substituted into the URL, as KEY=VALUE
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    set: Vec<(String, String)>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<String, String> {
    let config = match &args.config {
        Some(path) => load_config_file(path).map_err(|e| e.to_string())?,
        None => get_config(),
    };

    let content = tokio::fs::read_to_string(&args.descriptor)
        .await
        .map_err(|e| format!("failed to read {}: {}", args.descriptor.display(), e))?;
    let mut requester: Requester = serde_json::from_str(&content)
        .map_err(|e| format!("invalid descriptor {}: {}", args.descriptor.display(), e))?;

    if !args.set.is_empty() {
        let values: HashMap<String, String> = args.set.into_iter().collect();
        let resolver = config.resolver().map_err(|e| e.to_string())?;
        requester.url = resolver.replace_flat(&values, &requester.url);
        debug!(url = %requester.url, "substituted URL placeholders");
    }

    let client = build_client(&config).map_err(|e| e.to_string())?;
    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.timeout_duration());
    let ctx = RequestContext::new().with_timeout(timeout);
    let debug = args.debug || config.debug;

    let interrupt = ctx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupted, cancelling request");
                interrupt.cancel();
            }
            Err(e) => error!(error = %e, "failed to install Ctrl-C handler"),
        }
    });

    let executed = requester
        .request(&client, &ctx, debug)
        .await
        .map_err(format_failure)?;

    let values = requester.parse_response(&executed.response);
    let output = json!({
        "response": executed.response,
        "values": values,
        "curl": executed.curl,
    });

    serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
}

fn format_failure(err: ExecutionError) -> String {
    match &err.curl {
        Some(curl) => format!("{}\n{}", err, curl),
        None => err.to_string(),
    }
}
