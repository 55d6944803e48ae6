//! CLI entry point for the CBQL gateway.

use std::env;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use cbql_gateway::config::ENV_BASE_URL;
use cbql_gateway::query::{AGENT_GUIDANCE, CBQL_GUIDANCE};
use cbql_gateway::{
    Credential, GatewayConfig, HttpGateway, ToolError, TrackerService, progress_channel, validate,
};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

mod cli;
mod progress_ui;

use cli::{Args, Command};

/// Environment variable holding the Authorization header value.
const ENV_TOKEN: &str = "CODEBEAMER_TOKEN";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stderr keeps stdout clean for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(command = ?args.command, "CLI arguments parsed");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", boundary_message(&error));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let connection = Connection {
        base_url: args.base_url,
        connect_timeout: args.connect_timeout,
        read_timeout: args.read_timeout,
        token: args.token,
    };

    match args.command {
        Command::Validate { cbql } => {
            let query = validate(&cbql).map_err(ToolError::from)?;
            println!("{query}");
        }
        Command::Guidance => {
            println!("{CBQL_GUIDANCE}");
            println!();
            println!("{AGENT_GUIDANCE}");
        }
        Command::Query {
            cbql,
            page_size,
            max_pages,
            no_progress,
        } => {
            let (mut service, credential, config) = connection.connect()?;
            if let Some(max_pages) = max_pages {
                service = service.with_paging(config.default_page_size, max_pages);
            }

            let use_spinner = !no_progress && !args.quiet && io::stderr().is_terminal();
            let (sink, stream) = progress_channel();
            let ui = progress_ui::spawn_progress_ui(use_spinner, stream);

            let result = service
                .query_items(&credential, &cbql, page_size, &sink)
                .await;
            drop(sink);
            if let Some(handle) = ui
                && let Err(error) = handle.await
            {
                debug!(%error, "progress UI task ended abnormally");
            }

            let result = result?;
            info!(total_count = result.total_count, "Query complete");
            print_json(&result)?;
        }
        Command::Projects => {
            let (service, credential, _) = connection.connect()?;
            print_json(&service.list_projects(&credential).await?)?;
        }
        Command::Trackers { project_id } => {
            let (service, credential, _) = connection.connect()?;
            print_json(&service.list_trackers(&credential, project_id).await?)?;
        }
        Command::Item { item_id } => {
            let (service, credential, _) = connection.connect()?;
            print_json(&service.get_item_details(&credential, item_id).await?)?;
        }
    }

    Ok(())
}

/// Connection flags that override the environment.
struct Connection {
    base_url: Option<String>,
    connect_timeout: Option<u64>,
    read_timeout: Option<u64>,
    token: Option<String>,
}

impl Connection {
    fn connect(&self) -> Result<(TrackerService<HttpGateway>, Credential, GatewayConfig)> {
        let config = self.load_config()?;
        let credential = self.load_credential()?;
        let gateway = HttpGateway::from_config(&config)?;
        debug!(base_url = %gateway.base_url(), "Gateway ready");
        let service = TrackerService::with_config(gateway, &config);
        Ok((service, credential, config))
    }

    fn load_config(&self) -> Result<GatewayConfig> {
        let mut config = GatewayConfig::from_lookup(|name| {
            if name == ENV_BASE_URL
                && let Some(base_url) = &self.base_url
            {
                return Some(base_url.clone());
            }
            env::var(name).ok()
        })
        .context("invalid gateway configuration")?;

        if let Some(secs) = self.connect_timeout {
            config.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.read_timeout {
            config.read_timeout_secs = secs;
        }
        config
            .validate()
            .context("invalid gateway configuration")?;
        Ok(config)
    }

    fn load_credential(&self) -> Result<Credential> {
        let token = self
            .token
            .clone()
            .or_else(|| env::var(ENV_TOKEN).ok())
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        match token {
            Some(token) => Ok(Credential::new(token)),
            None => bail!("missing credential: pass --token or set {ENV_TOKEN}"),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// Flat error line for stderr: the tool boundary string when available.
fn boundary_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ToolError>() {
        Some(tool_error) => tool_error.boundary_message(),
        None => format!("{error:#}"),
    }
}
