//! Configuration module
//!
//! Global HTTP settings shared by every command.

use anyhow::{Context, Result};
use clap::Args;
use courier_client::HttpOptions;
use courier_tasks::config::parse_duration;
use std::time::Duration;

/// HTTP flags accepted before the subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct HttpArgs {
    /// Time allowed to establish a connection (e.g. 10s)
    #[arg(long, global = true, value_parser = parse_duration)]
    pub connect_timeout: Option<Duration>,

    /// Time allowed for each request (e.g. 30s)
    #[arg(long, global = true, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Extra header sent with every request, as NAME=VALUE (repeatable)
    #[arg(long = "header", global = true, value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Client shared by every API call of the command
    pub http: reqwest::Client,
}

impl Config {
    pub fn from_args(args: &HttpArgs) -> Result<Self> {
        let options = HttpOptions {
            connect_timeout: args.connect_timeout,
            timeout: args.timeout,
            headers: args.headers.clone(),
        };

        let http = options
            .build_client()
            .context("Failed to configure HTTP client")?;

        Ok(Self { http })
    }
}

/// Parses `NAME=VALUE`
pub fn parse_header(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("invalid header {:?}: expected NAME=VALUE", input)),
    }
}
