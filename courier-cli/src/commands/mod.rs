//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod segment;
mod sendgrid;
mod twilio;

pub use segment::SegmentCommands;
pub use sendgrid::SendGridCommands;
pub use twilio::TwilioCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use courier_tasks::{CancellationToken, Task};
use tracing::info;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Segment Reverse ETL
    Segment {
        #[command(subcommand)]
        command: SegmentCommands,
    },
    /// SendGrid mail
    #[command(name = "sendgrid")]
    SendGrid {
        #[command(subcommand)]
        command: SendGridCommands,
    },
    /// Twilio Notify
    Twilio {
        #[command(subcommand)]
        command: TwilioCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
/// * `cancel` - Fired on Ctrl-C
pub async fn handle_command(
    command: Commands,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    match command {
        Commands::Segment { command } => {
            segment::handle_segment_command(command, config, cancel).await
        }
        Commands::SendGrid { command } => {
            sendgrid::handle_sendgrid_command(command, config, cancel).await
        }
        Commands::Twilio { command } => {
            twilio::handle_twilio_command(command, config, cancel).await
        }
    }
}

/// Run a task and print its output as JSON on stdout
async fn run_task<T: Task>(task: T, cancel: CancellationToken) -> Result<()> {
    info!("Running {}", task.kind());

    let output = task
        .run(cancel)
        .await
        .with_context(|| format!("{} failed", task.kind()))?;

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    println!("{}", json);
    eprintln!("{} {}", "✓".green().bold(), task.kind().dimmed());

    Ok(())
}
