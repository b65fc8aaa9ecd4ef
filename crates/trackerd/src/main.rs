//! trackerd - Tracker session daemon
//!
//! Feeds inbound tracker messages (newline-delimited JSON) into the session
//! state, logs every change notification, and prints the final session
//! snapshot as JSON on exit.
//!
//! Usage:
//!   trackerd [OPTIONS] [config.toml]
//!
//! Options:
//!   --replay <path>     Read messages from a capture file instead of stdin
//!   --accept-privacy    Mark the privacy notice as accepted for this install
//!
//! If no config file is provided, built-in defaults are used.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracker_core::SessionStore;
use tracker_service::{init_logging, TrackerAction, TrackerConfig, TrackerContext, TrackerMessage};

/// Parsed command-line arguments
struct Args {
    /// Service config file (TOML)
    config_path: Option<String>,
    /// Capture file to replay
    replay_path: Option<String>,
    accept_privacy: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args {
        config_path: None,
        replay_path: None,
        accept_privacy: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--replay" | "-r" => {
                if i + 1 < args.len() {
                    result.replay_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Missing argument for --replay");
                    i += 1;
                }
            }
            "--accept-privacy" => {
                result.accept_privacy = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(arg.to_string());
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                i += 1;
            }
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"trackerd - Tracker session daemon

Usage: trackerd [OPTIONS] [config.toml]

Options:
  -r, --replay <path>   Replay a newline-delimited JSON capture file
                        (default: read messages from stdin)
      --accept-privacy  Mark the privacy notice as accepted
  -h, --help            Print this help message

Examples:
  # Replay a capture with defaults
  trackerd --replay config/pt30-session.jsonl

  # Pipe live messages with a config file
  tracker-bridge | trackerd config/trackerd.toml
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args();

    let config = match args.config_path {
        Some(ref path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };

    init_logging(&config.logging)?;
    tracing::info!("Starting trackerd (tracker session daemon)");
    if let Some(ref path) = args.config_path {
        tracing::info!("Loaded config from: {}", path);
    }

    let context = TrackerContext::new(config);
    if args.accept_privacy {
        context.session().set_privacy_accepted(true);
    }

    let listener = tokio::spawn(log_notifications(context.subscribe(), context.session()));

    match args.replay_path {
        Some(ref path) => {
            let capture = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read capture file '{}'", path))?;
            let outbound = context.events().replay(&capture)?;
            for message in &outbound {
                tracing::debug!(?message, "Outbound");
            }
            tracing::info!(
                replies = outbound.len(),
                "Replayed capture from {}",
                path
            );
        }
        None => ingest_stdin(&context).await?,
    }

    let snapshot = context.snapshot();
    drop(context);
    listener.await?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Apply messages from stdin until EOF; undecodable lines are logged and skipped
async fn ingest_stdin(context: &TrackerContext) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<TrackerMessage>(line) {
            Ok(message) => {
                for reply in context.events().handle(message) {
                    tracing::debug!(?reply, "Outbound");
                }
            }
            Err(e) => tracing::warn!(line = line_no, error = %e, "Skipping invalid message"),
        }
    }

    tracing::info!(lines = line_no, "Input closed");
    Ok(())
}

/// Presentation side: log each change with the relevant part of the snapshot
async fn log_notifications(
    mut rx: broadcast::Receiver<TrackerAction>,
    session: Arc<SessionStore>,
) {
    loop {
        match rx.recv().await {
            Ok(action) => {
                let snapshot = session.current_snapshot();
                match action {
                    TrackerAction::Tracker | TrackerAction::Vin => tracing::info!(
                        vin = %snapshot.vehicle_identifier,
                        product = snapshot.tracker_info.as_ref().map(|t| t.product.as_str()),
                        "Identity updated"
                    ),
                    TrackerAction::StoredEvents => tracing::info!(
                        received = snapshot.special_event_count,
                        on_tracker = ?snapshot.stored_event_count,
                        "Stored events"
                    ),
                    TrackerAction::SystemVariable => {
                        tracing::info!(value = %snapshot.system_variable, "System variable")
                    }
                    other => tracing::debug!(action = ?other, "Session changed"),
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "Notification listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
