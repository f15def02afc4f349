//! note - command-line client for the noteboard service.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use noteboard_client::{Client, ClientConfig, ClientError};
use noteboard_protocol::DEFAULT_SOCKET_PATH;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "note")]
#[command(about = "Write, read, or remove notes on the local noteboard service")]
#[command(version)]
struct Cli {
    /// Server socket path
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH, env = "NOTEBOARD_SOCKET")]
    socket: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a new note; the body is read from standard input
    Write {
        /// Note subject
        subject: String,
    },

    /// Print a note's body
    Read {
        /// Note subject
        subject: String,
    },

    /// Delete a note
    Remove {
        /// Note subject
        subject: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = Client::new(ClientConfig::new(cli.socket));

    match commands::execute(&client, cli.command).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Distinguishes failure to reach the server from a failed request.
fn exit_code_for(err: &ClientError) -> u8 {
    match err {
        ClientError::Io(_) => 1,
        _ => 2,
    }
}
