//! Command execution.

use crate::Commands;
use colored::Colorize;
use noteboard_client::{Client, ClientError};
use noteboard_protocol::MAX_PAYLOAD_LEN;
use tokio::io::AsyncReadExt;

/// Executes a command and returns the output to print.
pub async fn execute(client: &Client, cmd: Commands) -> Result<String, ClientError> {
    match cmd {
        Commands::Write { subject } => {
            let body = read_body().await?;
            client.add(&subject, &body).await?;
            Ok(format!("{} note {}", "Stored".green(), subject.cyan()))
        }

        Commands::Read { subject } => {
            let body = client.get(&subject).await?;
            Ok(String::from_utf8_lossy(&body).into_owned())
        }

        Commands::Remove { subject } => {
            client.remove(&subject).await?;
            Ok(format!("{} note {}", "Removed".green(), subject.cyan()))
        }
    }
}

/// Reads the note body from standard input.
///
/// One byte past the wire maximum is accepted here so that over-long input
/// fails at request construction instead of being silently truncated.
async fn read_body() -> Result<Vec<u8>, ClientError> {
    let mut body = Vec::new();
    tokio::io::stdin()
        .take((MAX_PAYLOAD_LEN + 1) as u64)
        .read_to_end(&mut body)
        .await?;
    Ok(body)
}
