//! Confirmation prompts.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use sparkblog_core::ports::Confirmation;

/// Answers yes without asking. For scripted and non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

#[async_trait]
impl Confirmation for AlwaysConfirm {
    async fn confirm(&self, question: &str) -> bool {
        tracing::debug!(question, "Auto-confirmed");
        true
    }
}

/// Answers no without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

#[async_trait]
impl Confirmation for NeverConfirm {
    async fn confirm(&self, _question: &str) -> bool {
        false
    }
}

/// Asks on the terminal and reads one line from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

#[async_trait]
impl Confirmation for TerminalConfirm {
    async fn confirm(&self, question: &str) -> bool {
        let mut stdout = tokio::io::stdout();
        if stdout
            .write_all(format!("{question} [y/N] ").as_bytes())
            .await
            .is_err()
        {
            return false;
        }
        let _ = stdout.flush().await;

        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(_) => is_yes(&line),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
