//! Confirmation prompts for destructive commands.

use std::io::{BufRead, Write};

use async_trait::async_trait;

use crate::workflow::ConfirmPrompt;

/// Asks on stdout and reads the answer from stdin.
pub struct StdinPrompt;

#[async_trait]
impl ConfirmPrompt for StdinPrompt {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        let question = format!("{}\n{} [y/N] ", title, message);

        // Reading stdin blocks, keep it off the runtime workers
        let answer = tokio::task::spawn_blocking(move || {
            let mut stdout = std::io::stdout();
            write!(stdout, "{}", question)?;
            stdout.flush()?;

            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok::<_, std::io::Error>(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_affirmative(&line),
            Ok(Err(e)) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
            Err(e) => {
                tracing::warn!("Confirmation task failed: {}", e);
                false
            }
        }
    }
}

/// Answers yes without asking (`--yes`).
pub struct AutoConfirm;

#[async_trait]
impl ConfirmPrompt for AutoConfirm {
    async fn confirm(&self, title: &str, _message: &str) -> bool {
        tracing::debug!("{}: confirmed by --yes", title);
        true
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
