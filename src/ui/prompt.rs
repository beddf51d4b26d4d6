use anyhow::{Context, Result};
use dialoguer::Confirm;

/// Ask a yes/no question on the terminal. Defaults to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation (use --yes when not attached to a terminal)")
}
