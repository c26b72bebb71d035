//! Command handlers, one module per top-level subcommand

pub mod completion;
pub mod config;
pub mod cycle;
pub mod exercise;
pub mod task;

use anyhow::Result;

use crate::output::Output;
use crate::prompt::confirm;

/// Ask before deleting, unless `--yes` was given or output is not for a human
///
/// Returns false when the user declined (or no TTY was available).
pub fn confirm_delete(what: &str, yes: bool, output: &Output) -> Result<bool> {
    if yes || !output.should_prompt() {
        return Ok(true);
    }

    if confirm(&format!("Delete {}?", what))? {
        Ok(true)
    } else {
        println!("Cancelled. Pass --yes to delete without a prompt.");
        Ok(false)
    }
}
