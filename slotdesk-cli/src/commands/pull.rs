use anyhow::Result;
use owo_colors::OwoColorize;
use slotdesk_core::Command;

use super::Session;
use crate::render::pluralize;

/// Load the backend schedule into the draft. Batch mode, if active, is kept.
pub async fn run(session: &mut Session) -> Result<()> {
    session.refetch().await?;
    session.save_draft()?;

    let days = session.editor.state().days().len();
    println!("Pulled {} {}", days, pluralize("day", days));
    Ok(())
}

/// Throw away local edits.
pub async fn reset(session: &mut Session) -> Result<()> {
    session.run(Command::Reset).await?;
    println!("{}", "Local changes discarded".dimmed());
    Ok(())
}
