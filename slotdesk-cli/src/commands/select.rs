use anyhow::Result;
use owo_colors::OwoColorize;
use slotdesk_core::{Command, DayKey, Effect};

use super::Session;
use crate::render::render_rows;

/// Toggle days on (in batch mode, into the batch selection).
pub async fn select(session: &mut Session, days: Vec<DayKey>) -> Result<()> {
    let effect = session.run(Command::AddDays(days)).await?;
    report(session, effect);
    Ok(())
}

/// Toggle days off.
pub async fn deselect(session: &mut Session, days: Vec<DayKey>) -> Result<()> {
    let effect = session.run(Command::RemoveDays(days)).await?;
    report(session, effect);
    Ok(())
}

fn report(session: &Session, effect: Effect) {
    if effect == Effect::Unchanged {
        println!("{}", "Nothing changed".dimmed());
        return;
    }
    let rows = session.editor.active_state().day_rows(session.config.day_order);
    println!("{}", render_rows(&rows));
}
