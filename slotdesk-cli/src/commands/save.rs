use anyhow::Result;
use owo_colors::OwoColorize;
use slotdesk_core::{Command, Effect};

use super::Session;
use crate::render::pluralize;

pub async fn run(session: &mut Session) -> Result<()> {
    if let Effect::Persist(payload) = session.run(Command::Save).await? {
        let count = payload.dates.len();
        println!(
            "{} {} {}",
            "Saved".green(),
            count,
            pluralize("time slot", count)
        );
    }
    Ok(())
}
