use anyhow::Result;
use slotdesk_core::{Command, DayKey, TimeOfDay, Timestamp};

use super::Session;
use crate::render::Render;

/// Set the free times of one day. With `add`, the day's current times are kept.
pub async fn run(
    session: &mut Session,
    day: DayKey,
    times: Vec<TimeOfDay>,
    add: bool,
) -> Result<()> {
    let mut stamped: Vec<Timestamp> = if add {
        session
            .editor
            .state()
            .available_dates
            .get(&day)
            .map(<[Timestamp]>::to_vec)
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    for time in times {
        stamped.push(day.at(time)?);
    }

    session
        .run(Command::SetDayTimes {
            day,
            times: stamped,
        })
        .await?;

    println!("   {}", session.editor.state().day_row(day).render());
    Ok(())
}
