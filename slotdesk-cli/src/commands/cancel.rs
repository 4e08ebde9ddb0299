use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use slotdesk_core::Timestamp;

use super::Session;
use crate::render::{Render, create_spinner};

/// Cancel an approved booking, then reload the schedule its slot belongs to.
pub async fn run(session: &mut Session, date: Timestamp, yes: bool) -> Result<()> {
    let client = session.client()?;

    let spinner = create_spinner("Fetching approved bookings");
    let approved = client.approved_requests().await;
    spinner.finish_and_clear();

    let Some(request) = approved?.into_iter().find(|r| r.date == date) else {
        anyhow::bail!("No approved booking at {}", date.to_display_string());
    };

    println!("   {}", request.render());

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Cancel the booking for {}?",
                request.user_full_name
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    client.cancel_request(date).await?;
    tracing::info!(date = date.millis(), "booking cancelled");
    println!("{}", "Booking cancelled".green());

    session.refetch().await?;
    session.save_draft()?;
    Ok(())
}
