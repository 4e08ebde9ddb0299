use anyhow::Result;

use super::Session;
use crate::render::{create_spinner, render_free_dates, render_requests};

/// Pending and approved requests, then the dates still free.
pub async fn run(session: &Session) -> Result<()> {
    let client = session.client()?;

    let spinner = create_spinner("Fetching requests");
    let result = tokio::try_join!(
        client.booked_requests(),
        client.approved_requests(),
        client.available_dates()
    );
    spinner.finish_and_clear();
    let (pending, approved, free) = result?;

    println!(
        "{}",
        render_requests("Pending requests", &pending, "No pending requests")
    );
    println!();
    println!(
        "{}",
        render_requests("Approved bookings", &approved, "No approved bookings")
    );
    println!();
    println!("{}", render_free_dates(&free));

    Ok(())
}
