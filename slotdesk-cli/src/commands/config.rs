use anyhow::Result;
use owo_colors::OwoColorize;
use slotdesk_core::config::SlotDeskConfig;

use super::Session;

pub fn run(session: &Session) -> Result<()> {
    let config_path = SlotDeskConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());
    println!("  Draft:    {}", session.config.draft_path()?.display());
    println!();
    println!("{}", "Backend".bold());
    println!("  URL:      {}", session.config.base_url);
    println!("  Timeout:  {}s", session.config.request_timeout_secs);

    Ok(())
}
