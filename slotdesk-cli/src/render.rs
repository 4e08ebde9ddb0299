//! Terminal rendering for slotdesk types.
//!
//! Free slots are green, booked slots red, hints dimmed.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use slotdesk_core::{BatchPhase, BatchSession, DayOrder, DayRow, Request, Timestamp};

/// Extension trait for colored terminal output.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for DayRow {
    fn render(&self) -> String {
        let label = format!("📅 {}", self.day);

        if self.has_no_times() {
            return format!("{}  {}", label, "no time selected for this date".dimmed());
        }

        let mut times: Vec<String> = Vec::new();
        times.extend(self.available.iter().map(|t| t.to_short_time().green().to_string()));
        times.extend(self.non_available.iter().map(|t| t.to_short_time().red().to_string()));

        format!("{}  {}", label, times.join(" "))
    }
}

impl Render for Request {
    fn render(&self) -> String {
        let who = match &self.username {
            Some(username) => format!("{} (@{})", self.user_full_name, username),
            None => self.user_full_name.clone(),
        };

        let mut line = format!(
            "{}  {}  {}",
            self.date.to_display_string().bold(),
            who,
            self.service_type.dimmed()
        );
        if let Some(note) = self.user_custom_data.as_deref().filter(|n| !n.is_empty()) {
            line.push_str(&format!("\n      {} {}", "note:".dimmed(), note));
        }
        line
    }
}

impl Render for BatchPhase {
    fn render(&self) -> String {
        match self {
            BatchPhase::Selecting => "selecting days".yellow().to_string(),
            BatchPhase::TimeEditing => "editing times".yellow().to_string(),
            BatchPhase::Applied => "applied, ready to commit".green().to_string(),
        }
    }
}

/// Batch session overview. Days are listed in `order`.
pub fn render_batch(batch: &BatchSession, order: DayOrder) -> String {
    let mut lines = vec![format!("{} {}", "Batch mode:".bold(), batch.phase().render())];

    let rows = batch.state().day_rows(order);
    if rows.is_empty() {
        lines.push(format!("   {}", "No dates selected".dimmed()));
    } else {
        lines.push("   Selected dates:".dimmed().to_string());
        for row in &rows {
            let line = if batch.phase() == BatchPhase::Applied {
                row.render()
            } else {
                format!("📅 {}", row.day)
            };
            lines.push(format!("   {line}"));
        }
    }

    if !batch.candidate_times().is_empty() {
        lines.push("   Times:".dimmed().to_string());
        for (i, time) in batch.candidate_times().iter().enumerate() {
            lines.push(format!("   {:>2}. {}", i + 1, time));
        }
    }

    lines.join("\n")
}

pub fn render_rows(rows: &[DayRow]) -> String {
    if rows.is_empty() {
        return "   No dates selected".dimmed().to_string();
    }
    rows.iter()
        .map(|row| format!("   {}", row.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_requests(title: &str, requests: &[Request], empty: &str) -> String {
    let mut lines = vec![title.bold().to_string()];
    if requests.is_empty() {
        lines.push(format!("   {}", empty.dimmed()));
    }
    for request in requests {
        lines.push(format!("   {}", request.render()));
    }
    lines.join("\n")
}

pub fn render_free_dates(dates: &[Timestamp]) -> String {
    let mut lines = vec!["Free dates".bold().to_string()];
    if dates.is_empty() {
        lines.push(format!("   {}", "No free dates, add some".dimmed()));
    }
    for date in dates {
        lines.push(format!("   {}", date.to_display_string().green()));
    }
    lines.join("\n")
}

pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
