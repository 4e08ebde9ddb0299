use anyhow::Result;
use owo_colors::OwoColorize;

use super::Session;
use crate::render::{render_batch, render_rows};

pub fn run(session: &Session) -> Result<()> {
    let order = session.config.day_order;
    let editor = &session.editor;

    println!("{}", "Schedule".bold());
    println!("{}", render_rows(&editor.state().day_rows(order)));

    if let Some(batch) = editor.batch() {
        println!();
        println!("{}", render_batch(batch, order));
    }

    Ok(())
}
