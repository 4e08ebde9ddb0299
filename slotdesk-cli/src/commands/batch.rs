use anyhow::Result;
use owo_colors::OwoColorize;
use slotdesk_core::{BatchPhase, Command, Effect, SlotDeskError};

use super::Session;
use crate::BatchAction;
use crate::render::{Render, render_batch};

pub async fn run(session: &mut Session, action: BatchAction) -> Result<()> {
    match action {
        BatchAction::On => {
            session.run(Command::EnterBatchMode).await?;
            println!(
                "Batch mode on. Pick dates with {}, then add times with {}",
                "slotdesk select".bold(),
                "slotdesk batch add".bold()
            );
        }
        BatchAction::Off => {
            session.run(Command::ExitBatchMode).await?;
            println!("{}", "Batch mode off".dimmed());
            return Ok(());
        }
        BatchAction::Edit => {
            session.run(Command::OpenBatchTimeEditor).await?;
        }
        BatchAction::Add { times } => {
            ensure_time_editor(session).await?;
            for time in times {
                if session.run(Command::AddBatchTime(time)).await? == Effect::Unchanged {
                    println!("{}", format!("{time} is already listed").dimmed());
                }
            }
        }
        BatchAction::Change { position, time } => {
            ensure_time_editor(session).await?;
            let index = to_index(position)?;
            session.run(Command::EditBatchTime { index, time }).await?;
        }
        BatchAction::Remove { position } => {
            ensure_time_editor(session).await?;
            let index = to_index(position)?;
            session.run(Command::RemoveBatchTime(index)).await?;
        }
        BatchAction::Cancel => {
            session.run(Command::CancelBatchTimeEditor).await?;
        }
        BatchAction::Apply => {
            session.run(Command::ApplyBatchTimes).await?;
        }
        BatchAction::Commit => {
            session.run(Command::CommitBatch).await?;
            println!(
                "Batch times added. Review with {} and store them with {}",
                "slotdesk status".bold(),
                "slotdesk save".bold()
            );
            return Ok(());
        }
    }

    if let Some(batch) = session.editor.batch() {
        println!("{}", render_batch(batch, session.config.day_order));
    }
    Ok(())
}

/// Time edits implicitly open the editor, which still needs a selection.
async fn ensure_time_editor(session: &mut Session) -> Result<()> {
    let phase = session
        .editor
        .batch()
        .map(|b| b.phase())
        .ok_or(SlotDeskError::BatchModeInactive)?;

    if phase != BatchPhase::TimeEditing {
        tracing::debug!(phase = %phase.render(), "opening batch time editor");
        session.run(Command::OpenBatchTimeEditor).await?;
    }
    Ok(())
}

/// Positions are shown 1-based.
fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| SlotDeskError::NoSuchBatchTime(position).into())
}
