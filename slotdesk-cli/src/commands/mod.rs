pub mod batch;
pub mod cancel;
pub mod config;
pub mod pull;
pub mod requests;
pub mod save;
pub mod select;
pub mod status;
pub mod times;

use anyhow::Result;
use owo_colors::OwoColorize;
use slotdesk_core::config::SlotDeskConfig;
use slotdesk_core::draft::DraftStore;
use slotdesk_core::{Command, Editor, Effect};

use crate::client::Client;
use crate::render::create_spinner;

/// The loaded draft plus what is needed to carry out command effects.
pub struct Session {
    pub config: SlotDeskConfig,
    pub editor: Editor,
    store: DraftStore,
}

impl Session {
    pub fn open(config: SlotDeskConfig) -> Result<Self> {
        let store = DraftStore::new(config.draft_path()?);
        let editor = store.load()?;
        Ok(Session {
            config,
            editor,
            store,
        })
    }

    pub fn client(&self) -> Result<Client> {
        Client::new(&self.config)
    }

    /// Dispatch a command and carry out its effect.
    ///
    /// The draft on disk is only rewritten once everything succeeded, so a
    /// rejected command or a failed request leaves it as it was. Leaving batch
    /// mode is the exception: it is written first and holds even when the
    /// reload fails.
    pub async fn run(&mut self, command: Command) -> Result<Effect> {
        let leaving_batch = command == Command::ExitBatchMode;
        let effect = self.editor.dispatch(command)?;

        match &effect {
            Effect::Refetch if leaving_batch => {
                self.save_draft()?;
                if let Err(e) = self.refetch().await {
                    tracing::warn!(error = %e, "schedule not reloaded after leaving batch mode");
                    eprintln!("{} {}", "!".red().bold(), format!("{e:#}").red());
                }
            }
            Effect::Refetch => self.refetch().await?,
            Effect::Persist(payload) => {
                let client = self.client()?;
                let spinner = create_spinner("Saving schedule");
                let result = client.save_schedule(payload).await;
                spinner.finish_and_clear();
                result?;

                tracing::info!(dates = payload.dates.len(), "schedule saved");
                self.refetch().await?;
            }
            Effect::None | Effect::Unchanged => {}
        }

        self.save_draft()?;
        Ok(effect)
    }

    /// Replace the primary state with the backend's current schedule.
    pub async fn refetch(&mut self) -> Result<()> {
        let client = self.client()?;
        let spinner = create_spinner("Fetching schedule");
        let result = client.fetch_schedule().await;
        spinner.finish_and_clear();

        self.editor.dispatch(Command::Load(result?))?;
        Ok(())
    }

    pub fn save_draft(&self) -> Result<()> {
        self.store.save(&self.editor)?;
        Ok(())
    }
}
