//! The working draft, kept on disk between runs.

use std::path::{Path, PathBuf};

use crate::editor::Editor;
use crate::error::{SlotDeskError, SlotDeskResult};

pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DraftStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing draft is an empty editor.
    pub fn load(&self) -> SlotDeskResult<Editor> {
        if !self.path.exists() {
            return Ok(Editor::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| SlotDeskError::Draft(format!("{}: {e}", self.path.display())))
    }

    pub fn save(&self, editor: &Editor) -> SlotDeskResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let temp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(editor)
            .map_err(|e| SlotDeskError::Serialization(e.to_string()))?;

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
