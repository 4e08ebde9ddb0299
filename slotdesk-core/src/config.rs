//! slotdesk configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{SlotDeskError, SlotDeskResult};
use crate::time::DayOrder;

static DEFAULT_BASE_URL: &str = "http://localhost:4000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DRAFT_FILE: &str = "draft.json";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn is_default_base_url(url: &String) -> bool {
    url == DEFAULT_BASE_URL
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Configuration at ~/.config/slotdesk/config.toml
///
/// Every key can be overridden from the environment with a `SLOTDESK_`
/// prefix, e.g. `SLOTDESK_BASE_URL`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SlotDeskConfig {
    /// Where the scheduling backend lives.
    #[serde(default = "default_base_url", skip_serializing_if = "is_default_base_url")]
    pub base_url: String,

    /// Where the working draft is kept. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub day_order: DayOrder,

    /// Post the application-start event to the backend log endpoint.
    #[serde(default)]
    pub report_activation: bool,
}

impl Default for SlotDeskConfig {
    fn default() -> Self {
        SlotDeskConfig {
            base_url: default_base_url(),
            data_dir: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            day_order: DayOrder::default(),
            report_activation: false,
        }
    }
}

impl SlotDeskConfig {
    pub fn config_path() -> SlotDeskResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SlotDeskError::Config("Could not determine config directory".into()))?
            .join("slotdesk");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, writing a commented-out default on first run.
    pub fn load() -> SlotDeskResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> SlotDeskResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("SLOTDESK"))
            .build()
            .map_err(|e| SlotDeskError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SlotDeskError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> SlotDeskResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => {
                let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
                Ok(PathBuf::from(expanded))
            }
            None => dirs::data_dir()
                .map(|d| d.join("slotdesk"))
                .ok_or_else(|| SlotDeskError::Config("Could not determine data directory".into())),
        }
    }

    pub fn draft_path(&self) -> SlotDeskResult<PathBuf> {
        Ok(self.data_path()?.join(DRAFT_FILE))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SlotDeskResult<()> {
        let contents = format!(
            "\
# slotdesk configuration

# Scheduling backend:
# base_url = \"{}\"

# Where the working draft is stored:
# data_dir = \"~/.local/share/slotdesk\"

# Seconds before a backend request is given up:
# request_timeout_secs = {}

# How days are listed: \"chronological\" or \"lexicographic\" (MM/DD/YYYY string order)
# day_order = \"chronological\"

# Send an activation message to the backend log on every start:
# report_activation = false
",
            DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SlotDeskError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SlotDeskError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
