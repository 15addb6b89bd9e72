use std::path::{Path, PathBuf};

use fintrack_domain::Language;
use serde::{Deserialize, Serialize};

/// Stores user-configurable preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub language: Language,
    /// Entries shown in the dashboard's recent list.
    #[serde(default = "Config::default_recent_limit")]
    pub recent_limit: usize,
    /// Lines processed between import progress updates.
    #[serde(default = "Config::default_progress_batch")]
    pub progress_batch: usize,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for the transaction data file. Defaults to `<base>/data`.
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional destination for exports and templates. Defaults to `~/Documents`.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            recent_limit: Self::default_recent_limit(),
            progress_batch: Self::default_progress_batch(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn default_recent_limit() -> usize {
        5
    }

    pub fn default_progress_batch() -> usize {
        25
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Clamps numeric preferences to usable values.
    pub fn normalized(mut self) -> Self {
        self.recent_limit = self.recent_limit.max(1);
        self.progress_batch = self.progress_batch.max(1);
        self
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }

        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
