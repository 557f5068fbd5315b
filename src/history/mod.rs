//! Persistent input history: every executed snippet, newest last.

use std::{fs, path::PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub language_code: String,
    pub source_text: String,
}

#[derive(Debug, Clone)]
pub struct ConsoleHistory {
    length: usize,
    storage_path: PathBuf,
}

impl ConsoleHistory {
    pub fn from_config(cfg: &Config) -> Self {
        let len = cfg.get_usize("HISTORY_LENGTH").unwrap_or(100);
        Self::at_path(cfg.history_path(), len)
    }

    pub fn at_path(storage_path: PathBuf, length: usize) -> Self {
        if let Some(parent) = storage_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        Self { length, storage_path }
    }

    pub fn read(&self) -> Result<Vec<HistoryEntry>> {
        if !self.storage_path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.storage_path)?;
        let entries: Vec<HistoryEntry> = serde_json::from_str(&text)?;
        Ok(entries)
    }

    /// Append one executed snippet, deduplicating an immediate repeat and
    /// truncating to the configured length (newest entries win).
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.read()?;
        if entries.last() == Some(&entry) {
            return Ok(());
        }
        entries.push(entry);
        if entries.len() > self.length {
            let over = entries.len() - self.length;
            entries.drain(0..over);
        }
        fs::write(&self.storage_path, serde_json::to_string(&entries)?)?;
        Ok(())
    }

    pub fn clear(&self) {
        let _ = fs::remove_file(&self.storage_path);
    }
}
