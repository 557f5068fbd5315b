//! Script language registry consulted at startup.

use std::fs;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// One selectable script language, as the server's console advertises it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    /// Identifier posted to the execution endpoint.
    pub code: String,
    /// Human-readable name shown in the selector.
    pub display_name: String,
    /// Editor highlight mode, if the language has one.
    #[serde(default)]
    pub editor_mode: Option<String>,
}

/// Ordered, immutable set of languages. Populated once at startup.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    entries: Vec<LanguageOption>,
}

impl LanguageRegistry {
    /// Load from `LANGUAGES_PATH` (JSON list) if configured, otherwise the
    /// built-in set the server console ships with.
    pub fn load(cfg: &Config) -> Result<Self> {
        if let Some(path) = cfg.get_path("LANGUAGES_PATH") {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read language list {}", path.display()))?;
            let entries: Vec<LanguageOption> = serde_json::from_str(&text)
                .with_context(|| format!("invalid language list {}", path.display()))?;
            return Self::from_entries(entries);
        }
        Self::from_entries(builtin_languages())
    }

    pub fn from_entries(entries: Vec<LanguageOption>) -> Result<Self> {
        if entries.is_empty() {
            bail!("language configuration is empty; at least one language is required");
        }
        Ok(Self { entries })
    }

    /// Configured order.
    pub fn list(&self) -> &[LanguageOption] {
        &self.entries
    }

    /// First configured entry.
    pub fn default_language(&self) -> &LanguageOption {
        &self.entries[0]
    }

    pub fn find(&self, code: &str) -> Option<&LanguageOption> {
        self.entries.iter().find(|l| l.code == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn builtin_languages() -> Vec<LanguageOption> {
    let lang = |code: &str, name: &str, mode: Option<&str>| LanguageOption {
        code: code.to_string(),
        display_name: name.to_string(),
        editor_mode: mode.map(str::to_string),
    };
    vec![
        lang("groovy", "Groovy", Some("groovy")),
        lang("esp", "JavaScript (ESP)", Some("javascript")),
        lang("python", "Python", Some("python")),
        lang("ruby", "Ruby", Some("ruby")),
        lang("jsp", "JSP", None),
    ]
}
