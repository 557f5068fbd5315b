//! Interactive console handler.

use anyhow::Result;
use is_terminal::IsTerminal;
use std::io;

use crate::config::Config;
use crate::history::ConsoleHistory;
use crate::languages::LanguageRegistry;
use crate::tui::run_console;

pub async fn run(cfg: &Config, registry: LanguageRegistry, record_history: bool) -> Result<()> {
    if !io::stdout().is_terminal() {
        eprintln!("Warning: the console requires a proper terminal.");
        return Err(anyhow::anyhow!("the console requires a terminal"));
    }

    let history = record_history.then(|| ConsoleHistory::from_config(cfg));
    run_console(cfg, registry, history).await
}
