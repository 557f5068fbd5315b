//! One-shot handler: execute a script once and print the transcript.

use anyhow::{anyhow, Result};

use crate::client::{ExecClient, ExecutionOutcome, ExecutionRequest};
use crate::config::Config;
use crate::history::{ConsoleHistory, HistoryEntry};
use crate::printer::TextPrinter;
use crate::spinner::Spinner;

pub async fn run(
    cfg: &Config,
    language_code: &str,
    source_text: &str,
    record_history: bool,
) -> Result<()> {
    let client = ExecClient::from_config(cfg)?;
    let printer = TextPrinter::from_config(cfg);
    let request = ExecutionRequest::new(language_code, source_text);

    if record_history {
        let history = ConsoleHistory::from_config(cfg);
        let _ = history.append(HistoryEntry {
            language_code: request.language_code.clone(),
            source_text: request.source_text.clone(),
        });
    }

    let spinner = Spinner::start("executing");
    let result = client.execute(&request).await;
    spinner.stop().await;

    match result? {
        ExecutionOutcome::Success { transcript } => {
            printer.print(&transcript);
            Ok(())
        }
        ExecutionOutcome::ServerError { status, transcript } => {
            // The transcript still prints: it carries the server-side
            // diagnostics for the failed script.
            printer.print(&transcript);
            Err(anyhow!("server reported HTTP {status}"))
        }
    }
}
