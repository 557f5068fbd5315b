//! Reqwest-based client for the server's script execution endpoint.
//!
//! The endpoint accepts a form-encoded POST (`lang` + `code`) and answers
//! with the execution transcript as plain text. At most one request may be
//! in flight per client; a concurrent call is rejected with [`ExecError::Busy`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;

use crate::config::Config;

/// One execution attempt. Constructed fresh per dispatch.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub language_code: String,
    pub source_text: String,
}

impl ExecutionRequest {
    pub fn new(language_code: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            source_text: source_text.into(),
        }
    }
}

/// Server response, line endings already normalized.
///
/// A non-2xx answer still carries the body: the transcript of a failed
/// script usually holds the server-side stack trace the user wants to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success { transcript: String },
    ServerError { status: u16, transcript: String },
}

impl ExecutionOutcome {
    pub fn transcript(&self) -> &str {
        match self {
            Self::Success { transcript } | Self::ServerError { transcript, .. } => transcript,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Failures that never produced a transcript.
#[derive(Debug)]
pub enum ExecError {
    /// An execution is already in flight; the new request was rejected.
    Busy,
    /// No response within the configured window.
    Timeout,
    /// Network or HTTP-level failure below the endpoint.
    Transport(reqwest::Error),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "an execution is already running"),
            Self::Timeout => write!(f, "no response from the server within the timeout"),
            Self::Transport(e) => write!(f, "request failed: {}", e),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ExecClient {
    http: reqwest::Client,
    endpoint: String,
    in_flight: AtomicBool,
    busy_tx: watch::Sender<bool>,
}

impl ExecClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.endpoint_url(),
            Duration::from_secs(cfg.request_timeout_secs()),
        )
    }

    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let (busy_tx, _) = watch::channel(false);
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            in_flight: AtomicBool::new(false),
            busy_tx,
        })
    }

    /// Observe the busy signal. Flips true at dispatch and false at
    /// completion, exactly once per accepted call.
    pub fn busy_signal(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the request and return the normalized transcript.
    ///
    /// Rejects immediately with [`ExecError::Busy`] while another call is
    /// pending; the busy signal is untouched in that case.
    pub async fn execute(&self, req: &ExecutionRequest) -> Result<ExecutionOutcome, ExecError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(ExecError::Busy);
        }
        let _busy = BusyGuard::engage(self);

        let form = [
            ("lang", req.language_code.as_str()),
            ("code", req.source_text.as_str()),
        ];

        let resp = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        let body = resp.text().await.map_err(classify)?;
        let transcript = normalize_line_endings(&body);

        if status.is_success() {
            Ok(ExecutionOutcome::Success { transcript })
        } else {
            Ok(ExecutionOutcome::ServerError {
                status: status.as_u16(),
                transcript,
            })
        }
    }
}

/// Flips the busy signal on for the lifetime of one accepted execute call.
/// Dropping it (any exit path) releases the slot and signals completion.
struct BusyGuard<'a> {
    client: &'a ExecClient,
}

impl<'a> BusyGuard<'a> {
    fn engage(client: &'a ExecClient) -> Self {
        client.busy_tx.send_replace(true);
        Self { client }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.client.in_flight.store(false, Ordering::SeqCst);
        self.client.busy_tx.send_replace(false);
    }
}

fn classify(e: reqwest::Error) -> ExecError {
    if e.is_timeout() {
        ExecError::Timeout
    } else {
        ExecError::Transport(e)
    }
}

/// The transcript contract: CRLF becomes LF before anything renders it.
pub fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n")
}
