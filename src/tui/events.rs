//! Event types for the interactive console.

use crossterm::event::KeyEvent;

use crate::client::{ExecError, ExecutionOutcome};

/// Everything the console loop reacts to.
#[derive(Debug)]
pub enum ConsoleEvent {
    /// User keyboard input.
    Key(KeyEvent),
    /// The in-flight execution completed (any outcome).
    ExecutionFinished(Result<ExecutionOutcome, ExecError>),
    /// Request to quit the console.
    Quit,
}
