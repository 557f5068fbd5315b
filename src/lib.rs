//! Terminal client for a server-side script console: post a script to the
//! server's execution endpoint and render the transcript it returns.

pub mod cli;
pub mod client;
pub mod config;
pub mod editor;
pub mod handlers;
pub mod history;
pub mod languages;
pub mod modes;
pub mod printer;
pub mod spinner;
pub mod tui;
