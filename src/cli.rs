use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "scon", about = "Terminal client for a server-side script console", version)]
#[command(group(ArgGroup::new("history_switch").args(["history", "no_history"]).multiple(false)))]
pub struct Cli {
    /// Script file to execute. When omitted, the script is read from piped stdin.
    #[arg(value_name = "SCRIPT")]
    pub script: Option<String>,

    /// Language identifier understood by the server. Defaults to the first
    /// configured language.
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Execution endpoint URL (overrides ENDPOINT_URL).
    #[arg(long)]
    pub url: Option<String>,

    /// Request timeout in seconds (overrides REQUEST_TIMEOUT).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Open the interactive console.
    #[arg(short = 'c', long)]
    pub console: bool,

    /// List the configured languages.
    #[arg(long = "list-languages", visible_alias = "ll")]
    pub list_languages: bool,

    /// Record executed snippets in the history file.
    #[arg(long)]
    pub history: bool,
    /// Disable history recording.
    #[arg(long = "no-history")]
    pub no_history: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
