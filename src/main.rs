use anyhow::{anyhow, bail, Result};
use is_terminal::IsTerminal;
use std::io::{self, Read};

use scon::cli;
use scon::config::Config;
use scon::handlers;
use scon::languages::LanguageRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // CLI overrides land in the environment before the config loads
    if let Some(url) = args.url.as_deref() {
        std::env::set_var("ENDPOINT_URL", url);
    }
    if let Some(secs) = args.timeout {
        std::env::set_var("REQUEST_TIMEOUT", secs.to_string());
    }

    // Load config and the language set
    let cfg = Config::load();
    let registry = LanguageRegistry::load(&cfg)?;

    if args.list_languages {
        handlers::languages::run(&registry);
        return Ok(());
    }

    // Effective history switch
    let record_history = if args.no_history {
        false
    } else if args.history {
        true
    } else {
        true // default enabled
    };

    if args.console {
        if args.script.is_some() {
            bail!("--console cannot be combined with a script argument");
        }
        return handlers::console::run(&cfg, registry, record_history).await;
    }

    // Resolve language: an explicit code must exist in the registry
    let language = match args.language.as_deref() {
        Some(code) => registry
            .find(code)
            .ok_or_else(|| anyhow!("unknown language '{}'; try --list-languages", code))?,
        None => registry.default_language(),
    };

    // Resolve source: file argument or piped stdin
    let source = match args.script.as_deref() {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read script {}: {}", path, e))?,
        None => {
            if io::stdin().is_terminal() {
                bail!("no script given; pass a file, pipe stdin, or use --console");
            }
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if source.trim().is_empty() {
        bail!("the script is empty");
    }

    handlers::run::run(&cfg, &language.code, &source, record_history).await
}
