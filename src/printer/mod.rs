//! Terminal output for one-shot mode.

use owo_colors::OwoColorize;

use crate::config::Config;

pub struct TextPrinter {
    color: Option<String>,
}

impl TextPrinter {
    pub fn from_config(cfg: &Config) -> Self {
        Self { color: cfg.get("DEFAULT_COLOR") }
    }

    pub fn plain() -> Self {
        Self { color: None }
    }

    pub fn print(&self, text: &str) {
        match self.color.as_deref() {
            Some("green") => println!("{}", text.green()),
            Some("cyan") => println!("{}", text.cyan()),
            Some("magenta") => println!("{}", text.magenta()),
            Some("yellow") => println!("{}", text.yellow()),
            _ => println!("{}", text),
        }
    }

    pub fn print_error(&self, text: &str) {
        eprintln!("{}", text.red());
    }
}
