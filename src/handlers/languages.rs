//! `--list-languages` shortcut.

use crate::languages::LanguageRegistry;

pub fn run(registry: &LanguageRegistry) {
    for lang in registry.list() {
        let mode = lang.editor_mode.as_deref().unwrap_or("-");
        println!("{:<10} {:<20} mode: {}", lang.code, lang.display_name, mode);
    }
}
