//! Highlight-mode rules, resolved lazily by mode name.
//!
//! A mode is looked up the first time the input surface needs it: a
//! user-supplied `<mode>.json` under `MODE_RULES_PATH` wins, then the
//! built-in table, then plain text. Resolved rules are memoized, so repeat
//! requests for the same mode never touch the filesystem again.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use serde::Deserialize;

use crate::config::Config;

/// Token classes a mode can colorize.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModeRules {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub line_comment: Option<String>,
    #[serde(default)]
    pub string_delimiters: Vec<char>,
}

impl ModeRules {
    pub fn is_plain(&self) -> bool {
        self.keywords.is_empty()
            && self.types.is_empty()
            && self.line_comment.is_none()
            && self.string_delimiters.is_empty()
    }
}

#[derive(Debug)]
pub struct ModeLoader {
    rules_dir: Option<PathBuf>,
    loaded: HashMap<String, ModeRules>,
}

impl ModeLoader {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            rules_dir: cfg.get_path("MODE_RULES_PATH"),
            loaded: HashMap::new(),
        }
    }

    pub fn with_rules_dir(rules_dir: Option<PathBuf>) -> Self {
        Self {
            rules_dir,
            loaded: HashMap::new(),
        }
    }

    /// Rules for `mode`, resolving on first use.
    pub fn rules(&mut self, mode: &str) -> &ModeRules {
        if !self.loaded.contains_key(mode) {
            let resolved = self.resolve(mode);
            self.loaded.insert(mode.to_string(), resolved);
        }
        &self.loaded[mode]
    }

    pub fn is_loaded(&self, mode: &str) -> bool {
        self.loaded.contains_key(mode)
    }

    fn resolve(&self, mode: &str) -> ModeRules {
        if let Some(dir) = &self.rules_dir {
            let path = dir.join(format!("{mode}.json"));
            if let Ok(text) = fs::read_to_string(&path) {
                if let Ok(rules) = serde_json::from_str::<ModeRules>(&text) {
                    return rules;
                }
            }
        }
        builtin_rules(mode).unwrap_or_default()
    }
}

fn builtin_rules(mode: &str) -> Option<ModeRules> {
    let rules = |keywords: &[&str], types: &[&str], comment: &str, strings: &[char]| ModeRules {
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        types: types.iter().map(|s| s.to_string()).collect(),
        line_comment: Some(comment.to_string()),
        string_delimiters: strings.to_vec(),
    };
    match mode {
        "groovy" => Some(rules(
            &[
                "def", "return", "if", "else", "for", "while", "in", "new", "class", "import",
                "true", "false", "null", "try", "catch", "finally", "switch", "case", "assert",
                "println", "print", "each", "closure", "it", "this", "void", "static",
            ],
            &["int", "long", "double", "boolean", "String", "Object", "List", "Map"],
            "//",
            &['"', '\''],
        )),
        "javascript" => Some(rules(
            &[
                "var", "function", "return", "if", "else", "for", "while", "new", "typeof",
                "true", "false", "null", "undefined", "try", "catch", "finally", "switch",
                "case", "this", "delete", "in", "instanceof", "throw",
            ],
            &[],
            "//",
            &['"', '\''],
        )),
        "python" => Some(rules(
            &[
                "def", "return", "if", "elif", "else", "for", "while", "in", "import", "from",
                "True", "False", "None", "try", "except", "finally", "class", "lambda", "print",
                "pass", "raise", "with", "as", "and", "or", "not", "is",
            ],
            &[],
            "#",
            &['"', '\''],
        )),
        "ruby" => Some(rules(
            &[
                "def", "end", "return", "if", "elsif", "else", "unless", "for", "while", "in",
                "do", "require", "true", "false", "nil", "begin", "rescue", "ensure", "class",
                "module", "puts", "print", "yield", "self",
            ],
            &[],
            "#",
            &['"', '\''],
        )),
        _ => None,
    }
}

// ----- Rendering -----

fn keyword_style() -> Style {
    Style::default().fg(Color::Cyan)
}

fn type_style() -> Style {
    Style::default().fg(Color::Yellow)
}

fn string_style() -> Style {
    Style::default().fg(Color::Green)
}

fn comment_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn number_style() -> Style {
    Style::default().fg(Color::Magenta)
}

/// Apply mode rules to one line of source, producing styled spans.
pub fn highlight_line(line: &str, rules: &ModeRules) -> Line<'static> {
    if rules.is_plain() {
        return Line::from(line.to_string());
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut word = String::new();
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte_idx, c) = chars[i];

        // Rest of the line is a comment
        if let Some(marker) = &rules.line_comment {
            if line[byte_idx..].starts_with(marker.as_str()) {
                flush_word(&mut spans, &mut word, rules);
                spans.push(Span::styled(line[byte_idx..].to_string(), comment_style()));
                return Line::from(spans);
            }
        }

        // String literal, honoring escapes
        if rules.string_delimiters.contains(&c) {
            flush_word(&mut spans, &mut word, rules);
            let quote = c;
            let start = byte_idx;
            let mut j = i + 1;
            while j < chars.len() {
                let (_, cj) = chars[j];
                if cj == '\\' {
                    j += 2;
                    continue;
                }
                if cj == quote {
                    j += 1;
                    break;
                }
                j += 1;
            }
            let end = if j < chars.len() { chars[j].0 } else { line.len() };
            spans.push(Span::styled(line[start..end].to_string(), string_style()));
            i = j;
            continue;
        }

        if c.is_alphanumeric() || c == '_' {
            word.push(c);
        } else {
            flush_word(&mut spans, &mut word, rules);
            spans.push(Span::raw(c.to_string()));
        }
        i += 1;
    }

    flush_word(&mut spans, &mut word, rules);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, rules: &ModeRules) {
    if word.is_empty() {
        return;
    }
    let style = if rules.keywords.iter().any(|k| k == word) {
        Some(keyword_style())
    } else if rules.types.iter().any(|t| t == word) {
        Some(type_style())
    } else if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        Some(number_style())
    } else {
        None
    };
    match style {
        Some(style) => spans.push(Span::styled(word.clone(), style)),
        None => spans.push(Span::raw(word.clone())),
    }
    word.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_groovy_rules_resolve_once() {
        let mut loader = ModeLoader::with_rules_dir(None);
        assert!(!loader.is_loaded("groovy"));
        assert!(loader.rules("groovy").keywords.iter().any(|k| k == "def"));
        assert!(loader.is_loaded("groovy"));
    }

    #[test]
    fn unknown_mode_degrades_to_plain() {
        let mut loader = ModeLoader::with_rules_dir(None);
        assert!(loader.rules("text/plain").is_plain());
        assert!(loader.rules("brainfuck").is_plain());
    }

    #[test]
    fn rules_dir_overrides_are_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groovy.json");
        std::fs::write(&path, r#"{"keywords":["magic"],"string_delimiters":["\""]}"#).unwrap();

        let mut loader = ModeLoader::with_rules_dir(Some(dir.path().to_path_buf()));
        assert!(loader.rules("groovy").keywords.contains(&"magic".to_string()));

        // Deleting the file must not matter: the mode is already resolved.
        std::fs::remove_file(&path).unwrap();
        assert!(loader.rules("groovy").keywords.contains(&"magic".to_string()));
    }

    #[test]
    fn highlighting_splits_keywords_strings_and_comments() {
        let mut loader = ModeLoader::with_rules_dir(None);
        let rules = loader.rules("groovy").clone();
        let line = highlight_line("def x = \"hi\" // note", &rules);
        let rendered: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(rendered, "def x = \"hi\" // note");
        assert!(line.spans.iter().any(|s| s.content == "def"));
        assert!(line.spans.iter().any(|s| s.content == "\"hi\""));
        assert!(line.spans.iter().any(|s| s.content == "// note"));
    }

    #[test]
    fn plain_rules_emit_single_span() {
        let line = highlight_line("anything at all", &ModeRules::default());
        assert_eq!(line.spans.len(), 1);
    }
}
