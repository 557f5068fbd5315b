//! Console state management. `ConsoleApp` is the controller: it owns both
//! editor surfaces, the selected language, and the execution cycle phase,
//! so a console instance carries no ambient globals and can be driven
//! directly in tests.

use crate::client::{ExecError, ExecutionOutcome, ExecutionRequest};
use crate::editor::EditorSurface;
use crate::languages::{LanguageOption, LanguageRegistry};
use crate::modes::{ModeLoader, ModeRules};

/// One execution cycle: Idle -> Dispatching -> Idle. Dispatching never
/// re-enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dispatching,
}

#[derive(Debug)]
pub struct ConsoleApp {
    registry: LanguageRegistry,
    selected: usize,
    /// Editable source buffer.
    pub input: EditorSurface,
    /// Read-only transcript buffer, hidden until the first result.
    pub output: EditorSurface,
    phase: Phase,
    pub status_message: String,
    /// Highlighted index while the language popup is open.
    popup: Option<usize>,
    /// Prior snippets, oldest first.
    recall: Vec<String>,
    recall_index: Option<usize>,
    mode_loader: ModeLoader,
    current_rules: ModeRules,
    pub show_help: bool,
    pub output_scroll: usize,
    endpoint: String,
}

impl ConsoleApp {
    pub fn new(
        registry: LanguageRegistry,
        mut mode_loader: ModeLoader,
        endpoint: String,
        recall: Vec<String>,
    ) -> Self {
        let default = registry.default_language().clone();
        let input = EditorSurface::input(default.editor_mode.as_deref());
        let current_rules = mode_loader.rules(input.mode()).clone();

        let mut app = Self {
            registry,
            selected: 0,
            input,
            output: EditorSurface::output(),
            phase: Phase::Idle,
            status_message: String::new(),
            popup: None,
            recall,
            recall_index: None,
            mode_loader,
            current_rules,
            show_help: false,
            output_scroll: 0,
            endpoint,
        };
        app.reset_status();
        app
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Dispatching
    }

    pub fn current_rules(&self) -> &ModeRules {
        &self.current_rules
    }

    // ----- Language selection -----

    pub fn languages(&self) -> &[LanguageOption] {
        self.registry.list()
    }

    pub fn selected_language(&self) -> &LanguageOption {
        &self.registry.list()[self.selected]
    }

    pub fn select_index(&mut self, index: usize) {
        if index >= self.registry.len() {
            return;
        }
        self.selected = index;
        let mode = self.registry.list()[index].editor_mode.clone();
        self.input.set_mode(mode.as_deref());
        self.current_rules = self.mode_loader.rules(self.input.mode()).clone();
        self.reset_status();
    }

    pub fn select_code(&mut self, code: &str) -> bool {
        match self.registry.list().iter().position(|l| l.code == code) {
            Some(i) => {
                self.select_index(i);
                true
            }
            None => false,
        }
    }

    pub fn popup_open(&self) -> bool {
        self.popup.is_some()
    }

    pub fn popup_selected(&self) -> Option<usize> {
        self.popup
    }

    pub fn open_popup(&mut self) {
        self.popup = Some(self.selected);
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn popup_next(&mut self) {
        if let Some(i) = self.popup {
            self.popup = Some((i + 1) % self.registry.len());
        }
    }

    pub fn popup_prev(&mut self) {
        if let Some(i) = self.popup {
            self.popup = Some(if i == 0 { self.registry.len() - 1 } else { i - 1 });
        }
    }

    pub fn confirm_popup(&mut self) {
        if let Some(i) = self.popup.take() {
            self.select_index(i);
        }
    }

    // ----- Execution cycle -----

    /// Flush the input surface into a request and enter Dispatching.
    ///
    /// Returns `None` (leaving every surface untouched) when a dispatch is
    /// already pending or there is nothing to execute.
    pub fn begin_dispatch(&mut self) -> Option<ExecutionRequest> {
        if self.is_busy() {
            self.status_message = "execution already running".to_string();
            return None;
        }
        // The buffer is the canonical source: read it at dispatch time so no
        // pending edit is lost.
        let source_text = self.input.content();
        if source_text.trim().is_empty() {
            self.status_message = "nothing to execute".to_string();
            return None;
        }
        self.phase = Phase::Dispatching;
        self.status_message = format!("running {} …", self.selected_language().display_name);
        self.push_recall(source_text.clone());
        Some(ExecutionRequest::new(
            self.selected_language().code.clone(),
            source_text,
        ))
    }

    /// Apply the outcome of the in-flight execution and return to Idle.
    pub fn finish(&mut self, result: Result<ExecutionOutcome, ExecError>) {
        self.phase = Phase::Idle;
        match result {
            Ok(ExecutionOutcome::Success { transcript }) => {
                self.output.set_content(&transcript);
                self.output.show();
                self.output_scroll = 0;
                self.status_message = "done".to_string();
            }
            Ok(ExecutionOutcome::ServerError { status, transcript }) => {
                // The transcript of a failed script still renders: it holds
                // the server-side diagnostics.
                self.output.set_content(&transcript);
                self.output.show();
                self.output_scroll = 0;
                self.status_message = format!("server reported HTTP {status}");
            }
            Err(e) => {
                // Previously rendered output stays as it is.
                self.status_message = format!("error: {e}");
            }
        }
    }

    // ----- History recall -----

    fn push_recall(&mut self, source: String) {
        if self.recall.last().map(|s| s.as_str()) != Some(source.as_str()) {
            self.recall.push(source);
        }
        self.recall_index = None;
    }

    pub fn recall_prev(&mut self) {
        if self.recall.is_empty() {
            return;
        }
        let next_index = match self.recall_index {
            None => self.recall.len() - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.recall_index = Some(next_index);
        let snippet = self.recall[next_index].clone();
        self.input.set_content(&snippet);
    }

    pub fn recall_next(&mut self) {
        match self.recall_index {
            None => {}
            Some(i) if i + 1 < self.recall.len() => {
                let ni = i + 1;
                self.recall_index = Some(ni);
                let snippet = self.recall[ni].clone();
                self.input.set_content(&snippet);
            }
            Some(_) => {
                self.recall_index = None;
                self.input.clear();
            }
        }
    }

    // ----- Output scrolling -----

    pub fn scroll_output_down(&mut self) {
        let max = self.output.lines().len().saturating_sub(1);
        if self.output_scroll < max {
            self.output_scroll += 1;
        }
    }

    pub fn scroll_output_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    fn reset_status(&mut self) {
        self.status_message = format!(
            "{} | F2 language, Ctrl+E run, F1 help",
            self.selected_language().display_name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::LanguageOption;

    fn registry() -> LanguageRegistry {
        LanguageRegistry::from_entries(vec![
            LanguageOption {
                code: "groovy".into(),
                display_name: "Groovy".into(),
                editor_mode: Some("groovy".into()),
            },
            LanguageOption {
                code: "jsp".into(),
                display_name: "JSP".into(),
                editor_mode: None,
            },
        ])
        .unwrap()
    }

    fn app() -> ConsoleApp {
        ConsoleApp::new(
            registry(),
            ModeLoader::with_rules_dir(None),
            "http://localhost:8080/system/console/sc".into(),
            Vec::new(),
        )
    }

    fn type_source(app: &mut ConsoleApp, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                app.input.insert_newline();
            } else {
                app.input.insert_char(c);
            }
        }
    }

    #[test]
    fn initial_state_matches_contract() {
        let app = app();
        assert!(!app.output.is_visible());
        assert!(!app.is_busy());
        assert_eq!(app.selected_language().code, "groovy");
        assert_eq!(app.input.mode(), "groovy");
    }

    #[test]
    fn selecting_modeless_language_falls_back_to_plain_text() {
        let mut app = app();
        assert!(app.select_code("jsp"));
        assert_eq!(app.input.mode(), crate::editor::PLAIN_TEXT_MODE);
        assert!(app.current_rules().is_plain());
        assert!(app.select_code("groovy"));
        assert_eq!(app.input.mode(), "groovy");
    }

    #[test]
    fn dispatch_flushes_buffer_and_blocks_reentry() {
        let mut app = app();
        type_source(&mut app, "println 1");
        let req = app.begin_dispatch().unwrap();
        assert_eq!(req.language_code, "groovy");
        assert_eq!(req.source_text, "println 1");
        assert!(app.is_busy());

        // Second dispatch while pending: rejected, surfaces untouched.
        assert!(app.begin_dispatch().is_none());
        assert_eq!(app.status_message, "execution already running");
        assert_eq!(app.input.content(), "println 1");
        assert!(!app.output.is_visible());
    }

    #[test]
    fn empty_buffer_does_not_dispatch() {
        let mut app = app();
        assert!(app.begin_dispatch().is_none());
        assert!(!app.is_busy());
    }

    #[test]
    fn success_renders_transcript_and_shows_output() {
        let mut app = app();
        type_source(&mut app, "println 1");
        app.begin_dispatch().unwrap();
        app.finish(Ok(ExecutionOutcome::Success { transcript: "1\n".into() }));
        assert!(!app.is_busy());
        assert!(app.output.is_visible());
        assert_eq!(app.output.content(), "1\n");
    }

    #[test]
    fn failure_leaves_previous_output_alone() {
        let mut app = app();
        type_source(&mut app, "println 1");
        app.begin_dispatch().unwrap();
        app.finish(Ok(ExecutionOutcome::Success { transcript: "first".into() }));

        app.begin_dispatch().unwrap();
        app.finish(Err(ExecError::Timeout));
        assert!(!app.is_busy());
        assert_eq!(app.output.content(), "first");
        assert!(app.status_message.starts_with("error:"));
    }

    #[test]
    fn server_error_still_renders_diagnostics() {
        let mut app = app();
        type_source(&mut app, "boom()");
        app.begin_dispatch().unwrap();
        app.finish(Ok(ExecutionOutcome::ServerError {
            status: 500,
            transcript: "MissingMethodException: boom".into(),
        }));
        assert!(app.output.is_visible());
        assert_eq!(app.output.content(), "MissingMethodException: boom");
        assert!(app.status_message.contains("500"));
    }

    #[test]
    fn recall_walks_previous_snippets() {
        let mut app = ConsoleApp::new(
            registry(),
            ModeLoader::with_rules_dir(None),
            "http://localhost".into(),
            vec!["a".into(), "b".into()],
        );
        app.recall_prev();
        assert_eq!(app.input.content(), "b");
        app.recall_prev();
        assert_eq!(app.input.content(), "a");
        app.recall_next();
        assert_eq!(app.input.content(), "b");
        app.recall_next();
        assert!(app.input.is_empty());
    }

    #[test]
    fn popup_cycles_and_confirms() {
        let mut app = app();
        app.open_popup();
        assert_eq!(app.popup_selected(), Some(0));
        app.popup_next();
        assert_eq!(app.popup_selected(), Some(1));
        app.popup_next();
        assert_eq!(app.popup_selected(), Some(0));
        app.popup_prev();
        assert_eq!(app.popup_selected(), Some(1));
        app.confirm_popup();
        assert!(!app.popup_open());
        assert_eq!(app.selected_language().code, "jsp");
    }
}
