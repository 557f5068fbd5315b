//! Async event loop for the interactive console.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::{
    client::ExecClient,
    config::Config,
    history::{ConsoleHistory, HistoryEntry},
    languages::LanguageRegistry,
    modes::ModeLoader,
};
use super::{app::ConsoleApp, events::ConsoleEvent, ui::render_ui};

/// Run the interactive console until the user quits.
pub async fn run_console(
    cfg: &Config,
    registry: LanguageRegistry,
    history: Option<ConsoleHistory>,
) -> Result<()> {
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("the console requires a terminal"));
    }

    let client = Arc::new(ExecClient::from_config(cfg)?);

    let recall = match &history {
        Some(h) => h
            .read()
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.source_text)
            .collect(),
        None => Vec::new(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = ConsoleApp::new(
        registry,
        ModeLoader::from_config(cfg),
        client.endpoint().to_string(),
        recall,
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel::<ConsoleEvent>();

    let result = run_app(&mut terminal, &mut app, client, history, event_tx, event_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ConsoleApp,
    client: Arc<ExecClient>,
    history: Option<ConsoleHistory>,
    event_tx: mpsc::UnboundedSender<ConsoleEvent>,
    mut event_rx: mpsc::UnboundedReceiver<ConsoleEvent>,
) -> Result<()> {
    // Pump keyboard events into the channel from a blocking task.
    let input_tx = event_tx.clone();
    tokio::task::spawn_blocking(move || loop {
        if event::poll(Duration::from_millis(100)).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if input_tx.send(ConsoleEvent::Key(key)).is_err() {
                    break; // Channel closed
                }
            }
        }
    });

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        if let Ok(console_event) = event_rx.try_recv() {
            match console_event {
                ConsoleEvent::Key(key) => {
                    if handle_key_event(app, key, &client, &history, &event_tx) {
                        break;
                    }
                }
                ConsoleEvent::ExecutionFinished(result) => {
                    app.finish(result);
                }
                ConsoleEvent::Quit => break,
            }
        }

        tokio::time::sleep(Duration::from_millis(16)).await;
    }

    Ok(())
}

/// Handle one key event. Returns true when the console should quit.
fn handle_key_event(
    app: &mut ConsoleApp,
    key: crossterm::event::KeyEvent,
    client: &Arc<ExecClient>,
    history: &Option<ConsoleHistory>,
    event_tx: &mpsc::UnboundedSender<ConsoleEvent>,
) -> bool {
    if app.show_help {
        app.show_help = false;
        return false;
    }

    if app.popup_open() {
        match key.code {
            KeyCode::Up => app.popup_prev(),
            KeyCode::Down => app.popup_next(),
            KeyCode::Enter => app.confirm_popup(),
            KeyCode::Esc => app.close_popup(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return true;
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return true;
        }
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            dispatch(app, client, history, event_tx);
        }
        KeyCode::F(5) => {
            dispatch(app, client, history, event_tx);
        }
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::F(2) => app.open_popup(),
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.recall_prev();
        }
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.recall_next();
        }
        KeyCode::PageUp => app.scroll_output_up(),
        KeyCode::PageDown => app.scroll_output_down(),
        KeyCode::Enter => {
            app.input.insert_newline();
        }
        KeyCode::Backspace => {
            app.input.backspace();
        }
        KeyCode::Delete => {
            app.input.delete();
        }
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Up => app.input.move_up(),
        KeyCode::Down => app.input.move_down(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Tab => {
            for _ in 0..4 {
                app.input.insert_char(' ');
            }
        }
        KeyCode::Char(c) => {
            app.input.insert_char(c);
        }
        _ => {}
    }

    false
}

/// Build a request from the buffer and run it on a spawned task. The
/// controller refuses re-entry while one is pending, so at most one task
/// is ever in flight.
fn dispatch(
    app: &mut ConsoleApp,
    client: &Arc<ExecClient>,
    history: &Option<ConsoleHistory>,
    event_tx: &mpsc::UnboundedSender<ConsoleEvent>,
) {
    let Some(request) = app.begin_dispatch() else {
        return;
    };

    if let Some(h) = history {
        let _ = h.append(HistoryEntry {
            language_code: request.language_code.clone(),
            source_text: request.source_text.clone(),
        });
    }

    let client = Arc::clone(client);
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = client.execute(&request).await;
        let _ = tx.send(ConsoleEvent::ExecutionFinished(result));
    });
}
