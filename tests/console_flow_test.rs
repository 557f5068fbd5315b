//! Full execute cycles driven through the console controller and a real
//! client against the HTTP stub.

mod common;

use std::time::Duration;

use anyhow::Result;
use scon::client::ExecClient;
use scon::languages::{LanguageOption, LanguageRegistry};
use scon::modes::ModeLoader;
use scon::tui::app::ConsoleApp;

use common::StubServer;

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

fn console(endpoint: &str) -> ConsoleApp {
    ConsoleApp::new(
        registry(),
        ModeLoader::with_rules_dir(None),
        endpoint.to_string(),
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

#[tokio::test]
async fn execute_cycle_renders_normalized_output() -> Result<()> {
    let server = StubServer::respond_with("200 OK", "1\r\n", Duration::ZERO).await;
    let client = ExecClient::new(server.url.clone(), Duration::from_secs(5))?;
    let mut app = console(&server.url);

    // Before any selection event, the input mode is the first entry's mode.
    assert_eq!(app.input.mode(), "groovy");
    assert!(!app.output.is_visible());

    type_source(&mut app, "println 1");
    let request = app.begin_dispatch().unwrap();
    assert_eq!(request.language_code, "groovy");
    assert!(app.is_busy());

    let result = client.execute(&request).await;
    app.finish(result);

    assert!(!app.is_busy());
    assert!(app.output.is_visible());
    assert_eq!(app.output.content(), "1\n");
    Ok(())
}

#[tokio::test]
async fn timeout_surfaces_error_and_keeps_previous_output() -> Result<()> {
    // First cycle succeeds and renders a transcript.
    let ok_server = StubServer::respond_with("200 OK", "first", Duration::ZERO).await;
    let ok_client = ExecClient::new(ok_server.url.clone(), Duration::from_secs(5))?;
    let mut app = console(&ok_server.url);

    type_source(&mut app, "println 'first'");
    let request = app.begin_dispatch().unwrap();
    app.finish(ok_client.execute(&request).await);
    assert_eq!(app.output.content(), "first");

    // Second cycle times out: error surfaces, transcript stays.
    let stalled = StubServer::stall().await;
    let slow_client = ExecClient::new(stalled.url.clone(), Duration::from_millis(300))?;

    let request = app.begin_dispatch().unwrap();
    app.finish(slow_client.execute(&request).await);

    assert!(!app.is_busy());
    assert!(app.status_message.starts_with("error:"));
    assert_eq!(app.output.content(), "first");
    Ok(())
}

#[tokio::test]
async fn server_failure_renders_diagnostics_transcript() -> Result<()> {
    let server = StubServer::respond_with(
        "500 Internal Server Error",
        "groovy.lang.MissingPropertyException\r\n\tat Script1.run",
        Duration::ZERO,
    )
    .await;
    let client = ExecClient::new(server.url.clone(), Duration::from_secs(5))?;
    let mut app = console(&server.url);

    type_source(&mut app, "nope");
    let request = app.begin_dispatch().unwrap();
    app.finish(client.execute(&request).await);

    assert!(app.output.is_visible());
    assert_eq!(
        app.output.content(),
        "groovy.lang.MissingPropertyException\n\tat Script1.run"
    );
    assert!(app.status_message.contains("500"));
    Ok(())
}
