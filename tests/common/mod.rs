#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};

use thinkboard::api::{
    ApiClient, ApiError, GradientResponse, Row, SearchRequest, SortRequest, StatsReply,
    UploadResponse,
};
use thinkboard::worker::RunMode;
use thinkboard::{App, AppConfig, AppEvent, Theme};

/// Canned server. Every call is recorded as `"<op> <detail>"`.
pub struct MockApiClient {
    pub calls: Mutex<Vec<String>>,
    pub upload_reply: Mutex<Result<UploadResponse, ApiError>>,
    pub rows_reply: Mutex<Result<Vec<Row>, ApiError>>,
    pub gradient_reply: Mutex<Result<GradientResponse, ApiError>>,
    pub stats_reply: Mutex<Result<StatsReply, ApiError>>,
    pub sample_reply: Mutex<Result<Vec<u8>, ApiError>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            upload_reply: Mutex::new(Ok(upload_response())),
            rows_reply: Mutex::new(Ok(people_rows(3))),
            gradient_reply: Mutex::new(Ok(GradientResponse {
                column: "age".to_string(),
                gradients: vec![Some(1.0), Some(-0.5), Some(2.0)],
            })),
            stats_reply: Mutex::new(Ok(StatsReply::Empty("No files uploaded yet".to_string()))),
            sample_reply: Mutex::new(Ok(b"age,income\n30,50000\n".to_vec())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ApiClient for MockApiClient {
    fn health(&self) -> Result<Value, ApiError> {
        self.record("health".to_string());
        Ok(json!({"status": "healthy", "version": "1.2.0"}))
    }

    fn upload(&self, filename: &str, contents: &[u8]) -> Result<UploadResponse, ApiError> {
        self.record(format!("upload {} {}", filename, contents.len()));
        self.upload_reply.lock().unwrap().clone()
    }

    fn sort(&self, request: &SortRequest) -> Result<Vec<Row>, ApiError> {
        self.record(format!("sort {} {}", request.column, request.order));
        self.rows_reply.lock().unwrap().clone()
    }

    fn search(&self, request: &SearchRequest) -> Result<Vec<Row>, ApiError> {
        self.record(format!("search {} {}", request.column, request.query));
        self.rows_reply.lock().unwrap().clone()
    }

    fn gradient(&self, column: &str) -> Result<GradientResponse, ApiError> {
        self.record(format!("gradient {}", column));
        self.gradient_reply.lock().unwrap().clone()
    }

    fn stats(&self) -> Result<StatsReply, ApiError> {
        self.record("stats".to_string());
        self.stats_reply.lock().unwrap().clone()
    }

    fn fetch_sample(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        self.record(format!("sample {}", filename));
        self.sample_reply.lock().unwrap().clone()
    }
}

pub fn upload_response() -> UploadResponse {
    serde_json::from_value(json!({
        "message": "File processed",
        "filename": "people.csv",
        "summary": {
            "columns": ["age", "income", "city"],
            "row_count": 50,
            "mean_values": {"age": 34.2, "income": 55210},
            "median_values": {"age": 33, "income": 54000},
            "mode_values": {"city": "Austin"},
            "max_values": {"age": 61, "income": 120000},
            "min_values": {"age": 19, "income": 18000}
        }
    }))
    .unwrap()
}

pub fn people_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| match json!({"age": 20 + i, "city": format!("City {}", i)}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        })
        .collect()
}

/// App wired to `client` with requests running inline.
pub fn test_app(client: Arc<MockApiClient>) -> (App, Receiver<AppEvent>) {
    std::env::remove_var("NO_COLOR");
    let (tx, rx) = channel();
    let config = AppConfig::default();
    let theme = Theme::from_config(&config.theme).unwrap();
    let app = App::with_client(tx, theme, config, client, RunMode::Inline);
    (app, rx)
}

/// Feed `event` and every follow-up event until the chain ends.
pub fn drive(app: &mut App, event: AppEvent) {
    let mut next = Some(event);
    while let Some(event) = next {
        next = app.event(&event);
    }
}

pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// App with `people.csv` selected and uploaded.
pub fn uploaded_app(client: Arc<MockApiClient>, dir: &Path) -> App {
    let (mut app, _rx) = test_app(client);
    let path = write_csv(dir, "people.csv", "age,income,city\n30,50000,Austin\n");
    drive(&mut app, AppEvent::SelectFile(path));
    drive(&mut app, AppEvent::Upload);
    assert!(app.state().has_upload());
    app
}

pub fn key(c: char) -> AppEvent {
    AppEvent::Key(crossterm::event::KeyEvent::new(
        crossterm::event::KeyCode::Char(c),
        crossterm::event::KeyModifiers::NONE,
    ))
}

pub fn code(code: crossterm::event::KeyCode) -> AppEvent {
    AppEvent::Key(crossterm::event::KeyEvent::new(
        code,
        crossterm::event::KeyModifiers::NONE,
    ))
}
