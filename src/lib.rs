use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::style::{Color, Style};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Clear};

pub mod analytics;
pub mod api;
pub mod cache;
pub mod chart;
pub mod chart_export;
pub mod cli;
pub mod config;
pub mod error_display;
mod help_strings;
pub mod logging;
pub mod notification;
pub mod prompt;
mod render;
pub mod state;
pub mod summary;
pub mod table;
pub mod upload;
pub mod widgets;
pub mod worker;

pub use api::{ApiClient, ApiError, ConnectionStatus, HttpApiClient};
pub use cache::CacheManager;
pub use cli::{Args, ChartType};
pub use config::{
    rgb_to_256_color, rgb_to_basic_ansi, AppConfig, ColorParser, ConfigManager, Theme,
};

use api::{GradientResponse, Row, SearchRequest, SortRequest, StatsReply, UploadResponse};
use error_display::{read_failure_message, user_message_from_api, user_message_from_report};
use notification::{NotificationCenter, NotificationTiming};
use prompt::{DialogKind, DialogOutcome, DialogValues, ParamDialog};
use state::{AppState, Target};
use upload::{path_from_paste, SelectedFile};
use widgets::controls::{Controls, DASHBOARD_CONTROLS, DIALOG_CONTROLS};
use widgets::debug::{DebugLine, DebugState};
use worker::{RequestRunner, RunMode};

/// Application name used for cache directory and other app-specific paths
pub const APP_NAME: &str = "thinkboard";

const UPLOAD_FIRST: &str = "Please upload a CSV file first.";
const SELECT_FILE_FIRST: &str = "Please select a CSV file to upload.";
const UPLOAD_IN_PROGRESS: &str = "An upload is already in progress.";
const UPLOAD_DONE: &str = "File uploaded successfully!";
const UPLOAD_FAILED: &str = "Error uploading file. Please try again.";
const SORT_DONE: &str = "Data sorted successfully!";
const SORT_FAILED: &str = "Error sorting data. Please try again.";
const SEARCH_FAILED: &str = "Error searching data. Please try again.";
const GRADIENT_DONE: &str = "Gradient computed successfully!";
const GRADIENT_FAILED: &str = "Error computing gradient. Please try again.";
const SAMPLE_LOADING: &str = "Loading sample data...";
const SAMPLE_FAILED: &str = "Error loading sample data. Please try uploading manually.";
const STATS_FAILED: &str = "Error fetching uploaded files. Please try again.";
const NOTHING_TO_EXPORT: &str = "No chart to export. Upload a CSV file first.";

/// Dashboard sections, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Upload,
    Analytics,
    Visualization,
    Results,
}

impl Section {
    pub const ALL: [Self; 4] = [
        Self::Upload,
        Self::Analytics,
        Self::Visualization,
        Self::Results,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Analytics => "Analytics",
            Self::Visualization => "Visualization",
            Self::Results => "Results",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Bracketed paste; a path here is a file drop
    Paste(String),
    Resize(u16, u16),
    /// Redraw timer while notifications or requests are live
    Tick,
    CheckHealth,
    HealthChecked(Result<Value, ApiError>),
    SelectFile(PathBuf),
    Upload,
    UploadFinished(SelectedFile, Result<UploadResponse, ApiError>),
    LoadSample(String),
    SampleLoaded(String, Result<Vec<u8>, ApiError>),
    Sort(SortRequest),
    /// Sequence number, request, reply
    SortFinished(u64, SortRequest, Result<Vec<Row>, ApiError>),
    Search(SearchRequest),
    SearchFinished(u64, SearchRequest, Result<Vec<Row>, ApiError>),
    Gradient(String),
    GradientFinished(u64, String, Result<GradientResponse, ApiError>),
    FetchStats,
    StatsFetched(u64, Result<StatsReply, ApiError>),
    SetChartType(ChartType),
    ExportChart,
    Exit,
    Crash(String),
}

impl AppEvent {
    /// Short name for logs and the debug strip.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Key(_) => "key",
            Self::Paste(_) => "paste",
            Self::Resize(..) => "resize",
            Self::Tick => "tick",
            Self::CheckHealth => "check_health",
            Self::HealthChecked(_) => "health_checked",
            Self::SelectFile(_) => "select_file",
            Self::Upload => "upload",
            Self::UploadFinished(..) => "upload_finished",
            Self::LoadSample(_) => "load_sample",
            Self::SampleLoaded(..) => "sample_loaded",
            Self::Sort(_) => "sort",
            Self::SortFinished(..) => "sort_finished",
            Self::Search(_) => "search",
            Self::SearchFinished(..) => "search_finished",
            Self::Gradient(_) => "gradient",
            Self::GradientFinished(..) => "gradient_finished",
            Self::FetchStats => "fetch_stats",
            Self::StatsFetched(..) => "stats_fetched",
            Self::SetChartType(_) => "set_chart_type",
            Self::ExportChart => "export_chart",
            Self::Exit => "exit",
            Self::Crash(_) => "crash",
        }
    }
}

/// What to do right after start.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub path: Option<PathBuf>,
    pub upload: bool,
    pub sample: Option<String>,
    pub debug: bool,
}

impl From<&Args> for RunOptions {
    fn from(args: &Args) -> Self {
        Self {
            path: args.path.clone(),
            upload: args.upload,
            sample: args.sample.clone(),
            debug: args.debug,
        }
    }
}

pub struct App {
    pub(crate) state: AppState,
    pub(crate) notifications: NotificationCenter,
    pub(crate) dialog: Option<ParamDialog>,
    pub(crate) active_section: Section,
    pub(crate) menu_open: bool,
    pub(crate) connection: ConnectionStatus,
    pub(crate) show_help: bool,
    pub(crate) help_scroll: usize,
    pub(crate) debug: DebugState,
    pub(crate) cache: Option<CacheManager>,
    pub(crate) theme: Theme,
    pub(crate) app_config: AppConfig,
    pub(crate) throbber_frame: u8,
    /// Set at render time from the terminal width
    pub(crate) narrow: bool,
    runner: RequestRunner,
}

impl App {
    /// App talking to the configured server over HTTP.
    pub fn new_with_config(events: Sender<AppEvent>, theme: Theme, config: AppConfig) -> Self {
        let client = HttpApiClient::new(
            &config.server.base_url,
            config.server.timeout_secs.map(Duration::from_secs),
        );
        let cache = match CacheManager::new(APP_NAME) {
            Ok(cache) => Some(cache),
            Err(e) => {
                log::warn!("cache.unavailable err={}", e);
                None
            }
        };
        Self::with_client(events, theme, config, Arc::new(client), RunMode::Threaded)
            .with_cache(cache)
    }

    /// App with an explicit client and run mode; no input history until
    /// [`App::with_cache`] is applied.
    pub fn with_client(
        events: Sender<AppEvent>,
        theme: Theme,
        config: AppConfig,
        client: Arc<dyn ApiClient>,
        mode: RunMode,
    ) -> Self {
        Self {
            state: AppState::new(config.default_chart_type()),
            notifications: NotificationCenter::new(NotificationTiming::from_config(
                &config.notifications,
            )),
            dialog: None,
            active_section: Section::default(),
            menu_open: false,
            connection: ConnectionStatus::default(),
            show_help: false,
            help_scroll: 0,
            debug: DebugState {
                enabled: config.debug.enabled,
                ..DebugState::default()
            },
            cache: None,
            theme,
            app_config: config,
            throbber_frame: 0,
            narrow: false,
            runner: RequestRunner::new(client, events, mode),
        }
    }

    pub fn with_cache(mut self, cache: Option<CacheManager>) -> Self {
        self.cache = cache;
        self
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn dialog(&self) -> Option<&ParamDialog> {
        self.dialog.as_ref()
    }

    pub fn connection(&self) -> &ConnectionStatus {
        &self.connection
    }

    pub fn active_section(&self) -> Section {
        self.active_section
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn is_help_visible(&self) -> bool {
        self.show_help
    }

    pub fn config(&self) -> &AppConfig {
        &self.app_config
    }

    /// Text of the upload control.
    pub fn upload_label(&self) -> String {
        render::dashboard::upload_button_label(self)
    }

    /// An upload or query is waiting for its reply.
    pub fn is_busy(&self) -> bool {
        self.state.upload_in_flight || self.runner.in_flight() > 0
    }

    /// Timer events are needed to animate the throbber and expire notifications.
    pub fn needs_tick(&self) -> bool {
        self.is_busy() || !self.notifications.is_empty()
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        if !matches!(event, AppEvent::Tick | AppEvent::Key(_)) {
            self.debug.last_action = event.name().to_string();
        }

        match event {
            AppEvent::Key(key) => {
                self.debug.on_key(key);
                self.key(key)
            }
            AppEvent::Paste(text) => self.paste(text),
            AppEvent::Resize(cols, rows) => {
                log::debug!("terminal.resize cols={} rows={}", cols, rows);
                None
            }
            AppEvent::Tick => {
                self.notifications.prune(Instant::now());
                None
            }
            AppEvent::CheckHealth => {
                self.connection = ConnectionStatus::Checking;
                self.submit(|client| AppEvent::HealthChecked(client.health()))
            }
            AppEvent::HealthChecked(result) => {
                match result {
                    Ok(reply) => {
                        log::info!("health.ok reply={}", reply);
                        self.connection = ConnectionStatus::from_health(reply);
                    }
                    Err(e) => {
                        log::warn!("health.failed err={}", e);
                        self.connection = ConnectionStatus::Offline;
                    }
                }
                None
            }
            AppEvent::SelectFile(path) => {
                self.select_file(SelectedFile::from_path(path.clone()));
                None
            }
            AppEvent::Upload => self.start_upload(),
            AppEvent::UploadFinished(file, result) => {
                self.state.upload_in_flight = false;
                match result {
                    Ok(response) => {
                        log::info!(
                            "upload.ok file={} columns={} rows={}",
                            file.name,
                            response.summary.columns.len(),
                            response.summary.row_count
                        );
                        self.state.apply_upload(file.clone(), response.clone());
                        self.notifications.success(UPLOAD_DONE);
                        self.active_section = Section::Analytics;
                    }
                    Err(e) => self.report_failure("upload", e, UPLOAD_FAILED),
                }
                None
            }
            AppEvent::LoadSample(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                self.notifications.info(SAMPLE_LOADING);
                self.submit(move |client| {
                    let result = client.fetch_sample(&name);
                    AppEvent::SampleLoaded(name, result)
                })
            }
            AppEvent::SampleLoaded(name, result) => {
                match result {
                    Ok(bytes) => {
                        self.select_file(SelectedFile::from_bytes(name.clone(), bytes.clone()));
                        self.notifications
                            .success(format!("Loaded {} successfully!", name));
                    }
                    Err(e) => {
                        log::warn!("sample.failed name={} err={}", name, e);
                        self.notifications.error(SAMPLE_FAILED);
                    }
                }
                None
            }
            AppEvent::Sort(request) => {
                if !self.require_upload() {
                    return None;
                }
                let seq = self.state.sequences.issue(Target::Table);
                let request = request.clone();
                log::info!(
                    "sort.request column={} order={} seq={}",
                    request.column,
                    request.order,
                    seq
                );
                self.submit(move |client| {
                    let result = client.sort(&request);
                    AppEvent::SortFinished(seq, request, result)
                })
            }
            AppEvent::SortFinished(seq, request, result) => {
                if !self.is_current(Target::Table, *seq, "sort") {
                    return None;
                }
                match result {
                    Ok(rows) => {
                        self.state.results = Some(table::build_table(
                            table::sort_title(&request.column, request.order),
                            rows,
                        ));
                        self.notifications.success(SORT_DONE);
                        self.active_section = Section::Results;
                    }
                    Err(e) => self.report_failure("sort", e, SORT_FAILED),
                }
                None
            }
            AppEvent::Search(request) => {
                if !self.require_upload() {
                    return None;
                }
                let seq = self.state.sequences.issue(Target::Table);
                let request = request.clone();
                log::info!("search.request column={} seq={}", request.column, seq);
                self.submit(move |client| {
                    let result = client.search(&request);
                    AppEvent::SearchFinished(seq, request, result)
                })
            }
            AppEvent::SearchFinished(seq, request, result) => {
                if !self.is_current(Target::Table, *seq, "search") {
                    return None;
                }
                match result {
                    Ok(rows) => {
                        self.state.results = Some(table::build_table(
                            table::search_title(&request.query, &request.column),
                            rows,
                        ));
                        self.notifications
                            .success(format!("Found {} results!", rows.len()));
                        self.active_section = Section::Results;
                    }
                    Err(e) => self.report_failure("search", e, SEARCH_FAILED),
                }
                None
            }
            AppEvent::Gradient(column) => {
                if !self.require_upload() {
                    return None;
                }
                let seq = self.state.sequences.issue(Target::Chart);
                let column = column.clone();
                log::info!("gradient.request column={} seq={}", column, seq);
                self.submit(move |client| {
                    let result = client.gradient(&column);
                    AppEvent::GradientFinished(seq, column, result)
                })
            }
            AppEvent::GradientFinished(seq, column, result) => {
                if !self.is_current(Target::Chart, *seq, "gradient") {
                    return None;
                }
                match result {
                    Ok(response) => {
                        self.state.apply_gradient(response, column);
                        self.notifications.success(GRADIENT_DONE);
                        self.active_section = Section::Visualization;
                    }
                    Err(e) => self.report_failure("gradient", e, GRADIENT_FAILED),
                }
                None
            }
            AppEvent::FetchStats => {
                let seq = self.state.sequences.issue(Target::Table);
                self.submit(move |client| AppEvent::StatsFetched(seq, client.stats()))
            }
            AppEvent::StatsFetched(seq, result) => {
                if !self.is_current(Target::Table, *seq, "stats") {
                    return None;
                }
                match result {
                    Ok(StatsReply::Files(stats)) => {
                        self.state.results = Some(table::stats_table(stats));
                        self.active_section = Section::Results;
                    }
                    Ok(StatsReply::Empty(message)) => self.notifications.info(message.clone()),
                    Err(e) => self.report_failure("stats", e, STATS_FAILED),
                }
                None
            }
            AppEvent::SetChartType(chart_type) => {
                if self.state.set_chart_type(*chart_type) {
                    log::debug!("chart.type_changed type={}", chart_type.as_str());
                }
                None
            }
            AppEvent::ExportChart => {
                self.export_chart();
                None
            }
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    fn submit<F>(&mut self, job: F) -> Option<AppEvent>
    where
        F: FnOnce(&dyn ApiClient) -> AppEvent + Send + 'static,
    {
        self.debug.requests_sent += 1;
        self.runner.submit(job)
    }

    /// Gate for sort, search and gradient.
    fn require_upload(&mut self) -> bool {
        if self.state.has_upload() {
            true
        } else {
            self.notifications.error(UPLOAD_FIRST);
            false
        }
    }

    fn is_current(&mut self, target: Target, seq: u64, op: &str) -> bool {
        if self.state.sequences.is_current(target, seq) {
            return true;
        }
        log::debug!("{}.discard_stale seq={}", op, seq);
        self.debug.responses_discarded += 1;
        false
    }

    fn report_failure(&mut self, op: &str, err: &ApiError, fallback: &str) {
        if err.is_application() {
            log::info!("{}.rejected err={}", op, err);
        } else {
            log::warn!("{}.failed err={}", op, err);
        }
        self.notifications.error(user_message_from_api(err, fallback));
    }

    fn select_file(&mut self, file: SelectedFile) {
        let (message, severity) = file.selection_feedback();
        log::info!("file.selected name={} csv={}", file.name, file.is_csv());
        self.notifications.push(message, severity);
        self.state.selected_file = Some(file);
        self.active_section = Section::Upload;
    }

    fn start_upload(&mut self) -> Option<AppEvent> {
        if self.state.upload_in_flight {
            self.notifications.info(UPLOAD_IN_PROGRESS);
            return None;
        }
        let Some(file) = self.state.selected_file.clone() else {
            self.notifications.error(SELECT_FILE_FIRST);
            return None;
        };
        let contents = match file.read_contents() {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("upload.read_failed file={} err={}", file.name, e);
                self.notifications
                    .error(read_failure_message(&e, file.path()));
                return None;
            }
        };

        log::info!("upload.request file={} bytes={}", file.name, contents.len());
        self.state.upload_in_flight = true;
        self.submit(move |client| {
            let result = client.upload(&file.name, &contents);
            AppEvent::UploadFinished(file, result)
        })
    }

    fn export_chart(&mut self) {
        let Some(spec) = self.state.chart.spec() else {
            self.notifications.error(NOTHING_TO_EXPORT);
            return;
        };
        let dir = self
            .app_config
            .chart
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = chart_export::export_file_name(&dir, chrono::Local::now());
        let size = (
            self.app_config.chart.export_width,
            self.app_config.chart.export_height,
        );
        let result = std::fs::create_dir_all(&dir)
            .map_err(color_eyre::Report::from)
            .and_then(|_| chart_export::write_chart_png(&path, spec, size));
        match result {
            Ok(()) => {
                log::info!("chart.exported path={}", path.display());
                self.notifications
                    .success(format!("Chart exported to {}", path.display()));
            }
            Err(e) => {
                log::warn!("chart.export_failed path={} err={:?}", path.display(), e);
                self.notifications.error(format!(
                    "Failed to export chart: {}",
                    user_message_from_report(&e)
                ));
            }
        }
    }

    fn open_dialog(&mut self, kind: DialogKind) {
        let history_limit = if self.app_config.query.enable_history {
            self.app_config.query.history_limit
        } else {
            0
        };
        let mut dialog = ParamDialog::new(
            kind,
            self.state.column_names(),
            history_limit,
            &self.theme,
        );
        if let Some(cache) = &self.cache {
            for field in dialog.fields.iter_mut() {
                if let Err(e) = field.input.load_history(cache) {
                    log::debug!("history.load_failed err={}", e);
                }
            }
        }
        self.dialog = Some(dialog);
    }

    /// Open a query dialog only once a file has been uploaded.
    fn open_query_dialog(&mut self, kind: DialogKind) {
        if self.require_upload() {
            self.open_dialog(kind);
        }
    }

    fn paste(&mut self, text: &str) -> Option<AppEvent> {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.paste(text);
            return None;
        }
        match path_from_paste(text) {
            Some(path) => Some(AppEvent::SelectFile(path)),
            None => {
                log::debug!("paste.ignored len={}", text.len());
                None
            }
        }
    }

    fn key(&mut self, key: &KeyEvent) -> Option<AppEvent> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }

        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) => {
                    self.show_help = false;
                }
                KeyCode::Down | KeyCode::Char('j') => self.help_scroll += 1,
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1)
                }
                KeyCode::PageDown => self.help_scroll += 10,
                KeyCode::PageUp => self.help_scroll = self.help_scroll.saturating_sub(10),
                KeyCode::Home => self.help_scroll = 0,
                _ => {}
            }
            return None;
        }

        if let Some(dialog) = self.dialog.as_mut() {
            if key.code == KeyCode::F(1) {
                self.open_help();
                return None;
            }
            return match dialog.handle_key(key, self.cache.as_ref()) {
                DialogOutcome::Pending => None,
                DialogOutcome::Cancelled => {
                    log::debug!("dialog.cancelled kind={:?}", dialog.kind);
                    self.dialog = None;
                    None
                }
                DialogOutcome::Submitted(values) => {
                    self.dialog = None;
                    Some(match values {
                        DialogValues::Sort(request) => AppEvent::Sort(request),
                        DialogValues::Search(request) => AppEvent::Search(request),
                        DialogValues::Gradient { column } => AppEvent::Gradient(column),
                        DialogValues::OpenFile(path) => AppEvent::SelectFile(path),
                        DialogValues::Sample(name) => AppEvent::LoadSample(name),
                    })
                }
            };
        }

        if self.menu_open {
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    self.active_section = self.active_section.next()
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.active_section = self.active_section.prev()
                }
                KeyCode::Char(c @ '1'..='4') => {
                    let idx = c as usize - '1' as usize;
                    self.active_section = Section::ALL[idx];
                    self.menu_open = false;
                }
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('m') => self.menu_open = false,
                KeyCode::Char('q') => return Some(AppEvent::Exit),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => Some(AppEvent::Exit),
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.open_help();
                None
            }
            KeyCode::Char('o') => {
                self.open_dialog(DialogKind::OpenFile);
                None
            }
            KeyCode::Char('l') => {
                self.open_dialog(DialogKind::Sample);
                None
            }
            KeyCode::Char('u') => Some(AppEvent::Upload),
            KeyCode::Char('s') => {
                self.open_query_dialog(DialogKind::Sort);
                None
            }
            KeyCode::Char('/') => {
                self.open_query_dialog(DialogKind::Search);
                None
            }
            KeyCode::Char('g') => {
                self.open_query_dialog(DialogKind::Gradient);
                None
            }
            KeyCode::Char('b') => Some(AppEvent::SetChartType(ChartType::Bar)),
            KeyCode::Char('n') => Some(AppEvent::SetChartType(ChartType::Line)),
            KeyCode::Char('p') => Some(AppEvent::SetChartType(ChartType::Pie)),
            KeyCode::Char('t') => Some(AppEvent::SetChartType(self.state.chart_type.next())),
            KeyCode::Char('f') => Some(AppEvent::FetchStats),
            KeyCode::Char('x') => Some(AppEvent::ExportChart),
            KeyCode::Tab => {
                self.active_section = self.active_section.next();
                None
            }
            KeyCode::BackTab => {
                self.active_section = self.active_section.prev();
                None
            }
            KeyCode::Char('m') if self.narrow => {
                self.menu_open = true;
                None
            }
            _ => None,
        }
    }

    fn open_help(&mut self) {
        self.show_help = true;
        self.help_scroll = 0;
    }

    fn status_text(&self) -> Option<String> {
        let data = self.state.current_data.as_ref()?;
        let name = self
            .state
            .current_file
            .as_ref()
            .map(|f| f.name.as_str())
            .unwrap_or("dataset");
        Some(format!("{} ({} rows)", name, data.summary.row_count))
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        use crate::render::context::RenderContext;
        use crate::render::layout::{app_layout, dashboard_layout};
        use crate::render::{chart_view, dashboard, dialog, notifications, overlays, table_view};

        self.debug.num_frames += 1;
        let ctx = RenderContext::from_theme_and_config(
            &self.theme,
            u16::try_from(self.app_config.display.table_cell_padding).unwrap_or(u16::MAX),
        );

        Clear.render(area, buf);
        if ctx.background != Color::Reset {
            Block::default()
                .style(Style::default().bg(ctx.background))
                .render(area, buf);
        }

        self.narrow = area.width < self.app_config.display.narrow_width;
        if !self.narrow {
            self.menu_open = false;
        }

        let app_layout = app_layout(area, self.debug.enabled);
        let main_area = app_layout.main_view;
        let dash = dashboard_layout(main_area, self.narrow, self.active_section);
        let active = self.active_section;

        dashboard::render_nav(dash.nav, buf, self, &ctx);
        if let Some(upload_area) = dash.upload {
            dashboard::render_upload(upload_area, buf, self, &ctx);
        }
        if let Some(analytics_area) = dash.analytics {
            let view = self.state.analytics_view();
            dashboard::render_analytics(
                analytics_area,
                buf,
                view.as_ref(),
                active == Section::Analytics,
                &ctx,
            );
        }
        if let Some(chart_area) = dash.chart {
            chart_view::render(
                chart_area,
                buf,
                &self.state.chart,
                self.state.chart_type,
                active == Section::Visualization,
                &ctx,
            );
        }
        if let Some(results_area) = dash.results {
            table_view::render(
                results_area,
                buf,
                self.state.results.as_ref(),
                active == Section::Results,
                &ctx,
            );
        }

        notifications::render(
            main_area,
            buf,
            &self.notifications.visible(Instant::now()),
            &ctx,
        );

        if self.menu_open {
            overlays::render_menu(main_area, buf, active, &ctx);
        }
        if let Some(param_dialog) = &self.dialog {
            dialog::render(main_area, buf, param_dialog, &ctx);
        }
        if self.show_help {
            let (title, text) = if self.dialog.is_some() {
                (" Dialog Help ", help_strings::dialog())
            } else {
                (" Help ", help_strings::dashboard())
            };
            overlays::render_help_overlay(main_area, buf, title, text, &mut self.help_scroll, &ctx);
        }

        let busy = self.is_busy();
        if busy {
            self.throbber_frame = self.throbber_frame.wrapping_add(1);
        }
        let use_unicode_throbber = std::env::var("LANG")
            .map(|l| l.to_uppercase().contains("UTF-8"))
            .unwrap_or(false);
        let hints: &[(&'static str, &'static str)] = if self.dialog.is_some() {
            &DIALOG_CONTROLS
        } else {
            &DASHBOARD_CONTROLS
        };
        let controls = Controls::from_context(&ctx)
            .with_controls(hints)
            .with_status(self.status_text())
            .with_unicode_throbber(use_unicode_throbber)
            .with_busy(busy, self.throbber_frame);
        controls.render(app_layout.control_bar, buf);

        if let Some(debug_area) = app_layout.debug {
            DebugLine {
                state: &self.debug,
                in_flight: self.runner.in_flight(),
            }
            .render(debug_area, buf);
        }
    }
}

/// Run the dashboard until the user quits.
pub fn run(options: RunOptions, config: AppConfig) -> Result<()> {
    use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event};
    use std::sync::mpsc;

    let theme = Theme::from_config(&config.theme)
        .or_else(|e| Theme::from_config(&AppConfig::default().theme).map_err(|_| e))?;

    if let Some(path) = &options.path {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
            .into());
        }
    }

    let mut terminal = ratatui::try_init().map_err(|e| {
        color_eyre::eyre::eyre!(
            "thinkboard requires an interactive terminal (TTY). No terminal detected: {}. \
             Run from a terminal or ensure stdout is connected to a TTY.",
            e
        )
    })?;
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableBracketedPaste) {
        log::warn!("terminal.bracketed_paste_unavailable err={}", e);
    }

    let (tx, rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), theme, config.clone());
    if options.debug {
        app.enable_debug();
    }
    log::info!(
        "app.start server={} chart_type={}",
        config.server.base_url,
        app.state.chart_type.as_str()
    );

    tx.send(AppEvent::CheckHealth)?;
    if let Some(path) = options.path {
        tx.send(AppEvent::SelectFile(path))?;
        if options.upload {
            tx.send(AppEvent::Upload)?;
        }
    } else if let Some(sample) = options.sample {
        tx.send(AppEvent::LoadSample(sample))?;
    }

    terminal.draw(|frame| frame.render_widget(&mut app, frame.area()))?;

    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);
    let result: Result<()> = (|| {
        loop {
            if crossterm::event::poll(poll_interval)? {
                match crossterm::event::read()? {
                    Event::Key(key) => {
                        if key.is_press() {
                            tx.send(AppEvent::Key(key))?
                        }
                    }
                    Event::Paste(text) => tx.send(AppEvent::Paste(text))?,
                    Event::Resize(cols, rows) => tx.send(AppEvent::Resize(cols, rows))?,
                    _ => {}
                }
            }

            let updated = match rx.recv_timeout(Duration::from_millis(0)) {
                Ok(event) => {
                    match event {
                        AppEvent::Exit => break,
                        AppEvent::Crash(msg) => return Err(color_eyre::eyre::eyre!(msg)),
                        event => {
                            if let Some(next) = app.event(&event) {
                                tx.send(next)?;
                            }
                        }
                    }
                    true
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if app.needs_tick() {
                        tx.send(AppEvent::Tick)?;
                    }
                    false
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            };

            if updated {
                terminal.draw(|frame| frame.render_widget(&mut app, frame.area()))?;
            }
        }
        Ok(())
    })();

    if let Err(e) = crossterm::execute!(std::io::stdout(), DisableBracketedPaste) {
        log::debug!("terminal.restore_paste_failed err={}", e);
    }
    ratatui::restore();
    log::info!("app.exit ok={}", result.is_ok());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_cycle() {
        assert_eq!(Section::Upload.next(), Section::Analytics);
        assert_eq!(Section::Results.next(), Section::Upload);
        assert_eq!(Section::Upload.prev(), Section::Results);
        assert_eq!(Section::Visualization.title(), "Visualization");
    }

    #[test]
    fn test_run_options_from_args() {
        use clap::Parser;
        let args = Args::try_parse_from(["thinkboard", "--upload", "--debug", "data.csv"]).unwrap();
        let options = RunOptions::from(&args);
        assert_eq!(options.path, Some(PathBuf::from("data.csv")));
        assert!(options.upload);
        assert!(options.debug);
        assert!(options.sample.is_none());
    }
}
