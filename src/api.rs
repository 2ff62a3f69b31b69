//! Client for the analytics server.
//!
//! [`ApiClient`] is the seam between the dashboard and the network: the app only
//! talks to the trait, [`HttpApiClient`] implements it with `ureq`, and tests
//! plug in an in-memory client.
//!
//! Replies are classified into [`ApiError`] tiers: a JSON body carrying a truthy
//! `error` field is an application error ([`ApiError::Server`], shown verbatim);
//! everything else that goes wrong is a transport, status or decode failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::time::Duration;

use crate::summary::DatasetSummary;

/// One result row: column name to JSON value, in server order.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortRequest {
    pub column: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub column: String,
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
struct GradientRequest<'a> {
    column: &'a str,
}

/// Successful `/upload` reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Name the server stored the file under
    #[serde(default)]
    pub filename: Option<String>,
    pub summary: DatasetSummary,
}

/// Successful `/gradient` reply. Non-finite gradients arrive as null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GradientResponse {
    #[serde(default)]
    pub column: String,
    pub gradients: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub rows: u64,
    pub columns: u64,
    pub numeric_columns: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatsResponse {
    pub total_files: u64,
    pub files: Vec<UploadedFile>,
}

/// `/stats` reply: either a file listing or a plain message (no files yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsReply {
    Files(StatsResponse),
    Empty(String),
}

/// Failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection, DNS, timeout or I/O failure
    Transport(String),
    /// Non-2xx status without an `error` field
    Status { code: u16, message: String },
    /// Body was not the JSON shape expected
    Decode(String),
    /// Server-reported `error` field, shown to the user verbatim
    Server(String),
}

impl ApiError {
    /// True for errors the server reported itself (tier b).
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Server(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::Status { code, message } => write!(f, "HTTP {}: {}", code, message),
            Self::Decode(msg) => write!(f, "invalid response: {}", msg),
            Self::Server(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Server reachability as shown in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Checking,
    Online {
        status: String,
        version: Option<String>,
    },
    Offline,
}

impl ConnectionStatus {
    /// From a `/health` reply; missing `status` reads as "ok".
    pub fn from_health(reply: &Value) -> Self {
        let text = |key: &str| {
            reply.get(key).and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
        };
        Self::Online {
            status: text("status").unwrap_or_else(|| "ok".to_string()),
            version: text("version"),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Checking => "connecting...".to_string(),
            Self::Online {
                status,
                version: Some(version),
            } => format!("{} v{}", status, version),
            Self::Online { status, .. } => status.clone(),
            Self::Offline => "offline".to_string(),
        }
    }
}

/// Operations the dashboard needs from the analytics server.
pub trait ApiClient: Send + Sync {
    /// `GET /health`
    fn health(&self) -> Result<Value, ApiError>;
    /// `POST /upload`, multipart field `file`
    fn upload(&self, filename: &str, contents: &[u8]) -> Result<UploadResponse, ApiError>;
    /// `POST /sort`
    fn sort(&self, request: &SortRequest) -> Result<Vec<Row>, ApiError>;
    /// `POST /search`
    fn search(&self, request: &SearchRequest) -> Result<Vec<Row>, ApiError>;
    /// `POST /gradient`
    fn gradient(&self, column: &str) -> Result<GradientResponse, ApiError>;
    /// `GET /stats`
    fn stats(&self) -> Result<StatsReply, ApiError>;
    /// `GET /Uploads/<filename>`, raw bytes
    fn fetch_sample(&self, filename: &str) -> Result<Vec<u8>, ApiError>;
}

/// Blocking HTTP implementation on top of a shared `ureq::Agent`.
pub struct HttpApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: builder.build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post_json<T: DeserializeOwned>(&self, path: &str, body: impl Serialize) -> Result<T, ApiError> {
        log::debug!("api.request method=POST path={}", path);
        decode_reply(self.agent.post(&self.url(path)).send_json(body))
    }
}

impl ApiClient for HttpApiClient {
    fn health(&self) -> Result<Value, ApiError> {
        log::debug!("api.request method=GET path=/health");
        decode_reply(self.agent.get(&self.url("/health")).call())
    }

    fn upload(&self, filename: &str, contents: &[u8]) -> Result<UploadResponse, ApiError> {
        let boundary = multipart_boundary();
        let body = multipart_body(&boundary, "file", filename, contents);
        log::debug!(
            "api.request method=POST path=/upload file={} bytes={}",
            filename,
            contents.len()
        );
        let reply = self
            .agent
            .post(&self.url("/upload"))
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            )
            .send_bytes(&body);
        decode_reply(reply)
    }

    fn sort(&self, request: &SortRequest) -> Result<Vec<Row>, ApiError> {
        self.post_json("/sort", request)
    }

    fn search(&self, request: &SearchRequest) -> Result<Vec<Row>, ApiError> {
        self.post_json("/search", request)
    }

    fn gradient(&self, column: &str) -> Result<GradientResponse, ApiError> {
        self.post_json("/gradient", GradientRequest { column })
    }

    fn stats(&self) -> Result<StatsReply, ApiError> {
        log::debug!("api.request method=GET path=/stats");
        match decode_reply::<Value>(self.agent.get(&self.url("/stats")).call()) {
            Ok(value) => stats_from_value(value),
            // no uploads yet: 404 {message}
            Err(ApiError::Status { code: 404, message }) => Ok(StatsReply::Empty(message)),
            Err(e) => Err(e),
        }
    }

    fn fetch_sample(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        let path = format!("/Uploads/{}", urlencoding::encode(filename));
        log::debug!("api.request method=GET path={}", path);
        match self.agent.get(&self.url(&path)).call() {
            Ok(response) => {
                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                Ok(bytes)
            }
            Err(ureq::Error::Status(code, response)) => Err(ApiError::Status {
                code,
                message: response.status_text().to_string(),
            }),
            Err(ureq::Error::Transport(t)) => Err(ApiError::Transport(t.to_string())),
        }
    }
}

fn stats_from_value(value: Value) -> Result<StatsReply, ApiError> {
    if value.get("files").is_none() {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return Ok(StatsReply::Empty(message.to_string()));
        }
    }
    serde_json::from_value(value)
        .map(StatsReply::Files)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Largest reply body accepted. `/sort` returns the whole dataset as JSON
/// records, which runs several times the size of a 16 MB upload.
pub const MAX_REPLY_BYTES: u64 = 256 * 1024 * 1024;

/// Read a whole reply body, up to [`MAX_REPLY_BYTES`].
fn read_body(response: ureq::Response) -> Result<String, ApiError> {
    let mut body = String::new();
    response
        .into_reader()
        .take(MAX_REPLY_BYTES + 1)
        .read_to_string(&mut body)
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    if body.len() as u64 > MAX_REPLY_BYTES {
        return Err(ApiError::Transport(format!(
            "response larger than {} MB",
            MAX_REPLY_BYTES / (1024 * 1024)
        )));
    }
    Ok(body)
}

/// Turn a `ureq` result into a typed reply, applying the error tiers.
fn decode_reply<T: DeserializeOwned>(result: Result<ureq::Response, ureq::Error>) -> Result<T, ApiError> {
    match result {
        Ok(response) => parse_body(&read_body(response)?),
        Err(ureq::Error::Status(code, response)) => {
            let status_text = response.status_text().to_string();
            let body = read_body(response).unwrap_or_default();
            Err(status_error(code, &status_text, &body))
        }
        Err(ureq::Error::Transport(t)) => Err(ApiError::Transport(t.to_string())),
    }
}

/// Parse a 2xx body. A truthy `error` field wins over the expected shape.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: Value = serde_json::from_str(&sanitize_non_finite(body))
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    if let Some(message) = server_error(&value) {
        return Err(ApiError::Server(message));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Classify a non-2xx reply.
pub(crate) fn status_error(code: u16, status_text: &str, body: &str) -> ApiError {
    let value = serde_json::from_str::<Value>(body).ok();
    if let Some(message) = value.as_ref().and_then(server_error) {
        return ApiError::Server(message);
    }
    let message = value
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status_text.to_string());
    ApiError::Status { code, message }
}

/// The `error` field of an object reply, if it is truthy.
fn server_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Replace bare `NaN`/`Infinity`/`-Infinity` tokens (emitted by some JSON
/// encoders for missing cells) with `null`. String contents are left alone.
pub(crate) fn sanitize_non_finite(body: &str) -> Cow<'_, str> {
    if !(body.contains("NaN") || body.contains("Infinity")) {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = body;

    while let Some(c) = rest.chars().next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if let Some(token) = ["-Infinity", "Infinity", "NaN"]
            .into_iter()
            .find(|t| rest.starts_with(t))
        {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    Cow::Owned(out)
}

fn multipart_boundary() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("----thinkboard-{:x}", nanos)
}

/// Build a `multipart/form-data` body with a single file part.
pub(crate) fn multipart_body(boundary: &str, field: &str, filename: &str, contents: &[u8]) -> Vec<u8> {
    let safe_name = filename.replace('"', "%22").replace(['\r', '\n'], " ");
    let mut body = Vec::with_capacity(contents.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, safe_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
