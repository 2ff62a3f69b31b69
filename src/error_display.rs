//! User-facing error message formatting.
//!
//! Matches on typed errors ([`ApiError`] variants, `io::ErrorKind`) rather
//! than parsing strings.

use std::io;
use std::path::Path;

use crate::api::ApiError;

/// Message for a failed request: server-reported errors verbatim, anything
/// else the operation's generic `fallback`.
pub fn user_message_from_api(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Server(message) => message.clone(),
        ApiError::Transport(_) | ApiError::Status { .. } | ApiError::Decode(_) => {
            fallback.to_string()
        }
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::Interrupted => "Operation interrupted.".to_string(),
        ErrorKind::OutOfMemory => "Out of memory.".to_string(),
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

/// Message for reading a selected file at upload time.
pub fn read_failure_message(err: &io::Error, path: Option<&Path>) -> String {
    let msg = user_message_from_io(err, None);
    match path {
        Some(p) => format!("Failed to read {}: {}", p.display(), msg),
        None => msg,
    }
}

/// Format a color_eyre Report by walking its cause chain for known error types.
pub fn user_message_from_report(report: &color_eyre::eyre::Report) -> String {
    for cause in report.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return user_message_from_io(io_err, None);
        }
        if let Some(api_err) = cause.downcast_ref::<ApiError>() {
            return api_err.to_string();
        }
    }

    // first line only; avoids long tracebacks
    let display = report.to_string();
    display
        .lines()
        .next()
        .map(str::trim)
        .unwrap_or("An error occurred")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_server_error_verbatim() {
        let err = ApiError::Server("Column 'zzz' not found".to_string());
        assert_eq!(
            user_message_from_api(&err, "Error sorting data. Please try again."),
            "Column 'zzz' not found"
        );
    }

    #[test]
    fn test_api_transport_uses_fallback() {
        let fallback = "Error sorting data. Please try again.";
        for err in [
            ApiError::Transport("connection refused".to_string()),
            ApiError::Status {
                code: 500,
                message: "Internal Server Error".to_string(),
            },
            ApiError::Decode("expected value".to_string()),
        ] {
            assert_eq!(user_message_from_api(&err, fallback), fallback);
        }
    }

    #[test]
    fn test_user_message_from_io_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "No such file");
        let msg = user_message_from_io(&err, None);
        assert!(msg.contains("not found"), "expected 'not found', got: {}", msg);
    }

    #[test]
    fn test_user_message_from_io_permission_denied() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let msg = user_message_from_io(&err, Some("(data.csv)"));
        assert_eq!(msg, "Permission denied. Check read access. (data.csv)");
    }

    #[test]
    fn test_read_failure_names_path() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let msg = read_failure_message(&err, Some(Path::new("/tmp/x.csv")));
        assert_eq!(msg, "Failed to read /tmp/x.csv: File or directory not found.");
    }

    #[test]
    fn test_report_walks_chain() {
        let report = color_eyre::eyre::Report::new(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied",
        ))
        .wrap_err("while saving");
        assert!(user_message_from_report(&report).starts_with("Permission denied"));
    }
}
