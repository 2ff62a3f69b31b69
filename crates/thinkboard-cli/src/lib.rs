//! Shared CLI definitions for thinkboard.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Chart rendering style for the visualization panel.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ChartType {
    /// Grouped bars, one group per column
    #[default]
    Bar,
    /// One line per statistic across columns
    Line,
    /// One ring per statistic, one slice per column
    Pie,
}

impl ChartType {
    pub const ALL: [Self; 3] = [Self::Bar, Self::Line, Self::Pie];

    /// Parse a chart type name (case-insensitive). Returns None for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "pie" => Some(Self::Pie),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
        }
    }

    /// Label shown on the chart type pills.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bar => "Bar",
            Self::Line => "Line",
            Self::Pie => "Pie",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Bar => Self::Line,
            Self::Line => Self::Pie,
            Self::Pie => Self::Bar,
        }
    }
}

/// Returns true when the file name ends in `.csv` (any case).
pub fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Command-line arguments for thinkboard
#[derive(Clone, Parser, Debug)]
#[command(
    name = "thinkboard",
    version,
    about = "CSV analytics dashboard in the terminal",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    /// CSV file to select for upload on start
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Upload PATH immediately after start
    #[arg(long = "upload", requires = "path", action)]
    pub upload: bool,

    /// Base URL of the analytics server (overrides config [server] base_url). Example: http://localhost:5000
    #[arg(long = "server", value_name = "URL")]
    pub server: Option<String>,

    /// Request timeout in seconds (overrides config [server] timeout_secs). Default: no timeout
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Download a sample file stored on the server (GET /Uploads/NAME) and select it
    #[arg(long = "sample", value_name = "NAME", conflicts_with = "path")]
    pub sample: Option<String>,

    /// Initial chart type (bar, line, pie)
    #[arg(long = "chart-type", value_enum)]
    pub chart_type: Option<ChartType>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Write the log to this file instead of the cache directory
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Clear all cache data and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,

    /// Generate default configuration file at ~/.config/thinkboard/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    out.push_str(&cmd.render_usage().to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let option_str = if arg.is_positional() {
            format!("[{placeholder}]")
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            if arg.get_action().takes_values() && !placeholder.is_empty() {
                format!("{op} {placeholder}")
            } else {
                op
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_from_name() {
        assert_eq!(ChartType::from_name("bar"), Some(ChartType::Bar));
        assert_eq!(ChartType::from_name(" LINE "), Some(ChartType::Line));
        assert_eq!(ChartType::from_name("Pie"), Some(ChartType::Pie));
        assert_eq!(ChartType::from_name("doughnut"), None);
    }

    #[test]
    fn test_chart_type_cycle() {
        let mut t = ChartType::default();
        for expected in [ChartType::Line, ChartType::Pie, ChartType::Bar] {
            t = t.next();
            assert_eq!(t, expected);
        }
    }

    #[test]
    fn test_has_csv_extension() {
        assert!(has_csv_extension(Path::new("data.csv")));
        assert!(has_csv_extension(Path::new("/tmp/DATA.CSV")));
        assert!(!has_csv_extension(Path::new("data.tsv")));
        assert!(!has_csv_extension(Path::new("csv")));
    }

    #[test]
    fn test_args_parse_upload_requires_path() {
        assert!(Args::try_parse_from(["thinkboard", "--upload"]).is_err());
        let args = Args::try_parse_from(["thinkboard", "--upload", "data.csv"]).unwrap();
        assert!(args.upload);
        assert_eq!(args.path, Some(PathBuf::from("data.csv")));
    }

    #[test]
    fn test_args_parse_chart_type_and_server() {
        let args = Args::try_parse_from([
            "thinkboard",
            "--chart-type",
            "pie",
            "--server",
            "http://localhost:5000",
        ])
        .unwrap();
        assert_eq!(args.chart_type, Some(ChartType::Pie));
        assert_eq!(args.server.as_deref(), Some("http://localhost:5000"));
        assert!(args.path.is_none());
    }

    #[test]
    fn test_force_requires_generate_config() {
        assert!(Args::try_parse_from(["thinkboard", "--force"]).is_err());
        assert!(Args::try_parse_from(["thinkboard", "--generate-config", "--force"]).is_ok());
    }

    #[test]
    fn test_render_options_markdown() {
        let md = render_options_markdown();
        assert!(md.starts_with("# Command Line Options"));
        assert!(md.contains("`--server <URL>`"));
        assert!(md.contains("`--clear-cache`"));
        assert!(!md.contains("--help"));
    }
}
