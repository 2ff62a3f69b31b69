//! Re-export of the shared CLI definitions so the app and the build script
//! agree on the same `Args`.

pub use thinkboard_cli::{has_csv_extension, render_options_markdown, Args, ChartType};
