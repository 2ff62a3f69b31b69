use crate::chart::SERIES_COLOR_KEYS;
use crate::config::Theme;
use crate::notification::Severity;
use ratatui::style::Color;

/// Snapshot of theme colors and display configuration for rendering.
/// Passed to the panel renderers instead of the theme and config separately.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub keybind_hints: Color,
    pub keybind_labels: Color,
    pub controls_bg: Color,
    pub throbber: Color,
    pub background: Color,
    pub surface: Color,
    pub primary: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_inverse: Color,
    pub dimmed: Color,
    pub success: Color,
    pub error: Color,
    pub info: Color,
    pub panel_border: Color,
    pub panel_border_active: Color,
    pub modal_border: Color,
    pub modal_border_active: Color,
    pub stat_value: Color,

    pub table_header: Color,
    pub table_header_bg: Color,

    pub series: [Color; 4],

    pub table_cell_padding: u16,
}

impl RenderContext {
    /// Build render context from app theme and config.
    pub fn from_theme_and_config(theme: &Theme, table_cell_padding: u16) -> Self {
        Self {
            keybind_hints: theme.get("keybind_hints"),
            keybind_labels: theme.get("keybind_labels"),
            controls_bg: theme.get("controls_bg"),
            throbber: theme.get("throbber"),
            background: theme.get("background"),
            surface: theme.get("surface"),
            primary: theme.get("primary"),
            text_primary: theme.get("text_primary"),
            text_secondary: theme.get("text_secondary"),
            text_inverse: theme.get("text_inverse"),
            dimmed: theme.get("dimmed"),
            success: theme.get("success"),
            error: theme.get("error"),
            info: theme.get("info"),
            panel_border: theme.get("panel_border"),
            panel_border_active: theme.get("panel_border_active"),
            modal_border: theme.get("modal_border"),
            modal_border_active: theme.get("modal_border_active"),
            stat_value: theme.get("stat_value"),

            table_header: theme.get("table_header"),
            table_header_bg: theme.get("table_header_bg"),

            series: SERIES_COLOR_KEYS.map(|key| theme.get(key)),

            table_cell_padding,
        }
    }

    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.info,
            Severity::Success => self.success,
            Severity::Error => self.error,
        }
    }

    pub fn series_color(&self, idx: usize) -> Color {
        self.series[idx % self.series.len()]
    }

    pub fn border(&self, active: bool) -> Color {
        if active {
            self.panel_border_active
        } else {
            self.panel_border
        }
    }
}
