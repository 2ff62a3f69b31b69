use crate::Section;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Top-level layout: main view, control bar, optional debug row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub main_view: Rect,
    pub control_bar: Rect,
    pub debug: Option<Rect>,
}

/// Top-level vertical layout: main view (fill), control bar (1 row), optional debug (1 row).
pub fn app_layout(area: Rect, debug_enabled: bool) -> AppLayout {
    let mut constraints = vec![Constraint::Fill(1), Constraint::Length(1)];

    if debug_enabled {
        constraints.push(Constraint::Length(1));
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let main_view = layout[0];
    let control_bar_idx = layout.len() - if debug_enabled { 2 } else { 1 };
    let control_bar = layout[control_bar_idx];

    let debug = if debug_enabled {
        Some(layout[layout.len() - 1])
    } else {
        None
    };

    AppLayout {
        main_view,
        control_bar,
        debug,
    }
}

/// Rows of the results panel: 10 body rows, header, footer and borders.
pub const RESULTS_HEIGHT: u16 = 14;
pub const UPLOAD_HEIGHT: u16 = 5;

/// Panels of the main view. In narrow mode only the active section gets an
/// area; the others are None.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    pub nav: Rect,
    pub upload: Option<Rect>,
    pub analytics: Option<Rect>,
    pub chart: Option<Rect>,
    pub results: Option<Rect>,
}

impl DashboardLayout {
    pub fn section(&self, section: Section) -> Option<Rect> {
        match section {
            Section::Upload => self.upload,
            Section::Analytics => self.analytics,
            Section::Visualization => self.chart,
            Section::Results => self.results,
        }
    }
}

pub fn dashboard_layout(area: Rect, narrow: bool, active: Section) -> DashboardLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Fill(1)])
        .split(area);
    let nav = rows[0];
    let body = rows[1];

    if narrow {
        let mut layout = DashboardLayout {
            nav,
            upload: None,
            analytics: None,
            chart: None,
            results: None,
        };
        match active {
            Section::Upload => layout.upload = Some(body),
            Section::Analytics => layout.analytics = Some(body),
            Section::Visualization => layout.chart = Some(body),
            Section::Results => layout.results = Some(body),
        }
        return layout;
    }

    let body_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(UPLOAD_HEIGHT),
            Constraint::Min(8),
            Constraint::Length(RESULTS_HEIGHT),
        ])
        .split(body);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body_rows[1]);

    DashboardLayout {
        nav,
        upload: Some(body_rows[0]),
        analytics: Some(middle[0]),
        chart: Some(middle[1]),
        results: Some(body_rows[2]),
    }
}

/// Centered rect within `r` with given percentage width and height.
pub fn centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centered rect with fixed width and height, clamped to fit inside `r`.
pub fn centered_rect_fixed(r: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(r.width);
    let h = height.min(r.height);
    let x = r.x + r.width.saturating_sub(w) / 2;
    let y = r.y + r.height.saturating_sub(h) / 2;
    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_layout_minimal() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = app_layout(area, false);

        assert_eq!(layout.main_view.height, 49);
        assert_eq!(layout.control_bar.height, 1);
        assert_eq!(layout.control_bar.y, 49);
        assert_eq!(layout.debug, None);
    }

    #[test]
    fn test_app_layout_with_debug() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = app_layout(area, true);

        assert_eq!(layout.main_view.height, 48);
        assert_eq!(layout.control_bar.y, 48);
        let debug = layout.debug.unwrap();
        assert_eq!(debug.height, 1);
        assert_eq!(debug.y, 49);
    }

    #[test]
    fn test_dashboard_wide_has_all_panels() {
        let area = Rect::new(0, 0, 120, 48);
        let layout = dashboard_layout(area, false, Section::Upload);

        assert_eq!(layout.nav.height, 1);
        let upload = layout.upload.unwrap();
        assert_eq!(upload.y, 1);
        assert_eq!(upload.height, UPLOAD_HEIGHT);
        let results = layout.results.unwrap();
        assert_eq!(results.height, RESULTS_HEIGHT);
        assert_eq!(results.bottom(), 48);
        let analytics = layout.analytics.unwrap();
        let chart = layout.chart.unwrap();
        assert_eq!(analytics.y, chart.y);
        assert_eq!(analytics.width + chart.width, 120);
    }

    #[test]
    fn test_dashboard_narrow_shows_active_only() {
        let area = Rect::new(0, 0, 60, 30);
        let layout = dashboard_layout(area, true, Section::Visualization);

        assert_eq!(layout.chart, Some(Rect::new(0, 1, 60, 29)));
        assert!(layout.upload.is_none());
        assert!(layout.analytics.is_none());
        assert!(layout.results.is_none());
        assert_eq!(layout.section(Section::Visualization), layout.chart);
    }

    #[test]
    fn test_centered_rect_50_50() {
        let area = Rect::new(0, 0, 100, 100);
        let centered = centered_rect(area, 50, 50);

        assert_eq!(centered.width, 50);
        assert_eq!(centered.height, 50);
        assert_eq!(centered.x, 25);
        assert_eq!(centered.y, 25);
    }

    #[test]
    fn test_centered_rect_small_area() {
        let area = Rect::new(10, 10, 20, 20);
        let centered = centered_rect(area, 50, 50);

        assert_eq!(centered.width, 10);
        assert_eq!(centered.height, 10);
        assert_eq!(centered.x, 15);
        assert_eq!(centered.y, 15);
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect_fixed(area, 60, 8);

        assert_eq!(rect, Rect::new(0, 1, 40, 8));
    }
}
