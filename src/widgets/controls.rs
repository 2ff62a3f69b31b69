use crate::render::context::RenderContext;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph, Widget},
};

/// Key hints of the dashboard, in display order.
pub const DASHBOARD_CONTROLS: [(&str, &str); 12] = [
    ("o", "Open"),
    ("u", "Upload"),
    ("l", "Sample"),
    ("s", "Sort"),
    ("/", "Search"),
    ("g", "Gradient"),
    ("t", "Chart"),
    ("f", "Files"),
    ("x", "Export"),
    ("Tab", "Section"),
    ("?", "Help"),
    ("q", "Quit"),
];

/// Key hints while a parameter dialog is open.
pub const DIALOG_CONTROLS: [(&str, &str); 4] = [
    ("Enter", "Next/Submit"),
    ("Tab", "Field"),
    ("^N/^P", "Column"),
    ("Esc", "Cancel"),
];

/// Bottom bar: key hints on the left, status text and throbber on the right.
pub struct Controls {
    pub controls: Vec<(&'static str, &'static str)>,
    pub status: Option<String>,
    pub bg_color: Color,
    pub key_color: Color,
    pub label_color: Color,
    pub throbber_color: Color,
    /// 8-dot braille spinner instead of |/-\
    pub use_unicode_throbber: bool,
    pub busy: bool,
    pub throbber_frame: u8,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            controls: DASHBOARD_CONTROLS.to_vec(),
            status: None,
            bg_color: Color::Indexed(236),
            key_color: Color::Cyan,
            label_color: Color::White,
            throbber_color: Color::Cyan,
            use_unicode_throbber: false,
            busy: false,
            throbber_frame: 0,
        }
    }
}

const THROBBER_WIDTH: u16 = 3;
const THROBBER_ASCII: [char; 4] = ['|', '/', '-', '\\'];
const THROBBER_BRAILLE_EIGHT: [char; 8] = ['⣷', '⣯', '⣟', '⡿', '⢿', '⣻', '⣽', '⣾'];

impl Controls {
    pub fn from_context(ctx: &RenderContext) -> Self {
        Self {
            bg_color: ctx.controls_bg,
            key_color: ctx.keybind_hints,
            label_color: ctx.keybind_labels,
            throbber_color: ctx.throbber,
            ..Self::default()
        }
    }

    pub fn with_controls(mut self, controls: &[(&'static str, &'static str)]) -> Self {
        self.controls = controls.to_vec();
        self
    }

    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = status;
        self
    }

    pub fn with_busy(mut self, busy: bool, throbber_frame: u8) -> Self {
        self.busy = busy;
        self.throbber_frame = throbber_frame;
        self
    }

    pub fn with_unicode_throbber(mut self, use_unicode: bool) -> Self {
        self.use_unicode_throbber = use_unicode;
        self
    }

    /// Number of key pairs that fit in `width` after reserving the right side.
    /// Pairs are never shrunk: key and label each get one trailing space.
    pub fn visible_pairs(&self, width: u16) -> usize {
        let status_width = self.status_width();
        let mut available = width.saturating_sub(status_width + THROBBER_WIDTH + 1);
        let mut shown = 0;
        for (key, action) in &self.controls {
            let need = (key.chars().count() as u16 + 1) + (action.chars().count() as u16 + 1);
            if available < need {
                break;
            }
            available -= need;
            shown += 1;
        }
        shown
    }

    fn status_width(&self) -> u16 {
        self.status
            .as_ref()
            .map(|s| s.chars().count() as u16 + 1)
            .unwrap_or(0)
    }

    fn throbber_char(&self) -> char {
        if !self.busy {
            ' '
        } else if self.use_unicode_throbber {
            THROBBER_BRAILLE_EIGHT[self.throbber_frame as usize % THROBBER_BRAILLE_EIGHT.len()]
        } else {
            THROBBER_ASCII[self.throbber_frame as usize % THROBBER_ASCII.len()]
        }
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let no_bg = self.bg_color == Color::Reset;
        if !no_bg {
            Block::default()
                .style(Style::default().bg(self.bg_color))
                .render(area, buf);
        }

        let n_show = self.visible_pairs(area.width);
        let mut constraints: Vec<Constraint> = self
            .controls
            .iter()
            .take(n_show)
            .flat_map(|(key, action)| {
                [
                    Constraint::Length(key.chars().count() as u16 + 1),
                    Constraint::Length(action.chars().count() as u16 + 1),
                ]
            })
            .collect();
        constraints.push(Constraint::Fill(1));
        constraints.push(Constraint::Length(self.status_width()));
        constraints.push(Constraint::Length(THROBBER_WIDTH));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);

        let (key_style, label_style) = if no_bg {
            (
                Style::default().fg(self.key_color),
                Style::default().fg(self.label_color),
            )
        } else {
            let base = Style::default().bg(self.bg_color);
            (base.fg(self.key_color), base.fg(self.label_color))
        };

        for (i, (key, action)) in self.controls.iter().take(n_show).enumerate() {
            Paragraph::new(*key).style(key_style).render(layout[i * 2], buf);
            Paragraph::new(*action)
                .style(label_style)
                .render(layout[i * 2 + 1], buf);
        }

        let status_idx = n_show * 2 + 1;
        if let Some(status) = &self.status {
            Paragraph::new(status.as_str())
                .style(label_style)
                .right_aligned()
                .render(layout[status_idx], buf);
        }

        let throbber_style = if no_bg {
            Style::default().fg(self.throbber_color)
        } else {
            Style::default().bg(self.bg_color).fg(self.throbber_color)
        };
        Paragraph::new(self.throbber_char().to_string())
            .style(throbber_style)
            .centered()
            .render(layout[status_idx + 1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_visible_pairs_fit_width() {
        let controls = Controls::default().with_controls(&[("o", "Open"), ("u", "Upload")]);
        // o+1 Open+1 = 7, u+1 Upload+1 = 9, plus 4 reserved
        assert_eq!(controls.visible_pairs(20), 2);
        assert_eq!(controls.visible_pairs(19), 1);
        assert_eq!(controls.visible_pairs(5), 0);
    }

    #[test]
    fn test_status_reserves_space() {
        let controls = Controls::default()
            .with_controls(&[("o", "Open")])
            .with_status(Some("abc".to_string()));
        assert_eq!(controls.visible_pairs(15), 1);
        assert_eq!(controls.visible_pairs(14), 0);
    }

    #[test]
    fn test_render_keys_and_throbber() {
        let controls = Controls::default()
            .with_controls(&[("q", "Quit")])
            .with_busy(true, 1);
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        (&controls).render(area, &mut buf);
        let text = row_text(&buf, 20);
        assert!(text.starts_with("q Quit"));
        assert_eq!(text.chars().nth(18), Some('/'));
    }

    #[test]
    fn test_unicode_throbber_frames() {
        let controls = Controls::default()
            .with_unicode_throbber(true)
            .with_busy(true, 9);
        assert_eq!(controls.throbber_char(), '⣯');
        let idle = Controls::default().with_busy(false, 3);
        assert_eq!(idle.throbber_char(), ' ');
    }
}
