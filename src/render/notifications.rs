//! Toast stack in the bottom-right corner, newest at the bottom.

use crate::notification::{Notification, Phase, Severity};
use crate::render::context::RenderContext;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "i",
        Severity::Success => "✓",
        Severity::Error => "✗",
    }
}

/// Areas for `count` toasts stacked upward from the bottom of `area`, in
/// oldest-to-newest order. Toasts that do not fit are dropped oldest first.
pub fn toast_areas(area: Rect, count: usize) -> Vec<Rect> {
    let width = TOAST_WIDTH.min(area.width);
    let fit = (area.height / TOAST_HEIGHT) as usize;
    let shown = count.min(fit);
    let x = area.right().saturating_sub(width);
    let mut areas: Vec<Rect> = (0..shown)
        .map(|i| Rect {
            x,
            y: area.bottom() - TOAST_HEIGHT * (i as u16 + 1),
            width,
            height: TOAST_HEIGHT,
        })
        .collect();
    areas.reverse();
    let mut out = vec![Rect::default(); count - shown];
    out.extend(areas);
    out
}

pub fn render(
    area: Rect,
    buf: &mut Buffer,
    toasts: &[(&Notification, Phase)],
    ctx: &RenderContext,
) {
    let areas = toast_areas(area, toasts.len());
    for ((notification, phase), toast) in toasts.iter().zip(areas) {
        if toast.area() == 0 {
            continue;
        }
        let color = ctx.severity_color(notification.severity);
        let mut style = Style::default().fg(color);
        if let Phase::Exiting(progress) = phase {
            if *progress > 0.5 {
                style = style.add_modifier(Modifier::DIM);
            }
        }

        Clear.render(toast, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style)
            .style(Style::default().bg(ctx.surface));
        let inner = block.inner(toast);
        block.render(toast, buf);
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", icon(notification.severity)), style),
            Span::styled(
                notification.message.as_str(),
                style.fg(ctx.text_primary),
            ),
        ]))
        .wrap(Wrap { trim: true })
        .render(inner, buf);
    }
}
