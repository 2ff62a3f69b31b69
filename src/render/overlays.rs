//! Help overlay and the narrow-terminal section menu.

use crate::render::context::RenderContext;
use crate::render::layout::{centered_rect, centered_rect_fixed};
use crate::Section;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};

/// Word-wrap `text` to `width` columns. Words longer than a line are split.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.lines() {
        if line.chars().count() <= width {
            out.push(line.to_string());
            continue;
        }
        let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
        let mut current = indent.clone();
        for word in line.split_whitespace() {
            let used = current.chars().count();
            let len = word.chars().count();
            let sep = usize::from(used > indent.len());
            if used + sep + len > width && used > indent.len() {
                out.push(std::mem::replace(&mut current, indent.clone()));
            }
            if current.chars().count() > indent.len() {
                current.push(' ');
            }
            let mut rest = word;
            while current.chars().count() + rest.chars().count() > width {
                let room = width.saturating_sub(current.chars().count()).max(1);
                let split = rest
                    .char_indices()
                    .nth(room)
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                current.push_str(&rest[..split]);
                out.push(std::mem::take(&mut current));
                rest = &rest[split..];
                if rest.is_empty() {
                    break;
                }
            }
            current.push_str(rest);
        }
        if !current.trim().is_empty() {
            out.push(current);
        }
    }
    out
}

/// Renders the help overlay with wrapped text and scrollbar. Clamps and updates `scroll` so the caller can persist it.
pub fn render_help_overlay(
    area: Rect,
    buf: &mut Buffer,
    title: &str,
    text: &str,
    scroll: &mut usize,
    ctx: &RenderContext,
) {
    let popup_area = centered_rect(area, 80, 80);
    Clear.render(popup_area, buf);

    let help_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(popup_area);
    let text_area = help_layout[0];
    let scrollbar_area = help_layout[1];

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ctx.modal_border_active));
    let inner_area = block.inner(text_area);
    block.render(text_area, buf);

    let wrapped = wrap_lines(text, inner_area.width as usize);
    let available_height = inner_area.height as usize;
    let max_scroll = wrapped.len().saturating_sub(available_height);
    *scroll = (*scroll).min(max_scroll);

    let visible: Vec<Line> = wrapped
        .iter()
        .skip(*scroll)
        .take(available_height)
        .map(|l| Line::raw(l.as_str()))
        .collect();
    Paragraph::new(visible)
        .style(Style::default().fg(ctx.text_primary))
        .render(inner_area, buf);

    if wrapped.len() > available_height {
        let track = scrollbar_area.height;
        let thumb = ((available_height as f64 / wrapped.len() as f64) * track as f64)
            .max(1.0)
            .min(track as f64) as u16;
        let pos = if max_scroll > 0 {
            ((*scroll as f64 / max_scroll as f64) * track.saturating_sub(thumb) as f64) as u16
        } else {
            0
        };
        for y in 0..track {
            let style = if (pos..pos + thumb).contains(&y) {
                Style::default().bg(ctx.text_primary)
            } else {
                Style::default().bg(ctx.surface)
            };
            buf.set_string(scrollbar_area.x, scrollbar_area.y + y, "█", style);
        }
    }
}

/// Section list shown when the menu is open on a narrow terminal.
pub fn render_menu(area: Rect, buf: &mut Buffer, active: Section, ctx: &RenderContext) {
    let height = Section::ALL.len() as u16 + 2;
    let popup = centered_rect_fixed(area, 30, height);
    Clear.render(popup, buf);

    let block = Block::default()
        .title(" Menu ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ctx.modal_border_active));
    let inner = block.inner(popup);
    block.render(popup, buf);

    let lines: Vec<Line> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let style = if *section == active {
                Style::default()
                    .fg(ctx.text_inverse)
                    .bg(ctx.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(ctx.text_primary)
            };
            Line::from(vec![
                Span::styled(format!(" {} ", i + 1), Style::default().fg(ctx.keybind_hints)),
                Span::styled(format!(" {} ", section.title()), style),
            ])
        })
        .collect();
    Paragraph::new(lines).render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_lines_untouched() {
        assert_eq!(wrap_lines("a b\n\nc", 10), vec!["a b", "", "c"]);
    }

    #[test]
    fn test_wrap_on_word_boundaries() {
        let wrapped = wrap_lines("upload the selected file now", 12);
        assert_eq!(wrapped, vec!["upload the", "selected", "file now"]);
    }

    #[test]
    fn test_wrap_keeps_indent() {
        let wrapped = wrap_lines("  s  sort the uploaded data", 14);
        assert_eq!(wrapped, vec!["  s sort the", "  uploaded", "  data"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let wrapped = wrap_lines("abcdefghij", 4);
        assert_eq!(wrapped, vec!["abcd", "efgh", "ij"]);
    }
}
