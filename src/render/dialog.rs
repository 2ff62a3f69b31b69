//! Parameter dialog overlay.

use crate::api::SortOrder;
use crate::prompt::{FieldKind, ParamDialog};
use crate::render::context::RenderContext;
use crate::render::layout::centered_rect_fixed;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};

/// Rows per field: label + hint line, then a bordered input.
const FIELD_HEIGHT: u16 = 4;

pub fn dialog_height(field_count: usize) -> u16 {
    FIELD_HEIGHT * field_count as u16 + 3
}

pub fn render(area: Rect, buf: &mut Buffer, dialog: &ParamDialog, ctx: &RenderContext) {
    let popup = centered_rect_fixed(area, 64, dialog_height(dialog.fields.len()));
    Clear.render(popup, buf);

    let block = Block::default()
        .title(dialog.kind.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ctx.modal_border_active))
        .style(Style::default().bg(ctx.background));
    let inner = block.inner(popup);
    block.render(popup, buf);

    let mut constraints: Vec<Constraint> = dialog
        .fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Fill(1));
    constraints.push(Constraint::Length(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in dialog.fields.iter().enumerate() {
        let focused = i == dialog.focus;
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(3)])
            .split(rows[i]);

        let label_style = if focused {
            Style::default()
                .fg(ctx.modal_border_active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(ctx.text_primary)
        };
        Paragraph::new(Line::from(vec![
            Span::styled(field.label, label_style),
            Span::styled(format!("  {}", field.hint), Style::default().fg(ctx.dimmed)),
        ]))
        .render(parts[0], buf);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused {
                ctx.modal_border_active
            } else {
                ctx.modal_border
            }));
        let input_area = input_block.inner(parts[1]);
        input_block.render(parts[1], buf);

        if field.kind == FieldKind::Order {
            let choice = |order: SortOrder, label: &'static str| {
                let style = if dialog.order == order {
                    Style::default()
                        .fg(ctx.text_inverse)
                        .bg(ctx.primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(ctx.text_secondary)
                };
                Span::styled(label, style)
            };
            Paragraph::new(Line::from(vec![
                choice(SortOrder::Asc, " Ascending "),
                Span::raw("  "),
                choice(SortOrder::Desc, " Descending "),
            ]))
            .render(input_area, buf);
        } else {
            (&field.input).render(input_area, buf);
        }
    }

    let hints = Line::from(vec![
        Span::styled("Enter", Style::default().fg(ctx.keybind_hints)),
        Span::styled(" next/submit  ", Style::default().fg(ctx.keybind_labels)),
        Span::styled("Tab", Style::default().fg(ctx.keybind_hints)),
        Span::styled(" field  ", Style::default().fg(ctx.keybind_labels)),
        Span::styled("↑/↓", Style::default().fg(ctx.keybind_hints)),
        Span::styled(" history  ", Style::default().fg(ctx.keybind_labels)),
        Span::styled("Esc", Style::default().fg(ctx.keybind_hints)),
        Span::styled(" cancel", Style::default().fg(ctx.keybind_labels)),
    ]);
    Paragraph::new(hints).render(rows[rows.len() - 1], buf);
}
