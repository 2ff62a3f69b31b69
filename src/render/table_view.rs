//! Results panel.

use crate::render::context::RenderContext;
use crate::render::dashboard::panel_block;
use crate::table::TableView;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Widget};

/// Column widths: widest of header and cells plus padding.
pub fn column_widths(headers: &[String], rows: &[Vec<String>], padding: u16) -> Vec<u16> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let widest = rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0);
            (widest.min(u16::MAX as usize) as u16).saturating_add(padding)
        })
        .collect()
}

pub fn render(
    area: Rect,
    buf: &mut Buffer,
    view: Option<&TableView>,
    active: bool,
    ctx: &RenderContext,
) {
    let title = view.map(TableView::title).unwrap_or("Results");
    let block = panel_block(title, active, ctx);
    let inner = block.inner(area);
    block.render(area, buf);

    let (headers, rows, footer) = match view {
        None => {
            Paragraph::new("Sort (s), search (/) or list uploaded files (f) to see results here.")
                .style(Style::default().fg(ctx.text_secondary))
                .centered()
                .render(inner, buf);
            return;
        }
        Some(TableView::Empty { placeholder, .. }) => {
            Paragraph::new(*placeholder)
                .style(Style::default().fg(ctx.text_secondary))
                .centered()
                .render(inner, buf);
            return;
        }
        Some(TableView::Rows {
            headers,
            rows,
            footer,
            ..
        }) => (headers, rows, footer),
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(inner);

    let widths = column_widths(headers, rows, ctx.table_cell_padding);
    let header_style = Style::default()
        .fg(ctx.table_header)
        .bg(ctx.table_header_bg)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(headers.iter().map(|h| Cell::from(h.as_str()))).style(header_style);
    let body = rows.iter().map(|r| {
        Row::new(r.iter().map(|c| Cell::from(c.as_str())))
            .style(Style::default().fg(ctx.text_primary))
    });

    Widget::render(
        Table::new(body, widths.into_iter().map(Constraint::Length))
            .header(header)
            .column_spacing(1),
        parts[0],
        buf,
    );

    Paragraph::new(footer.as_str())
        .style(Style::default().fg(ctx.dimmed))
        .render(parts[1], buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths() {
        let headers = vec!["name".to_string(), "age".to_string()];
        let rows = vec![
            vec!["Ann".to_string(), "34".to_string()],
            vec!["Bartholomew".to_string(), "7".to_string()],
        ];
        assert_eq!(column_widths(&headers, &rows, 2), vec![13, 5]);
    }

    #[test]
    fn test_column_widths_short_rows() {
        let headers = vec!["a".to_string(), "bb".to_string()];
        let rows = vec![vec!["xyz".to_string()]];
        assert_eq!(column_widths(&headers, &rows, 0), vec![3, 2]);
    }
}
