//! Navigation bar, upload panel and analytics panel.

use crate::analytics::{AnalyticsView, RANGE_TITLE, STATISTICAL_TITLE};
use crate::api::ConnectionStatus;
use crate::render::context::RenderContext;
use crate::{App, Section};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap};

pub const UPLOAD_IDLE_LABEL: &str = "Upload & Analyze";
pub const UPLOAD_BUSY_LABEL: &str = "Processing...";

/// Text of the upload control for the current state.
pub fn upload_button_label(app: &App) -> String {
    if app.state.upload_in_flight {
        UPLOAD_BUSY_LABEL.to_string()
    } else {
        app.state
            .selected_file
            .as_ref()
            .map(|f| f.upload_label())
            .unwrap_or_else(|| UPLOAD_IDLE_LABEL.to_string())
    }
}

pub(crate) fn panel_block<'a>(title: &'a str, active: bool, ctx: &RenderContext) -> Block<'a> {
    let title_style = if active {
        Style::default()
            .fg(ctx.panel_border_active)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ctx.text_primary)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ctx.border(active)))
        .title(Span::styled(format!(" {} ", title), title_style))
}

pub fn render_nav(area: Rect, buf: &mut Buffer, app: &App, ctx: &RenderContext) {
    let mut spans = vec![Span::styled(
        " ThinkBoard ",
        Style::default()
            .fg(ctx.text_inverse)
            .bg(ctx.primary)
            .add_modifier(Modifier::BOLD),
    )];

    if app.narrow {
        spans.push(Span::styled(
            format!(" {} ", app.active_section.title()),
            Style::default().fg(ctx.text_primary),
        ));
        spans.push(Span::styled(" m", Style::default().fg(ctx.keybind_hints)));
        spans.push(Span::styled(" Menu", Style::default().fg(ctx.keybind_labels)));
    } else {
        for section in Section::ALL {
            let style = if section == app.active_section {
                Style::default()
                    .fg(ctx.primary)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(ctx.text_secondary)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(section.title(), style));
        }
    }
    Paragraph::new(Line::from(spans)).render(area, buf);

    let status_color = match app.connection {
        ConnectionStatus::Online { .. } => ctx.success,
        ConnectionStatus::Offline => ctx.error,
        ConnectionStatus::Checking => ctx.dimmed,
    };
    let status = Line::from(vec![
        Span::styled("● ", Style::default().fg(status_color)),
        Span::styled(
            format!("{} ", app.connection.label()),
            Style::default().fg(ctx.text_secondary),
        ),
    ]);
    Paragraph::new(status).right_aligned().render(area, buf);
}

pub fn render_upload(area: Rect, buf: &mut Buffer, app: &App, ctx: &RenderContext) {
    let active = app.active_section == Section::Upload;
    let block = panel_block("Upload CSV", active, ctx);
    let inner = block.inner(area);
    block.render(area, buf);

    let hint = Line::from(Span::styled(
        "Paste a file path to drop it, press o to choose a file or l to load a server sample.",
        Style::default().fg(ctx.dimmed),
    ));

    let selected = match &app.state.selected_file {
        Some(file) => {
            let marker = if file.is_csv() {
                Span::styled(" ✓", Style::default().fg(ctx.success))
            } else {
                Span::styled(" (not a .csv file)", Style::default().fg(ctx.error))
            };
            Line::from(vec![
                Span::styled("Selected: ", Style::default().fg(ctx.text_secondary)),
                Span::styled(file.name.as_str(), Style::default().fg(ctx.text_primary)),
                marker,
            ])
        }
        None => Line::from(Span::styled(
            "No file selected",
            Style::default().fg(ctx.text_secondary),
        )),
    };

    let busy = app.state.upload_in_flight;
    let button_style = if busy {
        Style::default().fg(ctx.dimmed).bg(ctx.surface)
    } else {
        Style::default()
            .fg(ctx.text_inverse)
            .bg(ctx.primary)
            .add_modifier(Modifier::BOLD)
    };
    let mut button = vec![Span::styled(
        format!(" {} ", upload_button_label(app)),
        button_style,
    )];
    if busy {
        button.push(Span::styled(
            " uploading, please wait",
            Style::default().fg(ctx.throbber),
        ));
    } else {
        button.push(Span::styled("  u", Style::default().fg(ctx.keybind_hints)));
        button.push(Span::styled(" upload", Style::default().fg(ctx.keybind_labels)));
    }

    Paragraph::new(vec![hint, selected, Line::from(button)])
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

fn render_card(area: Rect, buf: &mut Buffer, label: &str, value: &str, ctx: &RenderContext) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ctx.panel_border));
    let inner = block.inner(area);
    block.render(area, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(ctx.stat_value)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(ctx.text_secondary))),
    ])
    .centered()
    .render(inner, buf);
}

pub fn render_analytics(
    area: Rect,
    buf: &mut Buffer,
    view: Option<&AnalyticsView>,
    active: bool,
    ctx: &RenderContext,
) {
    let block = panel_block("Analytics", active, ctx);
    let inner = block.inner(area);
    block.render(area, buf);

    let Some(view) = view else {
        Paragraph::new("Upload a CSV file to see its summary statistics.")
            .style(Style::default().fg(ctx.text_secondary))
            .centered()
            .wrap(Wrap { trim: true })
            .render(inner, buf);
        return;
    };

    let header_height = u16::from(view.header.is_some());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Length(4),
            Constraint::Fill(1),
        ])
        .split(inner);

    if let Some(header) = &view.header {
        Paragraph::new(header.as_str())
            .style(Style::default().fg(ctx.dimmed))
            .render(rows[0], buf);
    }

    let card_constraints = vec![Constraint::Ratio(1, view.cards.len().max(1) as u32); view.cards.len()];
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(card_constraints)
        .split(rows[1]);
    for (card, card_area) in view.cards.iter().zip(card_areas.iter()) {
        render_card(*card_area, buf, card.label, &card.value, ctx);
    }

    let heading = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(ctx.primary)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let summary_line = |label: &'static str, text: &str| {
        Line::from(vec![
            Span::styled(
                format!("{}: ", label),
                Style::default()
                    .fg(ctx.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(text.to_string(), Style::default().fg(ctx.text_secondary)),
        ])
    };

    let mut lines = vec![heading(STATISTICAL_TITLE)];
    lines.extend(view.statistical.iter().map(|l| summary_line(l.label, &l.text)));
    lines.push(Line::raw(""));
    lines.push(heading(RANGE_TITLE));
    lines.extend(view.range.iter().map(|l| summary_line(l.label, &l.text)));

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(rows[2], buf);
}
