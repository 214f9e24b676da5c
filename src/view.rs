use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::core::card_view::{CardView, DetailValue};
use crate::core::intent::Intent;

const ICON: &str = "▦";
const REFRESH: &str = "⟳";
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];
const CARET_CLOSED: &str = "▸";
const CARET_OPEN: &str = "▾";
const LABEL_WIDTH: u16 = 20;

/// Rows a card occupies. The detail panel adds its table plus borders
/// only while open.
pub fn card_height(view: &CardView) -> u16 {
    if view.info_open {
        view.detail_height().saturating_add(3)
    } else {
        1
    }
}

/// Index of the first card to draw so that `selected` ends up on screen.
pub fn first_visible(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let selected = selected.min(heights.len() - 1);
    let mut used = 0u16;
    let mut start = selected;
    for idx in (0..=selected).rev() {
        used = used.saturating_add(heights[idx]);
        if used > available && idx != selected {
            break;
        }
        start = idx;
    }
    start
}

fn tag(label: &str, intent: Intent) -> Span<'static> {
    Span::styled(
        format!(" {label} "),
        Style::default()
            .fg(Color::Black)
            .bg(intent.color())
            .add_modifier(Modifier::BOLD),
    )
}

fn minimal_tag(label: &str) -> Span<'static> {
    Span::styled(format!(" {label} "), Style::default().fg(Color::Gray))
}

fn refresh_button(view: &CardView, tick: u64) -> Span<'static> {
    if view.syncing {
        let frame = SPINNER[(tick as usize) % SPINNER.len()];
        Span::styled(format!(" {frame} "), Style::default().fg(Color::Yellow))
    } else {
        Span::raw(format!(" {REFRESH} "))
    }
}

fn summary_right(view: &CardView, tick: u64) -> Line<'static> {
    let caret = if view.info_open { CARET_OPEN } else { CARET_CLOSED };
    Line::from(vec![
        minimal_tag(&view.id_tag),
        minimal_tag(&view.workers_tag),
        tag(&view.state_tag, view.state_intent),
        refresh_button(view, tick),
        Span::raw(format!("{caret} ")),
    ])
}

fn summary_left(view: &CardView, selected: bool) -> Line<'static> {
    let icon_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut link_style = Style::default().add_modifier(Modifier::UNDERLINED);
    if selected {
        link_style = link_style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(format!(" {ICON} "), icon_style),
        Span::styled(view.name.clone(), link_style),
    ])
}

fn detail_table(view: &CardView) -> Table<'static> {
    let rows: Vec<Row> = view
        .detail
        .iter()
        .map(|row| {
            let value = match &row.value {
                DetailValue::Text(text) => Cell::from(text.clone()),
                DetailValue::Tag { label, intent } => Cell::from(Line::from(Span::styled(
                    label.clone(),
                    Style::default().fg(intent.color()),
                ))),
                DetailValue::Resources(items) if items.is_empty() => Cell::from("-"),
                DetailValue::Resources(items) => Cell::from(Text::from(
                    items
                        .iter()
                        .map(|(_, text)| Line::from(text.clone()))
                        .collect::<Vec<_>>(),
                )),
            };
            Row::new(vec![
                Cell::from(row.label).style(Style::default().fg(Color::DarkGray)),
                value,
            ])
            .height(row.height())
        })
        .collect();

    Table::new(rows, [Constraint::Length(LABEL_WIDTH), Constraint::Min(10)])
}

pub fn render_card(frame: &mut Frame, area: Rect, view: &CardView, selected: bool, tick: u64) {
    if area.height == 0 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let right = summary_right(view, tick);
    let right_width = (right.width() as u16).min(rows[0].width);
    let summary = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(rows[0]);

    let row_style = if selected {
        Style::default().bg(Color::Rgb(40, 44, 52))
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(summary_left(view, selected)).style(row_style), summary[0]);
    frame.render_widget(
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .style(row_style),
        summary[1],
    );

    if !view.info_open || rows[1].height == 0 {
        return;
    }

    let detail = detail_table(view).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" started {} ", view.created_short)),
    );
    frame.render_widget(detail, rows[1]);
}
