//! Turns the transcript into styled lines.
//!
//! Everything here is a pure function of the messages and the view mode, so
//! the chat screen and the one-shot `ask` command share it.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::config::ViewMode;
use crate::message::{Item, Message, Payload, Sender};

const TABLE_HEADERS: [&str; 6] = ["Phone", "Price", "RAM", "Battery", "Camera", "Rating"];

fn sender_label(sender: Sender) -> Line<'static> {
    match sender {
        Sender::User => Line::from(Span::styled(
            "You:",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Sender::Bot => Line::from(Span::styled(
            "SmartPick:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    }
}

/// Render the whole transcript, one blank line between messages
pub fn transcript_lines(messages: &[Message], mode: ViewMode) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for msg in messages {
        lines.extend(message_lines(msg, mode));
        lines.push(Line::default());
    }
    lines
}

pub fn message_lines(msg: &Message, mode: ViewMode) -> Vec<Line<'static>> {
    let mut lines = vec![sender_label(msg.sender)];
    match &msg.payload {
        Payload::Text(text) => {
            if text.is_empty() {
                lines.push(Line::default());
            }
            for line in text.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        Payload::Items(items) => match mode {
            ViewMode::Cards => lines.extend(card_lines(items)),
            ViewMode::Table => lines.extend(table_lines(items)),
        },
    }
    lines
}

fn card_lines(items: &[Item]) -> Vec<Line<'static>> {
    let border = Style::default().fg(Color::DarkGray);
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(vec![
            Span::styled("┌ ", border),
            Span::styled(item.key(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        ]));
        let fields = [
            ("Price", item.price_label()),
            ("RAM", item.ram_label()),
            ("Battery", item.battery_label()),
            ("Camera", item.camera_label()),
            ("Rating", item.rating_label()),
        ];
        for (name, value) in fields {
            lines.push(Line::from(vec![
                Span::styled("│ ", border),
                Span::styled(format!("{}: ", name), label),
                Span::raw(value),
            ]));
        }
    }
    lines
}

fn table_lines(items: &[Item]) -> Vec<Line<'static>> {
    let rows: Vec<[String; 6]> = items
        .iter()
        .map(|item| {
            [
                item.key(),
                item.price_label(),
                item.ram_label(),
                item.battery_label(),
                item.camera_label(),
                item.rating_label(),
            ]
        })
        .collect();

    let mut widths = [0usize; 6];
    for (w, header) in widths.iter_mut().zip(TABLE_HEADERS) {
        *w = header.chars().count();
    }
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header = join_cells(TABLE_HEADERS.iter().zip(widths).map(|(h, w)| pad(h, w)));
    let rule: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);

    let mut lines = vec![
        Line::from(Span::styled(
            header,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("─".repeat(rule), Style::default().fg(Color::DarkGray))),
    ];
    for row in rows {
        lines.push(Line::from(join_cells(
            row.iter().zip(widths).map(|(c, w)| pad(c, w)),
        )));
    }
    lines
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{}{}", cell, " ".repeat(fill))
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join("  ").trim_end().to_string()
}

/// Flatten a styled line to plain text
pub fn plain(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
