//! Status bar widget.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    last_update: Option<DateTime<Local>>,
    status_message: Option<&str>,
) {
    let mut spans = vec![];

    // Sensor state
    let (state_text, state_color) = match last_update {
        Some(_) => ("READING", Color::Green),
        None => ("WAITING", Color::Yellow),
    };
    spans.push(Span::styled(
        state_text,
        Style::default().fg(state_color).add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::raw(" │ "));

    let updated = match last_update {
        Some(at) => format!("Last update {}", at.format("%H:%M:%S")),
        None => "No reading yet".to_string(),
    };
    spans.push(Span::styled(updated, Style::default().fg(Color::Gray)));

    if let Some(status) = status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(status, Style::default().fg(Color::Gray)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
