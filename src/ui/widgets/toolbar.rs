//! Title toolbar shown in windowed mode.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_toolbar(frame: &mut Frame, area: Rect, device: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(40)]).areas(inner);

    let title = Line::from(vec![
        Span::styled(
            "Air Quality Monitor",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(device, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(title), left);

    let hint = Line::from(vec![
        Span::styled("Ctrl+F11/f full screen", Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled("? help", Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled("q quit", Style::default().fg(Color::Yellow)),
    ])
    .right_aligned();
    frame.render_widget(Paragraph::new(hint), right);
}
