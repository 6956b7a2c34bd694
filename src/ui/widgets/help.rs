//! Help panel widget.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::aqi::ColorBucket;

/// Render the help panel
pub fn render_help(frame: &mut Frame, area: Rect) {
    // Clear the area first
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Cyan);

    let mut help_text = vec![
        Line::from(""),
        Line::from(Span::styled("Controls", heading)),
        Line::from(vec![
            Span::styled("  Ctrl+F11/f", key),
            Span::raw(" - Toggle full screen"),
        ]),
        Line::from(vec![
            Span::styled("  ?/h/F1", key),
            Span::raw("     - Toggle this help"),
        ]),
        Line::from(vec![
            Span::styled("  q/Esc", key),
            Span::raw("      - Quit application"),
        ]),
        Line::from(""),
        Line::from(Span::styled("Scale (µg/m³)", heading)),
    ];

    let ranges = ["0-50", "51-100", "101-150", "151-200", "201-300", "301+"];
    for (bucket, range) in ColorBucket::ALL.iter().zip(ranges) {
        help_text.push(Line::from(vec![
            Span::styled("  ■ ", Style::default().fg(bucket.color())),
            Span::raw(format!("{:<8}", range)),
            Span::raw(bucket.label()),
        ]));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::raw("Press "),
        Span::styled("?", key.add_modifier(Modifier::BOLD)),
        Span::raw(" to close this help"),
    ]));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
