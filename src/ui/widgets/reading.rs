//! Widget for one labelled concentration.

use crate::ui::app::DisplaySlot;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render a slot centred in `area`.
///
/// `prominent` underlines the label; `windowed` adds a border and the band caption.
pub fn render_reading(
    frame: &mut Frame,
    area: Rect,
    slot: &DisplaySlot,
    prominent: bool,
    windowed: bool,
) {
    let block = if windowed {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
    } else {
        Block::default()
    };
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut label_style = Style::default().add_modifier(Modifier::BOLD);
    if prominent {
        label_style = label_style.add_modifier(Modifier::UNDERLINED);
    }

    let mut lines = vec![
        Line::styled(slot.label, label_style),
        Line::from(""),
        Line::styled(
            slot.text.clone(),
            Style::default().fg(slot.color()).add_modifier(Modifier::BOLD),
        ),
    ];

    if windowed {
        if let Some(bucket) = slot.bucket {
            lines.push(Line::styled(bucket.label(), Style::default().fg(bucket.color())));
        }
    }

    // Vertical centring
    let padding = inner.height.saturating_sub(lines.len() as u16) / 2;
    let mut content = vec![Line::from(""); padding as usize];
    content.extend(lines);

    let paragraph = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
