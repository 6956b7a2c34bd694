//! Terminal UI module using ratatui.
//!
//! This module provides the interactive dashboard: PM2.5 on top, PM1.0 and
//! PM10 below, redrawn whenever the poller publishes a new sample.

pub mod app;
pub mod input;
pub mod widgets;

pub use app::App;
pub use input::map_key_to_action;

use crate::error::{Result, UiError};
use crate::poller::Sample;
use crate::service;
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use widgets::{render_help, render_reading, render_status_bar, render_toolbar};

/// Draw the whole screen for the current state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let windowed = !app.full_screen;

    let body = if windowed {
        let [toolbar, body, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .areas(area);
        render_toolbar(frame, toolbar, &app.device);
        render_status_bar(frame, status, app.last_update, app.status_message.as_deref());
        body
    } else {
        area
    };

    let [top, rule, bottom] = Layout::vertical([
        Constraint::Percentage(55),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(body);

    render_reading(frame, top, &app.pm2_5, true, windowed);

    let line = Paragraph::new("─".repeat(rule.width as usize))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(line, rule);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(bottom);
    render_reading(frame, left, &app.pm1_0, false, windowed);
    render_reading(frame, right, &app.pm10, false, windowed);

    if app.show_help {
        render_help(frame, centered_rect(60, 70, area));
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);

    center
}

/// Run the dashboard until the user quits, a shutdown signal arrives or the poller fails.
///
/// The terminal is restored on every exit path.
pub async fn run_dashboard(
    mut app: App,
    rx: watch::Receiver<Option<Sample>>,
    poller: JoinHandle<Result<()>>,
) -> Result<()> {
    let mut terminal =
        ratatui::try_init().map_err(|e| UiError::InitializationError(e.to_string()))?;

    let result = event_loop(&mut terminal, &mut app, rx, poller).await;

    if let Err(e) = ratatui::try_restore() {
        warn!(error = %e, "failed to restore terminal");
    }
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    mut rx: watch::Receiver<Option<Sample>>,
    mut poller: JoinHandle<Result<()>>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut signals = service::shutdown_signals()?;
    let signals_handle = signals.handle();

    let result = loop {
        terminal
            .draw(|frame| render(frame, app))
            .map_err(|e| UiError::RenderError(e.to_string()))?;

        if app.should_quit {
            break Ok(());
        }

        tokio::select! {
            biased;

            finished = &mut poller => {
                // The poller only returns on its own when a read failed.
                break match finished {
                    Ok(result) => result,
                    Err(e) => Err(e.into()),
                };
            }
            signal = signals.next() => {
                info!(?signal, "shutdown signal received");
                app.should_quit = true;
            }
            changed = rx.changed() => {
                if changed.is_ok() {
                    let latest = *rx.borrow_and_update();
                    if let Some(sample) = latest {
                        app.apply_sample(&sample);
                    }
                }
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => app.handle_action(map_key_to_action(key)),
                Some(Ok(_)) => {}
                Some(Err(e)) => break Err(UiError::InputError(e.to_string()).into()),
                None => app.should_quit = true,
            },
        }
    };

    signals_handle.close();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorReading;
    use chrono::Local;
    use ratatui::{buffer::Buffer, backend::TestBackend, Terminal};

    /// Position of the first cell sequence spelling `text`
    fn find_text(buffer: &Buffer, text: &str) -> Option<(u16, u16)> {
        let chars: Vec<String> = text.chars().map(|c| c.to_string()).collect();
        let area = buffer.area;
        for y in 0..area.height {
            for x in 0..area.width.saturating_sub(chars.len() as u16 - 1) {
                let matched = chars
                    .iter()
                    .enumerate()
                    .all(|(i, c)| buffer[(x + i as u16, y)].symbol() == c);
                if matched {
                    return Some((x, y));
                }
            }
        }
        None
    }

    fn draw(app: &App) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn app_with_reading(full_screen: bool) -> App {
        let mut app = App::new("/dev/ttyAMA0".to_string(), full_screen);
        app.apply_sample(&Sample {
            reading: SensorReading::new(10, 75, 250),
            taken_at: Local::now(),
        });
        app
    }

    #[test]
    fn test_renders_colored_values() {
        let buffer = draw(&app_with_reading(false));

        let expected = [
            ("10 µ/m³", Color::Rgb(0, 228, 0)),
            ("75 µ/m³", Color::Rgb(255, 255, 0)),
            ("250 µ/m³", Color::Rgb(153, 0, 76)),
        ];
        for (text, color) in expected {
            let (x, y) = find_text(&buffer, text).unwrap_or_else(|| panic!("{text} not drawn"));
            assert_eq!(buffer[(x, y)].fg, color, "{text}");
        }
    }

    #[test]
    fn test_windowed_shows_chrome() {
        let buffer = draw(&app_with_reading(false));
        assert!(find_text(&buffer, "Air Quality Monitor").is_some());
        assert!(find_text(&buffer, "Last update").is_some());
        assert!(find_text(&buffer, "Very unhealthy").is_some());
    }

    #[test]
    fn test_full_screen_hides_chrome() {
        let buffer = draw(&app_with_reading(true));
        assert!(find_text(&buffer, "Air Quality Monitor").is_none());
        assert!(find_text(&buffer, "Last update").is_none());
        assert!(find_text(&buffer, "PM 2.5").is_some());
        assert!(find_text(&buffer, "250 µ/m³").is_some());
    }

    #[test]
    fn test_placeholder_before_first_reading() {
        let app = App::new("/dev/ttyAMA0".to_string(), false);
        let buffer = draw(&app);
        let (x, y) = find_text(&buffer, "NaN µ/m³").unwrap();
        assert_eq!(buffer[(x, y)].fg, app::PRIMARY_COLOR);
        assert!(find_text(&buffer, "No reading yet").is_some());
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app_with_reading(false);
        app.toggle_help();
        let buffer = draw(&app);
        assert!(find_text(&buffer, "Keyboard Shortcuts").is_some());
        assert!(find_text(&buffer, "301+").is_some());
    }
}
