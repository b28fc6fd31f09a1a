use crate::app::Action;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub mod home;
pub mod login;
pub mod register;

pub trait Component {
    fn handle_input(&mut self, event: KeyEvent) -> Result<Option<Action>>;
    fn render(&self, frame: &mut Frame);
}

/// A bordered single-line input; `masked` renders bullets instead of text.
pub(crate) fn input_field<'a>(title: &'a str, value: &'a str, focused: bool, masked: bool) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .style(Style::default().fg(if focused { Color::Cyan } else { Color::White }));
    let text = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    Paragraph::new(text).block(block)
}

/// A centered, bold menu entry that turns yellow when selected.
pub(crate) fn menu_item(label: &str, selected: bool) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        label,
        Style::default()
            .fg(if selected { Color::Yellow } else { Color::Gray })
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
}

/// Helper function to create a centered rectangle.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
