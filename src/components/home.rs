//! Screen shown after a successful login.

use crate::app::Action;
use crate::components::{menu_item, Component};
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

#[derive(Debug, Default)]
pub struct Home {
    pub username: String,
    /// 0: Log out, 1: Quit
    selected_index: usize,
}

impl Home {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            selected_index: 0,
        }
    }
}

impl Component for Home {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
                self.selected_index = 1 - self.selected_index;
            }
            KeyCode::Enter if self.selected_index == 0 => return Ok(Some(Action::Logout)),
            KeyCode::Enter => return Ok(Some(Action::Quit)),
            KeyCode::Char('l') | KeyCode::Esc => return Ok(Some(Action::Logout)),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .margin(1)
            .split(frame.area());

        let greeting = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("Welcome, {}!", self.username),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("You are signed in."),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .alignment(Alignment::Center);
        frame.render_widget(greeting, layout[0]);

        frame.render_widget(menu_item("Log out", self.selected_index == 0), layout[1]);
        frame.render_widget(menu_item("Quit", self.selected_index == 1), layout[2]);
    }
}
