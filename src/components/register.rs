//! Registration screen.

use crate::app::Action;
use crate::components::{input_field, menu_item, Component};
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::Paragraph};

/// Username, password, confirm password, back.
const FIELDS: usize = 4;

/// Represents the registration UI component.
#[derive(Debug, Default)]
pub struct Register {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    /// 0: username, 1: password, 2: confirm, 3: Back
    focus_index: usize,
    pub error_message: Option<String>,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus_index {
            0 => Some(&mut self.username),
            1 => Some(&mut self.password),
            2 => Some(&mut self.confirm_password),
            _ => None,
        }
    }

    /// Checks the form before anything touches the database.
    fn validate(&self) -> Option<&'static str> {
        if self.username.trim().is_empty() {
            Some("Username cannot be empty.")
        } else if self.password.is_empty() {
            Some("Password cannot be empty.")
        } else if self.password != self.confirm_password {
            Some("Passwords do not match.")
        } else {
            None
        }
    }
}

impl Component for Register {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char(c) => {
                if let Some(input) = self.focused_input() {
                    input.push(c);
                }
                self.error_message = None;
            }
            KeyCode::Backspace => {
                if let Some(input) = self.focused_input() {
                    input.pop();
                }
                self.error_message = None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus_index = (self.focus_index + 1) % FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_index = (self.focus_index + FIELDS - 1) % FIELDS;
            }
            KeyCode::Enter if self.focus_index == 3 => return Ok(Some(Action::GoLogin)),
            KeyCode::Enter => match self.validate() {
                Some(problem) => self.error_message = Some(problem.to_string()),
                None => return Ok(Some(Action::Submit)),
            },
            KeyCode::Esc => return Ok(Some(Action::GoLogin)),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(3), // Username
                Constraint::Length(3), // Password
                Constraint::Length(3), // Confirm
                Constraint::Length(2), // Error
                Constraint::Length(1), // Back
                Constraint::Min(0),
            ])
            .margin(1)
            .split(frame.area());

        let title = Paragraph::new(Span::styled(
            "Create an account",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);

        let fields = [
            (" Username ", &self.username, false),
            (" Password ", &self.password, true),
            (" Confirm Password ", &self.confirm_password, true),
        ];
        for (index, (title, value, masked)) in fields.into_iter().enumerate() {
            frame.render_widget(
                input_field(title, value, self.focus_index == index, masked),
                layout[index + 1],
            );
        }

        if let Some(error) = &self.error_message {
            let error = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center);
            frame.render_widget(error, layout[4]);
        }

        frame.render_widget(menu_item("Back to Login", self.focus_index == 3), layout[5]);
    }
}
