//! Login screen.

use crate::app::Action;
use crate::components::{centered_rect, input_field, menu_item, Component};
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::time::{Duration, Instant};

/// Number of focusable rows: username, password, register link, exit.
const FIELDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Error,
    Success,
}

/// Represents the login UI component.
#[derive(Debug, Default)]
pub struct Login {
    pub username: String,
    pub password: String,
    /// 0: Username, 1: Password, 2: Register, 3: Exit
    selected_index: usize,
    message: Option<(Notice, String)>,
    message_time: Option<Instant>,
    show_exit_dialog: bool,
    /// 0: Yes, 1: No
    exit_dialog_selected: usize,
}

impl Login {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties both inputs and returns focus to the username.
    pub fn reset(&mut self) {
        self.username.clear();
        self.password.clear();
        self.selected_index = 0;
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.set_message(Notice::Error, message.into());
    }

    pub fn set_success_message(&mut self, message: impl Into<String>) {
        self.set_message(Notice::Success, message.into());
    }

    #[cfg(test)]
    pub fn error_message(&self) -> Option<&str> {
        match &self.message {
            Some((Notice::Error, text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Hides the message once it has been shown for five seconds.
    pub fn check_message_timeout(&mut self) {
        if let Some(time) = self.message_time {
            if time.elapsed() >= Duration::from_secs(5) {
                self.clear_message();
            }
        }
    }

    fn set_message(&mut self, notice: Notice, message: String) {
        self.message = Some((notice, message));
        self.message_time = Some(Instant::now());
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.message_time = None;
    }

    fn handle_exit_dialog_input(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                self.exit_dialog_selected = 1 - self.exit_dialog_selected;
            }
            KeyCode::Enter if self.exit_dialog_selected == 0 => return Some(Action::Quit),
            KeyCode::Enter | KeyCode::Esc => self.show_exit_dialog = false,
            _ => {}
        }
        None
    }

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.selected_index {
            0 => Some(&mut self.username),
            1 => Some(&mut self.password),
            _ => None,
        }
    }
}

impl Component for Login {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.check_message_timeout();

        if self.show_exit_dialog {
            return Ok(self.handle_exit_dialog_input(key));
        }

        match key.code {
            KeyCode::Char(c) => {
                if let Some(input) = self.focused_input() {
                    input.push(c);
                }
                self.clear_message();
            }
            KeyCode::Backspace => {
                if let Some(input) = self.focused_input() {
                    input.pop();
                }
                self.clear_message();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.selected_index = (self.selected_index + 1) % FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.selected_index = (self.selected_index + FIELDS - 1) % FIELDS;
            }
            KeyCode::Enter => match self.selected_index {
                2 => return Ok(Some(Action::GoRegister)),
                3 => self.show_exit_dialog = true,
                _ => {
                    if self.username.is_empty() {
                        self.set_error_message("Username cannot be empty.");
                    } else if self.password.is_empty() {
                        self.set_error_message("Password cannot be empty.");
                    } else {
                        return Ok(Some(Action::Submit));
                    }
                }
            },
            KeyCode::Esc => self.show_exit_dialog = true,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(1), // Subtitle
                Constraint::Length(2), // Spacing
                Constraint::Length(3), // Username
                Constraint::Length(3), // Password
                Constraint::Length(2), // Message
                Constraint::Length(1), // Register
                Constraint::Length(1), // Exit
                Constraint::Min(0),
            ])
            .margin(1)
            .split(frame.area());

        let title = Paragraph::new(Span::styled(
            "sqlauth",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);

        let subtitle = Paragraph::new(Span::styled(
            "Sign in with your username and password",
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(subtitle, layout[1]);

        let margin = Margin {
            vertical: 0,
            horizontal: 1,
        };
        frame.render_widget(
            input_field(" Username ", &self.username, self.selected_index == 0, false),
            layout[3].inner(margin),
        );
        frame.render_widget(
            input_field(" Password ", &self.password, self.selected_index == 1, true),
            layout[4].inner(margin),
        );

        if let Some((notice, text)) = &self.message {
            let color = match notice {
                Notice::Error => Color::Red,
                Notice::Success => Color::Green,
            };
            let message = Paragraph::new(text.as_str())
                .style(Style::default().fg(color))
                .alignment(Alignment::Center);
            frame.render_widget(message, layout[5]);
        }

        frame.render_widget(menu_item("Register", self.selected_index == 2), layout[6]);
        frame.render_widget(menu_item("Exit", self.selected_index == 3), layout[7]);

        if self.show_exit_dialog {
            let dialog_area = centered_rect(60, 20, frame.area());
            let dialog_block = Block::default()
                .title("Confirm Exit")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded);

            let choice = |label: &'static str, index: usize, color: Color| {
                Span::styled(
                    label,
                    Style::default().fg(if self.exit_dialog_selected == index {
                        color
                    } else {
                        Color::DarkGray
                    }),
                )
            };
            let text = vec![
                Line::from("Are you sure you want to quit?"),
                Line::from(""),
                Line::from(vec![
                    choice(" Yes ", 0, Color::Green),
                    Span::raw("  "),
                    choice(" No ", 1, Color::Red),
                ]),
            ];

            let dialog = Paragraph::new(text)
                .block(dialog_block)
                .alignment(Alignment::Center);
            frame.render_widget(Clear, dialog_area);
            frame.render_widget(dialog, dialog_area);
        }
    }
}
