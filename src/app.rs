//! The main application state and logic for the login front-end.
//!
//! The app moves between three screens: Login, Register, and Home. Login and
//! Register hand their forms to [`sqlauth::auth`]; everything else is
//! navigation.

use crate::components::{home::Home, login::Login, register::Register, Component};
use crate::tui::{self, Tui};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sqlauth::auth::{self, Credentials, SqlUserInfo};

/// What a screen asks the app to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Submit the current form.
    Submit,
    GoRegister,
    GoLogin,
    Logout,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Login,
    Register,
    Home,
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    pub login: Login,
    pub register: Register,
    /// Present only while a user is signed in.
    pub home: Option<Home>,
    users: SqlUserInfo,
}

impl App {
    pub fn new(users: SqlUserInfo) -> Self {
        Self {
            state: AppState::Login,
            should_quit: false,
            login: Login::new(),
            register: Register::new(),
            home: None,
            users,
        }
    }

    /// Runs the draw/input loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be drawn to or read from.
    /// Database failures are shown on screen instead.
    pub fn run(&mut self, tui: &mut Tui) -> Result<()> {
        while !self.should_quit {
            tui.draw(|frame| self.render_ui(frame))?;
            match tui.next_event()? {
                tui::Event::Key(key) => self.handle_key(key)?,
                tui::Event::Tick => {
                    if self.state == AppState::Login {
                        self.login.check_message_timeout();
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Global keybinding: Ctrl+Q to quit
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        let action = match self.state {
            AppState::Login => self.login.handle_input(key)?,
            AppState::Register => self.register.handle_input(key)?,
            AppState::Home => match &mut self.home {
                Some(home) => home.handle_input(key)?,
                None => Some(Action::Logout),
            },
        };

        match action {
            Some(Action::Submit) => match self.state {
                AppState::Login => self.attempt_login(),
                AppState::Register => self.attempt_register(),
                AppState::Home => {}
            },
            Some(Action::GoRegister) => {
                self.register.reset();
                self.state = AppState::Register;
            }
            Some(Action::GoLogin) => self.state = AppState::Login,
            Some(Action::Logout) => {
                if let Some(home) = self.home.take() {
                    log::info!("'{}' logged out", home.username);
                }
                self.login.reset();
                self.state = AppState::Login;
            }
            Some(Action::Quit) => self.should_quit = true,
            None => {}
        }
        Ok(())
    }

    fn attempt_login(&mut self) {
        let credentials = Credentials {
            username: self.login.username.clone(),
            password: self.login.password.clone(),
        };
        match auth::login(&self.users, credentials) {
            Ok(true) => {
                self.home = Some(Home::new(self.login.username.clone()));
                self.login.password.clear();
                self.state = AppState::Home;
            }
            Ok(false) => {
                self.login.password.clear();
                self.login.set_error_message("Invalid username or password.");
            }
            Err(err) => {
                log::error!("{err:#}");
                self.login.set_error_message(format!("{err:#}"));
            }
        }
    }

    fn attempt_register(&mut self) {
        let credentials = Credentials {
            username: self.register.username.trim().to_string(),
            password: self.register.password.clone(),
        };
        match auth::register(&self.users, credentials) {
            Ok(_) => {
                self.login.reset();
                self.login.set_success_message("Registration successful! Please log in.");
                self.state = AppState::Login;
            }
            Err(err) => {
                log::error!("{err:#}");
                self.register.error_message = Some(format!("{err:#}"));
            }
        }
    }

    fn render_ui(&self, frame: &mut tui::Frame<'_>) {
        match (self.state, &self.home) {
            (AppState::Login, _) | (AppState::Home, None) => self.login.render(frame),
            (AppState::Register, _) => self.register.render(frame),
            (AppState::Home, Some(home)) => home.render(frame),
        }
    }
}
