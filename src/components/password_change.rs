//! Change/Update password form

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::components::input::{FocusRing, TextInput};
use crate::services::auth::PasswordChange;
use crate::store::Store;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use regex::Regex;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

pub const PASSWORDS_DIFFER_MESSAGE: &str = "Please make sure passwords are same.";
pub const PASSWORD_POLICY_MESSAGE: &str =
    "Password should be at least 8 character long, with at least one special char, one upper case and number";

/// Success notices disappear after this long
pub const NOTICE_TTL: Duration = Duration::from_secs(7);

static UPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Lu}").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").unwrap());
static SPECIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}0-9\s]").unwrap());

/// At least 8 characters with an upper-case letter, a digit and a special character
pub fn meets_policy(password: &str) -> bool {
    password.chars().count() >= 8
        && UPPER.is_match(password)
        && DIGIT.is_match(password)
        && SPECIAL.is_match(password)
}

const OLD: usize = 0;
const NEW: usize = 1;
const CONFIRM: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notification {
    success: bool,
    message: String,
    shown_at: Instant,
}

pub struct PasswordChangeComponent {
    fields: [TextInput; 3],
    focus: FocusRing,
    notification: Option<Notification>,
    /// Request sent, waiting for the node
    pending: bool,
    email: Option<String>,
}

impl Default for PasswordChangeComponent {
    fn default() -> Self {
        Self {
            fields: [
                TextInput::masked("Old Password"),
                TextInput::masked("Password"),
                TextInput::masked("Confirm Password"),
            ],
            focus: FocusRing::new(3),
            notification: None,
            pending: false,
            email: None,
        }
    }
}

impl PasswordChangeComponent {
    fn notify(&mut self, success: bool, message: impl Into<String>) {
        self.notification = Some(Notification {
            success,
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    fn submit(&mut self) -> Option<Action> {
        let password = self.fields[NEW].value.clone();
        if password != self.fields[CONFIRM].value {
            self.notify(false, PASSWORDS_DIFFER_MESSAGE);
            return None;
        }
        if !meets_policy(&password) {
            self.notify(false, PASSWORD_POLICY_MESSAGE);
            return None;
        }
        let Some(email) = self.email.clone() else {
            self.notify(false, "Not logged in");
            return None;
        };
        self.pending = true;
        Some(Action::ChangePassword(PasswordChange {
            email,
            old_password: self.fields[OLD].value.clone(),
            confirm: password.clone(),
            password,
        }))
    }

    /// Outcome of the request; success also clears the form
    pub fn password_updated(&mut self, result: Result<String, String>) {
        self.pending = false;
        match result {
            Ok(message) => {
                self.fields.iter_mut().for_each(TextInput::clear);
                self.focus.index = OLD;
                self.notify(true, message);
            }
            Err(message) => self.notify(false, message),
        }
    }

    /// Drop a success notice once it has been shown for [`NOTICE_TTL`]
    pub fn expire_notice(&mut self, now: Instant) {
        if let Some(notification) = &self.notification {
            if notification.success && now.duration_since(notification.shown_at) >= NOTICE_TTL {
                self.notification = None;
            }
        }
    }
}

impl Component for PasswordChangeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending {
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc if self.notification.is_some() => self.notification = None,
            KeyCode::Esc => return Ok(Some(Action::Back)),
            KeyCode::Enter if self.focus.is(CONFIRM) => return Ok(self.submit()),
            KeyCode::Enter => self.focus.next(),
            _ => {
                if !self.focus.handle_key(key) {
                    self.fields[self.focus.index].handle_key(key);
                }
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick {
            self.expire_notice(Instant::now());
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let mut content = vec![Line::from("")];
        for (i, field) in self.fields.iter().enumerate() {
            content.push(field.render(self.focus.is(i), 16));
        }
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  {}", PASSWORD_POLICY_MESSAGE),
            Style::default().fg(Color::DarkGray),
        )));
        content.push(Line::from(""));

        if self.pending {
            content.push(Line::from(Span::styled(
                "  Updating password...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(notification) = &self.notification {
            let (title, color) = if notification.success {
                ("Success", Color::Green)
            } else {
                ("Error", Color::Red)
            };
            content.push(Line::from(vec![
                Span::styled(
                    format!("  {}: ", title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(notification.message.clone(), Style::default().fg(color)),
            ]));
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Change/Update Password ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        Ok(())
    }
}

impl Screen for PasswordChangeComponent {
    fn sync(&mut self, store: &Store) {
        self.email = store.auth.user_email.clone();
    }

    fn hints(&self) -> Vec<KeyHint> {
        vec![
            ("Tab", "Next field"),
            ("Enter", "Update password"),
            ("Esc", "Back"),
            ("F1", "Help"),
        ]
    }
}
