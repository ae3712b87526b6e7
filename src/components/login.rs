//! Login page

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::components::centered_popup;
use crate::components::input::{FocusRing, TextInput};
use crate::store::{AuthState, Store};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SERVER: usize = 0;
const EMAIL: usize = 1;
const PASSWORD: usize = 2;

pub struct LoginComponent {
    fields: [TextInput; 3],
    focus: FocusRing,
    /// Missing-field message shown before any request is made
    error: Option<String>,
    auth: AuthState,
}

impl LoginComponent {
    pub fn new(server_url: &str, last_email: Option<&str>) -> Self {
        let mut focus = FocusRing::new(3);
        if last_email.is_some() {
            focus.index = PASSWORD;
        } else {
            focus.index = EMAIL;
        }
        Self {
            fields: [
                TextInput::new("Server").with_value(server_url),
                TextInput::new("Email").with_value(last_email.unwrap_or_default()),
                TextInput::masked("Password"),
            ],
            focus,
            error: None,
            auth: AuthState::default(),
        }
    }

    fn submit(&mut self) -> Option<Action> {
        if self.fields[SERVER].is_blank() {
            self.error = Some("Please enter the node address".to_string());
            return None;
        }
        if self.fields[EMAIL].is_blank() || self.fields[PASSWORD].value.is_empty() {
            self.error = Some("Please enter your email and password".to_string());
            return None;
        }
        self.error = None;
        let password = std::mem::take(&mut self.fields[PASSWORD].value);
        Some(Action::Login {
            server_url: self.fields[SERVER].trimmed().to_string(),
            email: self.fields[EMAIL].trimmed().to_string(),
            password,
        })
    }
}

impl Component for LoginComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.auth.pending {
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter if self.focus.is(PASSWORD) => return Ok(self.submit()),
            KeyCode::Enter => self.focus.next(),
            _ => {
                if !self.focus.handle_key(key) && self.fields[self.focus.index].handle_key(key) {
                    self.error = None;
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_popup(area, 64, 12);
        frame.render_widget(Clear, popup_area);

        let mut content = vec![
            Line::from(Span::styled(
                "Sign in to the node",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, field) in self.fields.iter().enumerate() {
            content.push(field.render(self.focus.is(i), 8));
        }
        content.push(Line::from(""));

        let message = self.error.as_deref().or(self.auth.error.as_deref());
        if self.auth.pending {
            content.push(Line::from(Span::styled(
                "Signing in...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(message) = message {
            content.push(Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Login ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Screen for LoginComponent {
    fn sync(&mut self, store: &Store) {
        self.auth = store.auth.clone();
    }

    fn hints(&self) -> Vec<KeyHint> {
        vec![
            ("Tab", "Next field"),
            ("Enter", "Sign in"),
            ("F1", "Help"),
            ("Ctrl+c", "Quit"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::input::tests::{key, type_text};
    use crate::store::AuthAction;
    use crate::store::StoreAction;

    #[test]
    fn test_remembered_email_focuses_password() {
        let login = LoginComponent::new("http://localhost:8484", Some("op@example.org"));
        assert!(login.focus.is(PASSWORD));
        assert_eq!(login.fields[EMAIL].value, "op@example.org");
    }

    #[test]
    fn test_enter_on_password_submits_and_clears_it() {
        let mut login = LoginComponent::new("http://localhost:8484", Some("op@example.org"));
        type_text(&mut login.fields[PASSWORD], "Secret#1");

        let action = login.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(
            action,
            Some(Action::Login {
                server_url: "http://localhost:8484".to_string(),
                email: "op@example.org".to_string(),
                password: "Secret#1".to_string(),
            })
        );
        assert!(login.fields[PASSWORD].value.is_empty());
    }

    #[test]
    fn test_missing_password_is_reported_locally() {
        let mut login = LoginComponent::new("http://localhost:8484", None);
        type_text(&mut login.fields[EMAIL], "op@example.org");
        login.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(login.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
        assert!(login.error.is_some());
    }

    #[test]
    fn test_keys_ignored_while_signing_in() {
        let mut login = LoginComponent::new("http://localhost:8484", None);
        let mut store = Store::new();
        store.dispatch(StoreAction::Auth(AuthAction::LoginStarted));
        login.sync(&store);

        login.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        assert!(login.fields[EMAIL].value.is_empty());
    }
}
