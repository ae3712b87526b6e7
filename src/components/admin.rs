//! User management: console accounts, sign-up requests and a form to
//! create an account directly
//!
//! The node only answers administrators; anyone else is sent back by the
//! API client before this screen shows anything.

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::components::input::{FocusRing, TextInput};
use crate::components::password_change::{
    meets_policy, PASSWORDS_DIFFER_MESSAGE, PASSWORD_POLICY_MESSAGE,
};
use crate::model::admin::{User, UserRequest};
use crate::services::admin::NewUser;
use crate::store::{AdminState, Store};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

const NAME: usize = 0;
const SURNAME: usize = 1;
const EMAIL: usize = 2;
const PASSWORD: usize = 3;
const CONFIRM: usize = 4;

const LABEL_WIDTH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Users,
    Requests,
}

/// New account form
struct UserForm {
    fields: [TextInput; 5],
    focus: FocusRing,
    error: Option<String>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            fields: [
                TextInput::new("Name"),
                TextInput::new("Surname"),
                TextInput::new("Email"),
                TextInput::masked("Password"),
                TextInput::masked("Confirm Password"),
            ],
            focus: FocusRing::new(5),
            error: None,
        }
    }
}

impl UserForm {
    fn validate(&self) -> Result<NewUser, String> {
        if let Some(blank) = self.fields.iter().find(|f| f.is_blank()) {
            return Err(format!("Please enter {}", blank.label.to_lowercase()));
        }
        let password = self.fields[PASSWORD].value.clone();
        if password != self.fields[CONFIRM].value {
            return Err(PASSWORDS_DIFFER_MESSAGE.to_string());
        }
        if !meets_policy(&password) {
            return Err(PASSWORD_POLICY_MESSAGE.to_string());
        }
        Ok(NewUser {
            name: self.fields[NAME].trimmed().to_string(),
            surname: self.fields[SURNAME].trimmed().to_string(),
            email: self.fields[EMAIL].trimmed().to_string(),
            confirm: password.clone(),
            password,
        })
    }
}

pub struct AdminComponent {
    state: AdminState,
    pane: Pane,
    users_table: TableState,
    requests_table: TableState,
    form: Option<UserForm>,
}

impl Default for AdminComponent {
    fn default() -> Self {
        Self {
            state: AdminState::default(),
            pane: Pane::Users,
            users_table: TableState::default(),
            requests_table: TableState::default(),
            form: None,
        }
    }
}

fn clamp_selection(table: &mut TableState, len: usize) {
    match table.selected() {
        _ if len == 0 => table.select(None),
        None => table.select(Some(0)),
        Some(i) if i >= len => table.select(Some(len - 1)),
        Some(_) => {}
    }
}

fn header(titles: &[&'static str]) -> Row<'static> {
    Row::new(titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    }))
}

impl AdminComponent {
    fn selected_request(&self) -> Option<&UserRequest> {
        self.requests_table
            .selected()
            .and_then(|i| self.state.requests.get(i))
    }

    fn move_by(&mut self, delta: isize) {
        let (table, len) = match self.pane {
            Pane::Users => (&mut self.users_table, self.state.users.len()),
            Pane::Requests => (&mut self.requests_table, self.state.requests.len()),
        };
        if len == 0 {
            return;
        }
        let current = table.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        table.select(Some(next as usize));
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.state.creating {
            return None;
        }
        let form = self.form.as_mut()?;
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Enter if form.focus.is(CONFIRM) => match form.validate() {
                Ok(user) => {
                    form.error = None;
                    return Some(Action::CreateUser(user));
                }
                Err(message) => form.error = Some(message),
            },
            KeyCode::Enter => form.focus.next(),
            _ => {
                if !form.focus.handle_key(key) {
                    form.fields[form.focus.index].handle_key(key);
                }
            }
        }
        None
    }

    fn draw_form(&self, form: &UserForm, frame: &mut Frame, area: Rect) {
        let mut content = vec![Line::from("")];
        for (i, field) in form.fields.iter().enumerate() {
            content.push(field.render(form.focus.is(i), LABEL_WIDTH));
        }
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  {}", PASSWORD_POLICY_MESSAGE),
            Style::default().fg(Color::DarkGray),
        )));
        content.push(Line::from(""));

        if self.state.creating {
            content.push(Line::from(Span::styled(
                "  Creating user...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(error) = &form.error {
            content.push(Line::from(vec![
                Span::styled(
                    "  Error: ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(error.clone(), Style::default().fg(Color::Red)),
            ]));
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Create User ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn block(&self, title: String, pane: Pane) -> Block<'static> {
        let color = if self.pane == pane {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(color))
    }

    fn draw_users(&mut self, frame: &mut Frame, area: Rect) {
        let block = self.block(format!(" Users ({}) ", self.state.users.len()), Pane::Users);
        if self.state.users.is_empty() {
            let message = if self.state.loading {
                Span::styled("Loading users...", Style::default().fg(Color::Yellow))
            } else if let Some(error) = &self.state.error {
                Span::styled(error.clone(), Style::default().fg(Color::Red))
            } else {
                Span::styled("No user registered", Style::default().fg(Color::DarkGray))
            };
            frame.render_widget(Paragraph::new(Line::from(message)).block(block), area);
            return;
        }

        let rows: Vec<Row> = self
            .state
            .users
            .iter()
            .map(|user: &User| {
                Row::new(vec![
                    Cell::from(user.full_name()),
                    Cell::from(user.user_email.clone()),
                    Cell::from(user.role_label()).style(Style::default().fg(Color::Yellow)),
                    Cell::from(user.creation_date.clone())
                        .style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(25),
                Constraint::Percentage(35),
                Constraint::Length(8),
                Constraint::Min(10),
            ],
        )
        .header(header(&["Name", "Email", "Role", "Created"]))
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
        frame.render_stateful_widget(table, area, &mut self.users_table);
    }

    fn draw_requests(&mut self, frame: &mut Frame, area: Rect) {
        let block = self.block(
            format!(" Requests ({}) ", self.state.requests.len()),
            Pane::Requests,
        );
        if self.state.requests.is_empty() {
            let message = Span::styled("No pending request", Style::default().fg(Color::DarkGray));
            frame.render_widget(Paragraph::new(Line::from(message)).block(block), area);
            return;
        }

        let rows: Vec<Row> = self
            .state
            .requests
            .iter()
            .map(|request| {
                Row::new(vec![
                    Cell::from(request.full_name()),
                    Cell::from(request.user_email.clone()),
                    Cell::from(request.status_label()).style(Style::default().fg(Color::Magenta)),
                    Cell::from(request.creation_date.clone())
                        .style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(25),
                Constraint::Percentage(35),
                Constraint::Length(10),
                Constraint::Min(10),
            ],
        )
        .header(header(&["Name", "Email", "Status", "Requested"]))
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
        frame.render_stateful_widget(table, area, &mut self.requests_table);
    }
}

impl Component for AdminComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }

        let action = match key.code {
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Tab | KeyCode::BackTab => {
                self.pane = match self.pane {
                    Pane::Users => Pane::Requests,
                    Pane::Requests => Pane::Users,
                };
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_by(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_by(-1);
                None
            }
            KeyCode::Char('g') => {
                self.move_by(isize::MIN / 2);
                None
            }
            KeyCode::Char('G') => {
                self.move_by(isize::MAX / 2);
                None
            }
            KeyCode::Char('r') => Some(Action::LoadAdmin),
            KeyCode::Char('n') => {
                self.form = Some(UserForm::default());
                None
            }
            KeyCode::Char('a') if self.pane == Pane::Requests => self
                .selected_request()
                .map(|r| Action::ApproveRequest(r.request_id.clone())),
            KeyCode::Char('x') | KeyCode::Delete if self.pane == Pane::Requests => self
                .selected_request()
                .map(|r| Action::RejectRequest(r.request_id.clone())),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        if let Some(form) = &self.form {
            self.draw_form(form, frame, area);
            return Ok(());
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        self.draw_users(frame, chunks[0]);
        self.draw_requests(frame, chunks[1]);
        Ok(())
    }
}

impl Screen for AdminComponent {
    fn sync(&mut self, store: &Store) {
        self.state = store.admin.clone();
        clamp_selection(&mut self.users_table, self.state.users.len());
        clamp_selection(&mut self.requests_table, self.state.requests.len());

        let Some(form) = self.form.as_mut() else {
            return;
        };
        if self.state.creating {
            return;
        }
        let email = form.fields[EMAIL].trimmed();
        if self.state.created.as_deref() == Some(email) {
            self.form = None;
        } else if let Some(error) = &self.state.create_error {
            form.error = Some(error.clone());
        }
    }

    fn on_enter(&mut self) {
        self.form = None;
    }

    fn hints(&self) -> Vec<KeyHint> {
        if self.form.is_some() {
            return vec![
                ("Tab", "Next field"),
                ("Enter", "Create user"),
                ("Esc", "Cancel"),
            ];
        }
        let mut hints = vec![("Tab", "Users/Requests"), ("j/k", "Move")];
        if self.pane == Pane::Requests {
            hints.extend([("a", "Approve"), ("x", "Reject")]);
        }
        hints.extend([("n", "New user"), ("r", "Reload"), ("F1", "Help")]);
        hints
    }
}
