//! Error and information dialog the operator has to acknowledge

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub struct AlertDialog<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

impl<'a> AlertDialog<'a> {
    pub fn new(title: &'a str, message: &'a str) -> Self {
        Self { title, message }
    }
}

impl Component for AlertDialog<'_> {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q') => {
                Some(Action::CloseModal)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let width = 60u16.min(area.width.saturating_sub(4)).max(20);
        // rough wrap estimate: message lines plus padding and the key hint
        let text_width = width.saturating_sub(4).max(1) as usize;
        let wrapped: usize = self
            .message
            .lines()
            .map(|line| line.chars().count() / text_width + 1)
            .sum();
        let height = (wrapped as u16 + 6).min(area.height);
        let popup_area = centered_popup(area, width, height);

        frame.render_widget(Clear, popup_area);

        let mut content = vec![Line::from("")];
        content.extend(self.message.lines().map(|line| {
            Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(Color::White),
            ))
        }));
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled(
                " Enter/Esc ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("OK"),
        ]));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(format!(" {} ", self.title))
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}
