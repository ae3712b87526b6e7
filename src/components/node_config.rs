//! Read-only view of the node environment

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::model::dataset::cell_to_string;
use crate::store::{NodeState, Store};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct NodeConfigComponent {
    node: NodeState,
    scroll: usize,
}

impl NodeConfigComponent {
    fn lines(&self) -> Vec<Line<'static>> {
        let Some(environ) = &self.node.environ else {
            let text = match &self.node.error {
                Some(error) => Span::styled(error.clone(), Style::default().fg(Color::Red)),
                None => Span::styled(
                    "Loading node configuration...",
                    Style::default().fg(Color::Yellow),
                ),
            };
            return vec![Line::from(text)];
        };

        let key_width = environ.keys().map(|k| k.len()).max().unwrap_or(0).min(32);
        environ
            .iter()
            .map(|(key, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}  ", key, width = key_width),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(cell_to_string(value)),
                ])
            })
            .collect()
    }
}

impl Component for NodeConfigComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let total = self.node.environ.as_ref().map_or(0, |e| e.len());
        match key.code {
            KeyCode::Char('r') => return Ok(Some(Action::LoadNodeEnviron)),
            KeyCode::Esc => return Ok(Some(Action::Back)),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(total.saturating_sub(1))
            }
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = (self.scroll + 10).min(total.saturating_sub(1)),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let lines = self.lines();
        let total = lines.len();
        let visible_height = area.height.saturating_sub(2) as usize;

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Node Configuration ")
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, area);

        if total > visible_height {
            let mut state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut state,
            );
        }
        Ok(())
    }
}

impl Screen for NodeConfigComponent {
    fn sync(&mut self, store: &Store) {
        self.node = store.node.clone();
    }

    fn on_enter(&mut self) {
        self.scroll = 0;
    }

    fn hints(&self) -> Vec<KeyHint> {
        vec![("j/k", "Scroll"), ("r", "Reload"), ("Esc", "Back"), ("F1", "Help")]
    }
}
