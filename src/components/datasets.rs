//! Registered dataset list

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::model::dataset::Dataset;
use crate::model::route::Route;
use crate::store::{DatasetsState, Store};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

#[derive(Default)]
pub struct DatasetsComponent {
    state: DatasetsState,
    table_state: TableState,
}

impl DatasetsComponent {
    pub fn selected(&self) -> Option<&Dataset> {
        self.table_state
            .selected()
            .and_then(|i| self.state.list.get(i))
    }

    fn move_by(&mut self, delta: isize) {
        let len = self.state.list.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }
}

impl Component for DatasetsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
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
            KeyCode::Char('r') => Some(Action::RefreshDatasets),
            KeyCode::Char('a') => Some(Action::Navigate(Route::AddDataset)),
            KeyCode::Enter | KeyCode::Char('p') => self
                .selected()
                .map(|d| Action::PreviewDataset(d.dataset_id.clone())),
            KeyCode::Char('e') => self
                .selected()
                .map(|d| Action::EditDataset(d.dataset_id.clone())),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.selected().map(|d| Action::ConfirmRemoveDataset {
                    dataset_id: d.dataset_id.clone(),
                    name: d.name.clone(),
                })
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Datasets ({}) ", self.state.list.len()))
            .border_style(Style::default().fg(Color::DarkGray));

        if self.state.list.is_empty() {
            let message = if self.state.loading {
                Span::styled("Loading datasets...", Style::default().fg(Color::Yellow))
            } else if let Some(error) = &self.state.error {
                Span::styled(error.clone(), Style::default().fg(Color::Red))
            } else {
                Span::styled(
                    "No dataset registered yet. Press a to add one.",
                    Style::default().fg(Color::DarkGray),
                )
            };
            frame.render_widget(Paragraph::new(Line::from(message)).block(block), area);
            return Ok(());
        }

        let header = Row::new(["Name", "Type", "Shape", "Tags", "Description"].map(|h| {
            Cell::from(h).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        }));
        let rows: Vec<Row> = self
            .state
            .list
            .iter()
            .map(|dataset| {
                Row::new(vec![
                    Cell::from(dataset.name.clone()),
                    Cell::from(dataset.data_type.clone()).style(Style::default().fg(Color::Yellow)),
                    Cell::from(dataset.shape_label()),
                    Cell::from(dataset.tags_label()).style(Style::default().fg(Color::Magenta)),
                    Cell::from(dataset.description.clone())
                        .style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(20),
                Constraint::Length(15),
                Constraint::Length(14),
                Constraint::Percentage(20),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
        Ok(())
    }
}

impl Screen for DatasetsComponent {
    fn sync(&mut self, store: &Store) {
        self.state = store.datasets.clone();
        let len = self.state.list.len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    fn hints(&self) -> Vec<KeyHint> {
        vec![
            ("j/k", "Move"),
            ("Enter", "Preview"),
            ("e", "Edit"),
            ("d", "Remove"),
            ("a", "Add"),
            ("r", "Reload"),
            ("F1", "Help"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::input::tests::key;
    use crate::store::{DatasetsAction, StoreAction};

    fn dataset(id: &str, name: &str) -> Dataset {
        Dataset {
            dataset_id: id.to_string(),
            name: name.to_string(),
            data_type: "csv".to_string(),
            ..Dataset::default()
        }
    }

    fn listed(datasets: Vec<Dataset>) -> DatasetsComponent {
        let mut store = Store::new();
        store.dispatch(StoreAction::Datasets(DatasetsAction::Listed(datasets)));
        let mut component = DatasetsComponent::default();
        component.sync(&store);
        component
    }

    #[test]
    fn test_enter_previews_selected() {
        let mut component = listed(vec![dataset("dataset_1", "heart"), dataset("dataset_2", "mnist")]);
        component.handle_key_event(key(KeyCode::Char('j'))).unwrap();

        let action = component.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(action, Some(Action::PreviewDataset("dataset_2".to_string())));
    }

    #[test]
    fn test_remove_asks_for_confirmation() {
        let mut component = listed(vec![dataset("dataset_1", "heart")]);

        let action = component.handle_key_event(key(KeyCode::Char('d'))).unwrap();

        assert_eq!(
            action,
            Some(Action::ConfirmRemoveDataset {
                dataset_id: "dataset_1".to_string(),
                name: "heart".to_string()
            })
        );
    }

    #[test]
    fn test_selection_clamped_after_removal() {
        let mut component = listed(vec![dataset("dataset_1", "heart"), dataset("dataset_2", "mnist")]);
        component.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(component.table_state.selected(), Some(1));

        let mut store = Store::new();
        store.dispatch(StoreAction::Datasets(DatasetsAction::Listed(vec![dataset(
            "dataset_1", "heart",
        )])));
        component.sync(&store);

        assert_eq!(component.selected().map(|d| d.name.as_str()), Some("heart"));
    }

    #[test]
    fn test_empty_list_has_no_selection_actions() {
        let mut component = listed(Vec::new());
        assert_eq!(component.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
        assert_eq!(
            component.handle_key_event(key(KeyCode::Char('a'))).unwrap(),
            Some(Action::Navigate(Route::AddDataset))
        );
    }
}
