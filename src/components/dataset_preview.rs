//! Dataset preview screen
//!
//! Shows the metadata of one registered dataset and, below it, either the
//! first rows of its data (tabular datasets) or its subject table (imaging
//! datasets).

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::components::table::TableComponent;
use crate::model::dataset::{cell_to_string, DatasetPreview};
use crate::store::{BidsPreview, Store};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DatasetPreviewComponent {
    dataset_id: Option<String>,
    preview: Option<DatasetPreview>,
    subjects: Option<BidsPreview>,
    table: TableComponent,
}

impl Default for DatasetPreviewComponent {
    fn default() -> Self {
        Self {
            dataset_id: None,
            preview: None,
            subjects: None,
            table: TableComponent::new(" Data "),
        }
    }
}

impl DatasetPreviewComponent {
    /// Show `dataset_id`, dropping whatever was previewed before
    pub fn open(&mut self, dataset_id: &str) {
        if self.dataset_id.as_deref() != Some(dataset_id) {
            self.preview = None;
            self.subjects = None;
            self.table.set_table(None);
        }
        self.dataset_id = Some(dataset_id.to_string());
    }

    fn metadata_lines(&self, preview: &DatasetPreview) -> Vec<Line<'static>> {
        let dataset = &preview.dataset;
        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(
                    format!("{:<14}", label),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(value),
            ])
        };

        let mut lines = vec![
            field("Name", dataset.name.clone()),
            field("Dataset ID", dataset.dataset_id.clone()),
            field("Data Type", dataset.data_type.clone()),
            field("Tags", dataset.tags_label()),
            field("Shape", dataset.shape_label()),
            field("Description", dataset.description.clone()),
        ];
        if let Some(path) = &dataset.path {
            lines.push(field("Path", path.clone()));
        }
        if let Some(modalities) = self.subjects.as_ref().and_then(|s| s.modalities.as_ref()) {
            lines.push(field("Modalities", modalities.join(", ")));
        }
        if let Some(params) = &dataset.dataset_parameters {
            if !params.is_null() {
                lines.push(field("Parameters", cell_to_string(params)));
            }
        }
        lines
    }
}

impl Component for DatasetPreviewComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(dataset_id) = self.dataset_id.clone() else {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(Action::Back),
                _ => None,
            });
        };

        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Back),
            KeyCode::Char('r') => Some(Action::PreviewDataset(dataset_id)),
            KeyCode::Char('e') => Some(Action::EditDataset(dataset_id)),
            KeyCode::Char('D') | KeyCode::Delete => {
                let name = self
                    .preview
                    .as_ref()
                    .map(|p| p.dataset.name.clone())
                    .unwrap_or_default();
                Some(Action::ConfirmRemoveDataset { dataset_id, name })
            }
            _ => return self.table.handle_key_event(key),
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let Some(preview) = &self.preview else {
            let message = match &self.dataset_id {
                Some(id) => format!("Loading {}...", id),
                None => "No dataset selected".to_string(),
            };
            let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Yellow)))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Dataset ")
                        .border_style(Style::default().fg(Color::DarkGray)),
                );
            frame.render_widget(paragraph, area);
            return Ok(());
        };

        let metadata = self.metadata_lines(preview);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(metadata.len() as u16 + 2),
                Constraint::Min(5),
            ])
            .split(area);

        let paragraph = Paragraph::new(metadata)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", preview.dataset.name))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, chunks[0]);

        self.table.draw(frame, chunks[1])
    }
}

impl Screen for DatasetPreviewComponent {
    fn sync(&mut self, store: &Store) {
        let Some(dataset_id) = self.dataset_id.as_deref() else {
            return;
        };

        self.preview = store
            .datasets
            .preview
            .as_ref()
            .filter(|p| p.dataset.dataset_id == dataset_id)
            .cloned();
        self.subjects = Some(store.bids_preview.clone())
            .filter(|s| s.dataset_id.as_deref() == Some(dataset_id));

        let imaging = self.preview.as_ref().is_some_and(|p| p.dataset.is_imaging());
        if imaging {
            self.table.set_title(" Subjects ");
            self.table
                .set_table(self.subjects.as_ref().and_then(|s| s.subject_table.as_ref()));
        } else {
            self.table.set_title(" Data ");
            self.table
                .set_table(self.preview.as_ref().and_then(|p| p.data_preview.as_ref()));
        }
    }

    fn hints(&self) -> Vec<KeyHint> {
        vec![
            ("j/k h/l", "Scroll"),
            ("e", "Edit"),
            ("D", "Remove"),
            ("r", "Reload"),
            ("Esc", "Back"),
        ]
    }
}
