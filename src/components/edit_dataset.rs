//! Edit name, tags and description of a registered dataset

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::components::input::{FocusRing, TextInput};
use crate::model::dataset::Dataset;
use crate::model::draft::parse_tags;
use crate::services::datasets::DatasetEdit;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const NAME: usize = 0;
const TAGS: usize = 1;
const DESC: usize = 2;

#[derive(Debug, Default)]
pub struct EditDatasetDialog {
    dataset_id: String,
    fields: [TextInput; 3],
    focus: FocusRing,
    error: Option<String>,
}

impl EditDatasetDialog {
    /// Prefill the form with the dataset's current values
    pub fn open(&mut self, dataset: &Dataset) {
        self.dataset_id = dataset.dataset_id.clone();
        self.fields = [
            TextInput::new("Name").with_value(&dataset.name),
            TextInput::new("Tags").with_value(dataset.tags_label()),
            TextInput::new("Description").with_value(&dataset.description),
        ];
        self.focus = FocusRing::new(3);
        self.error = None;
    }

    fn submit(&mut self) -> Option<Action> {
        let tags = parse_tags(&self.fields[TAGS].value);
        if self.fields[NAME].is_blank() {
            self.error = Some("Dataset name is a required field".to_string());
            return None;
        }
        if tags.is_empty() {
            self.error = Some("Please enter at least one tag for the dataset".to_string());
            return None;
        }
        self.error = None;
        Some(Action::UpdateDataset(DatasetEdit {
            dataset_id: self.dataset_id.clone(),
            name: self.fields[NAME].trimmed().to_string(),
            tags,
            desc: self.fields[DESC].trimmed().to_string(),
        }))
    }
}

impl Component for EditDatasetDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::CloseModal)),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(self.submit())
            }
            KeyCode::Enter if self.focus.is(DESC) => return Ok(self.submit()),
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
        let popup_area = centered_popup(area, 70, 11);
        frame.render_widget(Clear, popup_area);

        let mut content = vec![Line::from("")];
        for (i, field) in self.fields.iter().enumerate() {
            content.push(field.render(self.focus.is(i), 11));
        }
        content.push(Line::from(""));
        match &self.error {
            Some(error) => content.push(Line::from(Span::styled(
                format!("  {}", error),
                Style::default().fg(Color::Red),
            ))),
            None => content.push(Line::from(Span::styled(
                "  Tags are comma separated",
                Style::default().fg(Color::DarkGray),
            ))),
        }
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled(
                " Ctrl+s ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Save  "),
            Span::styled(
                " Esc ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ]));

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" Edit {} ", self.dataset_id))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::input::tests::{ctrl, key, type_text};

    fn dataset() -> Dataset {
        Dataset {
            dataset_id: "dataset_1".to_string(),
            name: "heart".to_string(),
            tags: vec!["heart".to_string(), "csv".to_string()],
            description: "heart failure".to_string(),
            ..Dataset::default()
        }
    }

    #[test]
    fn test_open_prefills_fields() {
        let mut dialog = EditDatasetDialog::default();
        dialog.open(&dataset());
        assert_eq!(dialog.fields[TAGS].value, "heart, csv");
        assert_eq!(dialog.fields[DESC].value, "heart failure");
    }

    #[test]
    fn test_save_sends_edit() {
        let mut dialog = EditDatasetDialog::default();
        dialog.open(&dataset());
        type_text(&mut dialog.fields[NAME], " v2");

        let action = dialog.handle_key_event(ctrl('s')).unwrap();

        assert_eq!(
            action,
            Some(Action::UpdateDataset(DatasetEdit {
                dataset_id: "dataset_1".to_string(),
                name: "heart v2".to_string(),
                tags: vec!["heart".to_string(), "csv".to_string()],
                desc: "heart failure".to_string(),
            }))
        );
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut dialog = EditDatasetDialog::default();
        dialog.open(&dataset());
        dialog.handle_key_event(ctrl('u')).unwrap();

        assert_eq!(dialog.handle_key_event(ctrl('s')).unwrap(), None);
        assert_eq!(
            dialog.error.as_deref(),
            Some("Dataset name is a required field")
        );

        dialog.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        assert!(dialog.error.is_none());
    }
}
