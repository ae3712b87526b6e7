//! Plain (csv / images) dataset registration form

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::components::input::{FocusRing, TextInput};
use crate::model::draft::parse_tags;
use crate::model::modal::BrowseTarget;
use crate::model::repository::{display_path, RepoPath};
use crate::services::datasets::NewDataset;
use crate::store::Store;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const DATA_TYPES: [&str; 2] = ["csv", "images"];
/// Data files accepted for a csv dataset
pub const ALLOWED_EXTENSIONS: [&str; 2] = [".csv", ".txt"];

const NAME: usize = 0;
const TYPE: usize = 1;
const PATH: usize = 2;
const TAGS: usize = 3;
const DESC: usize = 4;

const LABEL_WIDTH: usize = 13;

pub struct AddDatasetComponent {
    name: TextInput,
    data_type: Option<usize>,
    path: Option<RepoPath>,
    tags: TextInput,
    desc: TextInput,
    focus: FocusRing,
    /// Field index and message of the first failed check
    error: Option<(usize, String)>,
}

impl Default for AddDatasetComponent {
    fn default() -> Self {
        Self {
            name: TextInput::new("Name"),
            data_type: None,
            path: None,
            tags: TextInput::new("Tags"),
            desc: TextInput::new("Description"),
            focus: FocusRing::new(5),
            error: None,
        }
    }
}

impl AddDatasetComponent {
    /// Path picked in the file browser
    pub fn set_path(&mut self, path: RepoPath) {
        self.path = Some(path);
        if matches!(self.error, Some((PATH, _))) {
            self.error = None;
        }
        self.focus.index = TAGS;
    }

    fn cycle_type(&mut self, forward: bool) {
        let len = DATA_TYPES.len();
        self.data_type = Some(match (self.data_type, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
        if matches!(self.error, Some((TYPE, _))) {
            self.error = None;
        }
    }

    /// First failing check, in form order
    fn validate(&self) -> Result<NewDataset, (usize, String)> {
        if self.name.is_blank() {
            return Err((NAME, "Dataset name is a required field".to_string()));
        }
        let Some(data_type) = self.data_type.map(|i| DATA_TYPES[i]) else {
            return Err((TYPE, "Please select data type".to_string()));
        };
        let Some(path) = self.path.clone().filter(|p| !p.is_empty()) else {
            return Err((PATH, "Please select data file".to_string()));
        };
        if data_type == "csv" {
            let file = path.last().map(|s| s.to_lowercase()).unwrap_or_default();
            if !ALLOWED_EXTENSIONS.iter().any(|ext| file.ends_with(ext)) {
                return Err((
                    PATH,
                    format!("Only {} files can be registered as csv", ALLOWED_EXTENSIONS.join(" or ")),
                ));
            }
        }
        let tags = parse_tags(&self.tags.value);
        if tags.is_empty() {
            return Err((TAGS, "Please enter at least one tag for the dataset".to_string()));
        }
        if self.desc.is_blank() {
            return Err((DESC, "Please enter a description for dataset".to_string()));
        }

        Ok(NewDataset {
            name: self.name.trimmed().to_string(),
            data_type: data_type.to_string(),
            path,
            tags,
            desc: self.desc.trimmed().to_string(),
        })
    }

    fn submit(&mut self) -> Option<Action> {
        match self.validate() {
            Ok(dataset) => {
                self.error = None;
                Some(Action::AddDataset(dataset))
            }
            Err((field, message)) => {
                self.focus.index = field;
                self.error = Some((field, message));
                None
            }
        }
    }

    /// Marker and padded label, laid out like [`TextInput::render`]
    fn label(text: &str, focused: bool) -> [Span<'static>; 2] {
        let style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let marker = if focused { "> " } else { "  " };
        [
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{:<width$}: ", text, width = LABEL_WIDTH), style),
        ]
    }

    fn field_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for index in [NAME, TYPE, PATH, TAGS, DESC] {
            let focused = self.focus.is(index);
            let line = match index {
                NAME => self.name.render(focused, LABEL_WIDTH),
                TAGS => self.tags.render(focused, LABEL_WIDTH),
                DESC => self.desc.render(focused, LABEL_WIDTH),
                TYPE => {
                    let mut spans = Self::label("Type", focused).to_vec();
                    for (i, data_type) in DATA_TYPES.iter().enumerate() {
                        let style = if self.data_type == Some(i) {
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Green)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::DarkGray)
                        };
                        spans.push(Span::styled(format!(" {} ", data_type), style));
                        spans.push(Span::raw(" "));
                    }
                    Line::from(spans)
                }
                _ => {
                    let value = match &self.path {
                        Some(path) => Span::raw(display_path(path)),
                        None => Span::styled(
                            "<Enter to browse>",
                            Style::default().fg(Color::DarkGray),
                        ),
                    };
                    let mut spans = Self::label("Data File", focused).to_vec();
                    spans.push(value);
                    Line::from(spans)
                }
            };
            lines.push(line);

            if let Some((field, message)) = &self.error {
                if *field == index {
                    lines.push(Line::from(Span::styled(
                        format!("  {:<width$}  {}", "", message, width = LABEL_WIDTH),
                        Style::default().fg(Color::Red),
                    )));
                }
            }
        }
        lines
    }
}

impl Component for AddDatasetComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => return Ok(self.submit()),
                KeyCode::Char('d') => return Ok(Some(Action::AddDefaultDataset)),
                _ => {}
            }
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(Action::Back)),
            KeyCode::Enter if self.focus.is(PATH) => {
                return Ok(Some(Action::OpenFileBrowser(BrowseTarget::DatasetPath)))
            }
            KeyCode::Enter if self.focus.is(DESC) => return Ok(self.submit()),
            KeyCode::Enter => self.focus.next(),
            KeyCode::Left if self.focus.is(TYPE) => self.cycle_type(false),
            KeyCode::Right | KeyCode::Char(' ') if self.focus.is(TYPE) => self.cycle_type(true),
            _ => {
                if self.focus.handle_key(key) {
                    return Ok(None);
                }
                let edited = match self.focus.index {
                    NAME => self.name.handle_key(key),
                    TAGS => self.tags.handle_key(key),
                    DESC => self.desc.handle_key(key),
                    _ => false,
                };
                if edited && matches!(self.error, Some((field, _)) if field == self.focus.index) {
                    self.error = None;
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let mut content = vec![Line::from("")];
        content.extend(self.field_lines());
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            "  Tags are comma separated. Press Ctrl+d to register the default MNIST dataset instead.",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Add Dataset ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
        Ok(())
    }
}

impl Screen for AddDatasetComponent {
    fn sync(&mut self, _store: &Store) {}

    fn hints(&self) -> Vec<KeyHint> {
        vec![
            ("Tab", "Next field"),
            ("←/→", "Type"),
            ("Enter", "Browse"),
            ("Ctrl+s", "Register"),
            ("Ctrl+d", "Default dataset"),
            ("Esc", "Back"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::input::tests::{ctrl, key, type_text};
    use crate::model::repository::parse_path;

    fn filled(path: &str) -> AddDatasetComponent {
        let mut form = AddDatasetComponent::default();
        type_text(&mut form.name, "heart");
        form.data_type = Some(0);
        form.set_path(parse_path(path));
        type_text(&mut form.tags, "heart, csv");
        type_text(&mut form.desc, "heart failure");
        form
    }

    #[test]
    fn test_errors_reported_in_form_order() {
        let mut form = AddDatasetComponent::default();
        assert_eq!(form.handle_key_event(ctrl('s')).unwrap(), None);
        assert_eq!(
            form.error,
            Some((NAME, "Dataset name is a required field".to_string()))
        );

        type_text(&mut form.name, "heart");
        form.handle_key_event(ctrl('s')).unwrap();
        assert_eq!(form.error, Some((TYPE, "Please select data type".to_string())));
        assert!(form.focus.is(TYPE));

        form.handle_key_event(key(KeyCode::Right)).unwrap();
        form.handle_key_event(ctrl('s')).unwrap();
        assert_eq!(form.error, Some((PATH, "Please select data file".to_string())));
    }

    #[test]
    fn test_csv_must_have_allowed_extension() {
        let mut form = filled("/data/heart.parquet");
        form.handle_key_event(ctrl('s')).unwrap();
        assert!(matches!(form.error, Some((PATH, _))));

        let mut form = filled("/data/heart.TXT");
        assert!(form.handle_key_event(ctrl('s')).unwrap().is_some());
    }

    #[test]
    fn test_register_sends_form() {
        let mut form = filled("/data/heart.csv");

        let action = form.handle_key_event(ctrl('s')).unwrap();

        assert_eq!(
            action,
            Some(Action::AddDataset(NewDataset {
                name: "heart".to_string(),
                data_type: "csv".to_string(),
                path: parse_path("/data/heart.csv"),
                tags: vec!["heart".to_string(), "csv".to_string()],
                desc: "heart failure".to_string(),
            }))
        );
    }

    #[test]
    fn test_images_accept_folders() {
        let mut form = filled("/data/xrays");
        form.data_type = Some(1);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_enter_on_path_opens_browser() {
        let mut form = AddDatasetComponent::default();
        form.focus.index = PATH;
        assert_eq!(
            form.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::OpenFileBrowser(BrowseTarget::DatasetPath))
        );
        assert_eq!(
            form.handle_key_event(ctrl('d')).unwrap(),
            Some(Action::AddDefaultDataset)
        );
    }
}
