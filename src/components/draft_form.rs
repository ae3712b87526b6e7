//! Pieces shared by the MedicalFolder and BIDS wizards: the metadata form,
//! the reference-column picker, the subject report and step framing.

use crate::components::input::{FocusRing, TextInput};
use crate::components::table::TableComponent;
use crate::model::dataset::CsvTable;
use crate::model::draft::{parse_tags, DatasetMetadata, MetadataPatch, ReferenceColumn, SubjectReport};
use crate::wizard::WizardStep;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

const NAME: usize = 0;
const TAGS: usize = 1;
const DESC: usize = 2;

/// Subject names listed before the rest is summarised as "+N more"
const REPORT_PREVIEW: usize = 8;

/// Name, tags and description of the draft
pub struct MetadataForm {
    fields: [TextInput; 3],
    focus: FocusRing,
}

impl Default for MetadataForm {
    fn default() -> Self {
        Self {
            fields: [
                TextInput::new("Name"),
                TextInput::new("Tags"),
                TextInput::new("Description"),
            ],
            focus: FocusRing::new(3),
        }
    }
}

impl MetadataForm {
    /// Up/Down move between fields; edits return the patch to dispatch
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<MetadataPatch> {
        match key.code {
            KeyCode::Up => {
                self.focus.prev();
                None
            }
            KeyCode::Down | KeyCode::Enter => {
                self.focus.next();
                None
            }
            _ => {
                let index = self.focus.index;
                if !self.fields[index].handle_key(key) {
                    return None;
                }
                let value = self.fields[index].value.clone();
                let patch = match index {
                    NAME => MetadataPatch {
                        name: Some(value),
                        ..MetadataPatch::default()
                    },
                    TAGS => MetadataPatch {
                        tags: Some(parse_tags(&value)),
                        ..MetadataPatch::default()
                    },
                    DESC => MetadataPatch {
                        desc: Some(value),
                        ..MetadataPatch::default()
                    },
                    _ => return None,
                };
                Some(patch)
            }
        }
    }

    /// Follow the draft: a reset draft empties the form
    pub fn sync(&mut self, metadata: &DatasetMetadata) {
        if *metadata == DatasetMetadata::default() {
            self.fields.iter_mut().for_each(TextInput::clear);
            self.focus.index = NAME;
        }
    }

    pub fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| field.render(focused && self.focus.is(i), 12))
            .collect()
    }

    /// One-line summary for a collapsed step
    pub fn summary(metadata: &DatasetMetadata) -> String {
        match &metadata.name {
            Some(name) if !name.trim().is_empty() => {
                let tags = metadata.tags.as_deref().unwrap_or_default().join(", ");
                format!("{} [{}]", name.trim(), tags)
            }
            _ => "not filled yet".to_string(),
        }
    }
}

/// Reference CSV preview with a movable column cursor
pub struct ColumnPicker {
    table: TableComponent,
    cursor: usize,
}

impl Default for ColumnPicker {
    fn default() -> Self {
        Self {
            table: TableComponent::new(" Reference CSV "),
            cursor: 0,
        }
    }
}

impl ColumnPicker {
    /// Load the CSV; the cursor starts on the already chosen column
    pub fn sync(&mut self, csv: Option<&CsvTable>, chosen: &ReferenceColumn) {
        let before = self.table.headers().to_vec();
        self.table.set_table(csv);
        if self.table.headers() != before.as_slice() {
            self.cursor = chosen.index.unwrap_or(0);
        }
        let last = self.table.headers().len().saturating_sub(1);
        self.cursor = self.cursor.min(last);
        self.table.set_highlight_column(Some(self.cursor));
    }

    /// Left/Right move the column cursor, Up/Down scroll, Enter picks
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ReferenceColumn> {
        let columns = self.table.headers().len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') if self.cursor + 1 < columns => self.cursor += 1,
            KeyCode::Down | KeyCode::Char('j') => self.table.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => self.table.scroll_up(1),
            KeyCode::Enter => {
                let name = self.table.headers().get(self.cursor)?.clone();
                return Some(ReferenceColumn {
                    index: Some(self.cursor),
                    name: Some(name),
                });
            }
            _ => {}
        }
        self.table.set_highlight_column(Some(self.cursor));
        self.table.scroll_to_column(self.cursor);
        None
    }

    pub fn table_mut(&mut self) -> &mut TableComponent {
        &mut self.table
    }
}

fn names_line(label: &str, names: &[String], color: Color) -> Line<'static> {
    let mut shown = names
        .iter()
        .take(REPORT_PREVIEW)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > REPORT_PREVIEW {
        shown.push_str(&format!(" +{} more", names.len() - REPORT_PREVIEW));
    }
    Line::from(vec![
        Span::styled(
            format!("  {} ({}): ", label, names.len()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(shown),
    ])
}

/// Subjects matched between the reference CSV and the folder tree
pub fn subject_report_lines(report: &SubjectReport) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(available) = &report.available_subjects {
        lines.push(names_line("Subjects ready", available, Color::Green));
    }
    if let Some(missing) = report.missing_folders.as_ref().filter(|m| !m.is_empty()) {
        lines.push(names_line("In CSV without folder", missing, Color::Yellow));
    }
    if let Some(missing) = report.missing_entries.as_ref().filter(|m| !m.is_empty()) {
        lines.push(names_line("Folder without CSV entry", missing, Color::Yellow));
    }
    lines
}

/// Border for a wizard step; the focused one stands out
pub fn step_block<S: WizardStep>(step: S, focused: bool) -> Block<'static> {
    let color = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {}. {} ", step.number(), step.description()),
            Style::default().fg(color).add_modifier(if focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            }),
        ))
}

/// Dimmed explanation line
pub fn hint_line(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text.into()),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Yes/no switch rendered as `[x] label`
pub fn toggle_line(label: &str, on: bool, focused: bool) -> Line<'static> {
    let mark = if on { "[x]" } else { "[ ]" };
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(format!("  {} {}", mark, label), style))
}
