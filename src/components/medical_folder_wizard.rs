//! MedicalFolder dataset registration wizard
//!
//! Steps are stacked top to bottom as they unlock. Tab moves between the
//! visible steps; the focused one is drawn in full, the others collapse to
//! a one-line summary. Every edit is dispatched to the draft in the store,
//! so the component only keeps cursors and the text being typed.

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::components::draft_form::{
    hint_line, step_block, subject_report_lines, toggle_line, ColumnPicker, MetadataForm,
};
use crate::components::input::TextInput;
use crate::model::dataset::cell_to_string;
use crate::model::modal::BrowseTarget;
use crate::model::repository::display_path;
use crate::store::medical_folder::invert_mapping;
use crate::store::{MedicalFolderAction, MedicalFolderState, Store, StoreAction};
use crate::wizard::{MedicalFolderStep, WizardFlow};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn dispatch(action: MedicalFolderAction) -> Option<Action> {
    Some(Action::Dispatch(StoreAction::MedicalFolder(action)))
}

pub struct MedicalFolderWizardComponent {
    draft: MedicalFolderState,
    /// Index of the focused step among the visible ones
    section: usize,
    visible: usize,
    dlp_cursor: usize,
    folder_cursor: usize,
    /// Modality name being typed for the folder under the cursor
    modality_input: Option<TextInput>,
    /// Name of the new plan being typed
    dlp_name_input: Option<TextInput>,
    picker: ColumnPicker,
    metadata: MetadataForm,
}

impl Default for MedicalFolderWizardComponent {
    fn default() -> Self {
        Self {
            draft: MedicalFolderState::default(),
            section: 0,
            visible: 1,
            dlp_cursor: 0,
            folder_cursor: 0,
            modality_input: None,
            dlp_name_input: None,
            picker: ColumnPicker::default(),
            metadata: MetadataForm::default(),
        }
    }
}

impl MedicalFolderWizardComponent {
    pub fn focused_step(&self) -> MedicalFolderStep {
        let steps = self.draft.visible_steps();
        steps
            .get(self.section)
            .or(steps.last())
            .copied()
            .unwrap_or(MedicalFolderStep::Root)
    }

    fn folders(&self) -> &[String] {
        self.draft.modalities.as_deref().unwrap_or_default()
    }

    /// Next (or previous) default modality name for the folder under the cursor
    fn cycle_modality(&self, forward: bool) -> Option<Action> {
        let names = &self.draft.default_modality_names;
        let folder = self.folders().get(self.folder_cursor)?.clone();
        if names.is_empty() {
            return None;
        }
        let current = self
            .draft
            .modalities_mapping
            .get(&folder)
            .and_then(|m| names.iter().position(|n| n == m));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => names.len() - 1,
            (Some(i), true) => (i + 1) % names.len(),
            (Some(i), false) => (i + names.len() - 1) % names.len(),
        };
        dispatch(MedicalFolderAction::MapFolder {
            folder,
            modality: names[next].clone(),
        })
    }

    fn handle_modality_input(&mut self, key: KeyEvent) -> Option<Action> {
        let input = self.modality_input.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.modality_input = None;
                None
            }
            KeyCode::Enter => {
                let modality = input.trimmed().to_string();
                self.modality_input = None;
                let folder = self.folders().get(self.folder_cursor)?.clone();
                if modality.is_empty() {
                    return dispatch(MedicalFolderAction::ClearFolderMapping { folder });
                }
                dispatch(MedicalFolderAction::MapFolder { folder, modality })
            }
            _ => {
                input.handle_key(key);
                None
            }
        }
    }

    fn handle_dlp_name_input(&mut self, key: KeyEvent) -> Option<Action> {
        let input = self.dlp_name_input.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.dlp_name_input = None;
                None
            }
            KeyCode::Enter => {
                let name = input.trimmed().to_string();
                self.dlp_name_input = None;
                dispatch(MedicalFolderAction::SetNewDlpName(name))
            }
            _ => {
                input.handle_key(key);
                None
            }
        }
    }

    fn handle_dlp_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char(' ') {
            return Some(Action::UseExistingDlp(!self.draft.use_preexisting_dlp));
        }

        if self.draft.use_preexisting_dlp {
            let rows = self.draft.existing_dlps.as_ref().map_or(0, |t| t.data.len());
            match key.code {
                KeyCode::Char('j') | KeyCode::Down if self.dlp_cursor + 1 < rows => {
                    self.dlp_cursor += 1
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.dlp_cursor = self.dlp_cursor.saturating_sub(1)
                }
                KeyCode::Enter if rows > 0 => {
                    return dispatch(MedicalFolderAction::SelectDlp(self.dlp_cursor))
                }
                _ => {}
            }
            return None;
        }

        if key.code == KeyCode::Char('n') {
            return dispatch(MedicalFolderAction::SetCreateNewDlp(!self.draft.use_new_dlp));
        }
        if !self.draft.use_new_dlp {
            return None;
        }

        let folders = self.folders().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down if self.folder_cursor + 1 < folders => {
                self.folder_cursor += 1;
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.folder_cursor = self.folder_cursor.saturating_sub(1);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => self.cycle_modality(true),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_modality(false),
            KeyCode::Char('m') | KeyCode::Enter if folders > 0 => {
                let current = self
                    .folders()
                    .get(self.folder_cursor)
                    .and_then(|f| self.draft.modalities_mapping.get(f))
                    .cloned()
                    .unwrap_or_default();
                self.modality_input = Some(TextInput::new("Modality").with_value(current));
                None
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                let folder = self.folders().get(self.folder_cursor)?.clone();
                dispatch(MedicalFolderAction::ClearFolderMapping { folder })
            }
            KeyCode::Char('e') => {
                let current = self.draft.new_dlp_name.clone().unwrap_or_default();
                self.dlp_name_input = Some(TextInput::new("Plan name").with_value(current));
                None
            }
            KeyCode::Char('s') => dispatch(MedicalFolderAction::SaveModalityAssociation),
            _ => None,
        }
    }

    fn handle_step_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self.focused_step() {
            MedicalFolderStep::Root => match key.code {
                KeyCode::Enter => Some(Action::OpenFileBrowser(BrowseTarget::MedicalFolderRoot)),
                _ => None,
            },
            MedicalFolderStep::DataLoadingPlan => self.handle_dlp_key(key),
            MedicalFolderStep::ReferenceCsv => match key.code {
                KeyCode::Enter => Some(Action::OpenFileBrowser(
                    BrowseTarget::MedicalFolderReferenceCsv,
                )),
                KeyCode::Char('i') | KeyCode::Char(' ') => dispatch(
                    MedicalFolderAction::SetIgnoreReferenceCsv(!self.draft.ignore_reference_csv),
                ),
                _ => None,
            },
            MedicalFolderStep::ReferenceColumn => self
                .picker
                .handle_key(key)
                .map(Action::ValidateMedicalFolderReference),
            MedicalFolderStep::Metadata => self
                .metadata
                .handle_key(key)
                .and_then(|patch| dispatch(MedicalFolderAction::SetMetadata(patch))),
            MedicalFolderStep::Add => match key.code {
                KeyCode::Enter => Some(Action::SubmitMedicalFolder),
                _ => None,
            },
        }
    }

    fn dlp_lines(&self, focused: bool) -> Vec<Line<'static>> {
        let draft = &self.draft;
        let mut lines = vec![toggle_line(
            "Use an existing Data Loading Plan",
            draft.use_preexisting_dlp,
            focused,
        )];

        if draft.use_preexisting_dlp {
            match &draft.existing_dlps {
                None => lines.push(hint_line("Loading the DLP catalog...")),
                Some(table) if table.data.is_empty() => {
                    lines.push(hint_line("No Data Loading Plan saved on this node"))
                }
                Some(table) => {
                    for (i, row) in table.data.iter().enumerate() {
                        let chosen = draft.selected_dlp_index == Some(i);
                        let cursor = if focused && self.dlp_cursor == i { "> " } else { "  " };
                        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
                        let style = if chosen {
                            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        lines.push(Line::from(vec![
                            Span::styled(format!("  {}", cursor), Style::default().fg(Color::Cyan)),
                            Span::styled(
                                format!("{} {}", if chosen { "●" } else { "○" }, cells.join(" | ")),
                                style,
                            ),
                        ]));
                    }
                }
            }
            return lines;
        }

        lines.push(toggle_line(
            "Create a new folder-to-modality association",
            draft.use_new_dlp,
            focused,
        ));
        if !draft.use_new_dlp {
            return lines;
        }

        let name = match (&self.dlp_name_input, &draft.new_dlp_name) {
            (Some(input), _) => Span::styled(
                format!("{}_", input.value),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            (None, Some(name)) => Span::styled(name.clone(), Style::default().fg(Color::Green)),
            (None, None) => Span::styled("unnamed (press e)", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![Span::raw("    Plan name: "), name]));

        for (i, folder) in self.folders().iter().enumerate() {
            let under_cursor = focused && self.folder_cursor == i;
            let cursor = if under_cursor { "> " } else { "  " };
            let modality = match (&self.modality_input, under_cursor) {
                (Some(input), true) => Span::styled(
                    format!("{}_", input.value),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                _ => match draft.modalities_mapping.get(folder) {
                    Some(modality) => Span::styled(modality.clone(), Style::default().fg(Color::Green)),
                    None => Span::styled("unmapped", Style::default().fg(Color::DarkGray)),
                },
            };
            lines.push(Line::from(vec![
                Span::styled(format!("    {}", cursor), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{:<20} → ", folder)),
                modality,
            ]));
        }

        let saved = draft.modalities_to_folders.as_ref();
        let status = match saved {
            Some(saved) if *saved == invert_mapping(&draft.modalities_mapping) => {
                Span::styled("  Association saved", Style::default().fg(Color::Green))
            }
            Some(_) => Span::styled(
                "  Association changed since last save (press s)",
                Style::default().fg(Color::Yellow),
            ),
            None => Span::styled(
                "  Association not saved (press s)",
                Style::default().fg(Color::Yellow),
            ),
        };
        lines.push(Line::from(status));
        if !draft.default_modality_names.is_empty() {
            lines.push(hint_line(format!(
                "Modalities: {}",
                draft.default_modality_names.join(", ")
            )));
        }
        lines
    }

    fn step_lines(&self, step: MedicalFolderStep, focused: bool) -> Vec<Line<'static>> {
        let draft = &self.draft;
        match step {
            MedicalFolderStep::Root => {
                let mut lines = vec![match &draft.medical_folder_root {
                    Some(root) => Line::from(format!("  {}", display_path(root))),
                    None => hint_line("Press Enter to browse the data path"),
                }];
                if let Some(modalities) = &draft.modalities {
                    lines.push(hint_line(format!("Folders found: {}", modalities.join(", "))));
                }
                lines
            }
            MedicalFolderStep::DataLoadingPlan => self.dlp_lines(focused),
            MedicalFolderStep::ReferenceCsv => vec![
                match &draft.reference_csv {
                    Some(csv) => Line::from(format!("  {}", display_path(&csv.path))),
                    None => hint_line("Press Enter to browse for the CSV file"),
                },
                toggle_line(
                    "Ignore the reference CSV (i)",
                    draft.ignore_reference_csv,
                    focused,
                ),
            ],
            MedicalFolderStep::ReferenceColumn => {
                let mut lines = vec![match &draft.medical_folder_ref.reference.name {
                    Some(name) => Line::from(vec![
                        Span::raw("  Subject folder column: "),
                        Span::styled(name.clone(), Style::default().fg(Color::Green)),
                    ]),
                    None => hint_line("Move with ←/→ and press Enter on the subject column"),
                }];
                lines.extend(subject_report_lines(&draft.medical_folder_ref.subjects));
                lines
            }
            MedicalFolderStep::Metadata => self.metadata.lines(focused),
            MedicalFolderStep::Add => vec![Line::from(vec![
                Span::styled(
                    "  Enter ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Register the dataset"),
            ])],
        }
    }

    fn summary(&self, step: MedicalFolderStep) -> Line<'static> {
        let draft = &self.draft;
        let text = match step {
            MedicalFolderStep::DataLoadingPlan => match draft.selected_dlp() {
                Some(dlp) => format!("existing plan {}", dlp.name),
                None if draft.use_new_dlp => format!(
                    "{} folders mapped{}",
                    draft.modalities_mapping.len(),
                    draft
                        .new_dlp_name
                        .as_ref()
                        .map(|name| format!(" as {}", name))
                        .unwrap_or_default()
                ),
                None => "no plan".to_string(),
            },
            MedicalFolderStep::ReferenceCsv if draft.ignore_reference_csv => "ignored".to_string(),
            MedicalFolderStep::Metadata => MetadataForm::summary(&draft.metadata),
            _ => {
                return self
                    .step_lines(step, false)
                    .into_iter()
                    .next()
                    .unwrap_or_default()
            }
        };
        Line::from(format!("  {}", text))
    }
}

impl Component for MedicalFolderWizardComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.modality_input.is_some() {
            return Ok(self.handle_modality_input(key));
        }
        if self.dlp_name_input.is_some() {
            return Ok(self.handle_dlp_name_input(key));
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => {
                    return Ok(self.draft.can_submit().then_some(Action::SubmitMedicalFolder))
                }
                KeyCode::Char('r') => return Ok(dispatch(MedicalFolderAction::Reset)),
                _ => {}
            }
        }

        let visible = self.draft.visible_steps().len();
        match key.code {
            KeyCode::Esc => Ok(Some(Action::Back)),
            KeyCode::Tab => {
                self.section = (self.section + 1) % visible;
                Ok(None)
            }
            KeyCode::BackTab => {
                self.section = (self.section + visible - 1) % visible;
                Ok(None)
            }
            _ => Ok(self.handle_step_key(key)),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let steps = self.draft.visible_steps();
        let focused = self.focused_step();

        let constraints: Vec<Constraint> = steps
            .iter()
            .map(|step| {
                if *step != focused {
                    Constraint::Length(3)
                } else if *step == MedicalFolderStep::ReferenceColumn {
                    Constraint::Min(8)
                } else {
                    Constraint::Length(self.step_lines(*step, true).len() as u16 + 2)
                }
            })
            .chain(std::iter::once(Constraint::Min(0)))
            .collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (i, step) in steps.iter().enumerate() {
            let is_focused = *step == focused;
            let block = step_block(*step, is_focused);
            let inner = block.inner(chunks[i]);
            frame.render_widget(block, chunks[i]);

            if !is_focused {
                frame.render_widget(Paragraph::new(self.summary(*step)), inner);
                continue;
            }

            let lines = self.step_lines(*step, true);
            if *step == MedicalFolderStep::ReferenceColumn {
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(lines.len() as u16), Constraint::Min(3)])
                    .split(inner);
                frame.render_widget(Paragraph::new(lines), parts[0]);
                self.picker.table_mut().draw(frame, parts[1])?;
            } else {
                frame.render_widget(Paragraph::new(lines), inner);
            }
        }
        Ok(())
    }
}

impl Screen for MedicalFolderWizardComponent {
    fn sync(&mut self, store: &Store) {
        self.draft = store.medical_folder.clone();

        let steps = self.draft.visible_steps();
        let was_typing = self.focused_step() == MedicalFolderStep::Metadata;
        if steps.len() > self.visible && !was_typing {
            // jump to the first step that just unlocked
            self.section = self.visible;
        }
        self.visible = steps.len();
        self.section = self.section.min(self.visible - 1);

        let rows = self.draft.existing_dlps.as_ref().map_or(0, |t| t.data.len());
        self.dlp_cursor = self.dlp_cursor.min(rows.saturating_sub(1));
        self.folder_cursor = self.folder_cursor.min(self.folders().len().saturating_sub(1));

        self.picker.sync(
            self.draft.reference_csv.as_ref().map(|csv| &csv.data),
            &self.draft.medical_folder_ref.reference,
        );
        self.metadata.sync(&self.draft.metadata);
    }

    fn hints(&self) -> Vec<KeyHint> {
        let mut hints = vec![("Tab", "Next step")];
        match self.focused_step() {
            MedicalFolderStep::Root | MedicalFolderStep::ReferenceCsv => {
                hints.push(("Enter", "Browse"));
                if self.focused_step() == MedicalFolderStep::ReferenceCsv {
                    hints.push(("i", "Ignore CSV"));
                }
            }
            MedicalFolderStep::DataLoadingPlan => {
                hints.push(("Space", "Existing DLP"));
                if self.draft.use_preexisting_dlp {
                    hints.push(("Enter", "Select plan"));
                } else {
                    hints.extend([
                        ("n", "New association"),
                        ("e", "Plan name"),
                        ("←/→", "Modality"),
                        ("m", "Type modality"),
                        ("s", "Save"),
                    ]);
                }
            }
            MedicalFolderStep::ReferenceColumn => {
                hints.extend([("←/→", "Column"), ("Enter", "Use column")])
            }
            MedicalFolderStep::Metadata => hints.push(("↑/↓", "Field")),
            MedicalFolderStep::Add => hints.push(("Enter", "Register")),
        }
        hints.extend([("Ctrl+r", "Start over"), ("Esc", "Back")]);
        hints
    }
}
