//! BIDS dataset registration wizard
//!
//! Same layout as the MedicalFolder wizard, without the Data Loading Plan.

use crate::action::Action;
use crate::component::{Component, KeyHint, Screen};
use crate::components::draft_form::{
    hint_line, step_block, subject_report_lines, toggle_line, ColumnPicker, MetadataForm,
};
use crate::model::modal::BrowseTarget;
use crate::model::repository::display_path;
use crate::store::{BidsAction, BidsState, Store, StoreAction};
use crate::wizard::{BidsStep, WizardFlow};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn dispatch(action: BidsAction) -> Option<Action> {
    Some(Action::Dispatch(StoreAction::Bids(action)))
}

pub struct BidsWizardComponent {
    draft: BidsState,
    section: usize,
    visible: usize,
    picker: ColumnPicker,
    metadata: MetadataForm,
}

impl Default for BidsWizardComponent {
    fn default() -> Self {
        Self {
            draft: BidsState::default(),
            section: 0,
            visible: 1,
            picker: ColumnPicker::default(),
            metadata: MetadataForm::default(),
        }
    }
}

impl BidsWizardComponent {
    pub fn focused_step(&self) -> BidsStep {
        let steps = self.draft.visible_steps();
        steps
            .get(self.section)
            .or(steps.last())
            .copied()
            .unwrap_or(BidsStep::Root)
    }

    fn handle_step_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self.focused_step() {
            BidsStep::Root => match key.code {
                KeyCode::Enter => Some(Action::OpenFileBrowser(BrowseTarget::BidsRoot)),
                _ => None,
            },
            BidsStep::ReferenceCsv => match key.code {
                KeyCode::Enter => Some(Action::OpenFileBrowser(BrowseTarget::BidsReferenceCsv)),
                KeyCode::Char('i') | KeyCode::Char(' ') => dispatch(
                    BidsAction::SetIgnoreReferenceCsv(!self.draft.ignore_reference_csv),
                ),
                _ => None,
            },
            BidsStep::ReferenceColumn => self
                .picker
                .handle_key(key)
                .map(Action::ValidateBidsReference),
            BidsStep::Metadata => self
                .metadata
                .handle_key(key)
                .and_then(|patch| dispatch(BidsAction::SetMetadata(patch))),
            BidsStep::Add => match key.code {
                KeyCode::Enter => Some(Action::SubmitBids),
                _ => None,
            },
        }
    }

    fn step_lines(&self, step: BidsStep, focused: bool) -> Vec<Line<'static>> {
        let draft = &self.draft;
        match step {
            BidsStep::Root => {
                let mut lines = vec![match &draft.bids_root {
                    Some(root) => Line::from(format!("  {}", display_path(root))),
                    None => hint_line("Press Enter to browse the data path"),
                }];
                if let Some(modalities) = &draft.modalities {
                    lines.push(hint_line(format!("Modalities: {}", modalities.join(", "))));
                }
                if let Some(folders) = &draft.patient_folders {
                    lines.push(hint_line(format!("{} subject folders", folders.len())));
                }
                lines
            }
            BidsStep::ReferenceCsv => vec![
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
            BidsStep::ReferenceColumn => {
                let mut lines = vec![match &draft.bids_ref.reference.name {
                    Some(name) => Line::from(vec![
                        Span::raw("  Subject folder column: "),
                        Span::styled(name.clone(), Style::default().fg(Color::Green)),
                    ]),
                    None => hint_line("Move with ←/→ and press Enter on the subject column"),
                }];
                lines.extend(subject_report_lines(&draft.bids_ref.subjects));
                lines
            }
            BidsStep::Metadata => self.metadata.lines(focused),
            BidsStep::Add => vec![Line::from(vec![
                Span::styled(
                    "  Enter ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Register the dataset"),
            ])],
        }
    }

    fn summary(&self, step: BidsStep) -> Line<'static> {
        match step {
            BidsStep::ReferenceCsv if self.draft.ignore_reference_csv => Line::from("  ignored"),
            BidsStep::Metadata => {
                Line::from(format!("  {}", MetadataForm::summary(&self.draft.metadata)))
            }
            _ => self
                .step_lines(step, false)
                .into_iter()
                .next()
                .unwrap_or_default(),
        }
    }
}

impl Component for BidsWizardComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => {
                    return Ok(self.draft.can_submit().then_some(Action::SubmitBids))
                }
                KeyCode::Char('r') => return Ok(dispatch(BidsAction::Reset)),
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
                } else if *step == BidsStep::ReferenceColumn {
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
            if *step == BidsStep::ReferenceColumn {
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

impl Screen for BidsWizardComponent {
    fn sync(&mut self, store: &Store) {
        self.draft = store.bids.clone();

        let steps = self.draft.visible_steps();
        let was_typing = self.focused_step() == BidsStep::Metadata;
        if steps.len() > self.visible && !was_typing {
            self.section = self.visible;
        }
        self.visible = steps.len();
        self.section = self.section.min(self.visible - 1);

        self.picker.sync(
            self.draft.reference_csv.as_ref().map(|csv| &csv.data),
            &self.draft.bids_ref.reference,
        );
        self.metadata.sync(&self.draft.metadata);
    }

    fn hints(&self) -> Vec<KeyHint> {
        let mut hints = vec![("Tab", "Next step")];
        match self.focused_step() {
            BidsStep::Root => hints.push(("Enter", "Browse")),
            BidsStep::ReferenceCsv => hints.extend([("Enter", "Browse"), ("i", "Ignore CSV")]),
            BidsStep::ReferenceColumn => {
                hints.extend([("←/→", "Column"), ("Enter", "Use column")])
            }
            BidsStep::Metadata => hints.push(("↑/↓", "Field")),
            BidsStep::Add => hints.push(("Enter", "Register")),
        }
        hints.extend([("Ctrl+r", "Start over"), ("Esc", "Back")]);
        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::input::tests::{ctrl, key};
    use crate::model::dataset::CsvTable;
    use crate::model::draft::{MetadataPatch, ReferenceColumn, ReferenceCsv, SubjectReport};
    use crate::model::repository::parse_path;
    use serde_json::json;

    fn store_with(actions: Vec<BidsAction>) -> Store {
        let mut store = Store::new();
        for action in actions {
            store.dispatch(StoreAction::Bids(action));
        }
        store
    }

    fn root() -> BidsAction {
        BidsAction::SetBidsRoot {
            root_path: parse_path("/data/bids"),
            modalities: vec!["anat".to_string()],
        }
    }

    fn participants() -> BidsAction {
        BidsAction::SetReferenceCsv(ReferenceCsv {
            path: parse_path("/data/bids/participants.csv"),
            data: CsvTable {
                columns: vec!["participant_id".to_string(), "age".to_string()],
                index: vec![json!(0)],
                data: vec![vec![json!("sub-01"), json!(30)]],
            },
        })
    }

    #[test]
    fn test_steps_follow_draft() {
        let mut wizard = BidsWizardComponent::default();
        wizard.sync(&Store::new());
        assert_eq!(wizard.focused_step(), BidsStep::Root);

        wizard.sync(&store_with(vec![root()]));
        assert_eq!(wizard.focused_step(), BidsStep::ReferenceCsv);
        assert_eq!(
            wizard.handle_key_event(key(KeyCode::Char('i'))).unwrap(),
            dispatch(BidsAction::SetIgnoreReferenceCsv(true))
        );

        wizard.sync(&store_with(vec![root(), participants()]));
        assert_eq!(wizard.focused_step(), BidsStep::ReferenceColumn);
        let action = wizard.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::ValidateBidsReference(ReferenceColumn {
                index: Some(0),
                name: Some("participant_id".to_string()),
            }))
        );
    }

    #[test]
    fn test_metadata_focus_kept_when_add_unlocks() {
        let reference = BidsAction::SetBidsRef {
            reference: ReferenceColumn {
                index: Some(0),
                name: Some("participant_id".to_string()),
            },
            subjects: SubjectReport::default(),
        };
        let mut wizard = BidsWizardComponent::default();
        wizard.sync(&store_with(vec![root(), participants()]));
        wizard.sync(&store_with(vec![root(), participants(), reference.clone()]));
        assert_eq!(wizard.focused_step(), BidsStep::Metadata);

        wizard.sync(&store_with(vec![
            root(),
            participants(),
            reference,
            BidsAction::SetMetadata(MetadataPatch {
                name: Some("bids".to_string()),
                tags: Some(vec!["mri".to_string()]),
                desc: Some("anat".to_string()),
            }),
        ]));

        assert_eq!(wizard.focused_step(), BidsStep::Metadata);
        assert_eq!(wizard.handle_key_event(ctrl('s')).unwrap(), Some(Action::SubmitBids));
    }

    #[test]
    fn test_cannot_submit_early() {
        let mut wizard = BidsWizardComponent::default();
        wizard.sync(&store_with(vec![root()]));
        assert_eq!(wizard.handle_key_event(ctrl('s')).unwrap(), None);
        assert_eq!(
            wizard.handle_key_event(ctrl('r')).unwrap(),
            dispatch(BidsAction::Reset)
        );
    }
}
