//! Browser over the node's data path
//!
//! Listings come from the repository endpoint through the store; this
//! component only tracks which entry is highlighted and what may be picked.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_percent;
use crate::model::modal::BrowseTarget;
use crate::model::repository::{display_path, FileEntry, RepoPath};
use crate::store::RepositoryState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct FileBrowserDialog {
    pub target: BrowseTarget,
    listing: RepositoryState,
    list_state: ListState,
}

impl Default for FileBrowserDialog {
    fn default() -> Self {
        Self::new(BrowseTarget::DatasetPath)
    }
}

impl FileBrowserDialog {
    pub fn new(target: BrowseTarget) -> Self {
        Self {
            target,
            listing: RepositoryState::default(),
            list_state: ListState::default(),
        }
    }

    /// Start browsing for `target` at the data path root
    pub fn open(&mut self, target: BrowseTarget) -> Action {
        self.target = target;
        self.list_state.select(None);
        Action::ListRepository {
            path: Vec::new(),
            refresh: false,
        }
    }

    pub fn sync(&mut self, listing: &RepositoryState) {
        if listing.path != self.listing.path {
            self.list_state.select(None);
        }
        self.listing = listing.clone();
        let len = self.visible_entries().len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    /// Entries worth showing for this target: folders, plus files it accepts
    pub fn visible_entries(&self) -> Vec<&FileEntry> {
        self.listing
            .files
            .iter()
            .filter(|entry| entry.is_dir() || self.accepts_file(entry))
            .collect()
    }

    fn accepts_file(&self, entry: &FileEntry) -> bool {
        if self.target.folders_only() {
            return false;
        }
        let extensions = self.target.extensions();
        extensions.is_empty() || entry.has_extension(extensions)
    }

    /// Whether `entry` itself can be returned as the selection
    pub fn can_select(&self, entry: &FileEntry) -> bool {
        match self.target {
            BrowseTarget::DatasetPath => true,
            _ if self.target.folders_only() => entry.is_dir(),
            _ => !entry.is_dir() && self.accepts_file(entry),
        }
    }

    fn highlighted(&self) -> Option<&FileEntry> {
        let index = self.list_state.selected()?;
        self.visible_entries().get(index).copied()
    }

    fn parent(&self) -> Option<RepoPath> {
        let path = &self.listing.path;
        if path.is_empty() {
            return None;
        }
        Some(path[..path.len() - 1].to_vec())
    }

    fn move_by(&mut self, delta: isize) {
        let len = self.visible_entries().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.list_state.select(Some(next as usize));
    }

    fn select(&self, entry: &FileEntry) -> Option<Action> {
        self.can_select(entry).then(|| Action::BrowseSelected {
            target: self.target,
            path: entry.path.clone(),
        })
    }
}

impl Component for FileBrowserDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_by(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_by(-1);
                None
            }
            KeyCode::PageDown => {
                self.move_by(10);
                None
            }
            KeyCode::PageUp => {
                self.move_by(-10);
                None
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => match self.highlighted() {
                Some(entry) if entry.is_dir() => Some(Action::ListRepository {
                    path: entry.path.clone(),
                    refresh: false,
                }),
                Some(entry) => self.select(entry),
                None => None,
            },
            KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
                self.parent().map(|path| Action::ListRepository {
                    path,
                    refresh: false,
                })
            }
            KeyCode::Char('s') | KeyCode::Char(' ') => {
                self.highlighted().and_then(|entry| self.select(entry))
            }
            KeyCode::Char('r') => Some(Action::ListRepository {
                path: self.listing.path.clone(),
                refresh: true,
            }),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_percent(area, 80, 80);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.target.title()))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let location = Line::from(vec![
            Span::styled(" Location: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                display_path(&self.listing.path),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} entries)", self.listing.total),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(location), chunks[0]);

        if self.listing.error {
            let message = self
                .listing
                .message
                .clone()
                .unwrap_or_else(|| "Unable to list this folder".to_string());
            frame.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(Color::Red))),
                chunks[1],
            );
        } else {
            let items: Vec<ListItem> = self
                .visible_entries()
                .iter()
                .map(|entry| {
                    let (icon, style) = if entry.is_dir() {
                        ("▸ ", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
                    } else {
                        ("  ", Style::default().fg(Color::White))
                    };
                    let mut spans = vec![Span::styled(format!("{}{}", icon, entry.name), style)];
                    if entry.is_registered() {
                        spans.push(Span::styled(
                            "  [registered]",
                            Style::default().fg(Color::Green),
                        ));
                    } else if !entry.includes.is_empty() {
                        spans.push(Span::styled(
                            format!("  [{} datasets inside]", entry.includes.len()),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    if !self.can_select(entry) && !entry.is_dir() {
                        spans.push(Span::styled(
                            "  (not selectable)",
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();

            let list = List::new(items)
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let hint = Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Open  "),
            Span::styled(" Backspace ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Up  "),
            Span::styled(" s ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Select  "),
            Span::styled(" r ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("Refresh  "),
            Span::styled(" Esc ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw("Cancel"),
        ]);
        frame.render_widget(Paragraph::new(hint), chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::input::tests::key;
    use crate::model::repository::EntryKind;

    fn entry(kind: EntryKind, name: &str, extension: &str) -> FileEntry {
        FileEntry {
            kind,
            name: name.to_string(),
            path: vec!["data".to_string(), name.to_string()],
            extension: extension.to_string(),
            registered: None,
            includes: Vec::new(),
            created: None,
            size: None,
        }
    }

    fn listing() -> RepositoryState {
        RepositoryState {
            files: vec![
                entry(EntryKind::Dir, "mri", ""),
                entry(EntryKind::File, "participants.csv", ".csv"),
                entry(EntryKind::File, "notes.txt", ".txt"),
            ],
            error: false,
            message: None,
            path: vec!["data".to_string()],
            total: 3,
        }
    }

    #[test]
    fn test_folder_targets_hide_files() {
        let mut browser = FileBrowserDialog::new(BrowseTarget::BidsRoot);
        browser.sync(&listing());

        let names: Vec<&str> = browser.visible_entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["mri"]);
    }

    #[test]
    fn test_csv_target_keeps_folders_and_csv() {
        let mut browser = FileBrowserDialog::new(BrowseTarget::BidsReferenceCsv);
        browser.sync(&listing());

        let names: Vec<&str> = browser.visible_entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["mri", "participants.csv"]);
        assert!(!browser.can_select(browser.visible_entries()[0]));
        assert!(browser.can_select(browser.visible_entries()[1]));
    }

    #[test]
    fn test_enter_descends_into_folder_and_backspace_ascends() {
        let mut browser = FileBrowserDialog::new(BrowseTarget::MedicalFolderRoot);
        browser.sync(&listing());

        let action = browser.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::ListRepository {
                path: vec!["data".to_string(), "mri".to_string()],
                refresh: false
            })
        );

        let action = browser.handle_key_event(key(KeyCode::Backspace)).unwrap();
        assert_eq!(
            action,
            Some(Action::ListRepository {
                path: Vec::new(),
                refresh: false
            })
        );
    }

    #[test]
    fn test_select_returns_path_segments() {
        let mut browser = FileBrowserDialog::new(BrowseTarget::DatasetPath);
        browser.sync(&listing());
        browser.handle_key_event(key(KeyCode::Down)).unwrap();

        let action = browser.handle_key_event(key(KeyCode::Char('s'))).unwrap();

        assert_eq!(
            action,
            Some(Action::BrowseSelected {
                target: BrowseTarget::DatasetPath,
                path: vec!["data".to_string(), "participants.csv".to_string()],
            })
        );
    }

    #[test]
    fn test_cannot_pick_file_for_folder_target() {
        let mut browser = FileBrowserDialog::new(BrowseTarget::BidsRoot);
        browser.sync(&listing());
        let file = entry(EntryKind::File, "participants.csv", ".csv");
        assert!(browser.select(&file).is_none());
    }

    #[test]
    fn test_selection_resets_when_folder_changes() {
        let mut browser = FileBrowserDialog::new(BrowseTarget::DatasetPath);
        browser.sync(&listing());
        browser.handle_key_event(key(KeyCode::Down)).unwrap();
        browser.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(browser.list_state.selected(), Some(2));

        let mut deeper = listing();
        deeper.path.push("mri".to_string());
        browser.sync(&deeper);
        assert_eq!(browser.list_state.selected(), Some(0));
    }
}
