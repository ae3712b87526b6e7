//! Help dialog component
//!
//! Displays all keyboard shortcuts available in the application.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(1) => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        // Clear the area
        frame.render_widget(Clear, area);

        let margin = 4;
        let dialog_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.width() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:16}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Anywhere");
    add_shortcut(&mut lines, "F1", "Show this help");
    add_shortcut(&mut lines, "F2 .. F8", "Open a menu entry");
    add_shortcut(&mut lines, "Ctrl+l", "Log out");
    add_shortcut(&mut lines, "Ctrl+c", "Quit");
    add_shortcut(&mut lines, "Esc", "Back / close dialog");

    add_section(&mut lines, "Forms");
    add_shortcut(&mut lines, "Tab / ↓", "Next field");
    add_shortcut(&mut lines, "Shift+Tab / ↑", "Previous field");
    add_shortcut(&mut lines, "Ctrl+u", "Clear field");
    add_shortcut(&mut lines, "Enter", "Submit / open file browser");

    add_section(&mut lines, "Datasets");
    add_shortcut(&mut lines, "j / k", "Move selection");
    add_shortcut(&mut lines, "Enter", "Preview dataset");
    add_shortcut(&mut lines, "e", "Edit name, tags, description");
    add_shortcut(&mut lines, "d", "Remove dataset");
    add_shortcut(&mut lines, "r", "Reload list");
    add_shortcut(&mut lines, "h / l", "Scroll preview columns");

    add_section(&mut lines, "User Management");
    add_shortcut(&mut lines, "Tab", "Switch between users and requests");
    add_shortcut(&mut lines, "a / x", "Approve / reject request");
    add_shortcut(&mut lines, "n", "Create a user");

    add_section(&mut lines, "File Browser");
    add_shortcut(&mut lines, "Enter / l", "Open folder");
    add_shortcut(&mut lines, "Backspace / h", "Parent folder");
    add_shortcut(&mut lines, "s / Space", "Select file or folder");
    add_shortcut(&mut lines, "r", "Refresh listing");

    add_section(&mut lines, "Dataset Wizards");
    add_shortcut(&mut lines, "Tab / Shift+Tab", "Next / previous step");
    add_shortcut(&mut lines, "Enter", "Browse / validate / submit");
    add_shortcut(&mut lines, "← / →", "Pick reference column or modality");
    add_shortcut(&mut lines, "Space", "Toggle option");
    add_shortcut(&mut lines, "x", "Clear folder mapping");
    add_shortcut(&mut lines, "Ctrl+s", "Register the dataset");
    add_shortcut(&mut lines, "Ctrl+r", "Start over");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press Esc, q or F1 to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}
