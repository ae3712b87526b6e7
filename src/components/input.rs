//! Single-line text inputs and the focus ring of a form

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// Editable line of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub label: &'static str,
    pub value: String,
    /// Render as `*` (passwords)
    pub masked: bool,
}

impl TextInput {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Apply an editing key; returns whether the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                true
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => false,
            KeyCode::Char(c) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    fn shown(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// `label: value` with a cursor when focused; labels padded to `label_width`
    pub fn render(&self, focused: bool, label_width: usize) -> Line<'static> {
        let pad = label_width.saturating_sub(self.label.width());
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let marker = if focused { "> " } else { "  " };
        let mut value = self.shown();
        if focused {
            value.push('_');
        }

        Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{}{}: ", self.label, " ".repeat(pad)), label_style),
            Span::styled(
                value,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(if focused { Modifier::BOLD } else { Modifier::empty() }),
            ),
        ])
    }
}

/// Index of the focused field among `len` fields, wrapping both ways
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusRing {
    pub index: usize,
    pub len: usize,
}

impl FocusRing {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn is(&self, index: usize) -> bool {
        self.index == index
    }

    /// Tab/Down/Up/BackTab move the focus; returns whether the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.next();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn type_text(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = TextInput::new("Name");
        type_text(&mut input, "heartt");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value, "heart");

        assert!(input.handle_key(ctrl('u')));
        assert!(input.value.is_empty());
        assert!(!input.handle_key(ctrl('s')));
    }

    #[test]
    fn test_masked_render_hides_value() {
        let input = TextInput::masked("Password").with_value("abc");
        let line = input.render(false, 8);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.ends_with("***"));
        assert!(!text.contains("abc"));
    }

    #[test]
    fn test_focus_wraps() {
        let mut ring = FocusRing::new(3);
        ring.prev();
        assert_eq!(ring.index, 2);
        ring.next();
        assert_eq!(ring.index, 0);
        assert!(ring.handle_key(key(KeyCode::Tab)));
        assert!(ring.is(1));
    }
}
