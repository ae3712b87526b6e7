//! Table component for tabular previews
//!
//! Renders split-orientation tables (dataset previews, reference CSVs, the
//! DLP catalog) with headers, rows, and column alignment.

use crate::action::Action;
use crate::component::Component;
use crate::model::dataset::CsvTable;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column gets before its cells are cut with `...`
const MAX_COLUMN_WIDTH: usize = 40;

/// Table component for displaying tabular data
pub struct TableComponent {
    title: String,
    /// Column headers
    headers: Vec<String>,
    /// Data rows
    rows: Vec<Vec<String>>,
    /// Scroll offset
    scroll: usize,
    /// First column shown
    column_offset: usize,
    /// Column drawn highlighted (chosen reference column)
    highlight_column: Option<usize>,
}

impl Default for TableComponent {
    fn default() -> Self {
        Self::new(" Table ")
    }
}

/// Cut `text` to `width` display columns, marking the cut with `...`
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        let pad = width - text.width();
        return format!("{}{}", text, " ".repeat(pad));
    }
    let budget = width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&".".repeat(width.min(3)));
    let pad = width.saturating_sub(out.width());
    out.push_str(&" ".repeat(pad));
    out
}

impl TableComponent {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            headers: Vec::new(),
            rows: Vec::new(),
            scroll: 0,
            column_offset: 0,
            highlight_column: None,
        }
    }

    /// Replace the data; keeps the scroll position when the table is unchanged
    pub fn set_table(&mut self, table: Option<&CsvTable>) {
        let (headers, rows) = match table {
            Some(table) => (table.columns.clone(), table.rows()),
            None => (Vec::new(), Vec::new()),
        };
        if headers != self.headers || rows != self.rows {
            self.headers = headers;
            self.rows = rows;
            self.scroll = 0;
            self.column_offset = 0;
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_highlight_column(&mut self, column: Option<usize>) {
        self.highlight_column = column;
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Render table content as lines (for embedding in other panels)
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let headers: Vec<String> = self.headers.iter().skip(self.column_offset).cloned().collect();
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().skip(self.column_offset).cloned().collect())
            .collect();
        let highlight = self
            .highlight_column
            .and_then(|col| col.checked_sub(self.column_offset));
        Self::build_table_lines(&headers, &rows, highlight)
    }

    /// Build table lines from headers and rows
    pub fn build_table_lines(
        headers: &[String],
        rows: &[Vec<String>],
        highlight_column: Option<usize>,
    ) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if headers.is_empty() {
            return vec![Line::from(Span::styled(
                "No data",
                Style::default().fg(Color::DarkGray),
            ))];
        }

        // Calculate column widths
        let mut col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < col_widths.len() {
                    col_widths[i] = col_widths[i].max(cell.width());
                }
            }
        }
        for width in &mut col_widths {
            *width = (*width).clamp(1, MAX_COLUMN_WIDTH);
        }

        let column_style = |i: usize, base: Style| {
            if highlight_column == Some(i) {
                base.fg(Color::Black).bg(Color::Cyan)
            } else {
                base
            }
        };

        // Render header
        let header_spans: Vec<Span> = headers
            .iter()
            .enumerate()
            .flat_map(|(i, h)| {
                vec![
                    Span::styled(
                        fit_width(h, col_widths[i]),
                        column_style(
                            i,
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                    ),
                    Span::raw(" │ "),
                ]
            })
            .collect();
        lines.push(Line::from(header_spans));

        // Render separator
        let separator: String = col_widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        )));

        // Render rows
        for row in rows {
            let row_spans: Vec<Span> = row
                .iter()
                .enumerate()
                .take(col_widths.len())
                .flat_map(|(i, cell)| {
                    vec![
                        Span::styled(
                            fit_width(cell, col_widths[i]),
                            column_style(i, Style::default().fg(Color::White)),
                        ),
                        Span::raw(" │ "),
                    ]
                })
                .collect();
            lines.push(Line::from(row_spans));
        }

        // Add row count
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Total rows: {}", rows.len()),
            Style::default().fg(Color::Yellow),
        )));

        lines
    }

    pub fn scroll_down(&mut self, by: usize) {
        let max_scroll = self.rows.len().saturating_sub(1);
        self.scroll = (self.scroll + by).min(max_scroll);
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.scroll = self.scroll.saturating_sub(by);
    }

    pub fn scroll_right(&mut self) {
        if self.column_offset + 1 < self.headers.len() {
            self.column_offset += 1;
        }
    }

    /// Scroll horizontally so `column` is near the left edge
    pub fn scroll_to_column(&mut self, column: usize) {
        if column < self.column_offset || column > self.column_offset + 2 {
            self.column_offset = column.saturating_sub(2);
        }
    }

    pub fn scroll_left(&mut self) {
        self.column_offset = self.column_offset.saturating_sub(1);
    }
}

impl Component for TableComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_down(10)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_up(10)
            }
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::Char('l') | KeyCode::Right => self.scroll_right(),
            KeyCode::Char('h') | KeyCode::Left => self.scroll_left(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content = self.render_lines();
        let visible_height = area.height.saturating_sub(2) as usize;
        let total = content.len();

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title.clone())
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .scroll((self.scroll as u16, 0));

        frame.render_widget(paragraph, area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_fit_width_pads_and_cuts() {
        assert_eq!(fit_width("abc", 5), "abc  ");
        assert_eq!(fit_width("abcdefgh", 6), "abc...");
        // wide characters count double
        assert_eq!(fit_width("日本語テキスト", 7), "日本...");
    }

    #[test]
    fn test_lines_have_header_separator_rows_and_total() {
        let lines = TableComponent::build_table_lines(
            &["id".to_string(), "age".to_string()],
            &[
                vec!["sub-01".to_string(), "30".to_string()],
                vec!["sub-02".to_string(), "41".to_string()],
            ],
            None,
        );

        assert_eq!(lines.len(), 6);
        assert!(line_text(&lines[0]).starts_with("id    "));
        assert!(line_text(&lines[1]).contains("┼"));
        assert_eq!(line_text(&lines[5]), "Total rows: 2");
    }

    #[test]
    fn test_set_table_resets_scroll_on_new_data() {
        let table: CsvTable = serde_json::from_value(json!({
            "columns": ["a", "b"], "index": [0, 1], "data": [[1, 2], [3, 4]]
        }))
        .unwrap();
        let mut view = TableComponent::default();
        view.set_table(Some(&table));
        view.scroll_down(1);
        view.scroll_right();

        view.set_table(Some(&table));
        assert_eq!((view.scroll, view.column_offset), (1, 1));

        view.set_table(None);
        assert_eq!((view.scroll, view.column_offset), (0, 0));
        assert!(view.headers().is_empty());
    }

    #[test]
    fn test_column_offset_stops_at_last_column() {
        let mut view = TableComponent::default();
        view.headers = vec!["a".to_string(), "b".to_string()];
        view.scroll_right();
        view.scroll_right();
        assert_eq!(view.column_offset, 1);
        view.scroll_left();
        view.scroll_left();
        assert_eq!(view.column_offset, 0);
    }
}
