//! Header, navigation menu, status line and help bar around every screen

use crate::component::KeyHint;
use crate::model::route::Route;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Function key that opens each menu entry, in `Route::menu()` order
pub const MENU_KEYS: [&str; 7] = ["F2", "F3", "F4", "F5", "F6", "F7", "F8"];

/// Context needed for rendering the frame around a screen
pub struct ShellContext<'a> {
    pub route: &'a Route,
    pub server_url: &'a str,
    pub user_email: Option<&'a str>,
    /// An API call is in flight
    pub busy: bool,
    pub notice: Option<&'a str>,
    pub tick: u64,
}

pub fn render_header(frame: &mut Frame, area: Rect, ctx: &ShellContext) {
    let mut spans = vec![
        Span::styled(
            " Node Console ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            ctx.route.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", ctx.server_url),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some(email) = ctx.user_email {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {} ", email),
            Style::default().fg(Color::Black).bg(Color::Magenta),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Menu entry highlighted for `route`; previews belong to the dataset list
fn menu_entry(route: &Route) -> Route {
    match route {
        Route::DatasetPreview { .. } => Route::Datasets,
        other => other.clone(),
    }
}

pub fn render_menu(frame: &mut Frame, area: Rect, current: &Route) {
    let active = menu_entry(current);
    let items: Vec<ListItem> = Route::menu()
        .into_iter()
        .zip(MENU_KEYS)
        .map(|(route, key)| {
            let selected = route == active;
            let style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(if selected { "▶ " } else { "  " }, style),
                Span::styled(format!("{:<3} ", key), Style::default().fg(Color::DarkGray)),
                Span::styled(route.title().to_string(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Menu ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(list, area);
}

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &ShellContext) {
    let mut spans = vec![];

    if ctx.busy {
        spans.push(Span::styled(
            format!(" {} working ", SPINNER[(ctx.tick % SPINNER.len() as u64) as usize]),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(notice) = ctx.notice {
        spans.push(Span::styled(
            format!(" {} ", notice),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Styled ` key ` badge followed by its label
pub fn hint_spans(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{} ", label)),
    ]
}

pub fn render_help_bar(frame: &mut Frame, area: Rect, hints: &[KeyHint]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|&(key, label)| hint_spans(key, label))
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}
