//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    /// Navigation menu; absent on the login page
    pub menu: Option<Rect>,
    pub content: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Popup sized as a percentage of `area`
pub fn centered_percent(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = area.height.saturating_mul(percent_y) / 100;
    centered_popup(area, width, height)
}

/// Calculate main screen layout
pub fn calculate_main_layout(area: Rect, show_menu: bool) -> MainLayout {
    // header + content + status line + help bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let (menu, content) = if show_menu {
        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(main_chunks[1]);
        (Some(horizontal_chunks[0]), horizontal_chunks[1])
    } else {
        (None, main_chunks[1])
    };

    MainLayout {
        header: main_chunks[0],
        menu,
        content,
        status: main_chunks[2],
        help: main_chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_is_clamped_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_popup(area, 60, 6);
        assert_eq!(popup, Rect::new(0, 2, 40, 6));
    }

    #[test]
    fn test_login_layout_has_no_menu() {
        let layout = calculate_main_layout(Rect::new(0, 0, 100, 40), false);
        assert!(layout.menu.is_none());
        assert_eq!(layout.content.width, 100);
        assert_eq!(layout.help.height, 3);
    }

    #[test]
    fn test_menu_takes_left_column() {
        let layout = calculate_main_layout(Rect::new(0, 0, 100, 40), true);
        assert_eq!(layout.menu.map(|m| m.width), Some(30));
        assert_eq!(layout.content.x, 30);
    }
}
