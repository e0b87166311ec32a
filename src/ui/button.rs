//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Label for the submit control
pub fn submit_label(is_submitting: bool) -> &'static str {
    if is_submitting {
        "Loading..."
    } else {
        "Submit"
    }
}

/// Render a button with border; disabled buttons are dimmed
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    content: &str,
    is_selected: bool,
    is_enabled: bool,
) {
    let border_style = match (is_selected, is_enabled) {
        (_, false) => Style::default().fg(Color::DarkGray),
        (true, true) => Style::default().fg(Color::Cyan),
        (false, true) => Style::default().fg(Color::Blue),
    };

    let text_style = if !is_enabled {
        Style::default().fg(Color::DarkGray)
    } else if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let paragraph = Paragraph::new(format!(" {content} ")).style(text_style);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(paragraph.block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_label() {
        assert_eq!(submit_label(true), "Loading...");
        assert_eq!(submit_label(false), "Submit");
    }
}
