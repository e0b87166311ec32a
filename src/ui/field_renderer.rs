//! Field rendering utilities for forms

use formgate::schema::FieldSpec;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows taken by a text field box
pub const TEXT_FIELD_HEIGHT: u16 = 3;

/// Mask secret values for display
fn display_value(spec: &FieldSpec, value: &str) -> String {
    if spec.is_secret {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    }
}

/// Draw a bordered single-line text field
pub fn draw_text_field(
    frame: &mut Frame,
    area: Rect,
    spec: &FieldSpec,
    value: &str,
    is_active: bool,
    has_error: bool,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let border_style = if has_error {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display = display_value(spec, value);
    let display = if display.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display
    };
    let cursor = if is_active { "▌" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let block = Block::default()
        .title(format!(" {} ", spec.label))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.block(block), area);
}

/// Draw a checkbox line for a boolean field
pub fn draw_toggle(
    frame: &mut Frame,
    area: Rect,
    spec: &FieldSpec,
    checked: bool,
    is_active: bool,
) {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if is_active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let line = Line::from(vec![
        Span::styled(format!(" {mark} "), style),
        Span::styled(spec.label.as_str(), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a red one-line error message
pub fn draw_error(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph =
        Paragraph::new(format!(" {message}")).style(Style::default().fg(Color::Red));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_values_are_masked() {
        let spec = FieldSpec::text("password", "Password").secret();
        assert_eq!(display_value(&spec, "hunter22"), "••••••••");
    }

    #[test]
    fn test_plain_values_pass_through() {
        let spec = FieldSpec::text("email", "Email");
        assert_eq!(display_value(&spec, "a@b.com"), "a@b.com");
    }
}
