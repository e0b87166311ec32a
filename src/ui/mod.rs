//! UI module for rendering the TUI

mod button;
mod field_renderer;

use crate::app::{App, Focus};
use button::{render_button, submit_label, BUTTON_HEIGHT};
use field_renderer::{draw_error, draw_text_field, draw_toggle, TEXT_FIELD_HEIGHT};
use formgate::schema::FieldKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Widest the form grows
const FORM_WIDTH: u16 = 60;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let state = app.state();
    let focus = app.focus(&state);
    let schema = app.controller.schema();
    let fields: Vec<_> = schema.visible_fields(&state.values).collect();

    let area = centered(frame.area(), FORM_WIDTH);
    let block = Block::default()
        .title(format!(" {} ", app.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = Vec::new();
    for spec in &fields {
        match spec.kind {
            FieldKind::Text => {
                constraints.push(Constraint::Length(TEXT_FIELD_HEIGHT));
                constraints.push(Constraint::Length(1)); // Error line
            }
            FieldKind::Boolean => constraints.push(Constraint::Length(1)),
        }
    }
    constraints.push(Constraint::Length(BUTTON_HEIGHT));
    constraints.push(Constraint::Length(1)); // Root error
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1)); // Help / status

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    let mut row = 0;
    for spec in &fields {
        let is_active = focus == Focus::Field(spec.name.clone());
        match spec.kind {
            FieldKind::Text => {
                let error = app.visible_error(&state, &spec.name);
                draw_text_field(
                    frame,
                    chunks[row],
                    spec,
                    state.values.text(&spec.name),
                    is_active,
                    error.is_some(),
                );
                if let Some(message) = error {
                    draw_error(frame, chunks[row + 1], message);
                }
                row += 2;
            }
            FieldKind::Boolean => {
                draw_toggle(
                    frame,
                    chunks[row],
                    spec,
                    state.values.flag(&spec.name),
                    is_active,
                );
                row += 1;
            }
        }
    }

    render_button(
        frame,
        chunks[row],
        submit_label(state.is_submitting()),
        focus == Focus::Submit,
        state.derived_enabled,
    );

    if let Some(message) = state.root_error() {
        draw_error(frame, chunks[row + 1], message);
    }

    draw_status_bar(frame, chunks[row + 3], app);
}

/// Help text, replaced by the latest status message when there is one
fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Cyan)),
            Span::raw(": next  "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(": toggle  "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(": submit  "),
            Span::styled("Ctrl+R", Style::default().fg(Color::Cyan)),
            Span::raw(": reset  "),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::raw(": quit"),
        ]),
    };
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// Horizontally center a column of at most `width` cells
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
