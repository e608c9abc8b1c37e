//! Employee form panel.
//!
//! Create mode shows `[Save]`, Edit mode shows `[Update]` and a locked
//! identifier. `[Reset]` is always available.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::components::button_line;
use crate::app::{ActionKind, AppState, Button, FormField, FormMode, InputMode};

/// Buttons for the current form mode, with whether each one accepts clicks.
pub fn form_buttons(app: &AppState) -> Vec<(Button, &'static str, bool)> {
    let submit = match app.form_mode {
        FormMode::Create => (Button::Save, "[Save]", !app.is_busy(ActionKind::Create)),
        FormMode::Edit => (Button::Update, "[Update]", !app.is_busy(ActionKind::Update)),
    };
    vec![submit, (Button::Reset, "[Reset]", true)]
}

pub fn render_form(f: &mut Frame, area: Rect, app: &mut AppState) {
    let focused = app.input_mode == InputMode::Form;
    let title = match app.form_mode {
        FormMode::Create => "New employee".to_string(),
        FormMode::Edit => format!("Edit employee {}", app.form.employeeid),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { app.theme.title } else { app.theme.border }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FormField::ALL.len() as u16),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let label_style = Style::default().fg(app.theme.muted);
    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let active = focused && app.form_focus == field;
            let marker = if active { "▶ " } else { "  " };
            let value = app.field_value(field).to_string();
            let value_span = if !app.field_enabled(field) {
                Span::styled(
                    format!("{value} (locked)"),
                    Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
                )
            } else if active {
                Span::styled(
                    format!("{value}_"),
                    Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(value, Style::default().fg(app.theme.text))
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(app.theme.highlight_fg)),
                Span::styled(format!("{:<12}", format!("{}:", field.label())), label_style),
                value_span,
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), rows[0]);

    let buttons = form_buttons(app);
    let button_area = Rect { x: rows[2].x + 2, width: rows[2].width.saturating_sub(2), ..rows[2] };
    let (line, hits) = button_line(button_area, &buttons, &app.theme);
    f.render_widget(Paragraph::new(line), button_area);
    app.buttons.extend(hits);

    if let Some(badge) = &app.badge {
        let p = Paragraph::new(Line::from(Span::styled(
            format!(" {} ", badge.message),
            Style::default()
                .fg(app.theme.badge_fg)
                .bg(app.theme.badge_bg)
                .add_modifier(Modifier::BOLD),
        )));
        let badge_area = Rect { x: rows[4].x + 2, width: rows[4].width.saturating_sub(2), ..rows[4] };
        f.render_widget(p, badge_area);
    }
}
