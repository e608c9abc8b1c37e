//! Shared UI components (status bar, buttons, modal dialogs).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, Button, FormMode, InputMode, ModalState, Theme};

/// Render the bottom status bar with mode, counts and requests in flight.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Form => "FORM",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let form = match app.form_mode {
        FormMode::Create => "create",
        FormMode::Edit => "edit",
    };
    let busy = if app.pending.is_empty() {
        String::new()
    } else {
        format!("  working… ({} in flight)", app.pending.len())
    };
    let msg = format!(
        "mode: {mode}  form: {form}  rows: {}  rows/page: {}{busy}",
        app.records.len(),
        app.rows_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Lay out `[Label]` buttons left to right on the first row of `area`.
///
/// Disabled buttons are dimmed and left out of the returned hit areas.
pub fn button_line(
    area: Rect,
    buttons: &[(Button, &'static str, bool)],
    theme: &Theme,
) -> (Line<'static>, Vec<(Rect, Button)>) {
    let mut spans = Vec::with_capacity(buttons.len() * 2);
    let mut hits = Vec::new();
    let mut x = area.x;
    for (i, (button, label, enabled)) in buttons.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
            x = x.saturating_add(1);
        }
        let width = label.chars().count() as u16;
        let style = if *enabled {
            Style::default().fg(theme.header_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted).add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(*label, style));
        if *enabled && x < area.right() {
            let visible = width.min(area.right() - x);
            hits.push((Rect::new(x, area.y, visible, 1), *button));
        }
        x = x.saturating_add(width);
    }
    (Line::from(spans), hits)
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render whichever modal is open.
pub fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.modal {
        Some(ModalState::Alert { message }) => render_alert_modal(f, area, app, message),
        Some(ModalState::ConfirmDelete { employeeid, yes_selected }) => {
            render_confirm_modal(f, area, app, employeeid, *yes_selected)
        }
        Some(ModalState::Help { scroll }) => render_help_modal(f, area, app, *scroll),
        None => {}
    }
}

fn render_alert_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    // Wrap long server messages instead of truncating them
    let max_w = area.width.saturating_sub(6).max(30);
    let width = 60u16.min(max_w);
    let approx_lines = (message.chars().count() as u16 / width.saturating_sub(4).max(10)).max(1);
    let max_h = area.height.saturating_sub(4).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(width, height, area);
    let lines = vec![
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::from(Span::styled(
            "Enter / Esc to close",
            Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
        )),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Alert")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn render_confirm_modal(f: &mut Frame, area: Rect, app: &AppState, employeeid: &str, yes_selected: bool) {
    let rect = centered_rect(44, 7, area);
    let yes = if yes_selected { "[Yes]" } else { " Yes " };
    let no = if yes_selected { " No " } else { "[No]" };
    let body = format!("Delete employee {employeeid}?\n\n      {yes}    {no}");
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal with the keys currently bound to each action.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let entry = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {label:<22}")),
            Span::styled(keys, italic),
        ])
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Table", bold))];
    for (label, action) in [
        ("Move up / down", KeyAction::MoveUp),
        ("", KeyAction::MoveDown),
        ("Page up / down", KeyAction::PageUp),
        ("", KeyAction::PageDown),
        ("Edit selected row", KeyAction::EditRow),
        ("Delete selected row", KeyAction::DeleteRow),
        ("View all", KeyAction::ViewAll),
        ("Search again", KeyAction::Search),
        ("Search box", KeyAction::FocusSearch),
        ("Focus form", KeyAction::FocusForm),
        ("Save (create mode)", KeyAction::Save),
        ("Update (edit mode)", KeyAction::Update),
        ("Reset form", KeyAction::ResetForm),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ] {
        let keys = app.keymap.keys_for(action).join(", ");
        if label.is_empty() {
            if let Some(prev) = lines.last_mut() {
                prev.spans.push(Span::styled(format!(" / {keys}"), italic));
            }
        } else {
            lines.push(entry(label, keys));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Form", bold)));
    lines.push(entry("Next / previous field", "Tab, Down / BackTab, Up".into()));
    lines.push(entry("Save or update", "Enter".into()));
    lines.push(entry("Reset form", "Ctrl+r".into()));
    lines.push(entry("Back to table", "Esc".into()));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Mouse", bold)));
    lines.push(entry("Row controls", "click [Edit] / [Delete]".into()));
    lines.push(entry("Buttons", "click [Save] [Update] [Reset] [Search] [View All]".into()));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
