pub mod components;
pub mod form;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ActionKind, AppState, Button, InputMode};

/// Draw one frame. Button hit areas are recorded on `app` as they are drawn.
pub fn render(f: &mut Frame, app: &mut AppState) {
    app.buttons.clear();

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(root[2]);

    render_header(f, root[0], app);
    render_search_bar(f, root[1], app);
    table::draw_table(f, body[0], app);
    form::render_form(f, body[1], app);
    components::render_status_bar(f, root[3], app);

    if app.modal.is_some() {
        components::render_modal(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new(format!(
        "{}  /: search  Tab: form  a: view all  e: edit  d: delete  ?: help  q: quit",
        app.client.base_url()
    ))
    .block(
        Block::default()
            .title("employee-tui")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_search_bar(f: &mut Frame, area: Rect, app: &mut AppState) {
    let active = app.input_mode == InputMode::Search;
    let border = if active { app.theme.title } else { app.theme.border };
    let block = Block::default()
        .title("Search")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let loading = app.is_busy(ActionKind::Load);
    let labels: [(Button, &'static str, bool); 2] = [
        (Button::Search, "[Search]", !loading),
        (Button::ViewAll, "[View All]", !loading),
    ];
    let buttons_width = labels.iter().map(|(_, l, _)| l.len() as u16 + 1).sum::<u16>();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(8), Constraint::Length(buttons_width)])
        .split(inner);

    let cursor = if active { "_" } else { "" };
    let query = Line::from(vec![
        Span::styled("> ", Style::default().fg(app.theme.muted)),
        Span::styled(
            format!("{}{cursor}", app.search_query),
            Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(query), cols[0]);

    let button_area = Rect { x: cols[1].x + 1, width: cols[1].width.saturating_sub(1), ..cols[1] };
    let (line, hits) = components::button_line(button_area, &labels, &app.theme);
    f.render_widget(Paragraph::new(line), button_area);
    app.buttons.extend(hits);
}
