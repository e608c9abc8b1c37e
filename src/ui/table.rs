//! Employee table: row construction, drawing and mouse hit testing.
//!
//! Rows are rebuilt from `AppState::records` on every frame. Column order is
//! fixed (id, name, department, salary, actions) and the action column is
//! always rightmost with `[Edit]` before `[Delete]`.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use std::rc::Rc;

use crate::api::Employee;
use crate::app::AppState;

pub const HEADERS: [&str; 5] = ["ID", "NAME", "DEPARTMENT", "SALARY", "ACTIONS"];
pub const EDIT_LABEL: &str = "[Edit]";
pub const DELETE_LABEL: &str = "[Delete]";
const ACTIONS_WIDTH: u16 = 15;
const COLUMN_SPACING: u16 = 1;

/// One drawn row. `id` is the only link back to the record it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub id: String,
    pub cells: [String; 4],
}

/// Which per-row control a click landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowControl {
    Edit,
    Delete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowHit {
    pub index: usize,
    pub control: Option<RowControl>,
}

pub fn table_rows(records: &[Employee]) -> Vec<TableRow> {
    records
        .iter()
        .map(|e| TableRow {
            id: e.employeeid.clone(),
            cells: [
                e.employeeid.clone(),
                e.name.clone(),
                e.department.clone(),
                e.salary.clone(),
            ],
        })
        .collect()
}

/// First record index of the page containing `selected`.
pub fn page_start(selected: usize, rows_per_page: usize) -> usize {
    let rpp = rows_per_page.max(1);
    (selected / rpp) * rpp
}

fn widths() -> [Constraint; 5] {
    [
        Constraint::Fill(15),
        Constraint::Fill(35),
        Constraint::Fill(30),
        Constraint::Fill(20),
        Constraint::Length(ACTIONS_WIDTH),
    ]
}

/// Column rectangles inside the table border, laid out the way `Table` lays them out.
fn columns(inner: Rect) -> Rc<[Rect]> {
    Layout::horizontal(widths())
        .flex(Flex::Legacy)
        .spacing(COLUMN_SPACING)
        .split(inner)
}

fn inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

pub fn draw_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    app.table_area = area;
    let body_height = inner(area).height.saturating_sub(1) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let rows = table_rows(&app.records);
    let start = page_start(app.selected_index, app.rows_per_page);
    let end = (start + app.rows_per_page).min(rows.len());
    let slice = rows.get(start..end).unwrap_or_default();

    let drawn = slice.iter().enumerate().map(|(i, row)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let mut cells: Vec<Cell> = row.cells.iter().map(|c| Cell::from(c.clone())).collect();
        cells.push(Cell::from(format!("{EDIT_LABEL} {DELETE_LABEL}")));
        Row::new(cells).style(style)
    });

    let header = Row::new(HEADERS.to_vec()).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );
    let title = format!("Employees ({})", app.records.len());
    let table = Table::new(drawn, widths())
        .header(header)
        .flex(Flex::Legacy)
        .column_spacing(COLUMN_SPACING)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );

    f.render_widget(table, area);
}

/// Map a screen position inside the table to a record index and, if the
/// click landed on one, the row control beneath it.
pub fn hit_test(area: Rect, page_start: usize, page_len: usize, x: u16, y: u16) -> Option<RowHit> {
    let inner = inner(area);
    let first_row_y = inner.y.saturating_add(1);
    if x < inner.x || x >= inner.right() || y < first_row_y || y >= inner.bottom() {
        return None;
    }
    let offset = (y - first_row_y) as usize;
    if offset >= page_len {
        return None;
    }

    let actions = columns(inner)[4];
    let control = if x >= actions.x && x < actions.right() {
        let edit_end = actions.x + EDIT_LABEL.len() as u16;
        let delete_start = edit_end + 1;
        let delete_end = delete_start + DELETE_LABEL.len() as u16;
        if x < edit_end {
            Some(RowControl::Edit)
        } else if x >= delete_start && x < delete_end {
            Some(RowControl::Delete)
        } else {
            None
        }
    } else {
        None
    };
    Some(RowHit { index: page_start + offset, control })
}
