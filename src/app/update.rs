use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::api::EmployeeClient;
use crate::api::transport::{Dispatcher, ReqwestTransport};
use crate::app::keymap::{KeyAction, Keymap, format_action};
use crate::app::{AppState, Button, FormMode, InputMode, ModalState, Theme, actions};
use crate::config::Config;
use crate::ui;
use crate::ui::table::{RowControl, hit_test};

/// Whether the event loop should keep going after an input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: &Config,
) -> Result<()> {
    let client = EmployeeClient::new(&config.base_url)?;
    let dispatcher = Dispatcher::new(Arc::new(ReqwestTransport::new()?));
    let mut app = AppState::new(
        client,
        Theme::load(config.theme.as_deref()),
        Keymap::load(config.keymap.as_deref()),
    );
    info!(base_url = app.client.base_url(), "employee-tui started");

    if config.autoload {
        actions::view_all(&mut app);
    }

    loop {
        for pending in app.take_outbox() {
            dispatcher.dispatch(pending);
        }
        for completion in dispatcher.drain() {
            actions::complete(&mut app, completion);
        }
        app.expire_badge(Instant::now());

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(&mut app, key) == Flow::Quit {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                _ => {}
            }
        }
    }

    info!(in_flight = app.pending.len(), "employee-tui exiting");
    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Form => handle_form_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    debug!(action = format_action(action), "key action");
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::FocusForm => app.focus_form(),
        KeyAction::FocusSearch => app.input_mode = InputMode::Search,
        KeyAction::Save => actions::save(app),
        KeyAction::Update => actions::update(app),
        KeyAction::ResetForm => actions::reset(app),
        KeyAction::ViewAll => actions::view_all(app),
        KeyAction::Search => actions::search(app),
        KeyAction::EditRow => {
            if let Some(id) = app.selected_record().map(|e| e.employeeid.clone()) {
                actions::edit_row(app, &id);
            }
        }
        KeyAction::DeleteRow => {
            if let Some(id) = app.selected_record().map(|e| e.employeeid.clone()) {
                actions::request_delete(app, &id);
            }
        }
        KeyAction::MoveUp => {
            app.selected_index = app.selected_index.saturating_sub(1);
        }
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.records.len() {
                app.selected_index += 1;
            }
        }
        KeyAction::PageUp => {
            app.selected_index = app.selected_index.saturating_sub(app.rows_per_page.max(1));
        }
        KeyAction::PageDown => {
            let next = app.selected_index.saturating_add(app.rows_per_page.max(1));
            app.selected_index = next.min(app.records.len().saturating_sub(1));
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Tab | KeyCode::Down => app.cycle_focus(1),
        KeyCode::BackTab | KeyCode::Up => app.cycle_focus(-1),
        KeyCode::Enter => match app.form_mode {
            FormMode::Create => actions::save(app),
            FormMode::Edit => actions::update(app),
        },
        KeyCode::Char('r') if ctrl => actions::reset(app),
        KeyCode::Backspace => {
            if let Some(value) = app.field_mut(app.form_focus) {
                value.pop();
            }
        }
        KeyCode::Char(c) if !ctrl => {
            if let Some(value) = app.field_mut(app.form_focus) {
                value.push(c);
            }
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            actions::search(app);
        }
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_query.push(c);
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Alert { .. }) => {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                app.close_modal();
            }
        }
        Some(ModalState::ConfirmDelete { yes_selected, .. }) => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *yes_selected = !*yes_selected;
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => actions::confirm_delete(app),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => actions::cancel_delete(app),
            KeyCode::Enter => {
                if *yes_selected {
                    actions::confirm_delete(app);
                } else {
                    actions::cancel_delete(app);
                }
            }
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_modal()
            }
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}

pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    if app.modal.is_some() {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => click(app, mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.selected_index = app.selected_index.saturating_sub(1),
        MouseEventKind::ScrollDown => {
            if app.selected_index + 1 < app.records.len() {
                app.selected_index += 1;
            }
        }
        _ => {}
    }
}

fn click(app: &mut AppState, x: u16, y: u16) {
    let pos = Rect::new(x, y, 1, 1);
    if let Some(button) = app.buttons.iter().find(|(r, _)| r.intersects(pos)).map(|(_, b)| *b) {
        debug!(?button, "button clicked");
        match button {
            Button::Save => actions::save(app),
            Button::Update => actions::update(app),
            Button::Reset => actions::reset(app),
            Button::Search => actions::search(app),
            Button::ViewAll => actions::view_all(app),
        }
        return;
    }

    let page_start = ui::table::page_start(app.selected_index, app.rows_per_page);
    let page_len = app.records.len().saturating_sub(page_start).min(app.rows_per_page);
    let Some(hit) = hit_test(app.table_area, page_start, page_len, x, y) else {
        return;
    };
    app.selected_index = hit.index;
    let Some(id) = app.records.get(hit.index).map(|e| e.employeeid.clone()) else {
        return;
    };
    match hit.control {
        Some(RowControl::Edit) => actions::edit_row(app, &id),
        Some(RowControl::Delete) => actions::request_delete(app, &id),
        None => {}
    }
}
