//! Application state types and entry glue.
//!
//! `AppState` is the single UI state object every handler receives: form mode
//! and values, the last fetched record set, the selected row, modal and badge,
//! and the bookkeeping for requests still in flight.
//!
pub mod actions;
pub mod keymap;
pub mod update;

use ratatui::layout::Rect;
use ratatui::style::Color;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::api::transport::PendingRequest;
use crate::api::{Employee, EmployeeClient, HttpRequest};
use crate::validate::EmployeeForm;
use keymap::Keymap;

/// How long a success badge stays on screen.
pub const BADGE_DURATION: Duration = Duration::from_millis(1800);

/// The two mutually exclusive states of the employee form.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    /// Identifier editable, `[Save]` shown.
    Create,
    /// Identifier locked to the selected record, `[Update]` shown.
    Edit,
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    Search,
    Modal,
}

/// Form inputs, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    EmployeeId,
    Name,
    Department,
    Salary,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::EmployeeId,
        FormField::Name,
        FormField::Department,
        FormField::Salary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::EmployeeId => "Employee ID",
            FormField::Name => "Name",
            FormField::Department => "Department",
            FormField::Salary => "Salary",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Network operations, used to refuse a second trigger while one is running.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Load,
    Create,
    Update,
    Delete,
}

/// Clickable controls outside the table rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Save,
    Update,
    Reset,
    Search,
    ViewAll,
}

/// Blocking dialogs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Alert { message: String },
    ConfirmDelete { employeeid: String, yes_selected: bool },
    Help { scroll: u16 },
}

/// Transient acknowledgment shown after a successful write.
#[derive(Clone, Debug)]
pub struct Badge {
    pub message: String,
    pub shown_at: Instant,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub badge_fg: Color,
    pub badge_bg: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            badge_fg: Color::Rgb(0x1e, 0x1e, 0x2e),     // base
            badge_bg: Color::Rgb(0xa6, 0xe3, 0xa1),     // green
        }
    }

    /// Load from a key=value file when a path is given; fall back to `mocha`.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::from_file(p).unwrap_or_else(|| {
                tracing::warn!(path = %p.display(), "theme file unreadable, using defaults");
                Self::mocha()
            }),
            None => Self::mocha(),
        }
    }

    /// Parse a key=value theme file. Unknown keys and bad colors are skipped.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key.trim() {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "badge_fg" => theme.badge_fg = color,
                "badge_bg" => theme.badge_bg = color,
                _ => {}
            }
        }
        theme
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

pub struct AppState {
    pub client: EmployeeClient,
    pub records: Vec<Employee>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub form: EmployeeForm,
    pub form_mode: FormMode,
    pub form_focus: FormField,
    pub input_mode: InputMode,
    pub mode_before_modal: InputMode,
    pub search_query: String,
    pub modal: Option<ModalState>,
    /// Dialogs raised while another one was on screen, shown in order.
    pub queued_modals: VecDeque<ModalState>,
    pub badge: Option<Badge>,
    pub theme: Theme,
    pub keymap: Keymap,
    /// Tickets of requests still in flight.
    pub pending: HashMap<u64, ActionKind>,
    /// Requests built by handlers and not yet handed to the dispatcher.
    pub outbox: Vec<PendingRequest>,
    /// Last drawn table area, for mouse hit testing.
    pub table_area: Rect,
    /// Last drawn button positions, for mouse hit testing.
    pub buttons: Vec<(Rect, Button)>,
    next_ticket: u64,
}

impl AppState {
    pub fn new(client: EmployeeClient, theme: Theme, keymap: Keymap) -> Self {
        Self {
            client,
            records: Vec::new(),
            selected_index: 0,
            rows_per_page: 10,
            form: EmployeeForm::default(),
            form_mode: FormMode::Create,
            form_focus: FormField::EmployeeId,
            input_mode: InputMode::Normal,
            mode_before_modal: InputMode::Normal,
            search_query: String::new(),
            modal: None,
            queued_modals: VecDeque::new(),
            badge: None,
            theme,
            keymap,
            pending: HashMap::new(),
            outbox: Vec::new(),
            table_area: Rect::default(),
            buttons: Vec::new(),
            next_ticket: 1,
        }
    }

    /// State with the default theme and keymap.
    pub fn with_client(client: EmployeeClient) -> Self {
        Self::new(client, Theme::mocha(), Keymap::default())
    }

    pub fn record(&self, employeeid: &str) -> Option<&Employee> {
        self.records.iter().find(|e| e.employeeid == employeeid)
    }

    pub fn selected_record(&self) -> Option<&Employee> {
        self.records.get(self.selected_index)
    }

    /// Replace the record set after a load, keeping the selection in range.
    pub fn set_records(&mut self, records: Vec<Employee>) {
        self.records = records;
        self.selected_index = self.selected_index.min(self.records.len().saturating_sub(1));
    }

    pub fn is_busy(&self, kind: ActionKind) -> bool {
        self.pending.values().any(|k| *k == kind)
    }

    /// Queue a request for the dispatcher and remember what it was for.
    pub fn enqueue(&mut self, kind: ActionKind, request: HttpRequest) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending.insert(ticket, kind);
        self.outbox.push(PendingRequest { ticket, request });
        ticket
    }

    pub fn take_outbox(&mut self) -> Vec<PendingRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn show_badge(&mut self, message: impl Into<String>) {
        self.badge = Some(Badge {
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    pub fn expire_badge(&mut self, now: Instant) {
        if let Some(b) = &self.badge {
            if now.saturating_duration_since(b.shown_at) >= BADGE_DURATION {
                self.badge = None;
            }
        }
    }

    /// Show `modal`, or queue it behind the one already on screen.
    pub fn open_modal(&mut self, modal: ModalState) {
        if self.modal.is_some() {
            self.queued_modals.push_back(modal);
            return;
        }
        if self.input_mode != InputMode::Modal {
            self.mode_before_modal = self.input_mode;
        }
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    /// Dismiss the current dialog; the next queued one, if any, takes its place.
    pub fn close_modal(&mut self) {
        self.modal = self.queued_modals.pop_front();
        if self.modal.is_none() {
            self.input_mode = self.mode_before_modal;
        }
    }

    /// Blocking notification; the user must dismiss it.
    pub fn alert(&mut self, message: impl Into<String>) {
        self.open_modal(ModalState::Alert { message: message.into() });
    }

    /// Back to Create mode with every field empty.
    pub fn reset_form(&mut self) {
        self.form.clear();
        self.form_mode = FormMode::Create;
        self.form_focus = FormField::EmployeeId;
    }

    /// The identifier is locked while editing.
    pub fn field_enabled(&self, field: FormField) -> bool {
        !(field == FormField::EmployeeId && self.form_mode == FormMode::Edit)
    }

    pub fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::EmployeeId => &self.form.employeeid,
            FormField::Name => &self.form.name,
            FormField::Department => &self.form.department,
            FormField::Salary => &self.form.salary,
        }
    }

    /// Mutable access to an enabled field; `None` for the locked identifier.
    pub fn field_mut(&mut self, field: FormField) -> Option<&mut String> {
        if !self.field_enabled(field) {
            return None;
        }
        Some(match field {
            FormField::EmployeeId => &mut self.form.employeeid,
            FormField::Name => &mut self.form.name,
            FormField::Department => &mut self.form.department,
            FormField::Salary => &mut self.form.salary,
        })
    }

    /// Move focus forward (`step = 1`) or back (`step = -1`), skipping locked fields.
    pub fn cycle_focus(&mut self, step: isize) {
        let n = FormField::ALL.len() as isize;
        let mut idx = self.form_focus.index() as isize;
        for _ in 0..n {
            idx = (idx + step).rem_euclid(n);
            let field = FormField::ALL[idx as usize];
            if self.field_enabled(field) {
                self.form_focus = field;
                return;
            }
        }
    }

    pub fn focus_form(&mut self) {
        if !self.field_enabled(self.form_focus) {
            self.cycle_focus(1);
        }
        self.input_mode = InputMode::Form;
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
