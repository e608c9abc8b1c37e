//! Keybinding configuration: defaults, `Action = Key` overrides from a file,
//! and resolution of key presses to semantic actions in Normal mode.
//!
//! Form, search and modal input are handled directly by the event loop; only
//! table-level commands go through the keymap.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::Path;

/// Semantic actions available from the employee table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Show the key reference.
    OpenHelp,
    /// Move input focus into the employee form.
    FocusForm,
    /// Start typing into the search box.
    FocusSearch,
    /// Create the record described by the form.
    Save,
    /// Send the form's changes for the record being edited.
    Update,
    /// Clear the form and return to Create mode.
    ResetForm,
    /// Reload every record.
    ViewAll,
    /// Reload records matching the search box.
    Search,
    /// Load the selected row into the form.
    EditRow,
    /// Ask to delete the selected row.
    DeleteRow,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Bound but does nothing.
    Ignore,
}

const ACTIONS: [(KeyAction, &str); 16] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::FocusForm, "FocusForm"),
    (KeyAction::FocusSearch, "FocusSearch"),
    (KeyAction::Save, "Save"),
    (KeyAction::Update, "Update"),
    (KeyAction::ResetForm, "ResetForm"),
    (KeyAction::ViewAll, "ViewAll"),
    (KeyAction::Search, "Search"),
    (KeyAction::EditRow, "EditRow"),
    (KeyAction::DeleteRow, "DeleteRow"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PageUp, "PageUp"),
    (KeyAction::PageDown, "PageDown"),
    (KeyAction::Ignore, "Ignore"),
];

/// Mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Default bindings: arrows and vim keys for movement, single letters for commands.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Tab), KeyAction::FocusForm);
        bindings.insert((M::NONE, Char('i')), KeyAction::FocusForm);
        bindings.insert((M::NONE, Char('/')), KeyAction::FocusSearch);
        bindings.insert((M::NONE, Char('s')), KeyAction::Save);
        bindings.insert((M::NONE, Char('u')), KeyAction::Update);
        bindings.insert((M::NONE, Char('r')), KeyAction::ResetForm);
        bindings.insert((M::NONE, Char('a')), KeyAction::ViewAll);
        bindings.insert((M::NONE, Char('S')), KeyAction::Search);
        bindings.insert((M::SHIFT, Char('S')), KeyAction::Search);
        bindings.insert((M::NONE, Enter), KeyAction::EditRow);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditRow);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteRow);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteRow);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        Self { bindings }
    }

    /// Defaults, overridden from `path` when one is given and readable.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::from_file(p).unwrap_or_else(|| {
                tracing::warn!(path = %p.display(), "keymap file unreadable, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Start from defaults and apply every `Action = KeySpec` line.
    /// `KeySpec = Action` is accepted too; anything unparseable is skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted, for the help dialog.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key (modifiers + code) like "Ctrl+s" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTIONS.iter().find(|(_, name)| *name == s).map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTIONS
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}
