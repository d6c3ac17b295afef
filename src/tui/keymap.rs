//! # Key Bindings
//!
//! Maps key presses to navigator commands. Defaults are built in; the
//! `[keys]` config section replaces the key list of any command it names:
//!
//! ```toml
//! [keys]
//! quit = ["q", "ctrl+c"]
//! navigate = ["/", "s"]
//! ```
//!
//! Keys are written as `[ctrl+|alt+]<key>`, where `<key>` is a single
//! character or one of `up down left right enter esc tab backspace delete
//! home end pageup pagedown space`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Up,
    Down,
    Back,
    Advance,
    Navigate,
    Help,
    Quit,
    ToggleTimeView,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Up,
        Command::Down,
        Command::Back,
        Command::Advance,
        Command::Navigate,
        Command::Help,
        Command::Quit,
        Command::ToggleTimeView,
    ];

    /// Name used in the `[keys]` config section.
    pub fn name(self) -> &'static str {
        match self {
            Command::Up => "up",
            Command::Down => "down",
            Command::Back => "back",
            Command::Advance => "advance",
            Command::Navigate => "navigate",
            Command::Help => "help",
            Command::Quit => "quit",
            Command::ToggleTimeView => "toggle_time_view",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Short description for the help bar.
    pub fn description(self) -> &'static str {
        match self {
            Command::Up => "move up",
            Command::Down => "move down",
            Command::Back => "go out",
            Command::Advance => "go in",
            Command::Navigate => "navigate",
            Command::Help => "toggle help",
            Command::Quit => "quit",
            Command::ToggleTimeView => "toggle time view (absolute / relative)",
        }
    }

    fn default_keys(self) -> &'static [&'static str] {
        match self {
            Command::Up => &["up", "k"],
            Command::Down => &["down", "j"],
            Command::Back => &["left", "h"],
            Command::Advance => &["right", "l", "enter"],
            Command::Navigate => &["s"],
            Command::Help => &["?"],
            Command::Quit => &["q", "esc", "ctrl+c"],
            Command::ToggleTimeView => &["t"],
        }
    }

    /// The core action this command sends. Scrolling inside the file view
    /// is handled by the TUI before this is consulted.
    pub fn action(self) -> Action {
        match self {
            Command::Up => Action::CursorUp,
            Command::Down => Action::CursorDown,
            Command::Back => Action::Back,
            Command::Advance => Action::Advance,
            Command::Navigate => Action::OpenNavigator,
            Command::Help => Action::ToggleHelp,
            Command::Quit => Action::Quit,
            Command::ToggleTimeView => Action::ToggleTimeView,
        }
    }
}

/// A key with the modifiers that matter for matching. Shift is folded into
/// the character itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code,
            modifiers: modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT),
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// A plain character, which the navigator input takes as text.
    pub fn as_text(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.is_empty() => Some(c),
            _ => None,
        }
    }

    pub fn parse(spec: &str) -> Result<Self, String> {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = spec.trim();
        loop {
            if let Some(r) = rest.strip_prefix("ctrl+") {
                modifiers |= KeyModifiers::CONTROL;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("alt+") {
                modifiers |= KeyModifiers::ALT;
                rest = r;
            } else {
                break;
            }
        }

        let code = match rest {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(format!("unrecognized key {spec:?}")),
                }
            }
        };
        Ok(Self::new(code, modifiers))
    }
}

impl From<KeyEvent> for KeyPress {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        match self.code {
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::Left => f.write_str("←"),
            KeyCode::Right => f.write_str("→"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Command bindings, in `Command::ALL` order.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(Command, Vec<KeyPress>)>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_overrides(&BTreeMap::new())
    }
}

impl Keymap {
    /// Builds the keymap from `[keys]` overrides. Unknown commands and
    /// unparseable keys are logged and skipped; a command whose override
    /// parses to nothing keeps its defaults.
    pub fn from_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Self {
        for name in overrides.keys() {
            if Command::from_name(name).is_none() {
                warn!("Ignoring key binding for unknown command {name:?}");
            }
        }

        let bindings = Command::ALL
            .into_iter()
            .map(|command| {
                let parsed: Vec<KeyPress> = overrides
                    .get(command.name())
                    .map(|keys| {
                        keys.iter()
                            .filter_map(|k| match KeyPress::parse(k) {
                                Ok(key) => Some(key),
                                Err(e) => {
                                    warn!("Ignoring binding for {}: {e}", command.name());
                                    None
                                }
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                let keys = if parsed.is_empty() {
                    command
                        .default_keys()
                        .iter()
                        .filter_map(|k| KeyPress::parse(k).ok())
                        .collect()
                } else {
                    parsed
                };
                (command, keys)
            })
            .collect();
        Self { bindings }
    }

    /// First command bound to `key`.
    pub fn command_for(&self, key: &KeyPress) -> Option<Command> {
        self.bindings
            .iter()
            .find(|(_, keys)| keys.contains(key))
            .map(|(command, _)| *command)
    }

    pub fn keys(&self, command: Command) -> &[KeyPress] {
        self.bindings
            .iter()
            .find(|(c, _)| *c == command)
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or_default()
    }

    /// Help label: the bound keys joined with `/`. Quit shows only its first key.
    pub fn label(&self, command: Command) -> String {
        let keys = self.keys(command);
        let shown = if command == Command::Quit { &keys[..keys.len().min(1)] } else { keys };
        shown
            .iter()
            .map(KeyPress::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }
}
