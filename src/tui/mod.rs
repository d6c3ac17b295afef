//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One thread owns `App`. Each pass it draws (when something changed),
//! drains terminal input, then drains fetch completions from the channel.
//! Every message goes through `update()` one at a time, and any
//! `Effect::Fetch` it returns is spawned onto the tokio runtime.
//!
//! - **Loading**: redraws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms and only redraws on input or completions.

mod component;
mod components;
mod event;
pub mod highlight;
pub mod keymap;
pub mod theme;
mod ui;

use log::{info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode};
use crossterm::execute;
use ratatui::text::Text;
use ratatui::widgets::TableState;
use ratatui::{TerminalOptions, Viewport};
use tui_scrollview::ScrollViewState;

use crate::core::action::{Action, Effect, init, update};
use crate::core::config::ResolvedConfig;
use crate::core::locator::Locator;
use crate::core::state::{App, NavState};
use crate::registry::types::File;
use crate::registry::{FetchError, Registry, command};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputEvent, NavigateInput};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::keymap::{Command, Keymap};
use crate::tui::theme::Theme;

/// Rows used by the inline viewport when not in fullscreen mode.
const INLINE_HEIGHT: u16 = 24;

/// Highlighted text of one commit file, kept until the selection moves.
pub struct HighlightedFile {
    commit: String,
    path: String,
    pub text: Text<'static>,
}

/// TUI-specific presentation state (not part of core navigation logic)
pub struct TuiState {
    pub input: NavigateInput,
    pub table: TableState,
    pub file_scroll: ScrollViewState,
    pub highlighted: Option<HighlightedFile>,
    pub keymap: Keymap,
    pub theme: Theme,
}

impl TuiState {
    pub fn new(keymap: Keymap, theme: Theme) -> Self {
        Self {
            input: NavigateInput::new(theme.input()),
            table: TableState::default(),
            file_scroll: ScrollViewState::default(),
            highlighted: None,
            keymap,
            theme,
        }
    }

    /// Highlights `file` unless it is already the cached one. A new file
    /// starts scrolled to the top.
    pub fn highlight(&mut self, commit: &str, file: &File) {
        let cached = self
            .highlighted
            .as_ref()
            .is_some_and(|h| h.commit == commit && h.path == file.path);
        if cached {
            return;
        }
        self.file_scroll = ScrollViewState::default();
        self.highlighted = Some(HighlightedFile {
            commit: commit.to_string(),
            path: file.path.clone(),
            text: highlight::highlight(&file.path, &file.content, ratatui::style::Color::Reset),
        });
    }

    /// Runs `action` through `update`. The navigator text survives a
    /// rejected submit so it can be corrected in place.
    fn apply_action(&mut self, app: &mut App, action: Action) -> Effect {
        let submitted = matches!(action, Action::Submit(_));
        let effect = update(app, action);
        if submitted && app.state != NavState::Navigating {
            self.input.clear();
        }
        effect
    }

    /// Turns a terminal event into a core action, handling anything that is
    /// purely presentational (typing, file scrolling) along the way.
    fn route(&mut self, app: &App, event: &TuiEvent) -> Option<Action> {
        let key = match event {
            TuiEvent::Resize => return None,
            TuiEvent::Key(key) => Some(*key),
            TuiEvent::Paste(_) => None,
        };

        if app.state == NavState::Navigating {
            // Plain characters are text here, so only non-character quit keys apply
            if let Some(key) = key
                && key.as_text().is_none()
                && self.keymap.command_for(&key) == Some(Command::Quit)
            {
                return Some(Action::Quit);
            }
            return match self.input.handle_event(event) {
                Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
                _ => None,
            };
        }

        let key = key?;
        if app.state == NavState::BrowsingCommitFile {
            match (key.code, self.keymap.command_for(&key)) {
                (KeyCode::PageUp, _) => self.file_scroll.scroll_page_up(),
                (KeyCode::PageDown, _) => self.file_scroll.scroll_page_down(),
                (_, Some(Command::Up)) => self.file_scroll.scroll_up(),
                (_, Some(Command::Down)) => self.file_scroll.scroll_down(),
                (_, command) => return command.map(Command::action),
            }
            return None;
        }

        self.keymap.command_for(&key).map(Command::action)
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableBracketedPaste)?;
        info!("Terminal modes enabled (bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

/// Carries out one effect. Returns true when the loop should stop.
fn apply(
    effect: Effect,
    app: &App,
    registry: &Arc<dyn Registry>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::Fetch(fetch) => {
            command::spawn(registry.clone(), fetch, app.fetch_timeout, tx.clone());
            false
        }
    }
}

/// Runs the navigator until the user quits. Returns the error that ended
/// the session, if it ended in the errored state.
pub fn run(
    config: &ResolvedConfig,
    registry: Arc<dyn Registry>,
    startup: Option<Locator>,
) -> std::io::Result<Option<FetchError>> {
    let mut app = App::from_config(config, startup);
    let mut tui = TuiState::new(Keymap::from_overrides(&config.keys), Theme::default());

    let mut terminal = if config.fullscreen {
        ratatui::init()
    } else {
        ratatui::init_with_options(TerminalOptions {
            viewport: Viewport::Inline(INLINE_HEIGHT),
        })
    };
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for fetch completions
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;
    let mut should_quit = apply(init(&mut app), &app, &registry, &tx);

    while !should_quit {
        let animating = app.state.is_loading();
        if needs_redraw || animating {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame)) {
                ratatui::restore();
                return Err(e);
            }
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            if let Some(action) = tui.route(&app, &event) {
                let effect = tui.apply_action(&mut app, action);
                if apply(effect, &app, &registry, &tx) {
                    should_quit = true;
                    break;
                }
            }
        }

        // Fetch completions
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            let effect = update(&mut app, action);
            should_quit = apply(effect, &app, &registry, &tx);
        }
    }

    ratatui::restore();

    let fatal = app.fatal_error().cloned();
    match &fatal {
        Some(e) => warn!("Exiting after error: {}", e),
        None => info!("Exiting normally"),
    }
    Ok(fatal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use crossterm::event::KeyModifiers;
    use keymap::KeyPress;

    fn press(c: char) -> TuiEvent {
        TuiEvent::Key(KeyPress::char(c))
    }

    fn key(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyPress::new(code, KeyModifiers::NONE))
    }

    fn tui_state() -> TuiState {
        TuiState::new(Keymap::default(), Theme::default())
    }

    #[test]
    fn test_navigator_takes_command_keys_as_text() {
        let app = test_app();
        let mut tui = tui_state();
        for c in "qs?".chars() {
            assert!(tui.route(&app, &press(c)).is_none());
        }
        assert_eq!(tui.input.buffer, "qs?");
    }

    #[test]
    fn test_navigator_submit_and_quit() {
        let app = test_app();
        let mut tui = tui_state();
        for c in "bufbuild".chars() {
            tui.route(&app, &press(c));
        }
        assert!(matches!(
            tui.route(&app, &key(KeyCode::Enter)),
            Some(Action::Submit(text)) if text == "bufbuild"
        ));
        assert!(matches!(
            tui.route(&app, &key(KeyCode::Esc)),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_rejected_submit_keeps_navigator_text() {
        let mut app = test_app();
        let mut tui = tui_state();
        for c in "bufbuild/reg!stry".chars() {
            tui.route(&app, &press(c));
        }
        let action = tui.route(&app, &key(KeyCode::Enter)).unwrap();
        assert_eq!(tui.apply_action(&mut app, action), Effect::None);
        assert!(app.input_error.is_some());
        assert_eq!(tui.input.buffer, "bufbuild/reg!stry");

        tui.route(&app, &key(KeyCode::End));
        for _ in 0.."!stry".len() {
            tui.route(&app, &key(KeyCode::Backspace));
        }
        for c in "istry".chars() {
            tui.route(&app, &press(c));
        }
        let action = tui.route(&app, &key(KeyCode::Enter)).unwrap();
        assert!(matches!(tui.apply_action(&mut app, action), Effect::Fetch(_)));
        assert!(tui.input.buffer.is_empty());
    }

    #[test]
    fn test_browsing_keys_map_to_actions() {
        let mut app = test_app();
        app.state = NavState::BrowsingModules;
        let mut tui = tui_state();
        assert!(matches!(tui.route(&app, &press('j')), Some(Action::CursorDown)));
        assert!(matches!(tui.route(&app, &press('s')), Some(Action::OpenNavigator)));
        assert!(matches!(tui.route(&app, &press('t')), Some(Action::ToggleTimeView)));
        assert!(matches!(tui.route(&app, &press('q')), Some(Action::Quit)));
        assert!(tui.route(&app, &TuiEvent::Paste("x".into())).is_none());
    }

    #[test]
    fn test_file_view_scrolls_locally() {
        let mut app = test_app();
        app.state = NavState::BrowsingCommitFile;
        let mut tui = tui_state();
        assert!(tui.route(&app, &press('j')).is_none());
        assert!(tui.route(&app, &key(KeyCode::PageDown)).is_none());
        assert!(matches!(tui.route(&app, &press('h')), Some(Action::Back)));
    }

    #[test]
    fn test_highlight_cache_and_scroll_reset() {
        let mut tui = tui_state();
        let file = File {
            path: "buf.yaml".into(),
            content: b"version: v2\n".to_vec(),
        };
        tui.highlight("c1", &file);
        tui.file_scroll.scroll_down();
        tui.highlight("c1", &file);
        assert_eq!(tui.file_scroll.offset().y, 1);

        let other = File {
            path: "README.md".into(),
            content: b"# hi\n".to_vec(),
        };
        tui.highlight("c1", &other);
        assert_eq!(tui.file_scroll.offset().y, 0);
        assert_eq!(tui.highlighted.as_ref().unwrap().path, "README.md");
    }
}
