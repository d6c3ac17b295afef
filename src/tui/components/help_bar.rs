//! # HelpBar Component
//!
//! Key hints for the current state. Short help is one line; full help
//! (toggled with the help key) adds a second line of global commands.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{App, NavState};
use crate::tui::component::Component;
use crate::tui::keymap::{Command, Keymap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub keys: String,
    pub description: &'static str,
}

impl HelpEntry {
    fn command(keymap: &Keymap, command: Command) -> Self {
        Self {
            keys: keymap.label(command),
            description: command.description(),
        }
    }
}

/// Commands offered in the current state.
pub fn short_help(app: &App, keymap: &Keymap) -> Vec<HelpEntry> {
    use Command::*;

    let commands: Vec<Command> = match app.state {
        NavState::Navigating => {
            return vec![HelpEntry {
                keys: "enter".to_string(),
                description: "navigate",
            }];
        }
        // Nothing to go out of at the top level
        NavState::BrowsingModules => {
            let mut commands = vec![Up, Down];
            if !app.modules.is_empty() {
                commands.push(Advance);
            }
            commands.extend([ToggleTimeView, Help]);
            commands
        }
        NavState::BrowsingCommits => {
            let mut commands = vec![Up, Down, Back];
            if !app.commits.is_empty() {
                commands.push(Advance);
            }
            commands.extend([ToggleTimeView, Help]);
            commands
        }
        NavState::BrowsingCommitContents => {
            let mut commands = vec![Up, Down, Back];
            if !app.files.is_empty() {
                commands.push(Advance);
            }
            commands.extend([ToggleTimeView, Help]);
            commands
        }
        NavState::BrowsingCommitFile => vec![Up, Down, Back, Help],
        NavState::Errored(_) => vec![Quit],
        _ => vec![Navigate, Quit],
    };
    commands
        .into_iter()
        .map(|c| HelpEntry::command(keymap, c))
        .collect()
}

/// Short help plus the global commands.
pub fn full_help(app: &App, keymap: &Keymap) -> Vec<Vec<HelpEntry>> {
    let global = [Command::Navigate, Command::ToggleTimeView, Command::Help, Command::Quit]
        .into_iter()
        .map(|c| HelpEntry::command(keymap, c))
        .collect();
    vec![short_help(app, keymap), global]
}

pub struct HelpBar {
    pub lines: Vec<Vec<HelpEntry>>,
    pub style: Style,
}

impl HelpBar {
    pub fn new(app: &App, keymap: &Keymap, style: Style) -> Self {
        let lines = if app.display.show_help && app.state.is_browsing() {
            full_help(app, keymap)
        } else {
            vec![short_help(app, keymap)]
        };
        Self { lines, style }
    }

    pub fn height(&self) -> u16 {
        self.lines.len() as u16
    }
}

impl Component for HelpBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .lines
            .iter()
            .map(|entries| {
                let text = entries
                    .iter()
                    .map(|e| format!("{} {}", e.keys, e.description))
                    .collect::<Vec<_>>()
                    .join(" • ");
                Line::from(Span::styled(text, self.style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }
}
