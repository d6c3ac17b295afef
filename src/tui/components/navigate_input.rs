//! # NavigateInput Component
//!
//! Single-line text field for an owner or `[remote/]owner/module[:ref]`.
//!
//! ## Responsibilities
//!
//! - Capture text input and paste (newlines dropped)
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit the text on Enter and clear the buffer
//!
//! The field scrolls horizontally so the cursor stays visible; the offset
//! is measured in display columns (`unicode-width`), not bytes.

use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PLACEHOLDER: &str = "bufbuild";
/// Left and right border.
const HORIZONTAL_OVERHEAD: u16 = 2;
pub const HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Submit(String),
    ContentChanged,
}

pub struct NavigateInput {
    pub buffer: String,
    /// Byte offset of the cursor, always on a char boundary.
    cursor: usize,
    /// First visible display column.
    scroll: usize,
    pub style: Style,
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map_or(pos, |c| pos + c.len_utf8())
}

impl NavigateInput {
    pub fn new(style: Style) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
            style,
        }
    }

    /// Empties the field once a submit has been accepted.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Keeps the cursor column inside a field `width` columns wide.
    fn update_scroll(&mut self, width: usize) {
        let column = self.buffer[..self.cursor].width();
        if column < self.scroll {
            self.scroll = column;
        } else if width > 0 && column >= self.scroll + width {
            self.scroll = column + 1 - width;
        }
    }

    /// The part of the buffer starting at the scroll column.
    fn visible_text(&self) -> &str {
        let mut column = 0;
        for (i, c) in self.buffer.char_indices() {
            if column >= self.scroll {
                return &self.buffer[i..];
            }
            column += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        }
        ""
    }
}

impl Component for NavigateInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        self.update_scroll(width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Navigate to owner or module");

        let line = if self.buffer.is_empty() {
            Line::from(Span::styled(
                PLACEHOLDER,
                self.style.add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(Span::styled(self.visible_text().to_owned(), self.style))
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        let column = self.buffer[..self.cursor].width() - self.scroll;
        let x = area.x + 1 + (column as u16).min(width as u16);
        frame.set_cursor_position((x, area.y + 1));
    }
}

impl EventHandler for NavigateInput {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Paste(text) => {
                let single_line: String = text.chars().filter(|c| !c.is_control()).collect();
                self.insert(&single_line);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Key(key) => {
                if let Some(c) = key.as_text() {
                    self.insert(c.encode_utf8(&mut [0; 4]));
                    return Some(InputEvent::ContentChanged);
                }
                if !key.modifiers.is_empty() {
                    return None;
                }
                match key.code {
                    KeyCode::Enter => {
                        if self.buffer.trim().is_empty() {
                            return None;
                        }
                        Some(InputEvent::Submit(self.buffer.clone()))
                    }
                    KeyCode::Backspace if self.cursor > 0 => {
                        let prev = prev_char_boundary(&self.buffer, self.cursor);
                        self.buffer.drain(prev..self.cursor);
                        self.cursor = prev;
                        Some(InputEvent::ContentChanged)
                    }
                    KeyCode::Delete if self.cursor < self.buffer.len() => {
                        let next = next_char_boundary(&self.buffer, self.cursor);
                        self.buffer.drain(self.cursor..next);
                        Some(InputEvent::ContentChanged)
                    }
                    KeyCode::Left if self.cursor > 0 => {
                        self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                        Some(InputEvent::ContentChanged)
                    }
                    KeyCode::Right if self.cursor < self.buffer.len() => {
                        self.cursor = next_char_boundary(&self.buffer, self.cursor);
                        Some(InputEvent::ContentChanged)
                    }
                    KeyCode::Home if self.cursor > 0 => {
                        self.cursor = 0;
                        Some(InputEvent::ContentChanged)
                    }
                    KeyCode::End if self.cursor < self.buffer.len() => {
                        self.cursor = self.buffer.len();
                        Some(InputEvent::ContentChanged)
                    }
                    _ => None,
                }
            }
            TuiEvent::Resize => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::keymap::KeyPress;
    use crossterm::event::KeyModifiers;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyPress::new(code, KeyModifiers::NONE))
    }

    fn type_text(input: &mut NavigateInput, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::Key(KeyPress::char(c)));
        }
    }

    #[test]
    fn test_typing_and_editing() {
        let mut input = NavigateInput::new(Style::default());
        type_text(&mut input, "bufbuld");
        input.handle_event(&key(KeyCode::Left));
        input.handle_event(&key(KeyCode::Left));
        type_text(&mut input, "i");
        assert_eq!(input.buffer, "bufbuild");

        input.handle_event(&key(KeyCode::End));
        assert_eq!(
            input.handle_event(&key(KeyCode::Backspace)),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "bufbuil");

        input.handle_event(&key(KeyCode::Home));
        input.handle_event(&key(KeyCode::Delete));
        assert_eq!(input.buffer, "ufbuil");
        assert_eq!(input.handle_event(&key(KeyCode::Left)), None);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = NavigateInput::new(Style::default());
        type_text(&mut input, "aé");
        input.handle_event(&key(KeyCode::Backspace));
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_submit_keeps_buffer_until_cleared() {
        let mut input = NavigateInput::new(Style::default());
        type_text(&mut input, "bufbuild/registry");
        assert_eq!(
            input.handle_event(&key(KeyCode::Enter)),
            Some(InputEvent::Submit("bufbuild/registry".into()))
        );
        assert_eq!(input.buffer, "bufbuild/registry");

        input.clear();
        assert!(input.buffer.is_empty());
        assert_eq!(input.handle_event(&key(KeyCode::Enter)), None);
        type_text(&mut input, "x");
        assert_eq!(input.buffer, "x");
    }

    #[test]
    fn test_paste_drops_newlines() {
        let mut input = NavigateInput::new(Style::default());
        input.handle_event(&TuiEvent::Paste("bufbuild/\nregistry\n".into()));
        assert_eq!(input.buffer, "bufbuild/registry");
    }

    #[test]
    fn test_modified_keys_are_not_text() {
        let mut input = NavigateInput::new(Style::default());
        let ctrl_c = TuiEvent::Key(KeyPress::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(input.handle_event(&ctrl_c), None);
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_long_input_scrolls_to_cursor() {
        let backend = TestBackend::new(12, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = NavigateInput::new(Style::default());
        type_text(&mut input, "bufbuild/protovalidate");

        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("validate"));
        assert!(!text.contains("bufbuild/"));
    }

    #[test]
    fn test_render_placeholder() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = NavigateInput::new(Style::default());
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains(PLACEHOLDER));
    }
}
