//! # FileView Component
//!
//! Scrollable, highlighted contents of the selected commit file. Gets a
//! border in the accent color while it has focus (`BrowsingCommitFile`).

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::Component;
use crate::tui::theme::Theme;

pub struct FileView<'a> {
    pub path: &'a str,
    pub text: &'a Text<'static>,
    pub focused: bool,
    pub theme: &'a Theme,
    pub state: &'a mut ScrollViewState,
}

impl Component for FileView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = if self.focused {
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(self.theme.focused_border())
                .title(self.path)
        } else {
            Block::bordered().border_style(self.theme.help()).title(self.path)
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = (self.text.width() as u16).max(inner.width.saturating_sub(1));
        let height = (self.text.height() as u16).max(1);

        let mut scroll_view = ScrollView::new(Size::new(width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(self.text.clone()),
            Rect::new(0, 0, width, height),
        );
        frame.render_stateful_widget(scroll_view, inner, self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::text::Line;

    fn draw(view: &mut FileView<'_>) -> String {
        let backend = TestBackend::new(40, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn renders_path_and_contents() {
        let text = Text::from(vec![Line::from("version: v2"), Line::from("deps: []")]);
        let theme = Theme::default();
        let mut state = ScrollViewState::default();
        let mut view = FileView {
            path: "buf.yaml",
            text: &text,
            focused: true,
            theme: &theme,
            state: &mut state,
        };
        let screen = draw(&mut view);
        assert!(screen.contains("buf.yaml"));
        assert!(screen.contains("version: v2"));
        assert!(screen.contains("deps: []"));
        assert!(screen.contains('╭'));
    }

    #[test]
    fn scroll_offset_hides_leading_lines() {
        let lines: Vec<Line> = (0..20).map(|i| Line::from(format!("line {i:02}"))).collect();
        let text = Text::from(lines);
        let theme = Theme::default();
        let mut state = ScrollViewState::default();
        for _ in 0..5 {
            state.scroll_down();
        }
        let mut view = FileView {
            path: "long.txt",
            text: &text,
            focused: false,
            theme: &theme,
            state: &mut state,
        };
        let screen = draw(&mut view);
        assert!(screen.contains("line 05"));
        assert!(!screen.contains("line 00"));
    }
}
