//! # ResourceTable Component
//!
//! A header line plus a `Table` of modules, commits or files. The selection
//! mirrors `App::selected`; the table only owns its scroll offset.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use unicode_width::UnicodeWidthStr;

use crate::core::present::{self, Column};
use crate::tui::component::Component;
use crate::tui::theme::Theme;

pub struct ResourceTable<'a> {
    pub header: String,
    pub columns: &'a [Column],
    pub rows: Vec<present::Row>,
    pub selected: usize,
    /// Shown instead of the table when there are no rows.
    pub empty_message: Option<String>,
    pub theme: &'a Theme,
    pub state: &'a mut TableState,
}

/// Cuts `text` to at most `width` display columns.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

impl Component for ResourceTable<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [header_area, body_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);
        frame.render_widget(
            Paragraph::new(Line::styled(self.header.clone(), self.theme.header())),
            header_area,
        );

        if let Some(message) = &self.empty_message {
            frame.render_widget(Paragraph::new(message.as_str()), body_area);
            return;
        }

        let header = Row::new(self.columns.iter().map(|c| Cell::from(c.title)))
            .style(self.theme.column_header());
        let rows = self.rows.iter().map(|row| {
            Row::new(
                row.iter()
                    .zip(self.columns)
                    .map(|(value, column)| Cell::from(truncate(value, column.width as usize))),
            )
        });
        let widths = self.columns.iter().map(|c| Constraint::Length(c.width));

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(self.theme.selected_row());

        self.state.select(Some(self.selected));
        frame.render_stateful_widget(table, body_area, self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::present::{FILE_COLUMNS, MODULE_COLUMNS};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(table: &mut ResourceTable<'_>, width: u16, height: u16) -> Vec<String> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| table.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("registry", 4), "regi");
        assert_eq!(truncate("短い名前", 5), "短い");
        assert_eq!(truncate("ok", 10), "ok");
    }

    #[test]
    fn test_renders_header_columns_and_rows() {
        let theme = Theme::default();
        let mut state = TableState::default();
        let mut table = ResourceTable {
            header: "Modules (Owner: bufbuild)".into(),
            columns: &MODULE_COLUMNS,
            rows: vec![vec![
                "id1".into(),
                "registry".into(),
                "2024-05-01 00:00:00".into(),
                "public".into(),
                "active".into(),
            ]],
            selected: 0,
            empty_message: None,
            theme: &theme,
            state: &mut state,
        };
        let lines = draw(&mut table, 120, 6);
        assert!(lines[0].starts_with("Modules (Owner: bufbuild)"));
        assert!(lines[2].contains("ID") && lines[2].contains("Visibility"));
        assert!(lines[3].contains("registry") && lines[3].contains("public"));
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn test_empty_message_replaces_table() {
        let theme = Theme::default();
        let mut state = TableState::default();
        let mut table = ResourceTable {
            header: "Commits (Module: bufbuild/registry)".into(),
            columns: &FILE_COLUMNS,
            rows: vec![],
            selected: 0,
            empty_message: Some("No commits found for module".into()),
            theme: &theme,
            state: &mut state,
        };
        let lines = draw(&mut table, 60, 4);
        assert!(lines[2].starts_with("No commits found for module"));
        assert!(!lines.iter().any(|l| l.contains("Path")));
    }

    #[test]
    fn test_selection_follows_prop() {
        let theme = Theme::default();
        let mut state = TableState::default();
        let mut table = ResourceTable {
            header: String::new(),
            columns: &FILE_COLUMNS,
            rows: vec![vec!["a.proto".into()], vec!["b.proto".into()]],
            selected: 1,
            empty_message: None,
            theme: &theme,
            state: &mut state,
        };
        draw(&mut table, 60, 6);
        assert_eq!(state.selected(), Some(1));
    }
}
