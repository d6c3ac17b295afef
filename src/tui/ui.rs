use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::present::{self, COMMIT_COLUMNS, FILE_COLUMNS, MODULE_COLUMNS};
use crate::core::state::{App, NavState};
use crate::registry::FetchError;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{FileView, HelpBar, ResourceTable, TitleBar, navigate_input};
use crate::tui::keymap::Command;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Width of the file list beside the file view.
const FILE_LIST_WIDTH: u16 = 52;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let mut help_bar = HelpBar::new(app, &tui.keymap, tui.theme.help());

    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(help_bar.height() + 1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    TitleBar::new(&app.context, tui.theme.focused_border()).render(frame, title_area);

    match &app.state {
        NavState::Errored(error) => draw_error_view(frame, main_area, error, tui),
        NavState::Navigating => draw_navigator(frame, main_area, app, tui),
        state if state.is_loading() => draw_loading(frame, main_area, state, spinner_frame),
        NavState::BrowsingModules | NavState::BrowsingCommits => {
            draw_listing(frame, main_area, app, tui)
        }
        _ => draw_commit(frame, main_area, app, tui),
    }

    let [_, help_area] = Layout::vertical([Length(1), Min(0)]).areas(help_area);
    help_bar.render(frame, help_area);
}

fn draw_error_view(frame: &mut Frame, area: Rect, error: &FetchError, tui: &TuiState) {
    let lines = vec![
        Line::from(format!("error: {error}")),
        Line::from(""),
        Line::from(Span::styled(
            format!("press {} to quit", tui.keymap.label(Command::Quit)),
            tui.theme.help(),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .block(
            Block::bordered()
                .title("ERROR")
                .border_style(tui.theme.error()),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_navigator(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [input_area, error_area, _] =
        Layout::vertical([Length(navigate_input::HEIGHT), Length(1), Min(0)]).areas(area);
    let input_area = Rect {
        width: input_area.width.min(60),
        ..input_area
    };
    tui.input.render(frame, input_area);

    if let Some(error) = &app.input_error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), tui.theme.error())),
            error_area,
        );
    }
}

fn draw_loading(frame: &mut Frame, area: Rect, state: &NavState, spinner_frame: usize) {
    let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
    let message = present::loading_message(state).unwrap_or_default();
    frame.render_widget(Paragraph::new(format!("{spinner} {message}")), area);
}

fn draw_listing(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let now = Utc::now();
    let time_view = app.display.time_view;
    let (columns, rows) = match app.state {
        NavState::BrowsingModules => (
            &MODULE_COLUMNS[..],
            present::module_rows(&app.modules, time_view, now),
        ),
        _ => (
            &COMMIT_COLUMNS[..],
            present::commit_rows(&app.commits, time_view, now),
        ),
    };
    let empty_message = present::empty_message(app, &tui.keymap.label(Command::Navigate));

    ResourceTable {
        header: present::header(app),
        columns,
        rows,
        selected: app.selected,
        empty_message,
        theme: &tui.theme,
        state: &mut tui.table,
    }
    .render(frame, area);
}

fn draw_commit(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [list_area, file_area] =
        Layout::horizontal([Length(FILE_LIST_WIDTH), Min(0)]).areas(area);

    ResourceTable {
        header: present::header(app),
        columns: &FILE_COLUMNS,
        rows: present::file_rows(&app.files),
        selected: app.selected,
        empty_message: None,
        theme: &tui.theme,
        state: &mut tui.table,
    }
    .render(frame, list_area);

    let Some(file) = app.selected_file() else {
        return;
    };
    let commit = app.context.commit_id.as_deref().unwrap_or_default();
    tui.highlight(commit, file);

    // The file view sits under the header line, level with the table rows.
    let [_, file_area] = Layout::vertical([Length(2), Min(0)]).areas(file_area);
    if let Some(highlighted) = &tui.highlighted {
        FileView {
            path: &file.path,
            text: &highlighted.text,
            focused: app.state == NavState::BrowsingCommitFile,
            theme: &tui.theme,
            state: &mut tui.file_scroll,
        }
        .render(frame, file_area);
    }
}
