//! # TitleBar Component
//!
//! Top line: product name, the remote, and the path of the current level.
//!
//! ```text
//! regnav | buf.build | bufbuild/registry:abc123
//! ```
//!
//! Stateless. All three props come from `App`: the remote and path from the
//! navigation context, nothing from the TUI.

use crate::core::state::NavigationContext;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub remote: String,
    /// `owner[/module[:commit]]`, empty before the first navigation.
    pub path: String,
    pub style: Style,
}

impl TitleBar {
    pub fn new(context: &NavigationContext, style: Style) -> Self {
        let mut path = context.owner.clone();
        if let Some(module) = &context.module {
            path = format!("{path}/{module}");
        }
        if let Some(commit) = &context.commit_id {
            path = format!("{path}:{commit}");
        }
        Self {
            remote: context.remote.clone(),
            path,
            style,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("regnav", self.style),
            Span::raw(format!(" | {}", self.remote)),
        ];
        if !self.path.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.path)));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
