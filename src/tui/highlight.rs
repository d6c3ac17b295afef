//! Syntax highlighting for commit files.
//!
//! Module files are protobuf sources, markdown docs, `buf.yaml`/`buf.lock`
//! and license text. The grammar is picked from the file extension; files
//! with no match (`LICENSE`) render as plain text.

use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME_NAME: &str = "base16-ocean.dark";

fn syntax_for(path: &str) -> Option<&'static SyntaxReference> {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext)?;
    match extension {
        // No protobuf grammar ships in the default set
        "proto" => SYNTAX_SET.find_syntax_by_extension("c"),
        ext => SYNTAX_SET.find_syntax_by_extension(ext),
    }
}

/// Highlights `content` as the file at `path`. Invalid UTF-8 is replaced.
pub fn highlight(path: &str, content: &[u8], plain_fg: Color) -> Text<'static> {
    let source = String::from_utf8_lossy(content).replace('\t', "    ");

    let highlighter = syntax_for(path)
        .zip(THEME_SET.themes.get(THEME_NAME))
        .map(|(syntax, theme)| HighlightLines::new(syntax, theme));

    let Some(mut highlighter) = highlighter else {
        return plain(&source, plain_fg);
    };

    let mut lines = Vec::new();
    for line in LinesWithEndings::from(source.as_str()) {
        match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => {
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(hl_style, frag)| {
                        let content = frag.trim_end_matches(['\n', '\r']);
                        if content.is_empty() {
                            return None;
                        }
                        let fg = Color::Rgb(
                            hl_style.foreground.r,
                            hl_style.foreground.g,
                            hl_style.foreground.b,
                        );
                        Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
                    })
                    .collect();
                lines.push(Line::from(spans));
            }
            Err(e) => {
                log::warn!("Highlighting {path} failed, showing plain text: {e}");
                return plain(&source, plain_fg);
            }
        }
    }
    Text::from(lines)
}

fn plain(source: &str, fg: Color) -> Text<'static> {
    let style = Style::default().fg(fg);
    Text::from(
        source
            .lines()
            .map(|line| Line::from(Span::styled(line.to_owned(), style)))
            .collect::<Vec<_>>(),
    )
}
