//! # Presentation
//!
//! Turns navigation state into plain strings: table columns and rows,
//! headers, status lines and timestamps. Nothing here knows about the
//! terminal; `tui` lays these strings out.

use chrono::{DateTime, Datelike, Utc};

use crate::core::state::{App, NavState, TimeView};
use crate::registry::types::{Commit, File, Module};

/// Width of a registry id column (a dashless UUID).
const ID_WIDTH: u16 = 32;
/// `YYYY-MM-DD HH:MM:SS`
const TIME_WIDTH: u16 = 19;
const DIGEST_PREFIX_LEN: usize = 9;

pub const ABSOLUTE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const NO_FILES: &str = "No files found for commit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: u16,
}

const fn column(title: &'static str, width: u16) -> Column {
    Column { title, width }
}

pub const MODULE_COLUMNS: [Column; 5] = [
    column("ID", ID_WIDTH),
    column("Name", 20),
    column("Create Time", TIME_WIDTH),
    column("Visibility", 10),
    column("State", 10),
];

pub const COMMIT_COLUMNS: [Column; 3] = [
    column("ID", ID_WIDTH),
    column("Create Time", TIME_WIDTH),
    column("b5 Digest", DIGEST_PREFIX_LEN as u16),
];

pub const FILE_COLUMNS: [Column; 1] = [column("Path", 50)];

pub type Row = Vec<String>;

pub fn format_timestamp(
    timestamp: Option<DateTime<Utc>>,
    view: TimeView,
    now: DateTime<Utc>,
) -> String {
    let Some(timestamp) = timestamp else {
        return String::new();
    };
    match view {
        TimeView::Absolute => timestamp.format(ABSOLUTE_TIME_FORMAT).to_string(),
        TimeView::Relative => format_time_ago(now, timestamp),
    }
}

/// Calendar distance from `timestamp` to `now`, coarsest unit first.
/// Year, month and day are compared as calendar fields, so 23:59 on the
/// 31st of December is "last year" one minute later.
pub fn format_time_ago(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> String {
    if timestamp > now {
        return "in the future".to_string();
    }
    if timestamp == now {
        return "now".to_string();
    }

    let years = now.year() - timestamp.year();
    if years != 0 {
        return match years {
            1 => "last year".to_string(),
            n => format!("{n} years ago"),
        };
    }
    let months = now.month() as i32 - timestamp.month() as i32;
    if months != 0 {
        return match months {
            1 => "last month".to_string(),
            n => format!("{n} months ago"),
        };
    }
    let days = now.day() as i32 - timestamp.day() as i32;
    if days != 0 {
        return match days {
            1 => "yesterday".to_string(),
            n => format!("{n} days ago"),
        };
    }

    let elapsed = now - timestamp;
    if elapsed.num_seconds() < 60 {
        "a few seconds ago".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{} minutes ago", elapsed.num_minutes())
    } else {
        format!("{} hours ago", elapsed.num_hours())
    }
}

pub fn module_rows(modules: &[Module], view: TimeView, now: DateTime<Utc>) -> Vec<Row> {
    modules
        .iter()
        .map(|m| {
            vec![
                m.id.clone(),
                m.name.clone(),
                format_timestamp(m.create_time, view, now),
                m.visibility.label().to_string(),
                m.state.label().to_string(),
            ]
        })
        .collect()
}

/// Leading hex characters of the commit's b5 digest.
pub fn digest_prefix(commit: &Commit) -> String {
    let Some(digest) = &commit.digest else {
        return String::new();
    };
    let mut encoded = hex::encode(&digest.value);
    encoded.truncate(DIGEST_PREFIX_LEN);
    encoded
}

pub fn commit_rows(commits: &[Commit], view: TimeView, now: DateTime<Utc>) -> Vec<Row> {
    commits
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                format_timestamp(c.create_time, view, now),
                digest_prefix(c),
            ]
        })
        .collect()
}

pub fn file_rows(files: &[File]) -> Vec<Row> {
    if files.is_empty() {
        return vec![vec![NO_FILES.to_string()]];
    }
    files.iter().map(|f| vec![f.path.clone()]).collect()
}

/// Heading shown above the current level.
pub fn header(app: &App) -> String {
    let ctx = &app.context;
    let module = ctx.module.as_deref().unwrap_or_default();
    match &app.state {
        NavState::Navigating => "Navigate to owner or module".to_string(),
        NavState::BrowsingModules => format!("Modules (Owner: {})", ctx.owner),
        NavState::BrowsingCommits => format!("Commits (Module: {}/{})", ctx.owner, module),
        NavState::BrowsingCommitContents | NavState::BrowsingCommitFile => format!(
            "Commit {} (Module: {}/{})",
            ctx.commit_id.as_deref().unwrap_or_default(),
            ctx.owner,
            module
        ),
        state => state.name().to_string(),
    }
}

/// Spinner caption for loading states.
pub fn loading_message(state: &NavState) -> Option<&'static str> {
    match state {
        NavState::LoadingResource(_) => Some("Loading reference"),
        NavState::LoadingOwnerModules => Some("Loading modules"),
        NavState::LoadingCommits => Some("Loading commits"),
        NavState::LoadingCommitContents => Some("Loading commit file contents"),
        _ => None,
    }
}

/// Placeholder for an empty module or commit list. `navigate_key` is the
/// label of the key that opens the navigator.
pub fn empty_message(app: &App, navigate_key: &str) -> Option<String> {
    match app.state {
        NavState::BrowsingModules if app.modules.is_empty() => Some(format!(
            "No modules found for owner; use {navigate_key} to navigate elsewhere"
        )),
        NavState::BrowsingCommits if app.commits.is_empty() => {
            Some("No commits found for module".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::NavigationContext;
    use crate::registry::types::{Digest, ModuleState, ModuleVisibility};
    use crate::test_support::test_app;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_time_ago_calendar_units() {
        let now = at(2024, 6, 15, 12, 0, 0);
        let cases = [
            (at(2024, 6, 15, 12, 0, 0), "now"),
            (at(2024, 6, 15, 12, 0, 1), "in the future"),
            (at(2023, 1, 1, 0, 0, 0), "last year"),
            (at(2021, 6, 15, 12, 0, 0), "3 years ago"),
            (at(2024, 5, 30, 0, 0, 0), "last month"),
            (at(2024, 2, 15, 0, 0, 0), "4 months ago"),
            (at(2024, 6, 14, 23, 59, 0), "yesterday"),
            (at(2024, 6, 10, 12, 0, 0), "5 days ago"),
            (at(2024, 6, 15, 11, 59, 30), "a few seconds ago"),
            (at(2024, 6, 15, 11, 15, 0), "45 minutes ago"),
            (at(2024, 6, 15, 1, 0, 0), "11 hours ago"),
        ];
        for (timestamp, expected) in cases {
            assert_eq!(format_time_ago(now, timestamp), expected, "{timestamp}");
        }
    }

    #[test]
    fn test_time_ago_crosses_year_boundary_by_calendar() {
        let now = at(2024, 1, 1, 0, 1, 0);
        assert_eq!(format_time_ago(now, at(2023, 12, 31, 23, 59, 0)), "last year");
    }

    #[test]
    fn test_absolute_format() {
        let ts = Some(at(2024, 5, 1, 12, 30, 5));
        let now = at(2024, 6, 1, 0, 0, 0);
        assert_eq!(
            format_timestamp(ts, TimeView::Absolute, now),
            "2024-05-01 12:30:05"
        );
        assert_eq!(format_timestamp(ts, TimeView::Relative, now), "last month");
        assert_eq!(format_timestamp(None, TimeView::Absolute, now), "");
    }

    #[test]
    fn test_module_rows() {
        let modules = vec![Module {
            id: "0123".into(),
            name: "registry".into(),
            visibility: ModuleVisibility::Private,
            state: ModuleState::Active,
            create_time: Some(at(2024, 5, 1, 0, 0, 0)),
            ..Default::default()
        }];
        let rows = module_rows(&modules, TimeView::Absolute, at(2024, 6, 1, 0, 0, 0));
        assert_eq!(
            rows,
            vec![vec![
                "0123".to_string(),
                "registry".to_string(),
                "2024-05-01 00:00:00".to_string(),
                "private".to_string(),
                "active".to_string(),
            ]]
        );
        assert_eq!(rows[0].len(), MODULE_COLUMNS.len());
    }

    #[test]
    fn test_commit_digest_prefix() {
        let commit = Commit {
            id: "c1".into(),
            digest: Some(Digest {
                kind: "DIGEST_TYPE_B5".into(),
                value: vec![0xde, 0xad, 0xbe, 0xef, 0x01, 0x02],
            }),
            ..Default::default()
        };
        assert_eq!(digest_prefix(&commit), "deadbeef0");
        assert_eq!(digest_prefix(&Commit::default()), "");

        let rows = commit_rows(&[commit], TimeView::Absolute, Utc::now());
        assert_eq!(rows[0], vec!["c1".to_string(), String::new(), "deadbeef0".to_string()]);
    }

    #[test]
    fn test_file_rows_placeholder() {
        assert_eq!(file_rows(&[]), vec![vec![NO_FILES.to_string()]]);
        let files = vec![File {
            path: "buf.yaml".into(),
            content: vec![],
        }];
        assert_eq!(file_rows(&files), vec![vec!["buf.yaml".to_string()]]);
    }

    #[test]
    fn test_headers() {
        let mut app = test_app();
        assert_eq!(header(&app), "Navigate to owner or module");

        app.context = NavigationContext::owner_level("buf.build", "bufbuild");
        app.state = NavState::BrowsingModules;
        assert_eq!(header(&app), "Modules (Owner: bufbuild)");

        app.context = NavigationContext::module_level("buf.build", "bufbuild", "registry");
        app.state = NavState::BrowsingCommits;
        assert_eq!(header(&app), "Commits (Module: bufbuild/registry)");

        app.context = NavigationContext::commit_level("buf.build", "bufbuild", "registry", "abc");
        app.state = NavState::BrowsingCommitFile;
        assert_eq!(header(&app), "Commit abc (Module: bufbuild/registry)");
    }

    #[test]
    fn test_empty_messages() {
        let mut app = test_app();
        app.state = NavState::BrowsingModules;
        assert!(empty_message(&app, "s").unwrap().contains("use s"));
        app.modules.push(Module::default());
        assert!(empty_message(&app, "s").is_none());

        app.state = NavState::BrowsingCommits;
        assert_eq!(
            empty_message(&app, "s").as_deref(),
            Some("No commits found for module")
        );
    }

    #[test]
    fn test_loading_messages() {
        assert_eq!(
            loading_message(&NavState::LoadingCommits),
            Some("Loading commits")
        );
        assert!(loading_message(&NavState::BrowsingCommits).is_none());
    }
}
