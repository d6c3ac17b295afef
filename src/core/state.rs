//! # Application State
//!
//! Core navigation state for regnav. Domain logic only, no TUI types.
//! Presentation state (table offsets, scroll position) lives in `tui`.
//!
//! ```text
//! App
//! ├── state: NavState               // where the user is
//! ├── context: NavigationContext    // remote / owner / module / commit
//! ├── modules, commits, files       // the collection for the current level
//! ├── selected: usize               // cursor into that collection
//! ├── display: DisplayFlags         // help + time view toggles
//! ├── input_error: Option<String>   // inline navigator error
//! ├── in_flight: HashSet<Fetch>     // dispatched, not yet completed
//! └── rules: Arc<dyn ValidationRuleSet>
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::ResolvedConfig;
use crate::core::locator::{Locator, RegistryRules, ValidationRuleSet};
use crate::registry::command::DEFAULT_FETCH_TIMEOUT;
use crate::registry::types::{Commit, File, Module};
use crate::registry::{Fetch, FetchError};

/// The navigator's position. `Loading*` states each wait on exactly one
/// fetch, described by [`App::expected_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Navigating,
    LoadingResource(Locator),
    LoadingOwnerModules,
    BrowsingModules,
    LoadingCommits,
    BrowsingCommits,
    LoadingCommitContents,
    BrowsingCommitContents,
    BrowsingCommitFile,
    /// Terminal. Only `Quit` is answered from here.
    Errored(FetchError),
}

impl NavState {
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            NavState::LoadingResource(_)
                | NavState::LoadingOwnerModules
                | NavState::LoadingCommits
                | NavState::LoadingCommitContents
        )
    }

    pub fn is_browsing(&self) -> bool {
        matches!(
            self,
            NavState::BrowsingModules
                | NavState::BrowsingCommits
                | NavState::BrowsingCommitContents
                | NavState::BrowsingCommitFile
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            NavState::Navigating => "navigating",
            NavState::LoadingResource(_) => "loading resource",
            NavState::LoadingOwnerModules => "loading modules",
            NavState::BrowsingModules => "browsing modules",
            NavState::LoadingCommits => "loading commits",
            NavState::BrowsingCommits => "browsing commits",
            NavState::LoadingCommitContents => "loading commit contents",
            NavState::BrowsingCommitContents => "browsing commit contents",
            NavState::BrowsingCommitFile => "browsing commit file",
            NavState::Errored(_) => "errored",
        }
    }
}

/// Which remote, owner, module and commit the current level belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationContext {
    pub remote: String,
    pub owner: String,
    pub module: Option<String>,
    pub commit_id: Option<String>,
}

impl NavigationContext {
    pub fn owner_level(remote: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            owner: owner.into(),
            module: None,
            commit_id: None,
        }
    }

    pub fn module_level(
        remote: impl Into<String>,
        owner: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            module: Some(module.into()),
            ..Self::owner_level(remote, owner)
        }
    }

    pub fn commit_level(
        remote: impl Into<String>,
        owner: impl Into<String>,
        module: impl Into<String>,
        commit_id: impl Into<String>,
    ) -> Self {
        Self {
            commit_id: Some(commit_id.into()),
            ..Self::module_level(remote, owner, module)
        }
    }

    /// Drops the commit, keeping remote, owner and module.
    pub fn up_to_module(&self) -> Self {
        Self {
            commit_id: None,
            ..self.clone()
        }
    }

    /// Drops module and commit.
    pub fn up_to_owner(&self) -> Self {
        Self::owner_level(self.remote.clone(), self.owner.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeView {
    #[default]
    Absolute,
    Relative,
}

impl TimeView {
    pub fn toggle(self) -> Self {
        match self {
            TimeView::Absolute => TimeView::Relative,
            TimeView::Relative => TimeView::Absolute,
        }
    }
}

/// The only user-toggleable presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayFlags {
    pub show_help: bool,
    pub time_view: TimeView,
}

pub struct App {
    pub state: NavState,
    pub context: NavigationContext,
    pub modules: Vec<Module>,
    pub commits: Vec<Commit>,
    pub files: Vec<File>,
    pub selected: usize,
    pub display: DisplayFlags,
    /// Syntax or validation error from the last navigator submit.
    pub input_error: Option<String>,
    pub in_flight: HashSet<Fetch>,
    pub rules: Arc<dyn ValidationRuleSet>,
    pub fetch_timeout: Duration,
}

impl App {
    /// Starts in `Navigating`, or in `LoadingResource` when a startup
    /// locator is given.
    pub fn new(remote: impl Into<String>, startup: Option<Locator>) -> Self {
        let remote = remote.into();
        let (state, context) = match startup {
            Some(locator) => {
                let context = NavigationContext::module_level(
                    locator.remote.clone().unwrap_or(remote),
                    locator.owner.clone(),
                    locator.module.clone(),
                );
                (NavState::LoadingResource(locator), context)
            }
            None => (
                NavState::Navigating,
                NavigationContext::owner_level(remote, ""),
            ),
        };
        Self {
            state,
            context,
            modules: Vec::new(),
            commits: Vec::new(),
            files: Vec::new(),
            selected: 0,
            display: DisplayFlags::default(),
            input_error: None,
            in_flight: HashSet::new(),
            rules: Arc::new(RegistryRules),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn from_config(config: &ResolvedConfig, startup: Option<Locator>) -> Self {
        let mut app = Self::new(config.remote.clone(), startup);
        app.display.time_view = config.time_view;
        app.fetch_timeout = config.fetch_timeout;
        app
    }

    /// The fetch whose completion the current state is waiting for.
    /// Any other completion is stale.
    pub fn expected_fetch(&self) -> Option<Fetch> {
        let ctx = &self.context;
        match &self.state {
            NavState::LoadingResource(locator) => Some(Fetch::ResolveResource {
                remote: ctx.remote.clone(),
                locator: locator.clone(),
            }),
            NavState::LoadingOwnerModules => Some(Fetch::ListModules {
                remote: ctx.remote.clone(),
                owner: ctx.owner.clone(),
            }),
            NavState::LoadingCommits => Some(Fetch::ListCommits {
                remote: ctx.remote.clone(),
                owner: ctx.owner.clone(),
                module: ctx.module.clone()?,
            }),
            NavState::LoadingCommitContents => Some(Fetch::DownloadCommit {
                remote: ctx.remote.clone(),
                owner: ctx.owner.clone(),
                module: ctx.module.clone()?,
                commit: ctx.commit_id.clone()?,
            }),
            _ => None,
        }
    }

    /// Length of the collection the cursor moves over in the current state.
    pub fn current_len(&self) -> usize {
        match self.state {
            NavState::BrowsingModules => self.modules.len(),
            NavState::BrowsingCommits => self.commits.len(),
            NavState::BrowsingCommitContents | NavState::BrowsingCommitFile => self.files.len(),
            _ => 0,
        }
    }

    pub fn selected_module(&self) -> Option<&Module> {
        self.modules.get(self.selected)
    }

    pub fn selected_commit(&self) -> Option<&Commit> {
        self.commits.get(self.selected)
    }

    pub fn selected_file(&self) -> Option<&File> {
        self.files.get(self.selected)
    }

    /// The error that ended the session, if it ended in `Errored`.
    pub fn fatal_error(&self) -> Option<&FetchError> {
        match &self.state {
            NavState::Errored(e) => Some(e),
            _ => None,
        }
    }
}
