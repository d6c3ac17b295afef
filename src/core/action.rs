//! # Actions
//!
//! Everything that can happen in regnav becomes an `Action`.
//! User submits a locator? That's `Action::Submit(text)`.
//! A fetch completes? That's `Action::Fetched { request, result }`.
//!
//! `update()` takes the app and one action, mutates the app, and returns at
//! most one [`Effect`] for the event loop to carry out. No I/O happens here.
//!
//! ```text
//! App + Action  →  update()  →  App' + Effect
//! ```

use log::{debug, info, warn};

use crate::core::locator::{self, LocatorError};
use crate::core::state::{App, NavState, NavigationContext};
use crate::registry::types::Resource;
use crate::registry::{Fetch, FetchError, Fetched};

#[derive(Debug)]
pub enum Action {
    Quit,
    /// Text entered in the navigator.
    Submit(String),
    /// Descend into the selected row.
    Advance,
    Back,
    CursorUp,
    CursorDown,
    OpenNavigator,
    ToggleHelp,
    ToggleTimeView,
    /// A fetch finished. `request` is the fetch as it was dispatched.
    Fetched {
        request: Fetch,
        result: Result<Fetched, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Fetch(Fetch),
}

/// The first effect, before any input. Dispatches the startup resolve when
/// the app was built with a locator.
pub fn init(app: &mut App) -> Effect {
    match app.expected_fetch() {
        Some(fetch) => dispatch(app, fetch),
        None => Effect::None,
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    if let Action::Fetched { request, .. } = &action {
        app.in_flight.remove(request);
    }

    if let NavState::Errored(_) = app.state {
        return match action {
            Action::Quit => Effect::Quit,
            other => {
                debug!("Ignoring {:?} in errored state", other);
                Effect::None
            }
        };
    }

    match action {
        Action::Quit => Effect::Quit,
        Action::OpenNavigator => {
            app.input_error = None;
            transition(app, NavState::Navigating);
            Effect::None
        }
        Action::Submit(text) => submit(app, &text),
        Action::Fetched { request, result } => fetched(app, request, result),
        Action::Advance => advance(app),
        Action::Back => back(app),
        Action::CursorUp => {
            if is_list(&app.state) {
                app.selected = app.selected.saturating_sub(1);
            }
            Effect::None
        }
        Action::CursorDown => {
            if is_list(&app.state) && app.selected + 1 < app.current_len() {
                app.selected += 1;
            }
            Effect::None
        }
        Action::ToggleHelp => {
            if app.state.is_browsing() {
                app.display.show_help = !app.display.show_help;
            }
            Effect::None
        }
        Action::ToggleTimeView => {
            if app.state.is_browsing() {
                app.display.time_view = app.display.time_view.toggle();
            }
            Effect::None
        }
    }
}

/// States with a selectable row collection.
fn is_list(state: &NavState) -> bool {
    matches!(
        state,
        NavState::BrowsingModules | NavState::BrowsingCommits | NavState::BrowsingCommitContents
    )
}

fn transition(app: &mut App, next: NavState) {
    if app.state != next {
        debug!("{} -> {}", app.state.name(), next.name());
    }
    app.state = next;
}

/// Enters a loading state and issues the fetch it waits on, unless an
/// identical fetch is already in flight.
fn load(app: &mut App, next: NavState) -> Effect {
    transition(app, next);
    match app.expected_fetch() {
        Some(fetch) => dispatch(app, fetch),
        None => Effect::None,
    }
}

fn dispatch(app: &mut App, fetch: Fetch) -> Effect {
    if app.in_flight.insert(fetch.clone()) {
        Effect::Fetch(fetch)
    } else {
        debug!("Already in flight, waiting: {}", fetch.describe());
        Effect::None
    }
}

fn fail(app: &mut App, error: FetchError) -> Effect {
    warn!("Navigation failed in {}: {}", app.state.name(), error);
    transition(app, NavState::Errored(error));
    Effect::None
}

fn submit(app: &mut App, text: &str) -> Effect {
    if !matches!(app.state, NavState::Navigating) || text.is_empty() {
        return Effect::None;
    }

    match locator::resolve(text, app.rules.as_ref()) {
        Ok(Some(locator)) => {
            app.input_error = None;
            app.context = NavigationContext::module_level(
                locator
                    .remote
                    .clone()
                    .unwrap_or_else(|| app.context.remote.clone()),
                locator.owner.clone(),
                locator.module.clone(),
            );
            info!("Navigating to {locator}");
            load(app, NavState::LoadingResource(locator))
        }
        Ok(None) => Effect::None,
        Err(LocatorError::Syntax(_)) if !text.contains('/') && !text.contains(':') => {
            if let Err(e) = app.rules.validate_owner(text) {
                app.input_error = Some(LocatorError::from(e).to_string());
                return Effect::None;
            }
            app.input_error = None;
            app.context = NavigationContext::owner_level(app.context.remote.clone(), text);
            info!("Navigating to owner {text}");
            load(app, NavState::LoadingOwnerModules)
        }
        Err(e) => {
            debug!("Rejected navigator input {text:?}: {e}");
            app.input_error = Some(e.to_string());
            Effect::None
        }
    }
}

/// The payload kind a request produces, for mismatch reporting.
fn payload_kind(request: &Fetch) -> &'static str {
    match request {
        Fetch::ListModules { .. } => "modules",
        Fetch::ListCommits { .. } => "commits",
        Fetch::DownloadCommit { .. } => "files",
        Fetch::ResolveResource { .. } => "resource",
    }
}

fn fetched(app: &mut App, request: Fetch, result: Result<Fetched, FetchError>) -> Effect {
    if app.expected_fetch().as_ref() != Some(&request) {
        debug!(
            "Discarding stale result of {} in {}",
            request.describe(),
            app.state.name()
        );
        return Effect::None;
    }

    let payload = match result {
        Ok(payload) => payload,
        Err(e) => return fail(app, e),
    };
    debug!("Accepted result of {}", request.describe());

    match (app.state.clone(), payload) {
        (NavState::LoadingResource(locator), Fetched::Resource(resource)) => match resource {
            Resource::Module(module) => {
                app.context = NavigationContext::module_level(
                    app.context.remote.clone(),
                    locator.owner,
                    module.name,
                );
                load(app, NavState::LoadingCommits)
            }
            Resource::Commit(commit) => {
                app.context = NavigationContext::commit_level(
                    app.context.remote.clone(),
                    locator.owner,
                    locator.module,
                    commit.id,
                );
                load(app, NavState::LoadingCommitContents)
            }
            Resource::Label(_) => fail(app, FetchError::UnsupportedResource("label".into())),
        },
        (NavState::LoadingOwnerModules, Fetched::Modules(modules)) => {
            info!("Browsing {} modules of {}", modules.len(), app.context.owner);
            app.modules = modules;
            app.selected = 0;
            transition(app, NavState::BrowsingModules);
            Effect::None
        }
        (NavState::LoadingCommits, Fetched::Commits(commits)) => {
            app.commits = commits;
            app.selected = 0;
            transition(app, NavState::BrowsingCommits);
            Effect::None
        }
        (NavState::LoadingCommitContents, Fetched::Files(files)) => {
            app.files = files;
            app.selected = 0;
            transition(app, NavState::BrowsingCommitContents);
            Effect::None
        }
        (_, payload) => fail(
            app,
            FetchError::UnexpectedPayload {
                expected: payload_kind(&request),
                got: payload.kind(),
            },
        ),
    }
}

fn advance(app: &mut App) -> Effect {
    let remote = app.context.remote.clone();
    let owner = app.context.owner.clone();
    match app.state {
        NavState::BrowsingModules => {
            let Some(module) = app.selected_module() else {
                return Effect::None;
            };
            app.context = NavigationContext::module_level(remote, owner, module.name.clone());
            load(app, NavState::LoadingCommits)
        }
        NavState::BrowsingCommits => {
            let (Some(commit), Some(module)) = (app.selected_commit(), app.context.module.clone())
            else {
                return Effect::None;
            };
            app.context = NavigationContext::commit_level(remote, owner, module, commit.id.clone());
            load(app, NavState::LoadingCommitContents)
        }
        NavState::BrowsingCommitContents if app.selected_file().is_some() => {
            transition(app, NavState::BrowsingCommitFile);
            Effect::None
        }
        _ => Effect::None,
    }
}

fn back(app: &mut App) -> Effect {
    match app.state {
        NavState::BrowsingCommitFile => {
            transition(app, NavState::BrowsingCommitContents);
            Effect::None
        }
        NavState::BrowsingCommitContents => {
            app.context = app.context.up_to_module();
            load(app, NavState::LoadingCommits)
        }
        NavState::BrowsingCommits => {
            app.context = app.context.up_to_owner();
            load(app, NavState::LoadingOwnerModules)
        }
        _ => Effect::None,
    }
}
