//! # Fetch Commands
//!
//! One [`Fetch`] per navigation step. A fetch runs exactly once on its own
//! task, under a caller-supplied deadline, and its outcome comes back to the
//! event loop as [`Action::Fetched`] carrying the original request. The loop
//! uses that echo to tell current results from stale ones.
//!
//! ```text
//! update() ──Effect::Fetch(f)──▶ spawn(f) ──▶ execute(f) ──▶ Registry
//!    ▲                                            │
//!    └──────── Action::Fetched { f, result } ◀────┘
//! ```

use std::sync::{Arc, mpsc};
use std::time::Duration;

use log::{debug, info, warn};

use super::client::{FetchError, Registry};
use super::types::{Commit, File, Module, Resource};
use crate::core::action::Action;
use crate::core::locator::Locator;

/// Default per-fetch deadline.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A unit of remote work, keyed by everything that identifies its answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fetch {
    ListModules {
        remote: String,
        owner: String,
    },
    ListCommits {
        remote: String,
        owner: String,
        module: String,
    },
    DownloadCommit {
        remote: String,
        owner: String,
        module: String,
        commit: String,
    },
    ResolveResource {
        remote: String,
        locator: Locator,
    },
}

impl Fetch {
    pub fn describe(&self) -> String {
        match self {
            Fetch::ListModules { owner, .. } => format!("list modules of {owner}"),
            Fetch::ListCommits { owner, module, .. } => format!("list commits of {owner}/{module}"),
            Fetch::DownloadCommit {
                owner,
                module,
                commit,
                ..
            } => format!("download {owner}/{module}:{commit}"),
            Fetch::ResolveResource { locator, .. } => format!("resolve {locator}"),
        }
    }
}

/// Successful fetch payloads, one per [`Fetch`] variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Modules(Vec<Module>),
    Commits(Vec<Commit>),
    Files(Vec<File>),
    Resource(Resource),
}

impl Fetched {
    pub fn kind(&self) -> &'static str {
        match self {
            Fetched::Modules(_) => "modules",
            Fetched::Commits(_) => "commits",
            Fetched::Files(_) => "files",
            Fetched::Resource(_) => "resource",
        }
    }
}

/// Runs `fetch` against `registry` once, with no retry.
pub async fn execute(registry: &dyn Registry, fetch: &Fetch) -> Result<Fetched, FetchError> {
    match fetch {
        Fetch::ListModules { remote, owner } => registry
            .list_modules(remote, owner)
            .await
            .map(Fetched::Modules),
        Fetch::ListCommits {
            remote,
            owner,
            module,
        } => registry
            .list_commits(remote, owner, module)
            .await
            .map(Fetched::Commits),
        Fetch::DownloadCommit {
            remote,
            owner,
            module,
            commit,
        } => {
            let mut contents = registry.download(remote, owner, module, commit).await?;
            if contents.len() != 1 {
                return Err(FetchError::Protocol {
                    what: "commit contents",
                    expected: 1,
                    got: contents.len(),
                });
            }
            let content = contents.remove(0);
            Ok(Fetched::Files(content.files))
        }
        Fetch::ResolveResource { remote, locator } => {
            let mut resources = registry.get_resources(remote, locator).await?;
            if resources.len() != 1 {
                return Err(FetchError::Protocol {
                    what: "resource",
                    expected: 1,
                    got: resources.len(),
                });
            }
            match resources.remove(0) {
                Some(resource) => Ok(Fetched::Resource(resource)),
                None => Err(FetchError::UnsupportedResource("unknown".to_string())),
            }
        }
    }
}

/// [`execute`] bounded by `deadline`; running past it is a `Timeout`.
pub async fn execute_with_deadline(
    registry: &dyn Registry,
    fetch: &Fetch,
    deadline: Duration,
) -> Result<Fetched, FetchError> {
    match tokio::time::timeout(deadline, execute(registry, fetch)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{} timed out after {:?}", fetch.describe(), deadline);
            Err(FetchError::Timeout(deadline))
        }
    }
}

/// Dispatches `fetch` onto the tokio runtime. The result is sent to `tx`;
/// the task never touches navigation state.
pub fn spawn(
    registry: Arc<dyn Registry>,
    fetch: Fetch,
    deadline: Duration,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!("Spawning fetch via {}: {}", registry.name(), fetch.describe());
    tokio::spawn(async move {
        let started = std::time::Instant::now();
        let result = execute_with_deadline(registry.as_ref(), &fetch, deadline).await;
        debug!(
            "{} finished in {}ms (ok={})",
            fetch.describe(),
            started.elapsed().as_millis(),
            result.is_ok()
        );
        let description = fetch.describe();
        if tx
            .send(Action::Fetched {
                request: fetch,
                result,
            })
            .is_err()
        {
            warn!("Failed to deliver result of {description}: receiver dropped");
        }
    })
}
