//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use std::time::Duration;

use crate::core::locator::Locator;
use crate::core::state::App;
use crate::registry::types::{Commit, Content, Module, Resource};
use crate::registry::{FetchError, Registry};

/// An in-memory registry with canned answers.
///
/// By default it lists two modules, one commit, one empty content bundle
/// and resolves every locator to a module of the same name.
pub struct FakeRegistry {
    modules: Vec<Module>,
    commits: Vec<Commit>,
    contents: Vec<Content>,
    resources: Option<Vec<Option<Resource>>>,
    failure: Option<FetchError>,
    delay: Option<Duration>,
}

impl Default for FakeRegistry {
    fn default() -> Self {
        Self {
            modules: vec![
                Module {
                    id: "m1".into(),
                    name: "registry".into(),
                    ..Default::default()
                },
                Module {
                    id: "m2".into(),
                    name: "protovalidate".into(),
                    ..Default::default()
                },
            ],
            commits: vec![Commit {
                id: "c1".into(),
                ..Default::default()
            }],
            contents: vec![Content::default()],
            resources: None,
            failure: None,
            delay: None,
        }
    }
}

impl FakeRegistry {
    pub fn with_contents(mut self, contents: Vec<Content>) -> Self {
        self.contents = contents;
        self
    }

    pub fn with_resources(mut self, resources: Vec<Option<Resource>>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Every call fails with `error`.
    pub fn failing(mut self, error: FetchError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn answer<T>(&self, value: T) -> Result<T, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_modules(&self, _remote: &str, _owner: &str) -> Result<Vec<Module>, FetchError> {
        self.answer(self.modules.clone()).await
    }

    async fn list_commits(
        &self,
        _remote: &str,
        _owner: &str,
        _module: &str,
    ) -> Result<Vec<Commit>, FetchError> {
        self.answer(self.commits.clone()).await
    }

    async fn download(
        &self,
        _remote: &str,
        _owner: &str,
        _module: &str,
        _reference: &str,
    ) -> Result<Vec<Content>, FetchError> {
        self.answer(self.contents.clone()).await
    }

    async fn get_resources(
        &self,
        _remote: &str,
        locator: &Locator,
    ) -> Result<Vec<Option<Resource>>, FetchError> {
        let resources = self.resources.clone().unwrap_or_else(|| {
            vec![Some(Resource::Module(Module {
                name: locator.module.clone(),
                ..Default::default()
            }))]
        });
        self.answer(resources).await
    }
}

/// Creates a test App on `buf.build` with no startup locator.
pub fn test_app() -> App {
    App::new("buf.build", None)
}
