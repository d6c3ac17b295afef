use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{Commit, Content, Module, Resource};
use crate::core::locator::Locator;

/// Errors that end a fetch.
///
/// `Network`, `Timeout`, `Api` and `Parse` are transport or remote failures.
/// `Protocol` means the remote answered with the wrong shape (for example
/// two content bundles for one ref). `UnsupportedResource` is a resolved kind
/// the navigator has no browsing state for. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection-level failure (DNS, refused, TLS, reset).
    Network(String),
    /// The caller's deadline elapsed before the remote answered.
    Timeout(Duration),
    /// The remote returned a Connect error.
    Api {
        status: u16,
        code: String,
        message: String,
    },
    /// The response body did not decode.
    Parse(String),
    /// The response decoded but had the wrong cardinality or kind.
    Protocol {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// An answer of a different kind than the request asks for.
    UnexpectedPayload {
        expected: &'static str,
        got: &'static str,
    },
    UnsupportedResource(String),
}

impl FetchError {
    /// True for the fatal shape errors, as opposed to transport failures.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            FetchError::Protocol { .. }
                | FetchError::UnexpectedPayload { .. }
                | FetchError::UnsupportedResource(_)
        )
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Timeout(after) => {
                write!(f, "request timed out after {}s", after.as_secs_f32())
            }
            FetchError::Api {
                status,
                code,
                message,
            } => write!(f, "registry error (HTTP {status}, {code}): {message}"),
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
            FetchError::Protocol {
                what,
                expected,
                got,
            } => write!(f, "requested {expected} {what}, got {got}"),
            FetchError::UnexpectedPayload { expected, got } => {
                write!(f, "requested {expected}, got {got}")
            }
            FetchError::UnsupportedResource(kind) => {
                write!(f, "cannot handle resource of type {kind}")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// The registry transport. One handle is shared by every in-flight fetch,
/// so implementations must be safe to call concurrently.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Returns the name of the transport, for logs.
    fn name(&self) -> &str;

    async fn list_modules(&self, remote: &str, owner: &str) -> Result<Vec<Module>, FetchError>;

    async fn list_commits(
        &self,
        remote: &str,
        owner: &str,
        module: &str,
    ) -> Result<Vec<Commit>, FetchError>;

    /// Downloads the contents of `owner/module:reference`. The remote may
    /// answer with any number of bundles; callers check the count.
    async fn download(
        &self,
        remote: &str,
        owner: &str,
        module: &str,
        reference: &str,
    ) -> Result<Vec<Content>, FetchError>;

    /// Looks up what `locator` names. `None` entries are kinds the wire
    /// decoding did not recognize.
    async fn get_resources(
        &self,
        remote: &str,
        locator: &Locator,
    ) -> Result<Vec<Option<Resource>>, FetchError>;
}
