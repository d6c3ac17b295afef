//! Registry transport over the Connect protocol (unary, JSON codec).
//!
//! Every call is a `POST {base}/{package}.{Service}/{Method}` with a JSON
//! body. Success is HTTP 200 with the response message; anything else carries
//! a Connect error body `{"code": "...", "message": "..."}`.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::client::{FetchError, Registry};
use super::types::{Commit, Content, Module, Resource, WireResource};
use crate::core::config::{Credentials, DEFAULT_PAGE_SIZE};
use crate::core::locator::Locator;

const MODULE_SERVICE: &str = "buf.registry.module.v1.ModuleService";
const COMMIT_SERVICE: &str = "buf.registry.module.v1.CommitService";
const DOWNLOAD_SERVICE: &str = "buf.registry.module.v1.DownloadService";
const RESOURCE_SERVICE: &str = "buf.registry.module.v1.ResourceService";

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ListModulesResponse {
    modules: Vec<Module>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ListCommitsResponse {
    commits: Vec<Commit>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct DownloadResponse {
    contents: Vec<Content>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GetResourcesResponse {
    resources: Vec<WireResource>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ConnectError {
    code: String,
    message: String,
}

/// `{"owner": .., "module": .., "ref": ..}`, the `ResourceRef.Name` message.
fn resource_name(owner: &str, module: &str, reference: Option<&str>) -> Value {
    let mut name = json!({ "owner": owner, "module": module });
    if let Some(reference) = reference {
        name["ref"] = Value::String(reference.to_string());
    }
    name
}

pub struct ConnectClient {
    client: reqwest::Client,
    /// Replaces `https://{remote}` for every request when set.
    base_url: Option<String>,
    /// Only attached to requests for `auth_remote`.
    credentials: Option<Credentials>,
    auth_remote: String,
    page_size: u32,
}

impl ConnectClient {
    pub fn new(auth_remote: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: None,
            credentials,
            auth_remote: auth_remote.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn endpoint(&self, remote: &str, service: &str, method: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}/{service}/{method}"),
            None => format!("https://{remote}/{service}/{method}"),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        remote: &str,
        service: &str,
        method: &str,
        body: Value,
    ) -> Result<T, FetchError> {
        let url = self.endpoint(remote, service, method);
        debug!("Connect call {method} -> {url}");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Connect-Protocol-Version", "1")
            .json(&body);

        if remote == self.auth_remote
            && let Some(credentials) = &self.credentials
        {
            request = match &credentials.username {
                Some(username) => request.basic_auth(username, Some(&credentials.token)),
                None => request.bearer_auth(&credentials.token),
            };
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Connect {method} status: {status}");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            let error = serde_json::from_str::<ConnectError>(&body).unwrap_or(ConnectError {
                code: "unknown".to_string(),
                message: body,
            });
            warn!(
                "Connect {method} failed: HTTP {} {} - {}",
                status.as_u16(),
                error.code,
                error.message
            );
            return Err(FetchError::Api {
                status: status.as_u16(),
                code: error.code,
                message: error.message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse(format!("{method}: {e}")))
    }
}

#[async_trait]
impl Registry for ConnectClient {
    fn name(&self) -> &str {
        "connect"
    }

    async fn list_modules(&self, remote: &str, owner: &str) -> Result<Vec<Module>, FetchError> {
        let body = json!({
            "pageSize": self.page_size,
            "ownerRefs": [{ "name": owner }],
        });
        let response: ListModulesResponse = self
            .call(remote, MODULE_SERVICE, "ListModules", body)
            .await?;
        info!("Listed {} modules for owner {owner}", response.modules.len());
        Ok(response.modules)
    }

    async fn list_commits(
        &self,
        remote: &str,
        owner: &str,
        module: &str,
    ) -> Result<Vec<Commit>, FetchError> {
        let body = json!({
            "pageSize": self.page_size,
            "resourceRef": { "name": resource_name(owner, module, None) },
        });
        let response: ListCommitsResponse = self
            .call(remote, COMMIT_SERVICE, "ListCommits", body)
            .await?;
        info!(
            "Listed {} commits for {owner}/{module}",
            response.commits.len()
        );
        Ok(response.commits)
    }

    async fn download(
        &self,
        remote: &str,
        owner: &str,
        module: &str,
        reference: &str,
    ) -> Result<Vec<Content>, FetchError> {
        let body = json!({
            "values": [{
                "resourceRef": { "name": resource_name(owner, module, Some(reference)) },
            }],
        });
        let response: DownloadResponse = self
            .call(remote, DOWNLOAD_SERVICE, "Download", body)
            .await?;
        Ok(response.contents)
    }

    async fn get_resources(
        &self,
        remote: &str,
        locator: &Locator,
    ) -> Result<Vec<Option<Resource>>, FetchError> {
        let body = json!({
            "resourceRefs": [{
                "name": resource_name(
                    &locator.owner,
                    &locator.module,
                    locator.reference.as_deref(),
                ),
            }],
        });
        let response: GetResourcesResponse = self
            .call(remote, RESOURCE_SERVICE, "GetResources", body)
            .await?;
        Ok(response
            .resources
            .into_iter()
            .map(WireResource::into_resource)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uses_remote_by_default() {
        let client = ConnectClient::new("buf.build", None);
        assert_eq!(
            client.endpoint("buf.build", MODULE_SERVICE, "ListModules"),
            "https://buf.build/buf.registry.module.v1.ModuleService/ListModules"
        );
    }

    #[test]
    fn test_endpoint_base_url_override() {
        let client =
            ConnectClient::new("buf.build", None).with_base_url(Some("http://127.0.0.1:9000/".into()));
        assert_eq!(
            client.endpoint("buf.build", COMMIT_SERVICE, "ListCommits"),
            "http://127.0.0.1:9000/buf.registry.module.v1.CommitService/ListCommits"
        );
    }

    #[test]
    fn test_page_size_defaults_to_config_default() {
        assert_eq!(ConnectClient::new("buf.build", None).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(
            ConnectClient::new("buf.build", None).with_page_size(7).page_size,
            7
        );
    }

    #[test]
    fn test_resource_name_ref_is_optional() {
        assert_eq!(
            resource_name("bufbuild", "registry", None),
            json!({ "owner": "bufbuild", "module": "registry" })
        );
        assert_eq!(
            resource_name("bufbuild", "registry", Some("main")),
            json!({ "owner": "bufbuild", "module": "registry", "ref": "main" })
        );
    }
}
