//! Registry resource types, as carried by the Connect JSON encoding.
//!
//! Field names follow proto3 JSON (lowerCamelCase), enums arrive as their
//! full proto names, `bytes` as standard base64 and timestamps as RFC 3339.
//! Zero values are omitted on the wire, so every field is defaulted.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleVisibility {
    #[serde(rename = "MODULE_VISIBILITY_PUBLIC")]
    Public,
    #[serde(rename = "MODULE_VISIBILITY_PRIVATE")]
    Private,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ModuleVisibility {
    pub fn label(&self) -> &'static str {
        match self {
            ModuleVisibility::Public => "public",
            ModuleVisibility::Private => "private",
            ModuleVisibility::Unknown => "unknown",
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleState {
    #[serde(rename = "MODULE_STATE_ACTIVE")]
    Active,
    #[serde(rename = "MODULE_STATE_DEPRECATED")]
    Deprecated,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ModuleState {
    pub fn label(&self) -> &'static str {
        match self {
            ModuleState::Active => "active",
            ModuleState::Deprecated => "deprecated",
            ModuleState::Unknown => "unknown",
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub description: String,
    pub url: String,
    pub visibility: ModuleVisibility,
    pub state: ModuleState,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub default_label_name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Digest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "from_base64")]
    pub value: Vec<u8>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Commit {
    pub id: String,
    pub owner_id: String,
    pub module_id: String,
    pub create_time: Option<DateTime<Utc>>,
    pub digest: Option<Digest>,
    pub created_by_user_id: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub module_id: String,
    pub commit_id: String,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct File {
    pub path: String,
    #[serde(deserialize_with = "from_base64")]
    pub content: Vec<u8>,
}

/// One downloaded commit: the commit itself plus all of its files.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Content {
    pub commit: Option<Commit>,
    pub files: Vec<File>,
}

/// The remote's answer to a locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Module(Module),
    Commit(Commit),
    Label(Label),
}

impl Resource {
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Module(_) => "module",
            Resource::Commit(_) => "commit",
            Resource::Label(_) => "label",
        }
    }
}

/// Wire form of a resource: a oneof, so at most one key is set.
/// An empty value means the remote sent a kind this client does not know.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct WireResource {
    pub module: Option<Module>,
    pub commit: Option<Commit>,
    pub label: Option<Label>,
}

impl WireResource {
    pub fn into_resource(self) -> Option<Resource> {
        match (self.module, self.commit, self.label) {
            (Some(module), None, None) => Some(Resource::Module(module)),
            (None, Some(commit), None) => Some(Resource::Commit(commit)),
            (None, None, Some(label)) => Some(Resource::Label(label)),
            _ => None,
        }
    }
}

fn from_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    STANDARD
        .decode(encoded.as_bytes())
        .map_err(serde::de::Error::custom)
}
