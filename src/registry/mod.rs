pub mod client;
pub mod command;
pub mod connect;
pub mod types;

pub use client::{FetchError, Registry};
pub use command::{Fetch, Fetched};
pub use connect::ConnectClient;
pub use types::{Commit, Content, Digest, File, Label, Module, ModuleState, ModuleVisibility, Resource};
