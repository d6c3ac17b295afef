//! # Core Navigation Logic
//!
//! regnav's business logic. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Locator (resolver)   │
//!                    │  • State (app data)     │
//!                    │  • Action (messages)    │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect::Fetch
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  Registry  │
//!     │  Adapter   │                          │  (connect) │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`locator`]: parses `[remote/]owner/module[:ref]`
//! - [`state`]: the `App` struct, all navigation state in one place
//! - [`action`]: the `Action` enum and `update()`
//! - [`present`]: rows, headers and timestamps as plain strings
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod locator;
pub mod present;
pub mod state;
