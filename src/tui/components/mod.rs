//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: remote and current path
//! - `HelpBar`: key hints for the current state
//!
//! ### Stateful Components
//!
//! - `NavigateInput`: owns its text buffer, emits `InputEvent::Submit`
//! - `ResourceTable`: borrows a `TableState` from `TuiState`
//! - `FileView`: borrows a `ScrollViewState` from `TuiState`
//!
//! Components render from their fields alone, so each one can be drawn
//! in isolation under `TestBackend`.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── title_bar.rs       (top line)
//! ├── navigate_input.rs  (locator / owner entry)
//! ├── resource_table.rs  (modules, commits, files)
//! ├── file_view.rs       (highlighted file contents)
//! └── help_bar.rs        (key hints)
//! ```

pub mod file_view;
pub mod help_bar;
pub mod navigate_input;
pub mod resource_table;
mod title_bar;

pub use file_view::FileView;
pub use help_bar::HelpBar;
pub use navigate_input::{InputEvent, NavigateInput};
pub use resource_table::ResourceTable;
pub use title_bar::TitleBar;
