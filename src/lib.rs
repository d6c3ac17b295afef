//! regnav library exports for testing

pub mod core;
pub mod registry;
pub mod tui;

#[cfg(test)]
pub mod test_support;
