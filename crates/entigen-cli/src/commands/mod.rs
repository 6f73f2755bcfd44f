//! Command handlers.

pub mod completions;
pub mod generate;
pub mod validate;
