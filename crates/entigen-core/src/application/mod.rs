//! Application layer - orchestration of the generation run.
//!
//! Services coordinate the emitters; ports declare what the application
//! needs from the outside world (filesystem, descriptor persistence,
//! dependency-coordinate resolution, runtime features). All run-scoped
//! state lives in [`GenerationContext`], created once per run.

pub mod context;
pub mod emitters;
pub mod error;
pub mod ports;
pub mod services;

pub use context::GenerationContext;
pub use error::ApplicationError;
pub use services::{GenerateOptions, GenerationService, PhaseOutcome, RunReport};
