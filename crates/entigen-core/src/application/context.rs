//! Per-run generation context.
//!
//! One [`GenerationContext`] is created per generation run and passed
//! explicitly to every component that needs a resolved driver coordinate.
//! It owns the memoized resolution cache, scoped to the run's lifetime -
//! there is no global or thread-keyed state anywhere in the engine.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use crate::application::ports::{DependencyResolver, DriverArtifact};
use crate::error::EntigenResult;

/// Run-scoped state shared by the emitters.
pub struct GenerationContext<'a> {
    resolver: &'a dyn DependencyResolver,
    /// Memoized lookups, keyed by logical database name. A run is
    /// single-threaded, so interior mutability via `RefCell` suffices.
    cache: RefCell<HashMap<String, DriverArtifact>>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(resolver: &'a dyn DependencyResolver) -> Self {
        Self {
            resolver,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve driver coordinates, consulting the external resolver at most
    /// once per database name for the lifetime of the run.
    pub fn resolve(&self, database: &str) -> EntigenResult<DriverArtifact> {
        if let Some(hit) = self.cache.borrow().get(database) {
            debug!(database, "dependency cache hit");
            return Ok(hit.clone());
        }
        let artifact = self.resolver.resolve(database)?;
        self.cache
            .borrow_mut()
            .insert(database.to_string(), artifact.clone());
        Ok(artifact)
    }
}
