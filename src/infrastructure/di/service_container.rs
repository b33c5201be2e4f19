//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::{ApplicationResult, HierarchyLoader, StructureService};
use crate::config::Settings;
use crate::domain::LevelHierarchy;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    pub fn hierarchy_loader(&self) -> HierarchyLoader {
        HierarchyLoader::new(Arc::clone(&self.fs))
    }

    /// Load the hierarchy at `path` and build a service around it.
    pub fn structure_service(&self, path: &Path) -> ApplicationResult<StructureService> {
        let hierarchy: LevelHierarchy = self.hierarchy_loader().load(path)?;
        Ok(StructureService::new(
            Arc::clone(&self.fs),
            Arc::new(hierarchy),
        ))
    }
}
