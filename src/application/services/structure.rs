//! Document structuring service
//!
//! Applies one shared hierarchy to single texts, files, or whole directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::application::source::{PlainTextSource, TextSource};
use crate::application::{ApplicationError, ApplicationResult, ResultPathExt};
use crate::domain::{Gardener, LevelHierarchy, Tree};
use crate::infrastructure::traits::FileSystem;

/// Outcome for one document of a directory run.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub result: ApplicationResult<Tree>,
}

/// Service for turning document text into trees.
pub struct StructureService {
    fs: Arc<dyn FileSystem>,
    source: Arc<dyn TextSource>,
    hierarchy: Arc<LevelHierarchy>,
}

impl StructureService {
    /// Create a service reading plain-text documents.
    pub fn new(fs: Arc<dyn FileSystem>, hierarchy: Arc<LevelHierarchy>) -> Self {
        let source = Arc::new(PlainTextSource::new(Arc::clone(&fs)));
        Self::with_source(fs, source, hierarchy)
    }

    /// Create a service with a custom text source (e.g. an external extractor).
    pub fn with_source(
        fs: Arc<dyn FileSystem>,
        source: Arc<dyn TextSource>,
        hierarchy: Arc<LevelHierarchy>,
    ) -> Self {
        Self {
            fs,
            source,
            hierarchy,
        }
    }

    pub fn hierarchy(&self) -> &LevelHierarchy {
        &self.hierarchy
    }

    pub fn structure_text(&self, text: &str) -> ApplicationResult<Tree> {
        Ok(Gardener::new(&self.hierarchy).prune(text)?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn structure_file(&self, path: &Path) -> ApplicationResult<Tree> {
        let text = self.source.extract(path)?;
        self.structure_text(&text)
    }

    /// Structure every file below `dir` whose extension is in `extensions`.
    ///
    /// Documents are processed in parallel; a failing document is reported in its
    /// outcome and does not stop the others. Outcomes are sorted by path.
    #[instrument(level = "debug", skip(self))]
    pub fn structure_dir(
        &self,
        dir: &Path,
        extensions: &[String],
    ) -> ApplicationResult<Vec<DocumentOutcome>> {
        if !self.fs.is_dir(dir) {
            return Err(ApplicationError::NotFound(dir.to_path_buf()));
        }
        let files: Vec<PathBuf> = self
            .fs
            .list_files(dir)
            .with_path_context("list documents", dir)?
            .into_iter()
            .filter(|path| has_extension(path, extensions))
            .collect();
        debug!("structure_dir: {} candidate documents", files.len());

        let outcomes: Vec<DocumentOutcome> = files
            .into_par_iter()
            .map(|path| {
                let result = self.structure_file(&path);
                if let Err(e) = &result {
                    warn!("{}: {}", path.display(), e);
                }
                DocumentOutcome { path, result }
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(
            "structured {} documents in {} ({} failed)",
            outcomes.len(),
            dir.display(),
            failed
        );
        Ok(outcomes)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
}
