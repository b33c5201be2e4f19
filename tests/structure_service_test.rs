//! Integration tests for StructureService: files, directories, unsupported kinds.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use doctree::application::{ApplicationError, HierarchyLoader, StructureService, TextSource};
use doctree::domain::{DomainError, StructureError};
use doctree::infrastructure::{FileSystem, RealFileSystem};
use doctree::util::testing;

fn resource(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources")
        .join(path)
}

fn service(hierarchy: &str) -> StructureService {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let hierarchy = HierarchyLoader::new(Arc::clone(&fs))
        .load(&resource(hierarchy))
        .unwrap();
    StructureService::new(fs, Arc::new(hierarchy))
}

fn extensions() -> Vec<String> {
    vec!["md".to_string(), "txt".to_string()]
}

// ============================================================
// Single documents
// ============================================================

#[test]
fn given_text_file_when_structuring_then_returns_tree() {
    testing::init_test_setup();
    let service = service("hierarchies/civil_code.toml");

    let tree = service
        .structure_file(&resource("documents/civil_code.txt"))
        .unwrap();

    assert_eq!(tree.sections_field(), "books");
    let book = &tree.sections()[0];
    assert_eq!(book.sections().len(), 2);
    assert_eq!(
        book.sections()[0].description(),
        Some("General provisions for persons.")
    );
}

#[test]
fn given_art_of_war_when_structuring_then_paragraphs_attach_to_chapters() {
    let service = service("hierarchies/art_of_war.json");

    let tree = service
        .structure_file(&resource("documents/art_of_war.txt"))
        .unwrap();

    let chapters = tree.sections();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].title(), "I");
    assert_eq!(chapters[0].description(), Some("Laying Plans"));
    let numbers: Vec<&str> = chapters[0].paragraph_nodes().map(|p| p.title()).collect();
    assert_eq!(numbers, vec!["1", "2"]);
    assert_eq!(chapters[1].paragraph_nodes().count(), 1);
}

#[test]
fn given_pdf_when_structuring_then_unsupported_document() {
    let temp = TempDir::new().unwrap();
    let pdf = temp.path().join("scan.pdf");
    fs::write(&pdf, b"%PDF-1.7").unwrap();

    let result = service("hierarchies/civil_code.toml").structure_file(&pdf);

    assert!(matches!(
        result,
        Err(ApplicationError::UnsupportedDocument { .. })
    ));
}

#[test]
fn given_missing_file_when_structuring_then_not_found() {
    let result = service("hierarchies/civil_code.toml")
        .structure_file(Path::new("/nonexistent/civil_code.txt"));

    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[test]
fn given_custom_source_when_structuring_then_uses_extracted_text() {
    struct FixedSource;
    impl TextSource for FixedSource {
        fn extract(&self, _path: &Path) -> doctree::application::ApplicationResult<String> {
            Ok("BOOK TWO\nTITLE Z".to_string())
        }
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let hierarchy = HierarchyLoader::new(Arc::clone(&fs))
        .load(&resource("hierarchies/civil_code.toml"))
        .unwrap();
    let service = StructureService::with_source(fs, Arc::new(FixedSource), Arc::new(hierarchy));

    let tree = service.structure_file(Path::new("scan.pdf")).unwrap();

    assert_eq!(tree.sections()[0].title(), "TWO");
}

// ============================================================
// Directories
// ============================================================

#[test]
fn given_directory_when_structuring_then_processes_matching_extensions_in_path_order() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("b.txt"), "BOOK B\nTITLE 1").unwrap();
    fs::write(root.join("nested/a.md"), "BOOK A").unwrap();
    fs::write(root.join("empty.txt"), "  \n").unwrap();
    fs::write(root.join("notes.rst"), "BOOK ignored").unwrap();

    // Act
    let outcomes = service("hierarchies/civil_code.toml")
        .structure_dir(root, &extensions())
        .unwrap();

    // Assert
    let names: Vec<String> = outcomes
        .iter()
        .map(|o| {
            o.path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(names, vec!["b.txt", "empty.txt", "nested/a.md"]);

    assert!(outcomes[0].result.is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(ApplicationError::Domain(DomainError::Structure(
            StructureError::EmptyInput
        )))
    ));
    assert_eq!(
        outcomes[2].result.as_ref().unwrap().sections()[0].title(),
        "A"
    );
}

#[test]
fn given_missing_directory_when_structuring_then_not_found() {
    let result = service("hierarchies/civil_code.toml")
        .structure_dir(Path::new("/nonexistent/docs"), &extensions());

    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}
