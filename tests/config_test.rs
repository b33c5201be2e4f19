//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Local: UNION with negation support (project adds its own extensions)
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use doctree::config::{local_config_path, Settings};
use doctree::infrastructure::ServiceContainer;

// ============================================================
// Settings::load() local config tests
// ============================================================

#[test]
fn given_no_local_config_when_load_then_returns_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert!(settings.extensions.contains(&"txt".to_string()));
    assert!(settings.extensions.contains(&"md".to_string()));
}

#[test]
fn given_local_config_with_extensions_when_load_then_unions_with_current() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"extensions = ["rst"]"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert: defaults ["md", "txt"] plus "rst"
    assert!(settings.extensions.contains(&"rst".to_string()));
    assert!(settings.extensions.contains(&"txt".to_string()));
}

#[test]
fn given_local_config_with_negation_when_load_then_removes_negated_item() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"extensions = ["!md"]"#,
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert!(!settings.extensions.contains(&"md".to_string()));
}

#[test]
fn given_relative_hierarchy_in_local_config_when_load_then_resolves_against_project() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
hierarchy = "levels/civil_code.toml"
wrap_root = true
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(
        settings.hierarchy,
        Some(project.path().join("levels/civil_code.toml"))
    );
    assert!(settings.wrap_root);
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "pretty = \"maybe\"").unwrap();

    let result = Settings::load(Some(project.path()));

    assert!(result.is_err());
}

// ============================================================
// Template and container wiring
// ============================================================

#[test]
fn given_template_when_parsed_then_yields_default_settings() {
    let parsed: Settings = toml::from_str(&Settings::template()).unwrap();

    assert_eq!(parsed, Settings::default());
}

#[test]
fn given_container_when_building_structure_service_then_loads_hierarchy() {
    let container = ServiceContainer::new(Settings::default());
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/hierarchies/civil_code.toml");

    let service = container.structure_service(&path).unwrap();

    assert_eq!(service.hierarchy().leaf().name(), "article");
    let tree = service.structure_text("BOOK ONE").unwrap();
    assert_eq!(tree.node_count(), 1);
}
