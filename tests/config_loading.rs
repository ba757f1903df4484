use std::fs;
use std::path::PathBuf;

use cvrender::{Error, FailurePolicy, Page, RenderConfig, ResumeData, Section};
use tempfile::TempDir;

/// Write `contents` into a fresh directory that is removed when the
/// returned `TempDir` is dropped.
fn scratch_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create scratch dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write scratch file");
    (dir, path)
}

#[test]
fn config_file_reorders_sections() {
    let (_dir, path) = scratch_file(
        "order.json",
        r#"{ "failure_policy": "isolate", "sections": ["languages", "profile"] }"#,
    );
    let config = RenderConfig::from_path(&path).unwrap();
    assert_eq!(config.failure_policy, FailurePolicy::Isolate);
    assert_eq!(config.sections, vec![Section::Languages, Section::Profile]);

    let mut page = Page::with_default_template(ResumeData::bundled().unwrap(), config).unwrap();
    let report = page.dom_content_loaded().unwrap();
    assert_eq!(report.rendered, vec![Section::Languages, Section::Profile]);

    // Sections outside the configured list stay untouched
    let doc = page.document();
    let experience = doc.get_element_by_id("experience-container").unwrap();
    assert!(doc.children(experience).unwrap().is_empty());
}

#[test]
fn unknown_config_keys_are_rejected() {
    let (_dir, path) = scratch_file("typo.json", r#"{ "failure_polcy": "isolate" }"#);
    assert!(matches!(
        RenderConfig::from_path(&path),
        Err(Error::ConfigError(_))
    ));
}

#[test]
fn record_file_round_trips_through_loader() {
    let bundled = ResumeData::bundled().unwrap();
    let (_dir, path) = scratch_file("resume.json", &serde_json::to_string_pretty(&bundled).unwrap());
    let loaded = ResumeData::from_path(&path).unwrap();
    assert_eq!(loaded, bundled);
    assert_eq!(
        loaded.skills.iter().next().map(|g| g.category.as_str()),
        Some("Cloud Architecture")
    );
}

#[test]
fn missing_record_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");
    assert!(matches!(
        ResumeData::from_path(&path),
        Err(Error::LoadError(_))
    ));
}

#[test]
fn scratch_files_are_removed_with_their_dir() {
    let (dir, path) = scratch_file("gone.json", "{}");
    let root = dir.path().to_path_buf();
    assert!(path.exists());
    drop(dir);
    assert!(!root.exists());
}
