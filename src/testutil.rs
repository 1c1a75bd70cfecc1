//! Test utilities for setting up mock skill trees.
//!
//! This module provides a `TestFixture` builder for creating an isolated
//! skills root with a catalog, flat skills and plugin skills.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value, json};
use tempfile::TempDir;

use crate::{
    catalog::{CATALOG_FILE_NAME, Catalog},
    skill::{PLUGINS_DIR, SKILL_FILE_NAME, SKILLS_DIR},
};

/// Skill document with a description and optional trigger list.
pub fn skill_document(description: &str, triggers: &[&str]) -> String {
    let mut contents = format!("---\nname: test-skill\ndescription: {description}\n");
    if !triggers.is_empty() {
        contents.push_str("triggers:\n");
        for trigger in triggers {
            contents.push_str(&format!("  - {trigger}\n"));
        }
    }
    contents.push_str("---\n\n# Skill\n");
    contents
}

/// Catalog skill record with the commonly synced fields.
pub fn skill_record(
    id: &str,
    category: &str,
    description: Option<&str>,
    triggers: Option<&[&str]>,
) -> Value {
    let mut record = Map::new();
    record.insert("id".to_string(), json!(id));
    record.insert("name".to_string(), json!(id));
    record.insert("category".to_string(), json!(category));
    if let Some(description) = description {
        record.insert("description".to_string(), json!(description));
    }
    if let Some(triggers) = triggers {
        record.insert("triggers".to_string(), json!(triggers));
    }
    Value::Object(record)
}

/// Full catalog document around a list of skill records.
pub fn catalog_json(skills: &[Value]) -> String {
    let document = json!({
        "meta": { "lastUpdated": "2000-01-01" },
        "skills": skills,
        "plugins": [],
    });
    let mut rendered = serde_json::to_string_pretty(&document).expect("render catalog");
    rendered.push('\n');
    rendered
}

/// Test fixture for an isolated skills root.
pub struct TestFixture {
    /// Root temp directory (holds everything).
    root: TempDir,
}

impl TestFixture {
    /// Create a root with empty skills and plugins areas.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        fs::create_dir_all(root.path().join(SKILLS_DIR)).expect("create skills dir");
        fs::create_dir_all(root.path().join(PLUGINS_DIR)).expect("create plugins dir");
        Self { root }
    }

    /// Write the catalog file with the given skill records.
    pub fn with_catalog(self, skills: &[Value]) -> Self {
        fs::write(self.catalog_path(), catalog_json(skills)).expect("write catalog");
        self
    }

    /// Add a skill under `skills/<id>/`.
    pub fn with_skill(self, id: &str, contents: &str) -> Self {
        let skill_dir = self.root().join(SKILLS_DIR).join(id);
        write_skill(&skill_dir, contents);
        self
    }

    /// Add a skill under `plugins/<plugin>/skills/<id>/`.
    pub fn with_plugin_skill(self, plugin: &str, id: &str, contents: &str) -> Self {
        let skill_dir = self
            .root()
            .join(PLUGINS_DIR)
            .join(plugin)
            .join(SKILLS_DIR)
            .join(id);
        write_skill(&skill_dir, contents);
        self
    }

    /// Get the skills root.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Get the catalog file path.
    pub fn catalog_path(&self) -> PathBuf {
        self.root().join(CATALOG_FILE_NAME)
    }

    /// Read the catalog file as written on disk.
    pub fn read_catalog(&self) -> String {
        fs::read_to_string(self.catalog_path()).expect("read catalog")
    }

    /// Load the catalog written by `with_catalog`.
    pub fn catalog(&self) -> Catalog {
        Catalog::load(&self.catalog_path()).expect("load catalog")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a skill directory holding a document.
fn write_skill(skill_dir: &Path, contents: &str) {
    fs::create_dir_all(skill_dir).expect("create skill dir");
    fs::write(skill_dir.join(SKILL_FILE_NAME), contents).expect("write skill");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_empty_fixture() {
        let fixture = TestFixture::new();
        assert!(fixture.root().join(SKILLS_DIR).is_dir());
        assert!(fixture.root().join(PLUGINS_DIR).is_dir());
        assert!(!fixture.catalog_path().exists());
    }

    #[test]
    fn writes_loadable_catalog() {
        let fixture = TestFixture::new().with_catalog(&[skill_record("a", "misc", None, None)]);
        let catalog = fixture.catalog();
        assert!(catalog.contains("a"));
        assert_eq!(catalog.last_updated(), Some("2000-01-01"));
    }

    #[test]
    fn documents_omit_empty_trigger_lists() {
        let contents = skill_document("d", &[]);
        assert!(!contents.contains("triggers"));
        assert!(skill_document("d", &["x"]).contains("  - x\n"));
    }
}
