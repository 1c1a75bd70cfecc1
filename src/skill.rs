//! Skill document discovery and metadata loading.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    diagnostics::Diagnostics,
    frontmatter::{Metadata, parse_metadata},
};

/// The expected skill file name within a skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// Directory holding one subfolder per skill.
pub const SKILLS_DIR: &str = "skills";

/// Directory holding one subfolder per plugin.
pub const PLUGINS_DIR: &str = "plugins";

/// Discovered skill documents keyed by skill identifier.
pub type SkillFiles = BTreeMap<String, PathBuf>;

/// Find every skill document under a root directory.
///
/// Scans `<root>/skills/<id>/SKILL.md` first, then
/// `<root>/plugins/<plugin>/skills/<id>/SKILL.md`. A later match for the same
/// identifier replaces the earlier one.
pub fn discover(root: &Path, diagnostics: &mut Diagnostics) -> SkillFiles {
    let mut skills = SkillFiles::new();
    scan_skills_dir(&root.join(SKILLS_DIR), &mut skills, diagnostics);

    for plugin in read_directory(&root.join(PLUGINS_DIR), diagnostics) {
        let plugin_dir = plugin.path();
        if !plugin_dir.is_dir() {
            continue;
        }
        scan_skills_dir(&plugin_dir.join(SKILLS_DIR), &mut skills, diagnostics);
    }

    skills
}

/// Add every `<dir>/<id>/SKILL.md` to the map.
fn scan_skills_dir(dir: &Path, skills: &mut SkillFiles, diagnostics: &mut Diagnostics) {
    for entry in read_directory(dir, diagnostics) {
        let skill_dir = entry.path();
        if !skill_dir.is_dir() {
            continue;
        }
        let skill_path = skill_dir.join(SKILL_FILE_NAME);
        if !skill_path.is_file() {
            continue;
        }
        let id = entry.file_name().to_string_lossy().into_owned();
        debug!(skill = %id, path = %skill_path.display(), "discovered skill document");
        if let Some(previous) = skills.insert(id.clone(), skill_path) {
            diagnostics.warn(format!(
                "skill '{id}' found more than once, ignoring {}",
                previous.display()
            ));
        }
    }
}

/// Read a directory and return sorted entries, returning empty on missing.
fn read_directory(path: &Path, diagnostics: &mut Diagnostics) -> Vec<fs::DirEntry> {
    let mut entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(error) if error.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(error) => {
            diagnostics.warn(format!(
                "failed to read directory {}: {error}",
                path.display()
            ));
            return Vec::new();
        }
    }
    .filter_map(|entry| entry.ok())
    .collect::<Vec<_>>();

    entries.sort_by_key(|entry| entry.file_name());
    entries
}

/// Read a skill document and extract its metadata block.
///
/// Unreadable documents are reported and treated as carrying no metadata.
pub fn load_metadata(skill_path: &Path, diagnostics: &mut Diagnostics) -> Metadata {
    match fs::read_to_string(skill_path) {
        Ok(contents) => {
            let metadata = parse_metadata(&contents);
            if metadata.is_empty() {
                debug!(path = %skill_path.display(), "no metadata block");
            } else {
                debug!(path = %skill_path.display(), fields = metadata.len(), "parsed metadata");
            }
            metadata
        }
        Err(error) => {
            diagnostics.warn_skipped(skill_path, error.to_string());
            Metadata::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{
        diagnostics::Diagnostics,
        skill::{SKILL_FILE_NAME, discover, load_metadata},
        testutil::{TestFixture, skill_document},
    };

    #[test]
    fn finds_flat_and_plugin_skills() {
        let fixture = TestFixture::new()
            .with_skill("python-pro", &skill_document("Python", &["python"]))
            .with_plugin_skill("context7-plugin", "context7", &skill_document("Docs", &[]));

        let found = discover(fixture.root(), &mut Diagnostics::new(false));

        assert_eq!(
            found.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["context7", "python-pro"]
        );
        assert_eq!(
            found["context7"],
            fixture
                .root()
                .join("plugins/context7-plugin/skills/context7")
                .join(SKILL_FILE_NAME)
        );
    }

    #[test]
    fn plugin_copy_wins_over_flat_copy() {
        let fixture = TestFixture::new()
            .with_skill("shared", &skill_document("flat", &[]))
            .with_plugin_skill("some-plugin", "shared", &skill_document("nested", &[]));

        let found = discover(fixture.root(), &mut Diagnostics::new(false));

        assert_eq!(found.len(), 1);
        assert!(found["shared"].starts_with(fixture.root().join("plugins")));
    }

    #[test]
    fn skips_files_and_folders_without_document() {
        let fixture = TestFixture::new().with_skill("real", &skill_document("x", &[]));
        let skills_dir = fixture.root().join("skills");
        fs::write(skills_dir.join("README.md"), "not a skill").expect("write file");
        fs::create_dir_all(skills_dir.join("empty")).expect("create dir");
        fs::create_dir_all(skills_dir.join("other")).expect("create dir");
        fs::write(skills_dir.join("other").join("README.md"), "no").expect("write file");
        fs::write(fixture.root().join("plugins").join("stray.txt"), "x").expect("write file");

        let found = discover(fixture.root(), &mut Diagnostics::new(false));

        assert_eq!(found.keys().collect::<Vec<_>>(), vec!["real"]);
    }

    #[test]
    fn missing_areas_are_not_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let found = discover(dir.path(), &mut Diagnostics::new(false));
        assert!(found.is_empty());
    }

    #[test]
    fn unreadable_document_has_no_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        let metadata = load_metadata(&dir.path().join("absent.md"), &mut Diagnostics::new(false));
        assert!(metadata.is_empty());
    }
}
