//! The skills catalog file: loading, in-place edits and persistence.
//!
//! The catalog is kept as the parsed JSON document so that fields this tool
//! does not know about, and the order of every key, survive a rewrite. Skill
//! and plugin records are lifted out into typed wrappers on load and put back
//! into their original slot on save.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    result::Result as StdResult,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};

/// Default catalog file name under the skills root.
pub const CATALOG_FILE_NAME: &str = "SKILLS_INDEX.json";

/// Key of the skill record array.
const SKILLS_KEY: &str = "skills";
/// Key of the plugin record array.
const PLUGINS_KEY: &str = "plugins";
/// Key of the process metadata object.
const META_KEY: &str = "meta";
/// Key of the last-synced date inside `meta`.
const LAST_UPDATED_KEY: &str = "lastUpdated";

/// One entry of the `skills` array.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillRecord {
    /// Skill identifier, copied out of `fields` on load.
    id: String,
    /// Every field of the record in file order.
    fields: Map<String, Value>,
}

impl SkillRecord {
    /// Wrap a JSON value, requiring an object with a string `id`.
    fn from_value(value: Value, index: usize) -> StdResult<Self, String> {
        let Value::Object(fields) = value else {
            return Err(format!("skills[{index}] is not an object"));
        };
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("skills[{index}] has no string 'id'"))?
            .to_string();
        Ok(Self { id, fields })
    }

    /// The skill identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read a string field.
    fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// The current category.
    pub fn category(&self) -> Option<&str> {
        self.get_str("category")
    }

    /// Replace the category.
    pub fn set_category(&mut self, category: &str) {
        self.fields
            .insert("category".to_string(), Value::String(category.to_string()));
    }

    /// The current description.
    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    /// Replace the description.
    pub fn set_description(&mut self, description: &str) {
        self.fields.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
    }

    /// The trigger phrases, when stored as an array of strings.
    pub fn triggers(&self) -> Option<Vec<&str>> {
        self.fields
            .get("triggers")?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    /// True when the stored triggers equal `triggers` element by element.
    pub fn triggers_match(&self, triggers: &[String]) -> bool {
        self.triggers()
            .is_some_and(|stored| stored.into_iter().eq(triggers.iter().map(String::as_str)))
    }

    /// Replace the trigger phrases.
    pub fn set_triggers(&mut self, triggers: &[String]) {
        let items = triggers.iter().cloned().map(Value::String).collect();
        self.fields
            .insert("triggers".to_string(), Value::Array(items));
    }
}

/// One entry of the `plugins` array.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginRecord {
    /// Plugin identifier.
    id: String,
    /// Every field of the record in file order.
    fields: Map<String, Value>,
}

impl PluginRecord {
    /// Wrap a JSON value, requiring an object with a string `id`.
    fn from_value(value: Value, index: usize) -> StdResult<Self, String> {
        let Value::Object(fields) = value else {
            return Err(format!("plugins[{index}] is not an object"));
        };
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("plugins[{index}] has no string 'id'"))?
            .to_string();
        Ok(Self { id, fields })
    }

    /// The skill this plugin points back to.
    pub fn skill(&self) -> Option<&str> {
        self.fields.get("skill").and_then(Value::as_str)
    }

    /// Point the plugin at a skill.
    fn set_skill(&mut self, skill: &str) {
        self.fields
            .insert("skill".to_string(), Value::String(skill.to_string()));
    }
}

/// A full skill record supplied for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSkill {
    /// Skill identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Trigger phrases.
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Free-text description.
    pub description: String,
    /// CLI tool the skill wraps.
    #[serde(default)]
    pub cli: Option<String>,
    /// External integration the skill wraps.
    #[serde(default)]
    pub mcp: Option<String>,
    /// Parent plugin.
    #[serde(default)]
    pub plugin: Option<String>,
    /// Origin tag.
    pub source: String,
}

/// Registration input: new records plus plugin back-references.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    /// Records to append when their id is not yet cataloged.
    #[serde(default)]
    pub skills: Vec<NewSkill>,
    /// Plugin id to skill id links.
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl Seed {
    /// Load a seed file written in YAML or JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|error| Error::SeedRead {
            path: path.to_path_buf(),
            source: error,
        })?;
        serde_yaml::from_str(&contents).map_err(|error| Error::SeedParse {
            path: path.to_path_buf(),
            source: error,
        })
    }
}

/// Outcome of [`Catalog::register`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Skill ids appended to the catalog.
    pub added: Vec<String>,
    /// Plugin ids whose skill link changed.
    pub linked: Vec<String>,
}

/// In-memory catalog document.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Location the catalog was loaded from.
    path: PathBuf,
    /// Top-level document; the skill and plugin slots hold placeholders.
    document: Map<String, Value>,
    /// Skill records in file order.
    skills: Vec<SkillRecord>,
    /// Position of each skill id in `skills`.
    positions: HashMap<String, usize>,
    /// Plugin records, `None` when the file has no plugin array.
    plugins: Option<Vec<PluginRecord>>,
}

impl Catalog {
    /// Load a catalog from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(Error::CatalogMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(error) => {
                return Err(Error::CatalogRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };
        Self::from_json(path, &contents)
    }

    /// Parse catalog contents that were read from `path`.
    pub fn from_json(path: &Path, contents: &str) -> Result<Self> {
        let shape_error = |message: String| Error::CatalogShape {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = serde_json::from_str(contents).map_err(|error| Error::CatalogParse {
            path: path.to_path_buf(),
            source: error,
        })?;
        let Value::Object(mut document) = value else {
            return Err(shape_error("top level is not an object".to_string()));
        };

        let skills = match document.get_mut(SKILLS_KEY).map(Value::take) {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| SkillRecord::from_value(item, index))
                .collect::<StdResult<Vec<_>, _>>()
                .map_err(shape_error)?,
            Some(_) => return Err(shape_error("'skills' is not an array".to_string())),
            None => return Err(shape_error("missing 'skills' array".to_string())),
        };

        let plugins = match document.get_mut(PLUGINS_KEY).map(Value::take) {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| PluginRecord::from_value(item, index))
                    .collect::<StdResult<Vec<_>, _>>()
                    .map_err(shape_error)?,
            ),
            Some(_) => return Err(shape_error("'plugins' is not an array".to_string())),
            None => None,
        };

        let mut positions = HashMap::new();
        for (index, skill) in skills.iter().enumerate() {
            if positions.insert(skill.id.clone(), index).is_some() {
                return Err(shape_error(format!("duplicate skill id '{}'", skill.id)));
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            document,
            skills,
            positions,
            plugins,
        })
    }

    /// Location of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Skill records in catalog order.
    pub fn skills(&self) -> &[SkillRecord] {
        &self.skills
    }

    /// Plugin records in catalog order.
    #[cfg(test)]
    pub fn plugins(&self) -> &[PluginRecord] {
        self.plugins.as_deref().unwrap_or_default()
    }

    /// Look up a skill by id.
    pub fn skill(&self, id: &str) -> Option<&SkillRecord> {
        self.positions.get(id).map(|index| &self.skills[*index])
    }

    /// Look up a skill by id for editing.
    pub fn skill_mut(&mut self, id: &str) -> Option<&mut SkillRecord> {
        let index = *self.positions.get(id)?;
        self.skills.get_mut(index)
    }

    /// True when a skill with this id is cataloged.
    pub fn contains(&self, id: &str) -> bool {
        self.skill(id).is_some()
    }

    /// The `meta.lastUpdated` value, if any.
    pub fn last_updated(&self) -> Option<&str> {
        self.document
            .get(META_KEY)?
            .get(LAST_UPDATED_KEY)?
            .as_str()
    }

    /// Record `date` as the last sync date, creating `meta` when needed.
    pub fn stamp(&mut self, date: NaiveDate) {
        let stamp = Value::String(date.format("%Y-%m-%d").to_string());
        match self.document.get_mut(META_KEY) {
            Some(Value::Object(meta)) => {
                meta.insert(LAST_UPDATED_KEY.to_string(), stamp);
            }
            _ => {
                let mut meta = Map::new();
                meta.insert(LAST_UPDATED_KEY.to_string(), stamp);
                self.document.insert(META_KEY.to_string(), Value::Object(meta));
            }
        }
    }

    /// Append new skills and update plugin links.
    ///
    /// Skills whose id is already cataloged are left untouched.
    pub fn register(&mut self, seed: &Seed) -> Result<Registration> {
        let mut registration = Registration::default();

        for skill in &seed.skills {
            if self.contains(&skill.id) {
                continue;
            }
            let value =
                serde_json::to_value(skill).map_err(|error| Error::CatalogSerialize { source: error })?;
            let record = SkillRecord::from_value(value, self.skills.len()).map_err(|message| {
                Error::CatalogShape {
                    path: self.path.clone(),
                    message,
                }
            })?;
            self.positions.insert(record.id.clone(), self.skills.len());
            self.skills.push(record);
            registration.added.push(skill.id.clone());
        }

        if let Some(plugins) = &mut self.plugins {
            for plugin in plugins.iter_mut() {
                let Some(skill) = seed.links.get(&plugin.id) else {
                    continue;
                };
                if plugin.skill() != Some(skill.as_str()) {
                    plugin.set_skill(skill);
                    registration.linked.push(plugin.id.clone());
                }
            }
        }

        Ok(registration)
    }

    /// Render the catalog the way it is written to disk.
    pub fn to_json(&self) -> Result<String> {
        let mut document = self.document.clone();
        let skills = self
            .skills
            .iter()
            .map(|skill| Value::Object(skill.fields.clone()))
            .collect();
        document.insert(SKILLS_KEY.to_string(), Value::Array(skills));
        if let Some(plugins) = &self.plugins {
            let plugins = plugins
                .iter()
                .map(|plugin| Value::Object(plugin.fields.clone()))
                .collect();
            document.insert(PLUGINS_KEY.to_string(), Value::Array(plugins));
        }

        let mut rendered = serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|error| Error::CatalogSerialize { source: error })?;
        rendered.push('\n');
        Ok(rendered)
    }

    /// Replace the catalog file with the current contents.
    pub fn save(&self) -> Result<()> {
        let rendered = self.to_json()?;
        let write_error = |error: io::Error| Error::CatalogWrite {
            path: self.path.clone(),
            source: error,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            file.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_error)?;
        }
        file.write_all(rendered.as_bytes()).map_err(write_error)?;
        file.persist(&self.path)
            .map_err(|error| write_error(error.error))?;

        info!(path = %self.path.display(), skills = self.skills.len(), "catalog written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::{
        catalog::{Catalog, NewSkill, Seed},
        error::Error,
        testutil::{catalog_json, skill_record},
    };

    fn parse(contents: &str) -> Catalog {
        Catalog::from_json(Path::new("SKILLS_INDEX.json"), contents).expect("catalog parses")
    }

    fn new_skill(id: &str) -> NewSkill {
        NewSkill {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: "integrations".to_string(),
            triggers: vec![format!("use {id}")],
            description: format!("The {id} skill"),
            cli: None,
            mcp: Some(id.to_string()),
            plugin: Some(format!("{id}-plugin")),
            source: "tests".to_string(),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = Catalog::load(&dir.path().join("SKILLS_INDEX.json")).expect_err("missing");
        assert!(matches!(error, Error::CatalogMissing { .. }));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let error = Catalog::from_json(Path::new("x.json"), "{ nope").expect_err("invalid");
        assert!(matches!(error, Error::CatalogParse { .. }));
    }

    #[test]
    fn rejects_unexpected_layout() {
        for contents in [
            "[]",
            "{\"plugins\": []}",
            "{\"skills\": {}}",
            "{\"skills\": [{\"name\": \"no id\"}]}",
            "{\"skills\": [], \"plugins\": [1]}",
            "{\"skills\": [{\"id\": \"a\"}, {\"id\": \"a\"}]}",
        ] {
            let error = Catalog::from_json(Path::new("x.json"), contents).expect_err(contents);
            assert!(matches!(error, Error::CatalogShape { .. }), "{contents}");
        }
    }

    #[test]
    fn round_trip_preserves_order_and_unknown_fields() {
        let contents = "{\n  \"version\": 3,\n  \"meta\": {\n    \"lastUpdated\": \"2025-01-01\",\n    \"maintainer\": \"Zoë\"\n  },\n  \"skills\": [\n    {\n      \"source\": \"local\",\n      \"id\": \"zeta\",\n      \"cli\": null,\n      \"extra\": {\n        \"nested\": [\n          1,\n          2\n        ]\n      }\n    }\n  ],\n  \"plugins\": [\n    {\n      \"id\": \"p\",\n      \"skill\": null\n    }\n  ],\n  \"trailer\": true\n}\n";
        let catalog = parse(contents);
        let rendered = catalog.to_json().expect("render");
        assert_eq!(rendered, contents);

        let reloaded = parse(&rendered);
        assert_eq!(reloaded.skills(), catalog.skills());
        assert_eq!(reloaded.plugins(), catalog.plugins());
    }

    #[test]
    fn new_fields_are_appended_and_existing_ones_stay_in_place() {
        let mut catalog = parse(&catalog_json(&[skill_record("a", "misc", None, None)]));
        let skill = catalog.skill_mut("a").expect("skill");
        skill.set_category("languages");
        skill.set_description("added");

        let rendered = catalog.to_json().expect("render");
        let value: Value = serde_json::from_str(&rendered).expect("json");
        let keys: Vec<_> = value["skills"][0]
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["id", "name", "category", "description"]);
        assert_eq!(value["skills"][0]["category"], "languages");
    }

    #[test]
    fn stamp_creates_or_updates_meta() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).expect("date");

        let mut without_meta = parse("{\"skills\": []}");
        without_meta.stamp(date);
        assert_eq!(without_meta.last_updated(), Some("2026-03-09"));

        let mut with_meta = parse("{\"meta\": {\"lastUpdated\": \"2020-01-01\", \"n\": 1}, \"skills\": []}");
        with_meta.stamp(date);
        assert_eq!(with_meta.last_updated(), Some("2026-03-09"));
        assert!(with_meta.to_json().expect("render").contains("\"n\": 1"));
    }

    #[test]
    fn triggers_compare_in_order() {
        let catalog = parse(&catalog_json(&[skill_record(
            "a",
            "misc",
            Some("d"),
            Some(&["one", "two"][..]),
        )]));
        let skill = catalog.skill("a").expect("skill");
        assert!(skill.triggers_match(&["one".to_string(), "two".to_string()]));
        assert!(!skill.triggers_match(&["two".to_string(), "one".to_string()]));
        assert!(!skill.triggers_match(&["one".to_string()]));
        assert_eq!(skill.triggers(), Some(vec!["one", "two"]));
    }

    #[test]
    fn save_writes_pretty_json_with_trailing_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("SKILLS_INDEX.json");
        fs::write(&path, "{\"skills\":[{\"id\":\"a\",\"description\":\"naïve café\"}]}")
            .expect("write catalog");

        let catalog = Catalog::load(&path).expect("load");
        catalog.save().expect("save");

        let written = fs::read_to_string(&path).expect("read back");
        assert_eq!(
            written,
            "{\n  \"skills\": [\n    {\n      \"id\": \"a\",\n      \"description\": \"naïve café\"\n    }\n  ]\n}\n"
        );
        let leftovers = fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn register_appends_new_skills_and_links_plugins() {
        let mut catalog = parse(
            "{\"skills\": [{\"id\": \"playwright\"}], \"plugins\": [{\"id\": \"context7-plugin\"}, {\"id\": \"playwright-plugin\", \"skill\": \"playwright\"}, {\"id\": \"other\"}]}",
        );
        let seed = Seed {
            skills: vec![new_skill("context7"), new_skill("playwright")],
            links: [
                ("context7-plugin".to_string(), "context7".to_string()),
                ("playwright-plugin".to_string(), "playwright".to_string()),
            ]
            .into_iter()
            .collect(),
        };

        let registration = catalog.register(&seed).expect("register");

        assert_eq!(registration.added, vec!["context7"]);
        assert_eq!(registration.linked, vec!["context7-plugin"]);
        assert_eq!(catalog.skills().len(), 2);
        assert_eq!(catalog.plugins()[0].skill(), Some("context7"));
        assert_eq!(catalog.plugins()[2].skill(), None);

        let added = catalog.skill("context7").expect("added");
        assert_eq!(added.category(), Some("integrations"));
        let rendered = catalog.to_json().expect("render");
        assert!(rendered.contains("\"name\": \"CONTEXT7\""));
        assert!(rendered.contains("\"cli\": null"));

        let again = catalog.register(&seed).expect("register again");
        assert!(again.added.is_empty());
        assert!(again.linked.is_empty());
    }

    #[test]
    fn seed_files_accept_yaml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("seed.yaml");
        fs::write(
            &path,
            "skills:\n  - id: remotion\n    name: Remotion\n    category: design\n    triggers: [create video]\n    description: Videos from React\n    mcp: remotion\n    source: tests\nlinks:\n  remotion-plugin: remotion\n",
        )
        .expect("write seed");

        let seed = Seed::load(&path).expect("seed parses");
        assert_eq!(seed.skills.len(), 1);
        assert_eq!(seed.skills[0].cli, None);
        assert_eq!(seed.links["remotion-plugin"], "remotion");
    }
}
