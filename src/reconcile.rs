//! Reconciliation of the catalog against skill documents on disk.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::{
    catalog::{Catalog, SkillRecord},
    diagnostics::Diagnostics,
    frontmatter::Metadata,
    skill::{SkillFiles, load_metadata},
};

/// Category corrections keyed by skill id.
pub type Corrections = BTreeMap<String, String>;

/// Skills known to be filed under the wrong category.
const BUILTIN_CORRECTIONS: &[(&str, &str)] = &[
    ("python-pro", "languages"),
    ("javascript-pro", "languages"),
    ("typescript-pro", "languages"),
    ("cpp-pro", "languages"),
    ("rust-engineer", "languages"),
    ("golang-pro", "languages"),
    ("java-architect", "languages"),
    ("kotlin-specialist", "languages"),
    ("php-pro", "languages"),
    ("csharp-developer", "languages"),
    ("swift-expert", "languages"),
    ("sql-pro", "languages"),
    ("django-expert", "backend"),
    ("fastapi-expert", "backend"),
    ("flask-expert", "backend"),
    ("rails-expert", "backend"),
    ("laravel-specialist", "backend"),
    ("spring-boot-engineer", "backend"),
    ("nestjs-expert", "backend"),
    ("dotnet-core-expert", "backend"),
    ("react-dev", "frontend"),
    ("vue-expert", "frontend"),
    ("angular-architect", "frontend"),
    ("svelte-expert", "frontend"),
    ("flutter-expert", "mobile"),
    ("react-native-expert", "mobile"),
    ("devops-engineer", "devops"),
    ("kubernetes-specialist", "devops"),
    ("docker-management", "devops"),
    ("terraform-engineer", "devops"),
    ("cicd-pipelines", "devops"),
];

/// The built-in correction table.
pub fn default_corrections() -> Corrections {
    BUILTIN_CORRECTIONS
        .iter()
        .map(|(id, category)| ((*id).to_string(), (*category).to_string()))
        .collect()
}

/// Drift found and fixed by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Skill documents discovered on disk.
    pub skills_found: usize,
    /// Records whose trigger list was replaced.
    pub triggers_updated: usize,
    /// Records whose description was replaced or added.
    pub descriptions_added: usize,
    /// Records moved to their corrected category.
    pub categories_fixed: usize,
    /// Ids with a document on disk but no catalog record.
    pub skills_not_in_index: Vec<String>,
    /// Ids with a catalog record but no document on disk.
    pub index_skills_not_on_disk: Vec<String>,
}

impl Report {
    /// Total number of field updates applied to the catalog.
    pub fn updates(&self) -> usize {
        self.triggers_updated + self.descriptions_added + self.categories_fixed
    }
}

/// Merge on-disk metadata into the catalog and stamp it with `today`.
///
/// Documents win over the catalog for descriptions and triggers; corrections
/// apply only to ids that have a document. Records are never created or
/// removed here.
pub fn reconcile(
    catalog: &mut Catalog,
    skill_files: &SkillFiles,
    corrections: &Corrections,
    today: NaiveDate,
    diagnostics: &mut Diagnostics,
) -> Report {
    let mut report = Report {
        skills_found: skill_files.len(),
        ..Report::default()
    };

    for (id, skill_path) in skill_files {
        let metadata = load_metadata(skill_path, diagnostics);

        let Some(record) = catalog.skill_mut(id) else {
            report.skills_not_in_index.push(id.clone());
            continue;
        };

        let correction = corrections.get(id).map(String::as_str);
        apply_metadata(record, &metadata, correction, &mut report);
    }

    report.index_skills_not_on_disk = catalog
        .skills()
        .iter()
        .filter(|skill| !skill_files.contains_key(skill.id()))
        .map(|skill| skill.id().to_string())
        .collect();

    catalog.stamp(today);
    debug!(updates = report.updates(), "reconciliation finished");
    report
}

/// Update one record from its document.
fn apply_metadata(
    record: &mut SkillRecord,
    metadata: &Metadata,
    correction: Option<&str>,
    report: &mut Report,
) {
    if let Some(description) = metadata.description()
        && record.description() != Some(description)
    {
        debug!(skill = record.id(), "description updated");
        record.set_description(description);
        report.descriptions_added += 1;
    }

    if let Some(triggers) = metadata.triggers()
        && !record.triggers_match(triggers)
    {
        debug!(skill = record.id(), count = triggers.len(), "triggers updated");
        record.set_triggers(triggers);
        report.triggers_updated += 1;
    }

    if let Some(category) = correction
        && record.category() != Some(category)
    {
        debug!(
            skill = record.id(),
            from = record.category().unwrap_or("-"),
            to = category,
            "category corrected"
        );
        record.set_category(category);
        report.categories_fixed += 1;
    }
}
