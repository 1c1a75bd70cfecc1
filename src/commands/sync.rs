//! Implementation of the `skill-index sync` command.

use std::path::Path;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;
use serde::Serialize;

use crate::{
    catalog::Catalog,
    commands::{ColorChoice, Location},
    diagnostics::Diagnostics,
    diff::{colorize_diff, unified_diff},
    error::{Error, Result},
    palette::{fmt_heading, fmt_label, fmt_skill_name, fmt_warning, fmt_warning_heading},
    paths::display_path,
    reconcile::{Corrections, Report, reconcile},
    skill::discover,
};

/// Indent for list entries under a heading.
const INDENT: &str = "  ";

/// How the sync report is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

/// Options for a sync run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Evaluate and report without writing the catalog.
    pub dry_run: bool,
    /// Print a unified diff of the catalog changes.
    pub show_diff: bool,
    /// Report output format.
    pub format: ReportFormat,
}

/// JSON shape of the sync report.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    /// Skills root that was scanned.
    root: String,
    /// Whether the catalog was left untouched.
    dry_run: bool,
    /// Reconciliation counts and drift lists.
    #[serde(flatten)]
    report: &'a Report,
}

/// Execute the sync command.
pub async fn run(
    color: ColorChoice,
    verbose: bool,
    location: Location,
    options: SyncOptions,
) -> Result<()> {
    let resolved = location.resolve()?;
    let use_color = color.enabled();
    let mut diagnostics = Diagnostics::new(verbose);

    if options.format == ReportFormat::Text {
        println!(
            "{} {}",
            fmt_label("Syncing index from:", use_color),
            display_path(&resolved.root)
        );
        println!("{} {}", fmt_label("Dry run:", use_color), options.dry_run);
    }

    let mut catalog = Catalog::load(&resolved.catalog_path)?;
    if options.format == ReportFormat::Text {
        println!(
            "{} {}",
            fmt_label("Last synced:", use_color),
            catalog.last_updated().unwrap_or("never")
        );
    }
    let before = if options.show_diff {
        Some(catalog.to_json()?)
    } else {
        None
    };

    let report = sync_catalog(
        &mut catalog,
        &resolved.root,
        resolved.config.corrections(),
        Local::now().date_naive(),
        options.dry_run,
        &mut diagnostics,
    )?;

    if options.format == ReportFormat::Text {
        println!();
    }

    if let Some(before) = before {
        let label = display_path(catalog.path());
        let diff = unified_diff(
            &format!("a/{label}"),
            &format!("b/{label}"),
            &before,
            &catalog.to_json()?,
        );
        print!("{}", colorize_diff(&diff, use_color));
    }

    match options.format {
        ReportFormat::Text => print_report(&report, options.dry_run, use_color),
        ReportFormat::Json => print_json(&report, &resolved.root, options.dry_run)?,
    }

    diagnostics.print_skipped_summary();
    diagnostics.print_warning_summary();
    Ok(())
}

/// Discover documents under `root`, reconcile, and write unless `dry_run`.
///
/// Nothing is written when any step before the write fails.
pub fn sync_catalog(
    catalog: &mut Catalog,
    root: &Path,
    corrections: &Corrections,
    today: NaiveDate,
    dry_run: bool,
    diagnostics: &mut Diagnostics,
) -> Result<Report> {
    let skill_files = discover(root, diagnostics);
    diagnostics.note(format!(
        "Found {} skill documents under {}",
        skill_files.len(),
        display_path(root)
    ));

    let report = reconcile(catalog, &skill_files, corrections, today, diagnostics);
    if !dry_run {
        catalog.save()?;
    }
    Ok(report)
}

/// Print the human-readable report.
fn print_report(report: &Report, dry_run: bool, use_color: bool) {
    println!("{}", fmt_heading("=== Sync Results ===", use_color));
    println!("Skills found on disk: {}", report.skills_found);
    println!("Triggers updated: {}", report.triggers_updated);
    println!("Descriptions added: {}", report.descriptions_added);
    println!("Categories fixed: {}", report.categories_fixed);

    print_id_list(
        "Skills on disk but NOT in index",
        &report.skills_not_in_index,
        use_color,
    );
    print_id_list(
        "Skills in index but NOT on disk",
        &report.index_skills_not_on_disk,
        use_color,
    );

    println!();
    if dry_run {
        println!("{}", fmt_warning("[DRY RUN - no changes written]", use_color));
    } else {
        println!("{}", fmt_label("[Index updated successfully]", use_color));
    }
}

/// Print a sorted list of skill ids under a heading, if non-empty.
fn print_id_list(heading: &str, ids: &[String], use_color: bool) {
    if ids.is_empty() {
        return;
    }

    let mut sorted = ids.to_vec();
    sorted.sort();

    println!();
    println!(
        "{}",
        fmt_warning_heading(&format!("{heading} ({}):", sorted.len()), use_color)
    );
    for id in sorted {
        println!("{INDENT}- {}", fmt_skill_name(&id, use_color));
    }
}

/// Print the report as one JSON object.
fn print_json(report: &Report, root: &Path, dry_run: bool) -> Result<()> {
    let output = JsonReport {
        root: root.display().to_string(),
        dry_run,
        report,
    };
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|error| Error::CatalogSerialize { source: error })?;
    println!("{rendered}");
    Ok(())
}
