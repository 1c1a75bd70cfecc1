//! Implementation of the `skill-index register` command.

use std::path::{Path, PathBuf};

use crate::{
    catalog::{Catalog, Registration, Seed},
    commands::{ColorChoice, Location},
    error::Result,
    palette::{fmt_label, fmt_skill_name, fmt_warning},
    paths::display_path,
};

/// Execute the register command.
pub async fn run(
    color: ColorChoice,
    location: Location,
    seed: PathBuf,
    dry_run: bool,
) -> Result<()> {
    let resolved = location.resolve()?;
    let use_color = color.enabled();

    let mut catalog = Catalog::load(&resolved.catalog_path)?;
    let registration = register_seed(&mut catalog, &seed, dry_run)?;

    print_list("Skills added:", &registration.added, use_color);
    print_list("Plugins updated:", &registration.linked, use_color);
    println!(
        "{} {}",
        fmt_label("Total skills now:", use_color),
        catalog.skills().len()
    );

    if dry_run {
        println!("{}", fmt_warning("[DRY RUN - no changes written]", use_color));
    } else {
        println!("Wrote {}", display_path(catalog.path()));
    }
    Ok(())
}

/// Apply a seed file to the catalog, saving unless `dry_run`.
pub fn register_seed(catalog: &mut Catalog, seed: &Path, dry_run: bool) -> Result<Registration> {
    let seed = Seed::load(seed)?;
    let registration = catalog.register(&seed)?;
    if !dry_run {
        catalog.save()?;
    }
    Ok(registration)
}

/// Print a labelled, comma-separated id list.
fn print_list(label: &str, ids: &[String], use_color: bool) {
    let ids = if ids.is_empty() {
        "none".to_string()
    } else {
        ids.iter()
            .map(|id| fmt_skill_name(id, use_color))
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("{} {ids}", fmt_label(label, use_color));
}
