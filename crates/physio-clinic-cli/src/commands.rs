//! Command implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use physio_clinic_core::{Clinic, CsvTable, Group, Workbook};

/// Suggested file name when nothing was exported before.
const DEFAULT_EXPORT_NAME: &str = "groupsdata.json";

fn find_group<'a>(clinic: &'a Clinic, key: &str) -> Option<&'a Group> {
    let db = clinic.db();
    db.group(key).or_else(|| db.group_by_name(key))
}

pub fn status(clinic: &Clinic) -> Result<()> {
    let db = clinic.db();
    if db.groups.is_empty() {
        println!("No groups.");
        return Ok(());
    }
    println!(
        "{:<24} {:>8} {:>9} {:>8} {:>8} {:>6}",
        "group", "capacity", "available", "enrolled", "waiting", "paid"
    );
    for group in &db.groups {
        let Some(summary) = clinic.group_availability(&group.id) else {
            continue;
        };
        println!(
            "{:<24} {:>8} {:>9} {:>8} {:>8} {:>6}",
            group.name,
            summary.capacity,
            summary.available,
            summary.enrolled,
            summary.waitlisted,
            summary.active_subscriptions
        );
    }
    Ok(())
}

pub fn waitlist(clinic: &Clinic, key: &str) -> Result<()> {
    let group = find_group(clinic, key).with_context(|| format!("no group matches `{}`", key))?;
    let db = clinic.db();
    let waiting = db.waitlist(&group.id);
    if waiting.is_empty() {
        println!("Nobody is waiting for {}.", group.name);
    }
    for (position, membership) in waiting.iter().enumerate() {
        let name = db
            .patient(&membership.patient_id)
            .map(|p| p.full_name())
            .unwrap_or_else(|| membership.patient_id.clone());
        println!("{:>3}. {}", position + 1, name);
    }
    Ok(())
}

pub fn recalculate(clinic: &mut Clinic) -> Result<()> {
    clinic.recalculate_available()?;
    println!("Recalculated {} groups.", clinic.db().groups.len());
    Ok(())
}

pub fn export(clinic: &Clinic, path: Option<PathBuf>, with_bom: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => clinic
            .last_export_path()?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_NAME)),
    };
    let text = clinic.export_backup(with_bom)?;
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    clinic.remember_export_path(&path.to_string_lossy())?;
    tracing::info!(path = %path.display(), "backup exported");
    println!("Saved {}", path.display());
    Ok(())
}

pub fn import(clinic: &mut Clinic, path: &Path) -> Result<()> {
    let text = read(path)?;
    clinic.import_backup(&text)?;
    println!(
        "Imported {} patients and {} groups.",
        clinic.db().patients.len(),
        clinic.db().groups.len()
    );
    Ok(())
}

pub fn export_csv(clinic: &Clinic, table: &str, path: &Path) -> Result<()> {
    let table: CsvTable = match table.parse() {
        Ok(table) => table,
        Err(e) => bail!(e),
    };
    fs::write(path, clinic.export_csv(table))
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Saved {}", path.display());
    Ok(())
}

pub fn import_workbook(clinic: &mut Clinic, path: &Path) -> Result<()> {
    let workbook: Workbook = serde_json::from_str(&read(path)?)
        .with_context(|| format!("{} is not a workbook document", path.display()))?;
    let summary = clinic.import_workbook(&workbook)?;
    println!("{}", summary.message);
    Ok(())
}

pub fn settings(clinic: &mut Clinic, clinic_name: Option<String>) -> Result<()> {
    if let Some(name) = clinic_name {
        clinic.update_settings(name)?;
    }
    let name = clinic
        .db()
        .settings()
        .map(|s| s.clinic_name.as_str())
        .unwrap_or_default();
    println!("Clinic name: {}", name);
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
