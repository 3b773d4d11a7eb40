use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use hearth_core::validate_allocation;

use crate::errors::Result;

use super::{BudgetSnapshot, SnapshotStore};

const TMP_SUFFIX: &str = "tmp";

/// Plain JSON files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotStore;

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self, path: &Path) -> Result<BudgetSnapshot> {
        load_snapshot(path)
    }

    fn save(&self, snapshot: &BudgetSnapshot, path: &Path) -> Result<()> {
        save_snapshot(snapshot, path)
    }
}

/// Loads a snapshot, resolving legacy category funding on the way in.
pub fn load_snapshot(path: &Path) -> Result<BudgetSnapshot> {
    let data = fs::read_to_string(path)?;
    let snapshot: BudgetSnapshot = serde_json::from_str(&data)?;
    tracing::debug!(
        path = %path.display(),
        sources = snapshot.income_sources.len(),
        categories = snapshot.categories.len(),
        incomes = snapshot.incomes.len(),
        expenses = snapshot.expenses.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Writes the snapshot atomically by staging to a temporary file.
///
/// Every allocation rule is checked first; a malformed rule aborts the save
/// and leaves any existing file untouched.
pub fn save_snapshot(snapshot: &BudgetSnapshot, path: &Path) -> Result<()> {
    for category in &snapshot.categories {
        for allocation in &category.allocations {
            validate_allocation(allocation).map_err(|err| {
                tracing::warn!(category = %category.name, error = %err, "refusing to save snapshot");
                err
            })?;
        }
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = tmp_path(path);
    stage(&tmp, |file| file.write_all(json.as_bytes()))?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Creates `tmp`, fills it and syncs it. On failure the partial file is removed.
fn stage(tmp: &Path, fill: impl FnOnce(&mut File) -> io::Result<()>) -> io::Result<()> {
    let result = File::create(tmp).and_then(|mut file| {
        fill(&mut file)?;
        file.sync_all()
    });
    if result.is_err() {
        let _ = fs::remove_file(tmp);
    }
    result
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
