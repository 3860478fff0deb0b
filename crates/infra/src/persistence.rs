//! JSON snapshots of the catalog in the temp folder.
//!
//! A dump drains the catalog into `<timestamp>.<ext>`; a restore loads the
//! oldest such file back and deletes it.

use std::path::{Path, PathBuf};

use chrono::Utc;

use prodcat_catalog::{Catalog, CatalogSnapshot};

use crate::config::CatalogConfig;
use crate::error::InfraError;

/// Drain `catalog` into a new snapshot file and return its path.
///
/// The file is written while the catalog's write lock is held; if writing
/// fails the catalog keeps its contents.
pub fn dump_snapshot(catalog: &Catalog, config: &CatalogConfig) -> Result<PathBuf, InfraError> {
    let folder = &config.temp_folder;
    std::fs::create_dir_all(folder).map_err(|e| InfraError::io(folder, e))?;

    let path = config.snapshot_file(Utc::now());
    let snapshot = catalog.drain_with(|snapshot| write_snapshot(&path, snapshot))?;

    tracing::info!(
        file = %path.display(),
        products = snapshot.len(),
        reviews = snapshot.review_count(),
        "catalog dumped"
    );
    Ok(path)
}

/// Load the oldest snapshot file into `catalog`, replacing its contents, and
/// delete the file. `None` when there is nothing to restore.
pub fn restore_snapshot(catalog: &Catalog, config: &CatalogConfig) -> Result<Option<usize>, InfraError> {
    let Some(path) = find_snapshot(config)? else {
        return Ok(None);
    };

    let snapshot = read_snapshot(&path)?;
    let loaded = catalog.load(snapshot.entries)?;
    std::fs::remove_file(&path).map_err(|e| InfraError::io(&path, e))?;

    tracing::info!(file = %path.display(), products = loaded, "catalog restored");
    Ok(Some(loaded))
}

pub fn write_snapshot(path: &Path, snapshot: &CatalogSnapshot) -> Result<(), InfraError> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    std::fs::write(path, json).map_err(|e| InfraError::io(path, e))
}

pub fn read_snapshot(path: &Path) -> Result<CatalogSnapshot, InfraError> {
    let raw = std::fs::read(path).map_err(|e| InfraError::io(path, e))?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Oldest snapshot file in the temp folder, if any. Names sort by timestamp.
pub fn find_snapshot(config: &CatalogConfig) -> Result<Option<PathBuf>, InfraError> {
    let folder = &config.temp_folder;
    if !folder.exists() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    for dir_entry in std::fs::read_dir(folder).map_err(|e| InfraError::io(folder, e))? {
        let path = dir_entry.map_err(|e| InfraError::io(folder, e))?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == config.snapshot_extension);
        if matches && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};
    use prodcat_core::{FixedClock, ProductId};
    use prodcat_products::Rating;
    use rust_decimal::Decimal;

    fn catalog() -> Catalog {
        let clock = FixedClock::at(
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        );
        Catalog::new(Arc::new(clock))
    }

    fn seeded() -> Catalog {
        let catalog = catalog();
        catalog
            .create_drink(ProductId::new(101), "Tea", Decimal::new(199, 2), Rating::NotRated)
            .unwrap();
        catalog
            .create_food(
                ProductId::new(103),
                "Cake",
                Decimal::new(399, 2),
                Rating::NotRated,
                NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            )
            .unwrap();
        catalog.apply_review(ProductId::new(101), Rating::FourStar, "Nice").unwrap();
        catalog.apply_review(ProductId::new(101), Rating::FiveStar, "Lovely").unwrap();
        catalog
    }

    #[test]
    fn dump_then_restore_recovers_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::rooted_at(dir.path());
        let source = seeded();

        let path = dump_snapshot(&source, &config).unwrap();
        assert!(path.exists());
        assert!(source.is_empty().unwrap());

        let target = catalog();
        assert_eq!(restore_snapshot(&target, &config).unwrap(), Some(2));
        assert!(!path.exists());

        let tea = target.find_product(ProductId::new(101)).unwrap();
        assert_eq!(tea.rating(), Rating::FiveStar);
        assert_eq!(target.reviews(ProductId::new(101)).unwrap().len(), 2);
        assert_eq!(
            target.find_product(ProductId::new(103)).unwrap().best_before(),
            NaiveDate::from_ymd_opt(2024, 6, 20)
        );
    }

    #[test]
    fn restore_without_snapshot_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::rooted_at(dir.path());
        let target = seeded();

        assert_eq!(restore_snapshot(&target, &config).unwrap(), None);
        assert_eq!(target.len().unwrap(), 2);
    }

    #[test]
    fn failed_dump_keeps_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a folder").unwrap();
        let config = CatalogConfig {
            temp_folder: blocker.join("temp"),
            ..CatalogConfig::rooted_at(dir.path())
        };
        let source = seeded();

        assert!(matches!(dump_snapshot(&source, &config), Err(InfraError::Io { .. })));
        assert_eq!(source.len().unwrap(), 2);
    }

    #[test]
    fn corrupt_snapshot_is_reported_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::rooted_at(dir.path());
        std::fs::create_dir_all(&config.temp_folder).unwrap();
        let path = config.temp_folder.join("20240101T000000.000Z.tmp");
        std::fs::write(&path, "{ not json").unwrap();

        let err = restore_snapshot(&catalog(), &config).unwrap_err();
        assert!(matches!(err, InfraError::Snapshot(_)));
        assert!(path.exists());
    }

    #[test]
    fn oldest_snapshot_is_restored_first() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::rooted_at(dir.path());
        std::fs::create_dir_all(&config.temp_folder).unwrap();
        std::fs::write(config.temp_folder.join("20240102T000000.000Z.tmp"), "{}").unwrap();
        std::fs::write(config.temp_folder.join("20240101T000000.000Z.tmp"), "{}").unwrap();
        std::fs::write(config.temp_folder.join("20230101T000000.000Z.json"), "{}").unwrap();

        let found = find_snapshot(&config).unwrap().unwrap();
        assert!(found.ends_with("20240101T000000.000Z.tmp"));
    }
}
