//! Bulk load of product and review text files from the data folder.

use std::path::{Path, PathBuf};

use prodcat_catalog::CatalogEntry;
use prodcat_products::Review;

use crate::config::CatalogConfig;
use crate::error::InfraError;
use crate::records::{parse_product_record, parse_review_record, product_record, review_record};

/// Read every product file in `config.data_folder` together with its reviews.
///
/// Product files are visited in file-name order. A product file that cannot be
/// read or parsed is logged and skipped. A missing or unreadable reviews file
/// means the product has no reviews. Bad review lines are skipped individually.
pub fn load_directory(config: &CatalogConfig) -> Result<Vec<CatalogEntry>, InfraError> {
    let mut entries = Vec::new();

    for path in product_files(config)? {
        let product = match read_product_file(&path) {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping product file");
                continue;
            }
        };

        let reviews_path = config.reviews_file(product.id_typed());
        let reviews = match read_reviews(&reviews_path) {
            Ok(reviews) => reviews,
            Err(e) => {
                tracing::warn!(file = %reviews_path.display(), error = %e, "unreadable reviews file; loading product without reviews");
                Vec::new()
            }
        };
        tracing::debug!(product_id = %product.id_typed(), reviews = reviews.len(), "product file loaded");
        entries.push(CatalogEntry::new(product, reviews));
    }

    tracing::info!(
        folder = %config.data_folder.display(),
        products = entries.len(),
        "data folder scanned"
    );
    Ok(entries)
}

/// Write `entries` to `config.data_folder` in the layout [`load_directory`]
/// reads: one product file per entry plus a reviews file when it has any.
///
/// Returns the number of product files written.
pub fn write_directory(config: &CatalogConfig, entries: &[CatalogEntry]) -> Result<usize, InfraError> {
    let folder = &config.data_folder;
    std::fs::create_dir_all(folder).map_err(|e| InfraError::io(folder, e))?;

    for entry in entries {
        let id = entry.product.id_typed();
        let product_path = config.product_file(id);
        std::fs::write(&product_path, format!("{}\n", product_record(&entry.product)))
            .map_err(|e| InfraError::io(&product_path, e))?;

        if entry.reviews.is_empty() {
            continue;
        }
        let body: String = entry
            .reviews
            .iter()
            .map(|r| format!("{}\n", review_record(r)))
            .collect();
        let reviews_path = config.reviews_file(id);
        std::fs::write(&reviews_path, body).map_err(|e| InfraError::io(&reviews_path, e))?;
    }

    tracing::info!(folder = %folder.display(), products = entries.len(), "data folder written");
    Ok(entries.len())
}

fn product_files(config: &CatalogConfig) -> Result<Vec<PathBuf>, InfraError> {
    let folder = &config.data_folder;
    if !folder.exists() {
        tracing::warn!(folder = %folder.display(), "data folder missing; nothing to load");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for dir_entry in std::fs::read_dir(folder).map_err(|e| InfraError::io(folder, e))? {
        let path = dir_entry.map_err(|e| InfraError::io(folder, e))?.path();
        let is_product = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(&config.product_file_prefix));
        if is_product && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn read_product_file(path: &Path) -> Result<prodcat_products::Product, InfraError> {
    let text = std::fs::read_to_string(path).map_err(|e| InfraError::io(path, e))?;
    let line = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| InfraError::parse("", format!("{} is empty", path.display())))?;
    parse_product_record(line)
}

fn read_reviews(path: &Path) -> Result<Vec<Review>, InfraError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(InfraError::io(path, e)),
    };

    let reviews = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| match parse_review_record(line) {
            Ok(review) => Some(review),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping review line");
                None
            }
        })
        .collect();
    Ok(reviews)
}
