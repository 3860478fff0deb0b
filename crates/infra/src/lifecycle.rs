//! Explicit start-up and shut-down of a catalog backed by the filesystem.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

use prodcat_catalog::Catalog;
use prodcat_core::{Clock, ProductId};
use prodcat_products::Product;
use prodcat_reports::FormatterRegistry;

use crate::config::CatalogConfig;
use crate::error::InfraError;
use crate::{loader, persistence, report};

/// Everything a running shop needs: the shared catalog, the formatter
/// registry and the file layout.
#[derive(Debug, Clone)]
pub struct CatalogRuntime {
    pub catalog: Arc<Catalog>,
    pub formatters: Arc<FormatterRegistry>,
    pub config: CatalogConfig,
}

/// Build a runtime from `config`.
///
/// A pending snapshot in the temp folder wins over the data folder; otherwise
/// the product and review files are loaded.
pub fn bootstrap(config: CatalogConfig, clock: Arc<dyn Clock>) -> Result<CatalogRuntime, InfraError> {
    config.validate()?;
    let formatters = Arc::new(config.formatters()?);
    let catalog = Arc::new(Catalog::new(clock));

    match persistence::restore_snapshot(&catalog, &config)? {
        Some(count) => tracing::info!(products = count, "bootstrapped from snapshot"),
        None => {
            let count = catalog.load(loader::load_directory(&config)?)?;
            tracing::info!(products = count, "bootstrapped from data folder");
        }
    }

    Ok(CatalogRuntime {
        catalog,
        formatters,
        config,
    })
}

/// Dump the catalog to a snapshot file, leaving it empty.
pub fn shutdown(runtime: &CatalogRuntime) -> Result<PathBuf, InfraError> {
    let path = persistence::dump_snapshot(&runtime.catalog, &runtime.config)?;
    tracing::info!(file = %path.display(), "catalog shut down");
    Ok(path)
}

impl CatalogRuntime {
    pub fn write_report(&self, id: ProductId, locale: &str, client: &str) -> Result<PathBuf, InfraError> {
        report::write_product_report(&self.catalog, &self.formatters, &self.config, id, locale, client)
    }

    pub fn product_listing<F, C>(&self, locale: &str, filter: F, comparator: C) -> Result<String, InfraError>
    where
        F: Fn(&Product) -> bool,
        C: FnMut(&Product, &Product) -> Ordering,
    {
        report::product_listing(&self.catalog, &self.formatters, locale, filter, comparator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodcat_core::SystemClock;
    use prodcat_products::Rating;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(SystemClock)
    }

    #[test]
    fn bootstrap_loads_data_folder_when_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::rooted_at(dir.path());
        std::fs::create_dir_all(&config.data_folder).unwrap();
        std::fs::write(config.data_folder.join("product101.txt"), "D,101,Tea,1.99,0").unwrap();
        std::fs::write(config.data_folder.join("reviews101.txt"), "3,Fine").unwrap();

        let runtime = bootstrap(config, clock()).unwrap();
        let tea = runtime.catalog.find_product(ProductId::new(101)).unwrap();
        assert_eq!(tea.rating(), Rating::ThreeStar);
    }

    #[test]
    fn snapshot_takes_precedence_and_is_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::rooted_at(dir.path());
        std::fs::create_dir_all(&config.data_folder).unwrap();
        std::fs::write(config.data_folder.join("product101.txt"), "D,101,Tea,1.99,0").unwrap();

        let first = bootstrap(config.clone(), clock()).unwrap();
        first.catalog.apply_review(ProductId::new(101), Rating::FiveStar, "Great").unwrap();
        let dumped = shutdown(&first).unwrap();
        assert!(first.catalog.is_empty().unwrap());

        let second = bootstrap(config, clock()).unwrap();
        assert!(!dumped.exists());
        assert_eq!(second.catalog.reviews(ProductId::new(101)).unwrap().len(), 1);
    }

    #[test]
    fn runtime_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::rooted_at(dir.path());
        let runtime = bootstrap(config, clock()).unwrap();
        runtime
            .catalog
            .create_generic(ProductId::new(5), "Mug", "4.50".parse().unwrap(), Rating::NotRated)
            .unwrap();

        let path = runtime.write_report(ProductId::new(5), "en-US", "alice").unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("$4.50"));
    }

    #[test]
    fn bootstrap_rejects_invalid_config() {
        let config = CatalogConfig {
            default_locale: "xx-XX".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(bootstrap(config, clock()), Err(InfraError::Config(_))));
    }
}
