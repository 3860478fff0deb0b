use std::cmp::Ordering;
use std::path::PathBuf;

use prodcat_catalog::Catalog;
use prodcat_core::ProductId;
use prodcat_products::Product;
use prodcat_reports::FormatterRegistry;

use crate::config::CatalogConfig;
use crate::error::InfraError;

/// Render the report for product `id` in `locale` and write it to the
/// reports folder, one file per product and client.
///
/// Unknown locales fall back to the registry default.
pub fn write_product_report(
    catalog: &Catalog,
    formatters: &FormatterRegistry,
    config: &CatalogConfig,
    id: ProductId,
    locale: &str,
    client: &str,
) -> Result<PathBuf, InfraError> {
    let entry = catalog.entry(id)?;
    let formatter = formatters.get(locale);
    let body = formatter.format_report(&entry.product, &entry.reviews);

    let folder = &config.reports_folder;
    std::fs::create_dir_all(folder).map_err(|e| InfraError::io(folder, e))?;
    let path = config.report_file(id, client);
    std::fs::write(&path, body).map_err(|e| InfraError::io(&path, e))?;

    tracing::info!(
        product_id = %id,
        locale = formatter.locale(),
        client,
        file = %path.display(),
        "product report written"
    );
    Ok(path)
}

/// Products matching `filter`, sorted by `comparator`, one localized line
/// each.
pub fn product_listing<F, C>(
    catalog: &Catalog,
    formatters: &FormatterRegistry,
    locale: &str,
    filter: F,
    comparator: C,
) -> Result<String, InfraError>
where
    F: Fn(&Product) -> bool,
    C: FnMut(&Product, &Product) -> Ordering,
{
    let products = catalog.enumerate(filter, comparator)?;
    let formatter = formatters.get(locale);
    tracing::debug!(locale = formatter.locale(), products = products.len(), "product listing rendered");
    Ok(formatter.format_products(&products))
}
