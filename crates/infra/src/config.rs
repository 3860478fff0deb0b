//! Configuration loading and representation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prodcat_core::ProductId;
use prodcat_reports::{FormatterRegistry, LocaleProfile};

use crate::error::InfraError;

/// Where catalog data lives on disk and how files are named.
///
/// Patterns use `{id}` and `{client}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub data_folder: PathBuf,
    pub reports_folder: PathBuf,
    pub temp_folder: PathBuf,
    /// Files in `data_folder` starting with this prefix hold one product record.
    pub product_file_prefix: String,
    pub reviews_file_pattern: String,
    pub report_file_pattern: String,
    pub snapshot_extension: String,
    pub default_locale: String,
    pub locales: Vec<LocaleProfile>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("data"),
            reports_folder: PathBuf::from("reports"),
            temp_folder: PathBuf::from("temp"),
            product_file_prefix: "product".to_string(),
            reviews_file_pattern: "reviews{id}.txt".to_string(),
            report_file_pattern: "product{id}report{client}.txt".to_string(),
            snapshot_extension: "tmp".to_string(),
            default_locale: "en-GB".to_string(),
            locales: LocaleProfile::builtin(),
        }
    }
}

impl CatalogConfig {
    /// Layout rooted at `root` (`root/data`, `root/reports`, `root/temp`).
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_folder: root.join("data"),
            reports_folder: root.join("reports"),
            temp_folder: root.join("temp"),
            ..Self::default()
        }
    }

    /// Defaults overridden by `PRODCAT_*` environment variables.
    ///
    /// `PRODCAT_CONFIG` points at a JSON file used as the base instead of the
    /// defaults; the folder and locale variables are applied on top of it.
    pub fn from_env() -> Result<Self, InfraError> {
        let mut config = match std::env::var("PRODCAT_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => {
                tracing::debug!("PRODCAT_CONFIG not set; using default layout");
                Self::default()
            }
        };

        if let Ok(dir) = std::env::var("PRODCAT_DATA_FOLDER") {
            config.data_folder = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("PRODCAT_REPORTS_FOLDER") {
            config.reports_folder = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("PRODCAT_TEMP_FOLDER") {
            config.temp_folder = PathBuf::from(dir);
        }
        if let Ok(tag) = std::env::var("PRODCAT_DEFAULT_LOCALE") {
            config.default_locale = tag;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InfraError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| InfraError::io(path, e))?;
        let config: Self = serde_json::from_slice(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.product_file_prefix.trim().is_empty() {
            return Err(InfraError::Config("product_file_prefix cannot be empty".to_string()));
        }
        if !self.reviews_file_pattern.contains("{id}") {
            return Err(InfraError::Config("reviews_file_pattern must contain {id}".to_string()));
        }
        if !self.report_file_pattern.contains("{id}") {
            return Err(InfraError::Config("report_file_pattern must contain {id}".to_string()));
        }
        if self.snapshot_extension.trim().is_empty() {
            return Err(InfraError::Config("snapshot_extension cannot be empty".to_string()));
        }
        if !self.locales.iter().any(|l| l.tag == self.default_locale) {
            return Err(InfraError::Config(format!(
                "default_locale '{}' is not among the configured locales",
                self.default_locale
            )));
        }
        Ok(())
    }

    pub fn formatters(&self) -> Result<FormatterRegistry, InfraError> {
        Ok(FormatterRegistry::from_profiles(
            self.locales.clone(),
            self.default_locale.clone(),
        )?)
    }

    pub fn reviews_file(&self, id: ProductId) -> PathBuf {
        self.data_folder
            .join(self.reviews_file_pattern.replace("{id}", &id.to_string()))
    }

    pub fn product_file(&self, id: ProductId) -> PathBuf {
        self.data_folder
            .join(format!("{}{id}.txt", self.product_file_prefix))
    }

    pub fn report_file(&self, id: ProductId, client: &str) -> PathBuf {
        let name = self
            .report_file_pattern
            .replace("{id}", &id.to_string())
            .replace("{client}", &sanitize(client));
        self.reports_folder.join(name)
    }

    pub fn snapshot_file(&self, at: DateTime<Utc>) -> PathBuf {
        self.temp_folder.join(format!(
            "{}.{}",
            at.format("%Y%m%dT%H%M%S%.3fZ"),
            self.snapshot_extension
        ))
    }
}

/// Keeps file names portable: anything but ASCII alphanumerics, `-` and `_`
/// becomes `_`.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_layout_is_valid() {
        let config = CatalogConfig::default();
        config.validate().unwrap();
        assert_eq!(config.reviews_file(ProductId::new(101)), PathBuf::from("data/reviews101.txt"));
        assert_eq!(config.product_file(ProductId::new(101)), PathBuf::from("data/product101.txt"));
    }

    #[test]
    fn report_file_sanitizes_client_names() {
        let config = CatalogConfig::rooted_at("/srv/shop");
        assert_eq!(
            config.report_file(ProductId::new(7), "Client 1/../x"),
            PathBuf::from("/srv/shop/reports/product7reportClient_1____x.txt")
        );
    }

    #[test]
    fn snapshot_file_uses_timestamp_and_extension() {
        let config = CatalogConfig::rooted_at("/srv/shop");
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 5).unwrap();
        assert_eq!(
            config.snapshot_file(at),
            PathBuf::from("/srv/shop/temp/20240615T180005.000Z.tmp")
        );
    }

    #[test]
    fn validate_rejects_unknown_default_locale() {
        let config = CatalogConfig {
            default_locale: "xx-XX".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(config.validate(), Err(InfraError::Config(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: CatalogConfig = serde_json::from_str(r#"{"data_folder": "/tmp/pm"}"#).unwrap();
        assert_eq!(config.data_folder, PathBuf::from("/tmp/pm"));
        assert_eq!(config.product_file_prefix, "product");
        assert_eq!(config.locales.len(), 4);
    }

    #[test]
    fn from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"{"default_locale": "fr-FR"}"#).unwrap();

        let config = CatalogConfig::from_file(&path).unwrap();
        assert_eq!(config.default_locale, "fr-FR");
        assert_eq!(config.formatters().unwrap().default_locale(), "fr-FR");
    }
}
