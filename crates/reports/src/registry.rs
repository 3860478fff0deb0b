use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ReportError;
use crate::formatter::{Formatter, LocaleFormatter};
use crate::locale::LocaleProfile;

/// Formatters keyed by locale tag, with a default for unknown tags.
#[derive(Clone)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Arc<dyn Formatter>>,
    default: Arc<dyn Formatter>,
}

impl core::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("locales", &self.supported_locales())
            .field("default_locale", &self.default_locale())
            .finish()
    }
}

impl FormatterRegistry {
    /// Registry over `profiles`; `default_locale` must be one of them.
    pub fn from_profiles<I>(profiles: I, default_locale: impl Into<String>) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = LocaleProfile>,
    {
        let mut formatters: HashMap<String, Arc<dyn Formatter>> = HashMap::new();
        for profile in profiles {
            let formatter = LocaleFormatter::new(profile)?;
            formatters.insert(formatter.locale().to_string(), Arc::new(formatter));
        }

        let default_locale = default_locale.into();
        let default = formatters
            .get(&default_locale)
            .cloned()
            .ok_or(ReportError::UnknownDefaultLocale(default_locale))?;

        Ok(Self { formatters, default })
    }

    /// The built-in locales, defaulting to `en-GB`.
    pub fn builtin() -> Result<Self, ReportError> {
        Self::from_profiles(LocaleProfile::builtin(), "en-GB")
    }

    /// Add or replace the formatter for its locale.
    pub fn register(&mut self, formatter: Arc<dyn Formatter>) {
        if formatter.locale() == self.default.locale() {
            self.default = Arc::clone(&formatter);
        }
        self.formatters.insert(formatter.locale().to_string(), formatter);
    }

    /// Formatter for `tag`, or the default one.
    pub fn get(&self, tag: &str) -> Arc<dyn Formatter> {
        if let Some(formatter) = self.formatters.get(tag) {
            return Arc::clone(formatter);
        }
        tracing::debug!(locale = tag, fallback = self.default_locale(), "unsupported locale");
        self.default_formatter()
    }

    pub fn default_formatter(&self) -> Arc<dyn Formatter> {
        Arc::clone(&self.default)
    }

    pub fn default_locale(&self) -> &str {
        self.default.locale()
    }

    /// Supported tags, sorted.
    pub fn supported_locales(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.formatters.keys().cloned().collect();
        tags.sort();
        tags
    }
}
