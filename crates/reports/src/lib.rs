//! `prodcat-reports`: localized rendering of catalog data.
//!
//! Consumes products, reviews and discount totals handed out by the catalog and
//! turns them into text. Locale data is configuration, not code: a
//! [`FormatterRegistry`] maps tags to [`Formatter`]s with a default fallback.

pub mod error;
pub mod formatter;
pub mod locale;
pub mod registry;

pub use error::ReportError;
pub use formatter::{Formatter, LocaleFormatter};
pub use locale::LocaleProfile;
pub use registry::FormatterRegistry;
