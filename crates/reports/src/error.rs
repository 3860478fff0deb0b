use thiserror::Error;

/// Errors raised while assembling formatters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("locale {locale}: invalid date pattern '{pattern}'")]
    InvalidDatePattern { locale: String, pattern: String },

    #[error("default locale '{0}' is not among the configured locales")]
    UnknownDefaultLocale(String),
}
