//! Locale profiles: the data a [`LocaleFormatter`](crate::LocaleFormatter) renders with.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Keys of the localized string table.
pub mod keys {
    /// Template with `{name}`, `{price}`, `{rating}`, `{best_before}`.
    pub const PRODUCT: &str = "product";
    /// Template with `{rating}`, `{comment}`.
    pub const REVIEW: &str = "review";
    /// Template with `{rating}`, `{amount}`.
    pub const DISCOUNT: &str = "discount";
    pub const NO_REVIEW: &str = "no.review";
    pub const NO_PRODUCT: &str = "no.product";
    pub const NOT_APPLICABLE: &str = "not.applicable";
}

/// Everything locale-specific about rendering.
///
/// Profiles are plain data so the supported set can come from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleProfile {
    pub tag: String,
    pub currency_symbol: String,
    /// Symbol after the amount (`1,99 €`) instead of before (`£1.99`).
    #[serde(default)]
    pub symbol_after: bool,
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// `chrono` strftime pattern for short dates.
    pub date_pattern: String,
    pub texts: HashMap<String, String>,
}

fn texts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn english(tag: &str, symbol: &str, date_pattern: &str) -> LocaleProfile {
    LocaleProfile {
        tag: tag.to_string(),
        currency_symbol: symbol.to_string(),
        symbol_after: false,
        decimal_separator: '.',
        grouping_separator: ',',
        date_pattern: date_pattern.to_string(),
        texts: texts(&[
            (keys::PRODUCT, "{name}, Price: {price}, Rating: {rating}, Best Before: {best_before}"),
            (keys::REVIEW, "Review: {rating}\t{comment}"),
            (keys::DISCOUNT, "{rating}\t{amount}"),
            (keys::NO_REVIEW, "Not reviewed"),
            (keys::NO_PRODUCT, "No products"),
            (keys::NOT_APPLICABLE, "N/A"),
        ]),
    }
}

impl LocaleProfile {
    pub fn en_gb() -> Self {
        english("en-GB", "£", "%d/%m/%Y")
    }

    pub fn en_us() -> Self {
        english("en-US", "$", "%-m/%-d/%y")
    }

    pub fn en_ca() -> Self {
        english("en-CA", "$", "%Y-%m-%d")
    }

    pub fn fr_fr() -> Self {
        LocaleProfile {
            tag: "fr-FR".to_string(),
            currency_symbol: "€".to_string(),
            symbol_after: true,
            decimal_separator: ',',
            grouping_separator: ' ',
            date_pattern: "%d/%m/%Y".to_string(),
            texts: texts(&[
                (keys::PRODUCT, "{name}, Prix : {price}, Note : {rating}, À consommer avant : {best_before}"),
                (keys::REVIEW, "Avis : {rating}\t{comment}"),
                (keys::DISCOUNT, "{rating}\t{amount}"),
                (keys::NO_REVIEW, "Aucun avis"),
                (keys::NO_PRODUCT, "Aucun produit"),
                (keys::NOT_APPLICABLE, "s.o."),
            ]),
        }
    }

    /// The four locales shipped by default.
    pub fn builtin() -> Vec<LocaleProfile> {
        vec![Self::en_gb(), Self::en_us(), Self::fr_fr(), Self::en_ca()]
    }
}

/// Replaces each `{key}` in `template` with its value, in a single pass.
///
/// Unknown placeholders are kept verbatim; substituted values are never
/// re-scanned.
pub(crate) fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let key = &after[..close];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_define_every_key() {
        for profile in LocaleProfile::builtin() {
            for key in [keys::PRODUCT, keys::REVIEW, keys::DISCOUNT, keys::NO_REVIEW, keys::NO_PRODUCT, keys::NOT_APPLICABLE] {
                assert!(profile.texts.contains_key(key), "{} lacks {key}", profile.tag);
            }
        }
    }

    #[test]
    fn render_substitutes_named_placeholders() {
        let out = render("{a} and {b}, {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and y, x");
    }

    #[test]
    fn render_does_not_rescan_values() {
        let out = render("{name}: {price}", &[("name", "{price}"), ("price", "1.00")]);
        assert_eq!(out, "{price}: 1.00");
        assert_eq!(render("{unknown} {", &[]), "{unknown} {");
    }

    #[test]
    fn profiles_deserialize_from_json() {
        let json = r#"{
            "tag": "de-DE",
            "currency_symbol": "€",
            "symbol_after": true,
            "decimal_separator": ",",
            "grouping_separator": ".",
            "date_pattern": "%d.%m.%Y",
            "texts": {"no.review": "Keine Bewertung"}
        }"#;
        let profile: LocaleProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.tag, "de-DE");
        assert_eq!(profile.grouping_separator, '.');
    }
}
