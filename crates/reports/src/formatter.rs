use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use rust_decimal::{Decimal, RoundingStrategy};

use prodcat_products::{Product, Rating, Review, sort_best_first};

use crate::error::ReportError;
use crate::locale::{LocaleProfile, keys, render};

/// Renders catalog data as localized text.
///
/// Formatters only read what they are given; they never touch the catalog.
pub trait Formatter: Send + Sync {
    /// Locale tag, e.g. `en-GB`.
    fn locale(&self) -> &str;

    fn format_money(&self, amount: Decimal) -> String;

    fn format_date(&self, date: NaiveDate) -> String;

    /// Localized string for `key`; the key itself when the table lacks it.
    fn text(&self, key: &str) -> String;

    fn format_product(&self, product: &Product) -> String;

    fn format_review(&self, review: &Review) -> String;

    /// One line per rating bucket, lowest rating first.
    fn format_discounts(&self, totals: &BTreeMap<Rating, Decimal>) -> Vec<String> {
        totals
            .iter()
            .map(|(rating, amount)| {
                let stars = rating.stars();
                let money = self.format_money(*amount);
                render(
                    &self.text(keys::DISCOUNT),
                    &[("rating", stars.as_str()), ("amount", money.as_str())],
                )
            })
            .collect()
    }

    /// One product line per entry, in the order given.
    fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return format!("{}\n", self.text(keys::NO_PRODUCT));
        }
        products
            .iter()
            .map(|p| format!("{}\n", self.format_product(p)))
            .collect()
    }

    /// Product line followed by its reviews, best first.
    fn format_report(&self, product: &Product, reviews: &[Review]) -> String {
        let mut out = self.format_product(product);
        out.push('\n');

        if reviews.is_empty() {
            out.push_str(&self.text(keys::NO_REVIEW));
            out.push('\n');
            return out;
        }

        let mut sorted = reviews.to_vec();
        sort_best_first(&mut sorted);
        for review in &sorted {
            out.push_str(&self.format_review(review));
            out.push('\n');
        }
        out
    }
}

/// [`Formatter`] driven by a [`LocaleProfile`].
#[derive(Debug, Clone)]
pub struct LocaleFormatter {
    profile: LocaleProfile,
}

impl LocaleFormatter {
    pub fn new(profile: LocaleProfile) -> Result<Self, ReportError> {
        let invalid = StrftimeItems::new(&profile.date_pattern).any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(ReportError::InvalidDatePattern {
                locale: profile.tag,
                pattern: profile.date_pattern,
            });
        }
        Ok(Self { profile })
    }

    pub fn profile(&self) -> &LocaleProfile {
        &self.profile
    }

    /// Unsigned amount with two decimals and grouped thousands.
    fn format_number(&self, amount: Decimal) -> String {
        let plain = format!("{:.2}", amount.abs());
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (idx, digit) in int_part.chars().enumerate() {
            if idx > 0 && (int_part.len() - idx) % 3 == 0 {
                grouped.push(self.profile.grouping_separator);
            }
            grouped.push(digit);
        }

        format!("{grouped}{}{frac_part}", self.profile.decimal_separator)
    }
}

impl Formatter for LocaleFormatter {
    fn locale(&self) -> &str {
        &self.profile.tag
    }

    fn format_money(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        let number = self.format_number(rounded);
        if self.profile.symbol_after {
            format!("{sign}{number} {}", self.profile.currency_symbol)
        } else {
            format!("{sign}{}{number}", self.profile.currency_symbol)
        }
    }

    fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.profile.date_pattern).to_string()
    }

    fn text(&self, key: &str) -> String {
        self.profile
            .texts
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn format_product(&self, product: &Product) -> String {
        let best_before = product
            .best_before()
            .map(|d| self.format_date(d))
            .unwrap_or_else(|| self.text(keys::NOT_APPLICABLE));

        let price = self.format_money(product.price());
        let stars = product.rating().stars();

        render(
            &self.text(keys::PRODUCT),
            &[
                ("name", product.name()),
                ("price", price.as_str()),
                ("rating", stars.as_str()),
                ("best_before", best_before.as_str()),
            ],
        )
    }

    fn format_review(&self, review: &Review) -> String {
        let stars = review.rating().stars();
        render(
            &self.text(keys::REVIEW),
            &[("rating", stars.as_str()), ("comment", review.comment())],
        )
    }
}
