//! Reusable filters and comparators for [`Catalog::enumerate`](crate::Catalog::enumerate).

use std::cmp::Ordering;

use rust_decimal::Decimal;

use prodcat_products::{Product, Rating};

pub fn price_below(limit: Decimal) -> impl Fn(&Product) -> bool {
    move |p| p.price() < limit
}

pub fn rated_at_least(min: Rating) -> impl Fn(&Product) -> bool {
    move |p| p.rating() >= min
}

pub fn by_id(a: &Product, b: &Product) -> Ordering {
    a.id_typed().cmp(&b.id_typed())
}

/// Best rated first; the more expensive product wins a tie.
pub fn rating_desc_then_price_desc(a: &Product, b: &Product) -> Ordering {
    b.rating()
        .cmp(&a.rating())
        .then_with(|| b.price().cmp(&a.price()))
}
