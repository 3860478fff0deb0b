//! Demo catalog contents for an empty data folder.

use chrono::Days;
use rust_decimal::Decimal;

use prodcat_catalog::Catalog;
use prodcat_core::{DomainResult, ProductId};
use prodcat_products::Rating;

/// Products the simulated clients review.
pub const REVIEWED_PRODUCTS: [u32; 2] = [101, 102];

/// Fill `catalog` with a small mixed set of drinks and food, with a few
/// reviews. Returns the number of products afterwards.
///
/// Food dates are relative to the catalog's clock so one item is always on
/// its best-before day.
pub fn seed(catalog: &Catalog) -> DomainResult<usize> {
    let today = catalog.clock().today();
    let in_days = |n: u64| today.checked_add_days(Days::new(n)).unwrap_or(today);

    catalog.create_drink(ProductId::new(101), "Tea", Decimal::new(199, 2), Rating::NotRated)?;
    catalog.create_drink(ProductId::new(102), "Coffee", Decimal::new(199, 2), Rating::NotRated)?;
    catalog.create_food(ProductId::new(103), "Cake", Decimal::new(399, 2), Rating::NotRated, in_days(2))?;
    catalog.create_generic(ProductId::new(104), "Cookie", Decimal::new(299, 2), Rating::NotRated)?;
    catalog.create_drink(ProductId::new(105), "Hot Chocolate", Decimal::new(250, 2), Rating::NotRated)?;
    catalog.create_food(ProductId::new(106), "Chocolate", Decimal::new(299, 2), Rating::NotRated, today)?;

    for (id, ordinal, comment) in [
        (101, 4, "Nice hot cup of tea"),
        (101, 2, "Rather weak tea"),
        (101, 5, "Fine tea"),
        (102, 3, "Coffee was ok"),
        (102, 1, "Where is the milk?"),
        (103, 5, "Very nice cake"),
        (106, 3, "Sweet enough"),
    ] {
        catalog.apply_review_ordinal(ProductId::new(id), ordinal, comment)?;
    }

    let count = catalog.len()?;
    tracing::info!(products = count, "demo catalog seeded");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};
    use prodcat_core::FixedClock;

    #[test]
    fn seeds_reviewed_products() {
        let clock = FixedClock::at(
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        );
        let catalog = Catalog::new(Arc::new(clock));

        assert_eq!(seed(&catalog).unwrap(), 6);
        for id in REVIEWED_PRODUCTS {
            assert!(catalog.find_product(ProductId::new(id)).is_ok());
        }
        assert_eq!(catalog.find_product(ProductId::new(101)).unwrap().rating(), Rating::FourStar);

        // 18:00 is inside the drink window and 106 is on its best-before day.
        let chocolate = catalog.find_product(ProductId::new(106)).unwrap();
        assert_eq!(chocolate.discount(catalog.clock()), Decimal::new(30, 2));
    }

    #[test]
    fn seeding_twice_adds_reviews_but_not_products() {
        let catalog = Catalog::new(Arc::new(prodcat_core::SystemClock));
        seed(&catalog).unwrap();
        assert_eq!(seed(&catalog).unwrap(), 6);
        assert_eq!(catalog.reviews(ProductId::new(101)).unwrap().len(), 6);
    }
}
