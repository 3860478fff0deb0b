use serde::{Deserialize, Serialize};

use prodcat_products::{Product, Rating, Review};

/// One product with its review history, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub product: Product,
    pub reviews: Vec<Review>,
}

impl CatalogEntry {
    pub fn new(product: Product, reviews: Vec<Review>) -> Self {
        Self { product, reviews }
    }

    /// Rating implied by the review history.
    pub fn derived_rating(&self) -> Rating {
        Rating::average(self.reviews.iter().map(|r| r.rating().ordinal()))
    }

    /// Same entry with the product's rating recomputed from its reviews.
    ///
    /// An entry without reviews keeps the rating it was seeded with.
    pub fn reconciled(self) -> Self {
        if self.reviews.is_empty() {
            return self;
        }
        let rating = self.derived_rating();
        if rating == self.product.rating() {
            return self;
        }
        Self {
            product: self.product.apply_rating(rating),
            reviews: self.reviews,
        }
    }
}

impl From<(Product, Vec<Review>)> for CatalogEntry {
    fn from((product, reviews): (Product, Vec<Review>)) -> Self {
        Self::new(product, reviews)
    }
}

/// Point-in-time copy of the whole catalog, ordered by product id.
///
/// This is the unit handed to (and received from) persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub entries: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by_key(|e| e.product.id_typed());
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn review_count(&self) -> usize {
        self.entries.iter().map(|e| e.reviews.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodcat_core::ProductId;
    use rust_decimal::Decimal;

    #[test]
    fn reconciled_recomputes_stale_rating() {
        let product = Product::generic(ProductId::new(1), "Tea", Decimal::new(199, 2), Rating::OneStar).unwrap();
        let entry = CatalogEntry::new(
            product,
            vec![Review::new(Rating::FiveStar, "a"), Review::new(Rating::FourStar, "b")],
        );

        let entry = entry.reconciled();
        assert_eq!(entry.product.rating(), Rating::FiveStar);
        assert_eq!(entry.reviews.len(), 2);
    }

    #[test]
    fn reconciled_keeps_seed_rating_without_reviews() {
        let product = Product::generic(ProductId::new(1), "Tea", Decimal::new(199, 2), Rating::ThreeStar).unwrap();
        let entry = CatalogEntry::new(product, vec![]);
        assert_eq!(entry.derived_rating(), Rating::NotRated);
        assert_eq!(entry.reconciled().product.rating(), Rating::ThreeStar);
    }

    #[test]
    fn snapshot_orders_entries_by_id() {
        let make = |id| {
            CatalogEntry::new(
                Product::generic(ProductId::new(id), "P", Decimal::ONE, Rating::NotRated).unwrap(),
                vec![],
            )
        };
        let snapshot = CatalogSnapshot::new(vec![make(3), make(1), make(2)]);
        let ids: Vec<u32> = snapshot.entries.iter().map(|e| e.product.id_typed().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
