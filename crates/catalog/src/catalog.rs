use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::iter;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use prodcat_core::{Clock, DomainError, DomainResult, ProductId};
use prodcat_products::{Product, ProductKind, Rating, Review};

use crate::snapshot::{CatalogEntry, CatalogSnapshot};

type ReviewMap = HashMap<Product, Vec<Review>>;

/// In-memory product catalog: each product with its review history.
///
/// All state sits behind a single `RwLock`:
/// - `find_product`, `entry`, `reviews`, `aggregate_discount_by_rating`,
///   `enumerate` and `snapshot` take the read lock.
/// - `create_product`, `apply_review`, `load`, `drain` and `drain_with` take
///   the write lock for their whole critical section, so readers never
///   observe a product half-way through being re-keyed.
///
/// Callers always receive clones; nothing hands out a reference into the map.
pub struct Catalog {
    products: RwLock<ReviewMap>,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let len = self.products.read().map(|m| m.len()).ok();
        f.debug_struct("Catalog").field("products", &len).finish_non_exhaustive()
    }
}

impl Catalog {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Clock used to evaluate discount rules.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, ReviewMap>> {
        self.products
            .read()
            .map_err(|_| DomainError::internal("catalog lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, ReviewMap>> {
        self.products
            .write()
            .map_err(|_| DomainError::internal("catalog lock poisoned"))
    }

    /// Add a product with an empty review history.
    ///
    /// Creating a product whose `(id, name)` is already present is a no-op that
    /// returns the stored value; its reviews are left untouched. Reusing an id
    /// under a different name is rejected so that lookups by id stay unique.
    pub fn create_product(
        &self,
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        rating: Rating,
        kind: ProductKind,
    ) -> DomainResult<Product> {
        let product = Product::new(id, name, price, rating, kind)?;

        let mut products = self.write()?;

        if let Some((existing, _)) = products.get_key_value(&product) {
            // The stored rating moves with reviews; compare everything else.
            if existing.apply_rating(product.rating()).same_state_as(&product) {
                tracing::debug!(product_id = %id, "product already in catalog");
            } else {
                tracing::warn!(product_id = %id, "product already in catalog; new price or kind ignored");
            }
            return Ok(existing.clone());
        }

        if let Some(clash) = products.keys().find(|p| p.id_typed() == id) {
            return Err(DomainError::validation(format!(
                "id {id} is already used by '{}'",
                clash.name()
            )));
        }

        products.insert(product.clone(), Vec::new());
        tracing::info!(product_id = %id, name = product.name(), "product created");

        Ok(product)
    }

    pub fn create_generic(&self, id: ProductId, name: impl Into<String>, price: Decimal, rating: Rating) -> DomainResult<Product> {
        self.create_product(id, name, price, rating, ProductKind::Generic)
    }

    pub fn create_drink(&self, id: ProductId, name: impl Into<String>, price: Decimal, rating: Rating) -> DomainResult<Product> {
        self.create_product(id, name, price, rating, ProductKind::drink())
    }

    pub fn create_food(
        &self,
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        rating: Rating,
        best_before: NaiveDate,
    ) -> DomainResult<Product> {
        self.create_product(id, name, price, rating, ProductKind::food(best_before))
    }

    /// Current value of the product with `id`.
    pub fn find_product(&self, id: ProductId) -> DomainResult<Product> {
        let products = self.read()?;
        products
            .keys()
            .find(|p| p.id_typed() == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// Review history of the product with `id`, oldest first.
    pub fn reviews(&self, id: ProductId) -> DomainResult<Vec<Review>> {
        let products = self.read()?;
        products
            .iter()
            .find(|(p, _)| p.id_typed() == id)
            .map(|(_, reviews)| reviews.clone())
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// Product and review history read together under one lock.
    pub fn entry(&self, id: ProductId) -> DomainResult<CatalogEntry> {
        let products = self.read()?;
        products
            .iter()
            .find(|(p, _)| p.id_typed() == id)
            .map(|(p, reviews)| CatalogEntry::new(p.clone(), reviews.clone()))
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// Record a review and re-rate the product.
    ///
    /// Runs entirely under the write lock. The re-rated product is built before
    /// the old entry is touched; the remove/insert swap that follows cannot
    /// fail, so an error always leaves the previous entry in place.
    pub fn apply_review(&self, id: ProductId, rating: Rating, comment: impl Into<String>) -> DomainResult<Product> {
        let review = Review::new(rating, comment);

        let mut products = self.write()?;

        let (current, updated) = {
            let (current, reviews) = products
                .iter()
                .find(|(p, _)| p.id_typed() == id)
                .ok_or_else(|| DomainError::not_found(id))?;

            let ordinals = reviews
                .iter()
                .map(|r| r.rating().ordinal())
                .chain(iter::once(review.rating().ordinal()));
            let updated = current.apply_rating(Rating::average(ordinals));

            (current.clone(), updated)
        };

        // A plain `insert` would keep the stale key (equal by id/name), so the
        // entry is removed and re-inserted under the re-rated value.
        let (_, mut reviews) = products
            .remove_entry(&current)
            .ok_or_else(|| DomainError::internal(format!("entry for product {id} vanished under write lock")))?;
        reviews.push(review);
        let review_count = reviews.len();
        products.insert(updated.clone(), reviews);

        tracing::info!(
            product_id = %id,
            rating = updated.rating().ordinal(),
            reviews = review_count,
            "product reviewed"
        );

        Ok(updated)
    }

    /// Like [`Catalog::apply_review`], taking a raw star ordinal.
    pub fn apply_review_ordinal(&self, id: ProductId, ordinal: i64, comment: impl Into<String>) -> DomainResult<Product> {
        let rating = Rating::try_from(ordinal)?;
        self.apply_review(id, rating, comment)
    }

    /// Sum of current discounts, grouped by product rating.
    ///
    /// Only ratings held by at least one product appear in the map. A total
    /// too large for `Decimal` is an `Internal` error.
    pub fn aggregate_discount_by_rating(&self) -> DomainResult<BTreeMap<Rating, Decimal>> {
        let products = self.read()?;
        let clock = self.clock();

        let mut totals = BTreeMap::new();
        for product in products.keys() {
            let total = totals.entry(product.rating()).or_insert(Decimal::ZERO);
            *total = total.checked_add(product.discount(clock)).ok_or_else(|| {
                DomainError::internal(format!("discount total for {} overflowed", product.rating().stars()))
            })?;
        }

        Ok(totals)
    }

    /// Products matching `filter`, sorted by `comparator`.
    ///
    /// The result is a fresh `Vec` copied under the read lock; later writes
    /// never affect it.
    pub fn enumerate<F, C>(&self, filter: F, comparator: C) -> DomainResult<Vec<Product>>
    where
        F: Fn(&Product) -> bool,
        C: FnMut(&Product, &Product) -> Ordering,
    {
        let mut selected: Vec<Product> = {
            let products = self.read()?;
            products.keys().filter(|p| filter(p)).cloned().collect()
        };
        selected.sort_by(comparator);
        Ok(selected)
    }

    pub fn len(&self) -> DomainResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Replace the whole catalog with `entries`.
    ///
    /// The new map is built before the write lock is taken, then swapped in.
    /// Ratings of reviewed entries are recomputed from their history. Later
    /// entries with an id already seen are skipped.
    pub fn load<I>(&self, entries: I) -> DomainResult<usize>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut fresh = ReviewMap::new();
        for entry in entries {
            let entry = entry.reconciled();
            let id = entry.product.id_typed();
            if fresh.keys().any(|p| p.id_typed() == id) {
                tracing::warn!(product_id = %id, "duplicate product id in bulk load; skipping");
                continue;
            }
            fresh.insert(entry.product, entry.reviews);
        }

        let count = fresh.len();
        *self.write()? = fresh;
        tracing::info!(products = count, "catalog loaded");

        Ok(count)
    }

    /// Copy of the whole catalog.
    pub fn snapshot(&self) -> DomainResult<CatalogSnapshot> {
        let products = self.read()?;
        Ok(to_snapshot(products.iter().map(|(p, r)| (p.clone(), r.clone()))))
    }

    /// Take the whole catalog out, leaving it empty.
    pub fn drain(&self) -> DomainResult<CatalogSnapshot> {
        let taken = std::mem::take(&mut *self.write()?);
        tracing::info!(products = taken.len(), "catalog drained");
        Ok(to_snapshot(taken))
    }

    /// Hand a snapshot to `persist` while holding the write lock, and clear the
    /// catalog only if it succeeds.
    ///
    /// No write can slip in between the copy and the clear; on failure the
    /// catalog is left exactly as it was.
    pub fn drain_with<F, E>(&self, persist: F) -> Result<CatalogSnapshot, E>
    where
        F: FnOnce(&CatalogSnapshot) -> Result<(), E>,
        E: From<DomainError>,
    {
        let mut products = self.write()?;
        let snapshot = to_snapshot(products.iter().map(|(p, r)| (p.clone(), r.clone())));

        persist(&snapshot)?;

        products.clear();
        tracing::info!(products = snapshot.len(), "catalog drained");
        Ok(snapshot)
    }
}

fn to_snapshot<I>(entries: I) -> CatalogSnapshot
where
    I: IntoIterator<Item = (Product, Vec<Review>)>,
{
    CatalogSnapshot::new(entries.into_iter().map(CatalogEntry::from).collect())
}
