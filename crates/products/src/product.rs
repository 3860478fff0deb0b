use chrono::{NaiveDate, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use prodcat_core::{Clock, DomainError, DomainResult, Entity, ProductId};

use crate::rating::Rating;

/// Discount rate applied to the price when a product's variant rule allows it (10%).
pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Daily time-of-day window during which a drink is discounted.
///
/// Both bounds are exclusive: at exactly `start` or `end` no discount applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowData")]
pub struct DiscountWindow {
    start: NaiveTime,
    end: NaiveTime,
}

#[derive(Deserialize)]
struct WindowData {
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<WindowData> for DiscountWindow {
    type Error = DomainError;

    fn try_from(data: WindowData) -> Result<Self, Self::Error> {
        DiscountWindow::new(data.start, data.end)
    }
}

impl DiscountWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::validation(format!(
                "discount window must start before it ends ({start} >= {end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// 17:30 to 18:30 local time.
    pub fn happy_hour() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(17, 30, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(18, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time > self.start && time < self.end
    }
}

impl Default for DiscountWindow {
    fn default() -> Self {
        Self::happy_hour()
    }
}

/// Variant rule deciding when the discount applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductKind {
    /// No rule: the discount always applies.
    Generic,
    /// Discounted only on the best-before day itself.
    Food { best_before: NaiveDate },
    /// Discounted only inside a daily time window.
    Drink {
        #[serde(default)]
        window: DiscountWindow,
    },
}

impl ProductKind {
    pub fn drink() -> Self {
        ProductKind::Drink {
            window: DiscountWindow::happy_hour(),
        }
    }

    pub fn food(best_before: NaiveDate) -> Self {
        ProductKind::Food { best_before }
    }

    /// Whether the discount applies at the clock's current local time.
    pub fn discount_applies(&self, clock: &dyn Clock) -> bool {
        match self {
            ProductKind::Generic => true,
            ProductKind::Food { best_before } => clock.today() == *best_before,
            ProductKind::Drink { window } => window.contains(clock.time_of_day()),
        }
    }
}

/// A catalog entry.
///
/// Immutable: "changing" the rating produces a new value through
/// [`Product::apply_rating`]. Identity (`PartialEq`/`Hash`) is the
/// `(id, name)` pair only, so a re-rated copy still finds the same map entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProductData")]
pub struct Product {
    id: ProductId,
    name: String,
    price: Decimal,
    rating: Rating,
    kind: ProductKind,
}

/// Unvalidated wire shape; deserialization goes through [`Product::new`].
#[derive(Deserialize)]
struct ProductData {
    id: ProductId,
    name: String,
    price: Decimal,
    #[serde(default)]
    rating: Rating,
    kind: ProductKind,
}

impl TryFrom<ProductData> for Product {
    type Error = DomainError;

    fn try_from(data: ProductData) -> Result<Self, Self::Error> {
        Product::new(data.id, data.name, data.price, data.rating, data.kind)
    }
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        rating: Rating,
        kind: ProductKind,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if price < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "price cannot be negative (got {price})"
            )));
        }

        Ok(Self {
            id,
            name,
            price,
            rating,
            kind,
        })
    }

    pub fn generic(id: ProductId, name: impl Into<String>, price: Decimal, rating: Rating) -> DomainResult<Self> {
        Self::new(id, name, price, rating, ProductKind::Generic)
    }

    pub fn drink(id: ProductId, name: impl Into<String>, price: Decimal, rating: Rating) -> DomainResult<Self> {
        Self::new(id, name, price, rating, ProductKind::drink())
    }

    pub fn food(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        rating: Rating,
        best_before: NaiveDate,
    ) -> DomainResult<Self> {
        Self::new(id, name, price, rating, ProductKind::food(best_before))
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    pub fn best_before(&self) -> Option<NaiveDate> {
        match self.kind {
            ProductKind::Food { best_before } => Some(best_before),
            _ => None,
        }
    }

    /// New product value carrying `rating`; every other field is copied.
    pub fn apply_rating(&self, rating: Rating) -> Product {
        Product {
            rating,
            ..self.clone()
        }
    }

    /// 10% of the price, rounded half-up to 2 decimals, when the variant rule
    /// allows it at the clock's current time; zero otherwise.
    pub fn discount(&self, clock: &dyn Clock) -> Decimal {
        if self.kind.discount_applies(clock) {
            (self.price * DISCOUNT_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        }
    }

    /// `true` when all fields (not just the identity) are equal.
    pub fn same_state_as(&self, other: &Product) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.price == other.price
            && self.rating == other.rating
            && self.kind == other.kind
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Product {}

impl core::hash::Hash for Product {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}, {}, {}, {}", self.id, self.name, self.price, self.rating.stars())?;
        if let Some(date) = self.best_before() {
            write!(f, ", {date}")?;
        }
        Ok(())
    }
}
