//! Products domain module.
//!
//! Star ratings, reviews and the immutable `Product` value with its variant
//! discount rules. Pure domain logic: no IO and no locking.

pub mod product;
pub mod rating;
pub mod review;

pub use product::{DISCOUNT_RATE, DiscountWindow, Product, ProductKind};
pub use rating::Rating;
pub use review::{Review, sort_best_first};
