//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one with the new values.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two reviews with the same rating and comment are equal)
/// - **Entity**: Has identity (two products with the same id and name are the same product)
///
/// The trait requires:
/// - **Clone**: values are cheap to copy and handed out freely
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: helpful for logging and tests
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Review {
///     rating: Rating,
///     comment: String,
/// }
///
/// impl ValueObject for Review {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
