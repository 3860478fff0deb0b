use serde::{Deserialize, Serialize};

use prodcat_core::{DomainError, ValueObject};

/// Star rating of a product or a review.
///
/// Variants are declared in ordinal order so the derived `Ord` matches the
/// numeric ordinal (`NotRated` < `OneStar` < ... < `FiveStar`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    #[default]
    NotRated,
    OneStar,
    TwoStar,
    ThreeStar,
    FourStar,
    FiveStar,
}

impl ValueObject for Rating {}

impl Rating {
    pub const ALL: [Rating; 6] = [
        Rating::NotRated,
        Rating::OneStar,
        Rating::TwoStar,
        Rating::ThreeStar,
        Rating::FourStar,
        Rating::FiveStar,
    ];

    pub const MAX_ORDINAL: u8 = 5;

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Display label: one filled star per ordinal, padded with empty stars.
    pub fn stars(self) -> String {
        let filled = self.ordinal() as usize;
        let empty = Self::MAX_ORDINAL as usize - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }

    /// Rating for the rounded mean of `ordinals`.
    ///
    /// Ties round half up. An empty input is `NotRated`.
    pub fn average<I>(ordinals: I) -> Rating
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = ordinals
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), o| (sum + u64::from(o), count + 1));

        if count == 0 {
            return Rating::NotRated;
        }

        // round(sum / count) with ties up, in integers: floor((2 * sum + count) / (2 * count)).
        let rounded = (2 * sum + count) / (2 * count);
        Self::clamped(rounded)
    }

    fn clamped(ordinal: u64) -> Rating {
        let ordinal = ordinal.min(u64::from(Self::MAX_ORDINAL));
        Self::ALL[ordinal as usize]
    }
}

impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.stars())
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(Self::MAX_ORDINAL)).contains(&value) {
            Ok(Self::ALL[value as usize])
        } else {
            Err(DomainError::InvalidRating(value))
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::try_from(i64::from(value))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.ordinal()
    }
}
