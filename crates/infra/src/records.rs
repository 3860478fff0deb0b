//! Comma-separated text records for products and reviews.
//!
//! Product: `K,id,name,price,rating[,best_before]` where `K` is `D` (drink),
//! `F` (food, ISO date required) or `G` (generic).
//! Review: `rating,comment`; the comment may itself contain commas.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use prodcat_core::ProductId;
use prodcat_products::{Product, ProductKind, Rating, Review};

use crate::error::InfraError;

pub fn parse_product_record(line: &str) -> Result<Product, InfraError> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    if !(5..=6).contains(&fields.len()) {
        return Err(InfraError::parse(line, format!("expected 5 or 6 fields, found {}", fields.len())));
    }

    let id: ProductId = fields[1]
        .parse()
        .map_err(|e| InfraError::parse(line, format!("id: {e}")))?;
    let name = fields[2];
    let price: Decimal = fields[3]
        .parse()
        .map_err(|e| InfraError::parse(line, format!("price: {e}")))?;
    let rating = parse_rating(line, fields[4])?;

    let kind = match (fields[0], fields.get(5)) {
        ("D", _) => ProductKind::drink(),
        ("G", _) => ProductKind::Generic,
        ("F", Some(date)) => {
            let best_before = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| InfraError::parse(line, format!("best before: {e}")))?;
            ProductKind::food(best_before)
        }
        ("F", None) => return Err(InfraError::parse(line, "food record needs a best-before date")),
        (other, _) => return Err(InfraError::parse(line, format!("unknown product kind '{other}'"))),
    };

    Product::new(id, name, price, rating, kind).map_err(|e| InfraError::parse(line, e.to_string()))
}

pub fn parse_review_record(line: &str) -> Result<Review, InfraError> {
    let (rating, comment) = line
        .trim()
        .split_once(',')
        .ok_or_else(|| InfraError::parse(line, "expected 'rating,comment'"))?;

    Ok(Review::new(parse_rating(line, rating.trim())?, comment.trim()))
}

fn parse_rating(line: &str, raw: &str) -> Result<Rating, InfraError> {
    let ordinal: i64 = raw
        .parse()
        .map_err(|e| InfraError::parse(line, format!("rating: {e}")))?;
    Rating::try_from(ordinal).map_err(|e| InfraError::parse(line, e.to_string()))
}

/// Text record for `product`, readable by [`parse_product_record`].
pub fn product_record(product: &Product) -> String {
    let head = format!(
        "{},{},{},{}",
        product.id_typed(),
        product.name(),
        product.price(),
        product.rating().ordinal()
    );
    match product.kind() {
        ProductKind::Generic => format!("G,{head}"),
        ProductKind::Drink { .. } => format!("D,{head}"),
        ProductKind::Food { best_before } => format!("F,{head},{}", best_before.format("%Y-%m-%d")),
    }
}

pub fn review_record(review: &Review) -> String {
    format!("{},{}", review.rating().ordinal(), review.comment())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_drink_and_food_records() {
        let tea = parse_product_record("D,101,Tea,1.99,0").unwrap();
        assert_eq!(tea.id_typed(), ProductId::new(101));
        assert_eq!(tea.name(), "Tea");
        assert_eq!(tea.price(), Decimal::new(199, 2));
        assert_eq!(tea.kind(), &ProductKind::drink());

        let cake = parse_product_record(" F,103,Cake,3.99,4,2024-06-15 ").unwrap();
        assert_eq!(cake.rating(), Rating::FourStar);
        assert_eq!(cake.best_before(), NaiveDate::from_ymd_opt(2024, 6, 15));
    }

    #[test]
    fn rejects_malformed_product_records() {
        for bad in [
            "D,101,Tea,1.99",
            "X,101,Tea,1.99,0",
            "D,abc,Tea,1.99,0",
            "D,101,Tea,cheap,0",
            "D,101,Tea,1.99,9",
            "D,101,,1.99,0",
            "D,101,Tea,-1.99,0",
            "F,103,Cake,3.99,0",
            "F,103,Cake,3.99,0,15/06/2024",
        ] {
            assert!(
                matches!(parse_product_record(bad), Err(InfraError::Parse { .. })),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn review_comment_keeps_commas() {
        let review = parse_review_record("4,Nice, hot cup of tea").unwrap();
        assert_eq!(review.rating(), Rating::FourStar);
        assert_eq!(review.comment(), "Nice, hot cup of tea");
    }

    #[test]
    fn rejects_malformed_review_records() {
        assert!(parse_review_record("no comma here").is_err());
        assert!(parse_review_record("6,too good").is_err());
        assert!(parse_review_record("x,what").is_err());
    }

    #[test]
    fn written_records_parse_back() {
        let cake = Product::food(
            ProductId::new(103),
            "Cake",
            Decimal::new(399, 2),
            Rating::TwoStar,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        )
        .unwrap();
        let parsed = parse_product_record(&product_record(&cake)).unwrap();
        assert!(parsed.same_state_as(&cake));

        let review = Review::new(Rating::FiveStar, "Best cake, ever");
        assert_eq!(parse_review_record(&review_record(&review)).unwrap(), review);
    }
}
