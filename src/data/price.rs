use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("Price must be finite, got {0}")]
    NonFinite(f64),
    #[error("Price must be positive, got {0}")]
    NonPositive(f64),
}

//a single observation of the traded asset, one per trading period
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    //creates a new PricePoint with validation
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Result<Self, PriceError> {
        let point = PricePoint { timestamp, price };
        point.validate()?;
        Ok(point)
    }

    //creates a PricePoint without validation
    pub fn new_unchecked(timestamp: DateTime<Utc>, price: f64) -> Self {
        PricePoint { timestamp, price }
    }

    //checks the price is usable for share arithmetic
    pub fn validate(&self) -> Result<(), PriceError> {
        if !self.price.is_finite() {
            return Err(PriceError::NonFinite(self.price));
        }
        if self.price <= 0.0 {
            return Err(PriceError::NonPositive(self.price));
        }
        Ok(())
    }
}

//extracts the raw price column from a series
pub fn prices_of(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.price).collect()
}

//extracts the timestamp column from a series
pub fn timestamps_of(points: &[PricePoint]) -> Vec<DateTime<Utc>> {
    points.iter().map(|p| p.timestamp).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn accepts_positive_price() {
        let point = PricePoint::new(ts(), 101.5).unwrap();
        assert_eq!(point.price, 101.5);
    }

    #[test]
    fn rejects_zero_and_negative_prices() {
        assert_eq!(PricePoint::new(ts(), 0.0), Err(PriceError::NonPositive(0.0)));
        assert_eq!(
            PricePoint::new(ts(), -3.0),
            Err(PriceError::NonPositive(-3.0))
        );
    }

    #[test]
    fn rejects_non_finite_prices() {
        assert!(matches!(
            PricePoint::new(ts(), f64::NAN),
            Err(PriceError::NonFinite(_))
        ));
        assert!(matches!(
            PricePoint::new(ts(), f64::INFINITY),
            Err(PriceError::NonFinite(_))
        ));
    }

    #[test]
    fn column_extraction_keeps_order() {
        let points = vec![
            PricePoint::new_unchecked(ts(), 1.0),
            PricePoint::new_unchecked(ts() + chrono::Duration::days(1), 2.0),
        ];
        assert_eq!(prices_of(&points), vec![1.0, 2.0]);
        assert_eq!(timestamps_of(&points)[1], ts() + chrono::Duration::days(1));
    }
}
