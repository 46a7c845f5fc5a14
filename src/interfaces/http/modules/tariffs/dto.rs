//! Daily pricing DTOs (§6: `/api/daily-pricing`).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::tariff::{parse_hhmm, TariffSegment};

#[derive(Debug, Serialize)]
pub struct TariffSegmentDto {
    pub date: NaiveDate,
    pub start: String,
    pub end: String,
    pub price: Decimal,
    pub label: Option<String>,
}

impl From<TariffSegment> for TariffSegmentDto {
    fn from(s: TariffSegment) -> Self {
        Self {
            date: s.date,
            start: minute_to_hhmm(s.start_minute),
            end: minute_to_hhmm(s.end_minute),
            price: s.price,
            label: s.label,
        }
    }
}

fn minute_to_hhmm(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTariffSegmentRequest {
    pub date: NaiveDate,
    pub start: String,
    pub end: String,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub price: f64,
    pub label: Option<String>,
}

impl CreateTariffSegmentRequest {
    pub fn into_domain(self) -> Option<TariffSegment> {
        Some(TariffSegment {
            date: self.date,
            start_minute: parse_hhmm(&self.start)?,
            end_minute: parse_hhmm(&self.end)?,
            price: Decimal::try_from(self.price).ok()?,
            label: self.label,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DefaultPriceDto {
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_domain_parses_hhmm_and_price() {
        let req = CreateTariffSegmentRequest {
            date: NaiveDate::from_ymd_opt(2026, 7, 28).unwrap(),
            start: "22:30".into(),
            end: "07:00".into(),
            price: 4.2,
            label: Some("off-peak".into()),
        };
        let segment = req.into_domain().expect("valid request should parse");
        assert_eq!(segment.start_minute, 22 * 60 + 30);
        assert_eq!(segment.end_minute, 7 * 60);
        assert_eq!(segment.price, Decimal::try_from(4.2).unwrap());
    }

    #[test]
    fn into_domain_rejects_malformed_time() {
        let req = CreateTariffSegmentRequest {
            date: NaiveDate::from_ymd_opt(2026, 7, 28).unwrap(),
            start: "not-a-time".into(),
            end: "07:00".into(),
            price: 1.0,
            label: None,
        };
        assert!(req.into_domain().is_none());
    }

    #[test]
    fn dto_formats_minutes_as_hhmm() {
        let segment = TariffSegment {
            date: NaiveDate::from_ymd_opt(2026, 7, 28).unwrap(),
            start_minute: 90,
            end_minute: 600,
            price: Decimal::new(350, 2),
            label: None,
        };
        let dto = TariffSegmentDto::from(segment);
        assert_eq!(dto.start, "01:30");
        assert_eq!(dto.end, "10:00");
    }
}
