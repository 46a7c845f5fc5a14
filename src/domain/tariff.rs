//! TariffSegment domain entity and the pure matching rules behind
//! the Tariff Resolver (§4.2).

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A half-open-looking but inclusive daily price window. `start == end`
/// covers the full day; `start > end` is a cross-midnight window meaning
/// "time >= start OR time <= end" (§4.2).
#[derive(Debug, Clone)]
pub struct TariffSegment {
    pub date: NaiveDate,
    /// Minutes since midnight, `[0, 1439]` (`24:00` normalizes to `23:59` = 1439).
    pub start_minute: u16,
    pub end_minute: u16,
    pub price: Decimal,
    pub label: Option<String>,
}

pub const END_OF_DAY_MINUTE: u16 = 23 * 60 + 59;

/// Fallback price when no segment matches on the current or prior date,
/// matching the reference implementation's hardcoded default (§4.2).
pub const DEFAULT_PRICE: Decimal = Decimal::from_parts(60, 0, 0, false, 1);

/// Parses `HH:MM` (or the literal `24:00`) into minutes since midnight,
/// normalizing `24:00` to `23:59` per §3/§4.2.
pub fn parse_hhmm(s: &str) -> Option<u16> {
    if s == "24:00" {
        return Some(END_OF_DAY_MINUTE);
    }
    let (h, m) = s.split_once(':')?;
    let h: u16 = h.parse().ok()?;
    let m: u16 = m.parse().ok()?;
    if h > 24 || m > 59 {
        return None;
    }
    Some((h * 60 + m).min(END_OF_DAY_MINUTE))
}

impl TariffSegment {
    /// Whether `minute_of_day` falls inside this segment's window.
    pub fn matches_minute(&self, minute_of_day: u16) -> bool {
        if self.start_minute == self.end_minute {
            return true; // full-day segment
        }
        if self.start_minute < self.end_minute {
            minute_of_day >= self.start_minute && minute_of_day <= self.end_minute
        } else {
            // cross-midnight: time >= start OR time <= end
            minute_of_day >= self.start_minute || minute_of_day <= self.end_minute
        }
    }
}

/// Picks the matching segment with the highest price, the conservative
/// tie-break specified by §4.2.
pub fn resolve_highest_price(segments: &[TariffSegment], minute_of_day: u16) -> Option<Decimal> {
    segments
        .iter()
        .filter(|seg| seg.matches_minute(minute_of_day))
        .map(|seg| seg.price)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn seg(start: &str, end: &str, price: Decimal) -> TariffSegment {
        TariffSegment {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_minute: parse_hhmm(start).unwrap(),
            end_minute: parse_hhmm(end).unwrap(),
            price,
            label: None,
        }
    }

    #[test]
    fn end_of_day_normalizes_to_2359() {
        assert_eq!(parse_hhmm("24:00"), Some(END_OF_DAY_MINUTE));
        assert_eq!(parse_hhmm("23:59"), Some(END_OF_DAY_MINUTE));
    }

    #[test]
    fn full_day_segment_matches_everything() {
        let s = seg("08:00", "08:00", dec!(6.0));
        assert!(s.matches_minute(0));
        assert!(s.matches_minute(23 * 60 + 59));
    }

    #[test]
    fn ordinary_segment_is_inclusive_both_ends() {
        let s = seg("22:00", "23:59", dec!(2.0));
        assert!(s.matches_minute(22 * 60));
        assert!(s.matches_minute(23 * 60 + 59));
        assert!(!s.matches_minute(21 * 60 + 59));
    }

    #[test]
    fn cross_midnight_segment_matches_both_sides() {
        let s = seg("22:00", "06:00", dec!(2.0));
        assert!(s.matches_minute(23 * 60)); // 23:00
        assert!(s.matches_minute(0)); // 00:00
        assert!(s.matches_minute(6 * 60)); // 06:00
        assert!(!s.matches_minute(12 * 60)); // noon
    }

    #[test]
    fn overlap_resolves_to_highest_price() {
        let segments = vec![seg("08:00", "20:00", dec!(5.0)), seg("10:00", "12:00", dec!(8.0))];
        assert_eq!(resolve_highest_price(&segments, 11 * 60), Some(dec!(8.0)));
        assert_eq!(resolve_highest_price(&segments, 9 * 60), Some(dec!(5.0)));
    }

    #[test]
    fn no_match_returns_none() {
        let segments = vec![seg("08:00", "20:00", dec!(5.0))];
        assert_eq!(resolve_highest_price(&segments, 22 * 60), None);
    }
}
