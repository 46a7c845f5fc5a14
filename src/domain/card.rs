//! Card domain entity (§3): the prepaid balance behind an idTag.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Card {
    /// The idTag value this card authorizes.
    pub id: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_positive_balance(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Debits `amount`, clamping the resulting balance at zero (§4.6, §4.7 — the
    /// balance invariant `balance(c) >= 0` always holds, §8).
    pub fn debit_clamped(&mut self, amount: Decimal) -> Decimal {
        let applied = amount.min(self.balance).max(Decimal::ZERO);
        self.balance = (self.balance - applied).max(Decimal::ZERO);
        applied
    }

    pub fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn debit_clamps_at_zero() {
        let mut c = Card::new("TAG1");
        c.balance = dec!(1.00);
        let applied = c.debit_clamped(dec!(4.80));
        assert_eq!(applied, dec!(1.00));
        assert_eq!(c.balance, Decimal::ZERO);
    }

    #[test]
    fn debit_never_goes_negative_on_repeat() {
        let mut c = Card::new("TAG1");
        c.balance = dec!(5.00);
        c.debit_clamped(dec!(5.00));
        assert_eq!(c.balance, Decimal::ZERO);
        c.debit_clamped(dec!(1.00));
        assert_eq!(c.balance, Decimal::ZERO);
    }

    #[test]
    fn credit_increases_balance() {
        let mut c = Card::new("TAG1");
        c.credit(dec!(10.00));
        assert_eq!(c.balance, dec!(10.00));
    }
}
