//! Tariff calculation
//!
//! Pricing is an external collaborator behind a seam: the billing engine
//! hands a tariff the total consumption and the window and receives the
//! amount due. The flat-rate implementation here is the minimal core's
//! stand-in for a real rate-table integration.

use rust_decimal::Decimal;

use core_kernel::{ConsumptionWindow, Money};

/// Computes the amount due for aggregated consumption over a window
pub trait Tariff: Send + Sync + 'static {
    fn amount_due(&self, total_kwh: Decimal, window: &ConsumptionWindow) -> Money;
}

/// Flat per-kWh price with an optional daily standing charge
#[derive(Debug, Clone)]
pub struct FlatRateTariff {
    unit_price: Money,
    standing_charge_per_day: Option<Money>,
}

impl FlatRateTariff {
    /// Creates a flat tariff charging `unit_price` per kWh
    pub fn new(unit_price: Money) -> Self {
        Self {
            unit_price,
            standing_charge_per_day: None,
        }
    }

    /// Adds a fixed charge applied per calendar day of the window
    pub fn with_standing_charge(mut self, per_day: Money) -> Self {
        self.standing_charge_per_day = Some(per_day);
        self
    }
}

impl Tariff for FlatRateTariff {
    fn amount_due(&self, total_kwh: Decimal, window: &ConsumptionWindow) -> Money {
        let mut due = self.unit_price.multiply(total_kwh);
        if let Some(per_day) = self.standing_charge_per_day {
            due = due + per_day.multiply(Decimal::from(window.days()));
        }
        due.round_bankers(due.currency().decimal_places())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn january() -> ConsumptionWindow {
        ConsumptionWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_flat_rate() {
        let tariff = FlatRateTariff::new(Money::new(dec!(0.15), Currency::USD));
        let due = tariff.amount_due(dec!(25), &january());
        assert_eq!(due.amount(), dec!(3.75));
    }

    #[test]
    fn test_zero_consumption_zero_charge() {
        let tariff = FlatRateTariff::new(Money::new(dec!(0.15), Currency::USD));
        let due = tariff.amount_due(Decimal::ZERO, &january());
        assert!(due.is_zero());
    }

    #[test]
    fn test_standing_charge_scales_with_days() {
        let tariff = FlatRateTariff::new(Money::new(dec!(0.10), Currency::USD))
            .with_standing_charge(Money::new(dec!(0.25), Currency::USD));

        // 31 days at 0.25 plus 100 kWh at 0.10
        let due = tariff.amount_due(dec!(100), &january());
        assert_eq!(due.amount(), dec!(17.75));
    }

    #[test]
    fn test_amount_rounds_to_currency() {
        let tariff = FlatRateTariff::new(Money::new(dec!(0.1234), Currency::USD));
        let due = tariff.amount_due(dec!(10), &january());
        assert_eq!(due.amount(), dec!(1.23));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn flat_rate_is_monotone_in_consumption(
                a in 0i64..1_000_000i64,
                b in 0i64..1_000_000i64,
            ) {
                let tariff = FlatRateTariff::new(Money::new(dec!(0.15), Currency::USD));
                let lo = Decimal::new(a.min(b), 3);
                let hi = Decimal::new(a.max(b), 3);

                let due_lo = tariff.amount_due(lo, &january());
                let due_hi = tariff.amount_due(hi, &january());

                prop_assert!(due_lo.amount() <= due_hi.amount());
                prop_assert!(!due_lo.amount().is_sign_negative());
                prop_assert_eq!(due_lo.currency(), Currency::USD);
            }
        }
    }
}
