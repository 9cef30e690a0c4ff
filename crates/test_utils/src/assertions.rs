//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types, giving more meaningful
//! failure messages than the standard macros.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_metering::ReadingEntry;

/// Asserts that two Money values are approximately equal within a tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that a listing is ascending by timestamp
pub fn assert_readings_ascending(entries: &[ReadingEntry]) {
    for pair in entries.windows(2) {
        assert!(
            pair[0].recorded_at <= pair[1].recorded_at,
            "Readings out of order: {} after {}",
            pair[0].recorded_at,
            pair[1].recorded_at
        );
    }
}

/// Asserts that a listing sums to the expected total
pub fn assert_readings_total(entries: &[ReadingEntry], expected: Decimal) {
    let total: Decimal = entries.iter().map(|e| e.energy_kwh).sum();
    assert_eq!(
        total, expected,
        "Listing sums to {total}, expected {expected}"
    );
}
