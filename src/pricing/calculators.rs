//! Core pricing calculation functions.
//!
//! Pure functions for invoice math - no storage, no clock, no I/O.
//! Amounts are `f64` and every intermediate is rounded with [`round_money`]
//! before it feeds the next step, so outputs match invoices issued by
//! earlier versions of the tool to the last bit.

use super::coercion::{count_or, decimal_or};
use super::models::{InvoiceBreakdown, InvoiceInput};

/// Values closer than this to an integer are snapped to it after rounding.
const NEAR_INTEGER_TOLERANCE: f64 = 1e-9;

/// Round to two decimal places, half away from zero.
///
/// Non-finite input, or input too large to scale by 100, yields 0. The value is nudged by one machine epsilon
/// before scaling so literals like `1.005` round up the way a person expects,
/// and results within `1e-9` of an integer are snapped to it
/// (`20.000000000000004` becomes `20`).
///
/// # Examples
/// ```
/// use umrah_invoice::pricing::round_money;
///
/// assert_eq!(round_money(269.5), 269.5);
/// assert_eq!(round_money(1.234), 1.23);
/// assert_eq!(round_money(1.005), 1.01);
/// assert_eq!(round_money(f64::NAN), 0.0);
/// ```
pub fn round_money(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    let scaled = ((value + f64::EPSILON) * 100.0).round();
    if !scaled.is_finite() {
        return 0.0;
    }
    let mut result = scaled / 100.0;

    let near_int = result.round();
    if (result - near_int).abs() < NEAR_INTEGER_TOLERANCE {
        result = near_int;
    }

    // Collapse -0.0 so serialized output never shows "-0".
    if result == 0.0 {
        0.0
    } else {
        result
    }
}

/// Calculate the full invoice breakdown from raw form inputs.
///
/// Total function: malformed or missing fields fall back to their defaults,
/// the traveler count is at least 1, and a zero or unparsable exchange rate
/// is treated as 1.
///
/// `total_with_profit_pkr` converts the aggregate `with_profit` while
/// `per_pax_pkr` converts the already-divided `per_pax_sar`, so
/// `per_pax_pkr * pax_count` can differ from the total by a cent. Both
/// paths are kept because issued invoices carry these exact values.
pub fn calculate_invoice(input: &InvoiceInput) -> InvoiceBreakdown {
    let makkah_rate = decimal_or(input.makkah_hotel_rate.as_ref(), 0.0);
    let makkah_nights = count_or(input.nights_in_makkah.as_ref(), 0);
    let madinah_rate = decimal_or(input.madinah_hotel_rate.as_ref(), 0.0);
    let madinah_nights = count_or(input.nights_in_madinah.as_ref(), 0);
    let visa_per_pax = decimal_or(input.visa_rate.as_ref(), 0.0);
    let ziyarat_per_pax = decimal_or(input.ziyarat_rate.as_ref(), 0.0);
    let profit = decimal_or(input.profit_percentage.as_ref(), 0.0);
    let airline_per_pax_pkr = decimal_or(input.airline_price_pkr.as_ref(), 0.0);
    let pax_count = count_or(input.per_pax_count.as_ref(), 1).max(1);
    let sar_to_pkr = resolve_exchange_rate(decimal_or(input.exchange_rate.as_ref(), 1.0));

    let pax = pax_count as f64;

    let makkah_cost = round_money(makkah_rate * makkah_nights as f64);
    let madinah_cost = round_money(madinah_rate * madinah_nights as f64);
    let visa_total = round_money(visa_per_pax * pax);
    let ziyarat_total = round_money(ziyarat_per_pax * pax);

    let base_total = round_money(makkah_cost + madinah_cost + visa_total + ziyarat_total);
    let with_profit = round_money(base_total * (1.0 + profit / 100.0));

    let per_pax_sar = round_money(if pax_count > 0 { with_profit / pax } else { 0.0 });
    let per_pax_pkr = round_money(round_money(per_pax_sar * sar_to_pkr) + airline_per_pax_pkr);

    let airline_total_pkr = round_money(airline_per_pax_pkr * pax);
    let total_with_profit_pkr = round_money(with_profit * sar_to_pkr + airline_total_pkr);

    InvoiceBreakdown {
        makkah_cost,
        madinah_cost,
        visa_total,
        ziyarat_total,
        base_total,
        with_profit,
        per_pax_sar,
        per_pax_pkr,
        airline_per_pax_pkr,
        airline_total_pkr,
        total_with_profit_pkr,
        pax_count,
    }
}

/// Exchange rates must be positive; anything else means "not set".
fn resolve_exchange_rate(parsed: f64) -> f64 {
    if parsed > 0.0 {
        parsed
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::coercion::FieldValue;

    fn reference_input() -> InvoiceInput {
        InvoiceInput {
            makkah_hotel_rate: Some(100.0.into()),
            nights_in_makkah: Some(2_i64.into()),
            madinah_hotel_rate: Some(150.0.into()),
            nights_in_madinah: Some(1_i64.into()),
            visa_rate: Some(50.0.into()),
            ziyarat_rate: Some(20.0.into()),
            profit_percentage: Some(10.0.into()),
            per_pax_count: Some(2_i64.into()),
            exchange_rate: Some(75.0.into()),
            airline_price_pkr: Some(50000.0.into()),
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_basic() {
        assert_eq!(round_money(1.234), 1.23);
        assert_eq!(round_money(1.236), 1.24);
        assert_eq!(round_money(269.5), 269.5);
        assert_eq!(round_money(0.0), 0.0);
    }

    #[test]
    fn test_round_money_half_rounds_up() {
        assert_eq!(round_money(0.125), 0.13);
        assert_eq!(round_money(1.005), 1.01);
        assert_eq!(round_money(2.675), 2.68);
    }

    #[test]
    fn test_round_money_snaps_float_artifacts() {
        assert_eq!(round_money(20.000000000000004), 20.0);
        assert_eq!(round_money(19.999999999999996), 20.0);
        // 0.1 + 0.2 = 0.30000000000000004
        assert_eq!(round_money(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_round_money_non_finite() {
        assert_eq!(round_money(f64::NAN), 0.0);
        assert_eq!(round_money(f64::INFINITY), 0.0);
        assert_eq!(round_money(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_round_money_overflowing_scale() {
        assert!(round_money(1e305).is_finite());
        assert_eq!(round_money(1e307), 0.0);
        assert_eq!(round_money(f64::MAX), 0.0);
        assert_eq!(round_money(-f64::MAX), 0.0);
    }

    #[test]
    fn test_round_money_never_negative_zero() {
        let rounded = round_money(-0.001);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());
    }

    // ==================== calculate_invoice tests ====================

    #[test]
    fn test_reference_scenario() {
        let r = calculate_invoice(&reference_input());

        assert_eq!(r.makkah_cost, 200.0);
        assert_eq!(r.madinah_cost, 150.0);
        assert_eq!(r.visa_total, 100.0);
        assert_eq!(r.ziyarat_total, 40.0);
        assert_eq!(r.base_total, 490.0);
        assert_eq!(r.with_profit, 539.0);
        assert_eq!(r.per_pax_sar, 269.5);
        assert_eq!(r.per_pax_pkr, 70212.5); // 269.5 * 75 + 50000
        assert_eq!(r.airline_per_pax_pkr, 50000.0);
        assert_eq!(r.airline_total_pkr, 100000.0);
        assert_eq!(r.total_with_profit_pkr, 140425.0); // 539 * 75 + 100000
        assert_eq!(r.pax_count, 2);
    }

    #[test]
    fn test_string_inputs_match_numeric_inputs() {
        let input = InvoiceInput {
            makkah_hotel_rate: Some("100".into()),
            nights_in_makkah: Some("2".into()),
            madinah_hotel_rate: Some("150.00".into()),
            nights_in_madinah: Some("1".into()),
            visa_rate: Some("50".into()),
            ziyarat_rate: Some("20".into()),
            profit_percentage: Some("10".into()),
            per_pax_count: Some("2".into()),
            exchange_rate: Some("75".into()),
            airline_price_pkr: Some("50000".into()),
        };

        assert_eq!(calculate_invoice(&input), calculate_invoice(&reference_input()));
    }

    #[test]
    fn test_empty_input() {
        let r = calculate_invoice(&InvoiceInput::default());

        assert_eq!(r.base_total, 0.0);
        assert_eq!(r.per_pax_sar, 0.0);
        assert_eq!(r.per_pax_pkr, 0.0);
        assert_eq!(r.total_with_profit_pkr, 0.0);
        assert_eq!(r.pax_count, 1);
    }

    #[test]
    fn test_blank_strings_behave_like_missing() {
        let input = InvoiceInput {
            makkah_hotel_rate: Some("".into()),
            nights_in_makkah: Some("".into()),
            per_pax_count: Some("".into()),
            exchange_rate: Some("".into()),
            ..Default::default()
        };

        assert_eq!(calculate_invoice(&input), calculate_invoice(&InvoiceInput::default()));
    }

    #[test]
    fn test_pax_count_floor() {
        for raw in ["0", "-3", "abc", "0.5"] {
            let input = InvoiceInput {
                per_pax_count: Some(raw.into()),
                visa_rate: Some(10.0.into()),
                ..Default::default()
            };
            let r = calculate_invoice(&input);
            assert_eq!(r.pax_count, 1, "pax for {raw:?}");
            assert_eq!(r.visa_total, 10.0);
        }
    }

    #[test]
    fn test_zero_or_invalid_exchange_rate_falls_back_to_one() {
        for raw in [FieldValue::Number(0.0), "0".into(), "n/a".into(), FieldValue::Number(-5.0)] {
            let input = InvoiceInput {
                makkah_hotel_rate: Some(100.0.into()),
                nights_in_makkah: Some(1_i64.into()),
                exchange_rate: Some(raw.clone()),
                ..Default::default()
            };
            let r = calculate_invoice(&input);
            assert_eq!(r.total_with_profit_pkr, 100.0, "rate {raw:?}");
            assert_eq!(r.per_pax_pkr, 100.0, "rate {raw:?}");
        }
    }

    #[test]
    fn test_negative_profit_is_not_clamped() {
        let input = InvoiceInput {
            makkah_hotel_rate: Some(100.0.into()),
            nights_in_makkah: Some(2_i64.into()),
            profit_percentage: Some((-10.0).into()),
            ..Default::default()
        };
        let r = calculate_invoice(&input);

        assert_eq!(r.base_total, 200.0);
        assert_eq!(r.with_profit, 180.0);
        assert!(r.with_profit < r.base_total);
    }

    #[test]
    fn test_base_total_identity_and_non_negative() {
        let inputs = [
            reference_input(),
            InvoiceInput {
                makkah_hotel_rate: Some(333.33.into()),
                nights_in_makkah: Some(3_i64.into()),
                madinah_hotel_rate: Some(0.1.into()),
                nights_in_madinah: Some(7_i64.into()),
                visa_rate: Some(0.2.into()),
                ziyarat_rate: Some(12.345.into()),
                profit_percentage: Some(7.5.into()),
                per_pax_count: Some(3_i64.into()),
                exchange_rate: Some(74.89.into()),
                airline_price_pkr: Some(123456.78.into()),
            },
        ];

        for input in &inputs {
            let r = calculate_invoice(input);
            assert_eq!(
                r.base_total,
                round_money(r.makkah_cost + r.madinah_cost + r.visa_total + r.ziyarat_total)
            );
            assert!(r.pax_count >= 1);
            for amount in r.amounts() {
                assert!(amount.is_finite() && amount >= 0.0, "amount {amount}");
            }
        }
    }

    #[test]
    fn test_per_pax_and_total_may_disagree_by_a_cent() {
        // 100 SAR split over 3 travelers: per pax 33.33, total stays 100.
        let input = InvoiceInput {
            visa_rate: Some((100.0 / 3.0).into()),
            per_pax_count: Some(3_i64.into()),
            exchange_rate: Some(1.0.into()),
            ..Default::default()
        };
        let r = calculate_invoice(&input);

        assert_eq!(r.visa_total, 100.0);
        assert_eq!(r.per_pax_sar, 33.33);
        assert_eq!(r.total_with_profit_pkr, 100.0);
        assert_ne!(round_money(r.per_pax_pkr * r.pax_count as f64), r.total_with_profit_pkr);
    }

    #[test]
    fn test_float_artifacts_are_snapped() {
        // 0.1 * 3 nights = 0.30000000000000004
        let input = InvoiceInput {
            makkah_hotel_rate: Some(0.1.into()),
            nights_in_makkah: Some(3_i64.into()),
            ..Default::default()
        };
        assert_eq!(calculate_invoice(&input).makkah_cost, 0.3);
    }

    #[test]
    fn test_oversized_rates_stay_finite() {
        let input = InvoiceInput {
            makkah_hotel_rate: Some("1e307".into()),
            nights_in_makkah: Some(100_i64.into()),
            madinah_hotel_rate: Some(f64::MAX.into()),
            nights_in_madinah: Some(1_i64.into()),
            exchange_rate: Some("1e300".into()),
            airline_price_pkr: Some(f64::MAX.into()),
            per_pax_count: Some(2_i64.into()),
            ..Default::default()
        };
        let r = calculate_invoice(&input);

        for amount in r.amounts() {
            assert!(amount.is_finite(), "amount {amount}");
        }
    }

    #[test]
    fn test_idempotent() {
        let input = reference_input();
        assert_eq!(calculate_invoice(&input), calculate_invoice(&input));
    }
}
