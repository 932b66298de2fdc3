//! Currency display and invoice numbering.

use chrono::{DateTime, Local, TimeZone};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::coercion::{strict_decimal, FieldValue};

/// Currency used when a caller does not name one.
pub const DEFAULT_CURRENCY: &str = "SAR";

/// Format an amount as `"1,234.50 SAR"`.
///
/// Always two decimals with comma thousands separators. `None` and
/// non-finite amounts render as `"0.00 <currency>"`.
///
/// # Examples
/// ```
/// use umrah_invoice::pricing::format_currency;
///
/// assert_eq!(format_currency(Some(123.0), "SAR"), "123.00 SAR");
/// assert_eq!(format_currency(Some(123.4), "PKR"), "123.40 PKR");
/// assert_eq!(format_currency(None, "SAR"), "0.00 SAR");
/// ```
pub fn format_currency(amount: Option<f64>, currency: &str) -> String {
    let value = amount.filter(|v| v.is_finite()).unwrap_or(0.0);
    format!("{} {}", format_amount(value), currency)
}

/// [`format_currency`] in the default currency.
pub fn format_sar(amount: Option<f64>) -> String {
    format_currency(amount, DEFAULT_CURRENCY)
}

/// Format a raw form value; blank strings are zero, junk renders as zero.
pub fn format_field_currency(value: Option<&FieldValue>, currency: &str) -> String {
    format_currency(value.and_then(strict_decimal), currency)
}

/// Two-decimal grouped rendering of a finite amount, without currency.
pub fn format_amount(value: f64) -> String {
    // from_f64_retain keeps the exact binary value so half-way cases round
    // on what is actually stored.
    match Decimal::from_f64_retain(value) {
        Some(d) => format_decimal(d),
        None => group_thousands(&format!("{:.2}", value)),
    }
}

/// Two-decimal grouped rendering of a decimal amount.
pub fn format_decimal(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    group_thousands(&rounded.to_string())
}

fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac}")
}

/// Generate an invoice number for the current moment.
pub fn generate_invoice_number() -> String {
    invoice_number_at(&Local::now())
}

/// `INV-YYYYMMDD-xxxxxx`: calendar date in the given zone, suffix is the last
/// six digits of the Unix timestamp in milliseconds.
///
/// Two numbers generated within the same millisecond (or exactly 1000
/// seconds apart on the same day) collide.
pub fn invoice_number_at<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let suffix = now.timestamp_millis().rem_euclid(1_000_000);
    format!("INV-{}-{:06}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_defaults() {
        assert_eq!(format_sar(Some(123.0)), "123.00 SAR");
        assert_eq!(format_currency(Some(123.4), "PKR"), "123.40 PKR");
        assert_eq!(format_sar(None), "0.00 SAR");
    }

    #[test]
    fn test_format_currency_non_finite() {
        assert_eq!(format_sar(Some(f64::NAN)), "0.00 SAR");
        assert_eq!(format_currency(Some(f64::INFINITY), "PKR"), "0.00 PKR");
    }

    #[test]
    fn test_format_currency_thousands() {
        assert_eq!(format_currency(Some(140425.0), "PKR"), "140,425.00 PKR");
        assert_eq!(format_currency(Some(1234567.891), "PKR"), "1,234,567.89 PKR");
        assert_eq!(format_currency(Some(999.999), "SAR"), "1,000.00 SAR");
        assert_eq!(format_currency(Some(-1234.5), "SAR"), "-1,234.50 SAR");
    }

    #[test]
    fn test_format_field_currency() {
        assert_eq!(format_field_currency(Some(&"12.5".into()), "SAR"), "12.50 SAR");
        assert_eq!(format_field_currency(Some(&"".into()), "SAR"), "0.00 SAR");
        assert_eq!(format_field_currency(Some(&"abc".into()), "SAR"), "0.00 SAR");
        assert_eq!(format_field_currency(None, "PKR"), "0.00 PKR");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(dec!(0)), "0.00");
        assert_eq!(format_decimal(dec!(-0.001)), "0.00");
        assert_eq!(format_decimal(dec!(1000)), "1,000.00");
        assert_eq!(format_decimal(dec!(70212.5)), "70,212.50");
        assert_eq!(format_decimal(dec!(2.345)), "2.35");
    }

    #[test]
    fn test_invoice_number_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 10, 15, 30).unwrap();
        let number = invoice_number_at(&at);

        let expected_suffix = at.timestamp_millis() % 1_000_000;
        assert_eq!(number, format!("INV-20240307-{:06}", expected_suffix));
        assert_eq!(number.len(), "INV-YYYYMMDD-xxxxxx".len());
    }

    #[test]
    fn test_invoice_number_uses_local_date() {
        // 23:30 UTC on the 7th is already the 8th in UTC+5.
        let utc = Utc.with_ymd_and_hms(2024, 3, 7, 23, 30, 0).unwrap();
        let karachi = utc.with_timezone(&FixedOffset::east_opt(5 * 3600).unwrap());

        assert!(invoice_number_at(&utc).starts_with("INV-20240307-"));
        assert!(invoice_number_at(&karachi).starts_with("INV-20240308-"));
    }

    #[test]
    fn test_invoice_number_in_local_zone() {
        let now = Local::now();
        let number = invoice_number_at(&now);

        assert_eq!(number, format!("INV-{}-{:06}", now.format("%Y%m%d"), now.timestamp_millis() % 1_000_000));
        assert!(generate_invoice_number().starts_with("INV-"));
    }

    #[test]
    fn test_invoice_number_suffix_is_zero_padded() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_042).unwrap();
        assert!(invoice_number_at(&at).ends_with("-000042"));
    }
}
