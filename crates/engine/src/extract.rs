//! Best-effort field extraction from receipt text.
//!
//! The OCR collaborator only hands back raw text; this module pulls a
//! candidate `(amount, date, merchant)` tuple out of it. The heuristics are
//! explicitly unreliable producers: every field is optional and the caller
//! decides what an absent amount means (no transaction, `partial` log).

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:total|amount|\$)\s*:?\s*(\d+(?:\.\d{1,2})?)").unwrap()
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[-/](\d{1,2})[-/](\d{1,2})").unwrap());

const MERCHANT_MAX_LEN: usize = 100;

/// Candidate fields pulled out of receipt text. All optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceiptFields {
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
    pub merchant: Option<String>,
}

/// Scans `raw_text` for an amount, a date and a merchant name.
pub fn extract_fields(raw_text: &str) -> ReceiptFields {
    ReceiptFields {
        amount_minor: extract_amount_minor(raw_text),
        date: extract_date(raw_text),
        merchant: extract_merchant(raw_text),
    }
}

/// First `total`/`amount`/`$`-anchored decimal, converted to minor units.
fn extract_amount_minor(text: &str) -> Option<i64> {
    let captures = AMOUNT_RE.captures(text)?;
    decimal_to_minor(captures.get(1)?.as_str())
}

/// Parses `"12"`, `"12.3"` or `"12.34"` into cents.
fn decimal_to_minor(raw: &str) -> Option<i64> {
    let (units, fraction) = match raw.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (raw, ""),
    };
    let units: i64 = units.parse().ok()?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        2 => fraction.parse().ok()?,
        _ => return None,
    };
    units
        .checked_mul(100)
        .and_then(|minor| minor.checked_add(cents))
}

/// Only unambiguous `YYYY-MM-DD` / `YYYY/MM/DD` forms are accepted;
/// `D/M/Y`-style dates are regional guesswork and are left unparsed.
fn extract_date(text: &str) -> Option<NaiveDate> {
    let captures = DATE_RE.captures(text)?;
    let year = captures.get(1)?.as_str().parse().ok()?;
    let month = captures.get(2)?.as_str().parse().ok()?;
    let day = captures.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First non-empty line, truncated to 100 characters.
fn extract_merchant(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|line| !line.is_empty())?;
    Some(line.chars().take(MERCHANT_MAX_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_receipt() {
        let text = "CORNER DELI\n123 Main St\n2024-03-14\nTOTAL: 23.50\nThank you!";
        let fields = extract_fields(text);
        assert_eq!(fields.amount_minor, Some(2350));
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 3, 14));
        assert_eq!(fields.merchant.as_deref(), Some("CORNER DELI"));
    }

    #[test]
    fn dollar_sign_anchor_and_short_fraction() {
        assert_eq!(extract_amount_minor("$ 12.3"), Some(1230));
        assert_eq!(extract_amount_minor("Amount: 7"), Some(700));
    }

    #[test]
    fn no_anchor_means_no_amount() {
        let fields = extract_fields("SOME SHOP\nitems 3\n19.99\n");
        assert_eq!(fields.amount_minor, None);
    }

    #[test]
    fn ambiguous_date_forms_are_skipped() {
        assert_eq!(extract_date("paid on 03/14/2024"), None);
        assert_eq!(
            extract_date("paid on 2024/03/14"),
            NaiveDate::from_ymd_opt(2024, 3, 14)
        );
        assert_eq!(extract_date("2024-13-40"), None);
    }

    #[test]
    fn merchant_skips_blank_lines_and_truncates() {
        let text = format!("\n   \n{}\nTOTAL 1.00", "M".repeat(150));
        let merchant = extract_fields(&text).merchant.unwrap();
        assert_eq!(merchant.len(), 100);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert_eq!(extract_fields(""), ReceiptFields::default());
    }
}
