//! Integer money helpers.
//!
//! All amounts are minor units (cents). Percentages are basis points
//! (1 bp = 0.01%), so a 2-decimal percentage survives integer arithmetic.

/// `part / whole` expressed in basis points, rounded half-up.
///
/// Returns 0 when `whole` is not positive. Not clamped: a `part` larger than
/// `whole` yields more than 10_000 bps.
pub fn percent_bps(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return 0;
    }
    let scaled = i128::from(part) * 10_000 + i128::from(whole) / 2;
    (scaled / i128::from(whole)) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        // 1/3 of the limit: 3333.33.. bps rounds down, 2/3: 6666.66.. rounds up.
        assert_eq!(percent_bps(1, 3), 3333);
        assert_eq!(percent_bps(2, 3), 6667);
        // Exactly half a basis point rounds up.
        assert_eq!(percent_bps(1, 20_000), 1);
    }

    #[test]
    fn scenario_values() {
        assert_eq!(percent_bps(21_050, 50_000), 4210);
        assert_eq!(percent_bps(12_000, 50_000), 2400);
    }

    #[test]
    fn unclamped_above_full() {
        assert_eq!(percent_bps(15_000, 10_000), 15_000);
    }

    #[test]
    fn zero_whole_is_zero() {
        assert_eq!(percent_bps(500, 0), 0);
    }
}
