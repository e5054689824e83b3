//! Pure comparison primitives: text, calendar distance and amount tolerance.

use chrono::NaiveDate;

use crate::util::levenshtein_distance;

/// Relative difference allowed by [`amounts_match`] when no tolerance is given.
pub const DEFAULT_AMOUNT_TOLERANCE: f64 = 0.02;

/// Case-insensitive Levenshtein similarity in `[0.0, 1.0]`.
///
/// Identical strings (after trimming and lowercasing, including two empty
/// strings) score `1.0`; a single empty side scores `0.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let max_len = a.len().max(b.len());
    1.0 - (levenshtein_distance(&a, &b) as f64 / max_len as f64)
}

fn normalize(s: &str) -> Vec<char> {
    s.trim().to_lowercase().chars().collect()
}

/// Absolute number of calendar days between two dates.
pub fn date_delta_days(d1: NaiveDate, d2: NaiveDate) -> u32 {
    (d1 - d2).num_days().unsigned_abs() as u32
}

/// Whether two amounts agree within `tolerance`, relative to their mean.
/// Signs are ignored.
pub fn amounts_match(x: f64, y: f64, tolerance: f64) -> bool {
    let (x, y) = (x.abs(), y.abs());
    if x == y {
        return true;
    }
    relative_difference(x, y) <= tolerance
}

/// `max(0, 1 - |Δ| / mean)` over absolute values; `1.0` for equal amounts.
pub fn amount_similarity(x: f64, y: f64) -> f64 {
    let (x, y) = (x.abs(), y.abs());
    if x == y {
        return 1.0;
    }
    (1.0 - relative_difference(x, y)).max(0.0)
}

/// Callers guarantee `x != y`, so the mean is never zero.
fn relative_difference(x: f64, y: f64) -> f64 {
    (x - y).abs() / ((x + y) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn similarity_identity() {
        assert_eq!(similarity("Shoprite", "Shoprite"), 1.0);
        assert_eq!(similarity("  SHOPRITE ", "shoprite"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn similarity_one_side_empty() {
        assert_eq!(similarity("", "x"), 0.0);
        assert_eq!(similarity("x", "   "), 0.0);
    }

    #[test]
    fn similarity_is_symmetric_and_bounded() {
        let samples = [
            "Shoprite Lekki",
            "SHOPRITE LEKKI PHASE 1",
            "POS/WEB PURCHASE",
            "Chicken Republic",
            "",
            "ß",
            "Total Energies",
        ];
        for a in samples {
            for b in samples {
                let ab = similarity(a, b);
                assert_eq!(ab, similarity(b, a), "{a:?} vs {b:?}");
                assert!((0.0..=1.0).contains(&ab), "{a:?} vs {b:?} = {ab}");
            }
        }
    }

    #[test]
    fn similarity_partial() {
        let s = similarity("Shoprite Lekki", "SHOPRITE LEKKI PHASE 1");
        assert!((s - (1.0 - 8.0 / 22.0)).abs() < 1e-12, "score was {s}");
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn date_delta_is_absolute() {
        assert_eq!(date_delta_days(date(2024, 3, 1), date(2024, 3, 1)), 0);
        assert_eq!(date_delta_days(date(2024, 3, 1), date(2024, 3, 4)), 3);
        assert_eq!(date_delta_days(date(2024, 3, 4), date(2024, 3, 1)), 3);
        // Leap day.
        assert_eq!(date_delta_days(date(2024, 2, 28), date(2024, 3, 1)), 2);
    }

    #[test]
    fn amounts_match_tolerance() {
        assert!(amounts_match(100.0, 100.0, DEFAULT_AMOUNT_TOLERANCE));
        assert!(amounts_match(100.0, 101.0, DEFAULT_AMOUNT_TOLERANCE));
        assert!(!amounts_match(100.0, 110.0, DEFAULT_AMOUNT_TOLERANCE));
    }

    #[test]
    fn amounts_match_ignores_sign_and_zero() {
        assert!(amounts_match(15000.0, -15000.0, DEFAULT_AMOUNT_TOLERANCE));
        assert!(amounts_match(0.0, 0.0, 0.0));
        assert!(!amounts_match(0.0, 10.0, DEFAULT_AMOUNT_TOLERANCE));
    }

    #[test]
    fn amount_similarity_floors_at_zero() {
        assert_eq!(amount_similarity(100.0, -100.0), 1.0);
        assert_eq!(amount_similarity(0.0, 10.0), 0.0);
        let s = amount_similarity(100.0, 150.0);
        assert!((s - 0.6).abs() < 1e-12, "score was {s}");
    }
}
