/// Display mechanics: compact amounts with alphabetic thousand tiers.

/// `999.5`, `1.5a`, `2b`, ..., `1.1z`, `3aa`. NaN prints `0`, infinities `∞`.
pub fn format_amount(value: f64) -> String {
    if value.is_nan() {
        return "0".to_owned();
    }
    if value.is_infinite() {
        return "∞".to_owned();
    }

    let mut v = value;
    let mut tier = 0u32;
    while v >= 1000.0 {
        v /= 1000.0;
        tier += 1;
    }
    format!("{}{}", two_places(v), tier_suffix(tier))
}

/// Up to two decimals, trailing zeros and dot dropped.
fn two_places(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

/// 1 → `a`, 26 → `z`, 27 → `aa` (bijective base 26).
fn tier_suffix(tier: u32) -> String {
    let mut out = Vec::new();
    let mut t = tier;
    while t > 0 {
        t -= 1;
        out.push(b'a' + (t % 26) as u8);
        t /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_roll_over_after_z() {
        assert_eq!(tier_suffix(0), "");
        assert_eq!(tier_suffix(1), "a");
        assert_eq!(tier_suffix(26), "z");
        assert_eq!(tier_suffix(27), "aa");
        assert_eq!(tier_suffix(28), "ab");
        assert_eq!(tier_suffix(26 * 27), "zz");
        assert_eq!(tier_suffix(26 * 27 + 1), "aaa");
    }

    #[test]
    fn two_places_trims() {
        assert_eq!(two_places(1.0), "1");
        assert_eq!(two_places(1.5), "1.5");
        assert_eq!(two_places(1.25), "1.25");
        assert_eq!(two_places(0.0), "0");
    }
}
