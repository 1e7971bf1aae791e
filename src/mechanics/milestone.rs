/// Milestone mechanics: level thresholds that compound production.

/// Completed intervals at `level`; an interval of 0 disables the tier.
#[inline]
pub fn completed(level: u32, interval: u32) -> u32 {
    if interval == 0 { 0 } else { level / interval }
}

/// `(1 + mult)^count`; a tier never shrinks output.
#[inline]
pub fn tier_factor(mult: f64, count: u32) -> f64 {
    if count == 0 {
        1.0
    } else {
        (1.0 + mult.max(0.0)).powf(f64::from(count))
    }
}

/// Log damping of a compounded factor: `1 + log10(1 + factor)`.
#[inline]
pub fn dampen(factor: f64) -> f64 {
    1.0 + (1.0 + factor.max(0.0)).log10()
}
