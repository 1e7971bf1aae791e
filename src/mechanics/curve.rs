/// Cost-curve mechanics: geometric pricing with overflow clamping.

/// Finite ceiling returned instead of NaN/Infinity when a cost blows up.
/// Anything at or above it is treated as unaffordable.
pub const COST_SENTINEL: f64 = f64::MAX;

/// Hard bound on single-level steps for any bulk or max purchase loop.
pub const MAX_PURCHASE_ITERS: u32 = 1_000_000;

/// Clamp a raw cost into `[0, COST_SENTINEL]`; NaN and +inf map to the sentinel.
#[inline]
pub fn clamp_cost(raw: f64) -> f64 {
    if raw.is_nan() || raw >= COST_SENTINEL {
        COST_SENTINEL
    } else {
        raw.max(0.0)
    }
}

/// `base * growth^level * scale`, clamped.
#[inline]
pub fn geometric_cost(base: f64, growth: f64, level: u32, scale: f64) -> f64 {
    clamp_cost(base * growth.powf(f64::from(level)) * scale)
}

/// True once a cost or running sum can no longer be compared meaningfully.
#[inline]
pub fn is_overflowed(value: f64) -> bool {
    !value.is_finite() || value >= COST_SENTINEL
}
