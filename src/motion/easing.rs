/// Cubic ease-in-out over `t` in [0, 1]. Inputs outside the range are clamped.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = clamp_unit(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Clamp to [0, 1], mapping NaN to 0.
pub fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Position of `value` inside `[start, end]` as a fraction, clamped.
pub fn local_fraction(value: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if value >= end { 1.0 } else { 0.0 };
    }
    clamp_unit((value - start) / (end - start))
}
