//! Linear interpolation
//!
//! Maps an animated value onto a visual property (scale, translation,
//! opacity). Inputs outside the input range are clamped.

/// Linear interpolation of `x` from `input` onto `output`, clamped
pub fn interpolate(x: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let (in_lo, in_hi) = input;
    let (out_lo, out_hi) = output;

    if in_hi == in_lo {
        return out_lo;
    }

    // Weighted form keeps both end points exact
    let t = ((x - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    out_lo * (1.0 - t) + out_hi * t
}
