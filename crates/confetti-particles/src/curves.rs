//! Fade and interpolation helpers shared by every effect

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Opacity cap from the global end-of-run fade.
///
/// 1.0 until `duration - fade_length`, then linear down to 0.0 at `duration`,
/// and 0.0 afterwards.
pub fn global_fade(elapsed: f64, duration: f64, fade_length: f64) -> f32 {
    let fade_start = duration - fade_length;
    if elapsed <= fade_start {
        return 1.0;
    }
    if fade_length <= 0.0 {
        return 0.0;
    }
    (1.0 - (elapsed - fade_start) / fade_length).clamp(0.0, 1.0) as f32
}

/// Linear fade that starts once `ratio` passes `start`: 1.0 before, 0.0 at `ratio >= 1`.
pub fn late_fade(ratio: f32, start: f32) -> f32 {
    if ratio <= start {
        1.0
    } else {
        (1.0 - (ratio - start) / (1.0 - start)).clamp(0.0, 1.0)
    }
}
