//! Fade curves

/// 1.0 until `start`, then falls linearly to 0.0 over `duration`
pub fn ramp_down(elapsed: f64, start: f64, duration: f64) -> f32 {
    if elapsed <= start {
        return 1.0;
    }
    if duration <= 0.0 {
        return 0.0;
    }
    (1.0 - (elapsed - start) / duration).clamp(0.0, 1.0) as f32
}
