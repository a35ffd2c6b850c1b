//! Easing curves used by timed animations.
//!
//! All curves map `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.
//! Inputs outside the unit interval are clamped.

/// Quadratic ease-in-out.
///
/// `p < 0.5 ? 2p² : 1 - (-2p + 2)² / 2`
pub fn ease_in_out_quad(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.5 {
        2.0 * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(2) / 2.0
    }
}

/// Quadratic ease-out: fast start, gentle arrival.
pub fn ease_out_quad(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(2)
}

#[cfg(test)]
mod tests {
    use super::{ease_in_out_quad, ease_out_quad};

    #[test]
    fn in_out_hits_fixed_points() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert_eq!(ease_in_out_quad(0.25), 0.125);
        assert_eq!(ease_in_out_quad(0.75), 0.875);
    }

    #[test]
    fn in_out_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = ease_in_out_quad(i as f64 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn out_clamps_inputs() {
        assert_eq!(ease_out_quad(-1.0), 0.0);
        assert_eq!(ease_out_quad(2.0), 1.0);
        assert_eq!(ease_out_quad(0.5), 0.75);
    }
}
