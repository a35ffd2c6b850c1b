pub mod easing;
pub mod geodesy;
pub mod spherical;
pub mod vec;

pub use easing::*;
pub use geodesy::*;
pub use spherical::*;
pub use vec::*;

/// Linear interpolation between `start` and `end`.
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}
