//! Geological timeline model and navigation.
//!
//! The dataset is a tree of [`TimelineNode`]s (eons → eras → periods →
//! epochs). [`Navigator`] walks it one sibling level at a time, and
//! [`locate`] maps a 0–100 scrubber position onto the nearest item of a level.

pub mod dataset;
pub mod error;
pub mod format;
pub mod hierarchy;
pub mod locator;
pub mod navigation;
pub mod node;
pub mod playback;

pub use dataset::*;
pub use error::*;
pub use format::*;
pub use hierarchy::*;
pub use locator::*;
pub use navigation::*;
pub use node::*;
pub use playback::*;

/// Calendar year treated as "now" by the built-in dataset.
pub const PRESENT_YEAR: i64 = 2026;

/// Scrubber position of the present day.
pub const PRESENT_POSITION: f64 = 100.0;
