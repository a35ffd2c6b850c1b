//! Earth/Moon scene state: bodies, orbit camera, picking, input gestures and
//! the Moon-formation sequence.
//!
//! Nothing here renders. A host reads body transforms and the camera pose
//! each frame and draws them however it likes.

pub mod bodies;
pub mod camera;
pub mod formation;
pub mod input;
pub mod picking;

pub use bodies::*;
pub use camera::*;
pub use formation::*;
pub use input::*;
pub use picking::*;
