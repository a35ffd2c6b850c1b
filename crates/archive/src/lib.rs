//! The geological archive: timeline navigation driving an Earth/Moon stage.
//!
//! [`Archive`] is the single owner of mutable state. Hosts forward input to
//! it, call [`Archive::frame`] once per animation frame, and apply the
//! [`UiCommand`]s and [`Stage`] it exposes.

pub mod app;
pub mod config;
pub mod error;
pub mod focus;
pub mod layers;
pub mod logging;
pub mod playback;
pub mod stage;
pub mod ui;

pub use app::{Archive, ArchiveEvent, EventActivation};
pub use config::*;
pub use error::ArchiveError;
pub use focus::{CameraMove, FocusOutcome, FocusState};
pub use layers::{Layer, LayerStates};
pub use playback::{PLAYBACK_TIMER, PlaybackDriver};
pub use stage::{EventPin, Stage, StageNotice};
pub use ui::*;
