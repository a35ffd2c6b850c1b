//! Pointer and touch gestures translated into camera and body actions.
//!
//! - one touch (or pen) pointer dragging orbits the camera
//! - two touch pointers pinching zoom
//! - a mouse drag rotates the focused body
//! - the wheel zooms
//! - a release that stayed within the click threshold is a click

use foundation::math::Vec2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputAction {
    /// Screen-space drag in pixels.
    Orbit { dx: f64, dy: f64 },
    /// Zoom in pinch pixels; positive moves away.
    Zoom { delta: f64 },
    RotateBody { dx: f64, dy: f64 },
    Click { x: f64, y: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InputConfig {
    /// Per-axis movement under which a press and release is a click.
    pub click_threshold_px: f64,
    pub pinch_zoom_speed: f64,
    pub wheel_zoom_speed: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            click_threshold_px: 5.0,
            pinch_zoom_speed: 0.005,
            wheel_zoom_speed: 0.001,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct ActivePointer {
    id: i32,
    kind: PointerKind,
    last: Vec2,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Gesture {
    Idle,
    Drag,
    Pinch { distance: f64 },
}

#[derive(Debug, Clone)]
pub struct InputAdapter {
    config: InputConfig,
    pointers: Vec<ActivePointer>,
    gesture: Gesture,
    press_origin: Option<Vec2>,
    click_candidate: bool,
}

impl InputAdapter {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            pointers: Vec::new(),
            gesture: Gesture::Idle,
            press_origin: None,
            click_candidate: false,
        }
    }

    /// A pointer is held down; idle Earth rotation pauses meanwhile.
    pub fn is_dragging(&self) -> bool {
        !self.pointers.is_empty()
    }

    pub fn pointer_down(&mut self, id: i32, kind: PointerKind, pos: Vec2) {
        if self.pointers.iter().any(|p| p.id == id) {
            return;
        }
        if kind == PointerKind::Mouse && !self.pointers.is_empty() {
            return;
        }
        self.pointers.push(ActivePointer { id, kind, last: pos });

        match self.pointers.len() {
            1 => {
                self.gesture = Gesture::Drag;
                self.press_origin = Some(pos);
                self.click_candidate = true;
            }
            2 if self.all_touch() => {
                self.gesture = Gesture::Pinch {
                    distance: self.pinch_distance(),
                };
                self.click_candidate = false;
            }
            _ => {
                self.gesture = Gesture::Idle;
                self.click_candidate = false;
            }
        }
    }

    pub fn pointer_move(&mut self, id: i32, pos: Vec2) -> Option<InputAction> {
        let index = self.pointers.iter().position(|p| p.id == id)?;
        let previous = self.pointers[index].last;
        let kind = self.pointers[index].kind;
        self.pointers[index].last = pos;

        if let Some(origin) = self.press_origin {
            if !self.within_click_threshold(origin, pos) {
                self.click_candidate = false;
            }
        }

        match self.gesture {
            Gesture::Drag => {
                let delta = pos - previous;
                Some(match kind {
                    PointerKind::Mouse => InputAction::RotateBody {
                        dx: delta.x,
                        dy: delta.y,
                    },
                    PointerKind::Touch | PointerKind::Pen => InputAction::Orbit {
                        dx: delta.x,
                        dy: delta.y,
                    },
                })
            }
            Gesture::Pinch { distance } => {
                let now = self.pinch_distance();
                self.gesture = Gesture::Pinch { distance: now };
                // Fingers moving apart zoom in.
                Some(InputAction::Zoom {
                    delta: -(now - distance),
                })
            }
            Gesture::Idle => None,
        }
    }

    pub fn pointer_up(&mut self, id: i32, pos: Vec2) -> Option<InputAction> {
        let index = self.pointers.iter().position(|p| p.id == id)?;
        self.pointers.remove(index);

        let click = match (self.pointers.is_empty(), self.press_origin) {
            (true, Some(origin)) if self.click_candidate && self.within_click_threshold(origin, pos) => {
                Some(InputAction::Click { x: pos.x, y: pos.y })
            }
            _ => None,
        };
        self.resume_after_release();
        click
    }

    /// Lost pointers never produce clicks.
    pub fn pointer_cancel(&mut self, id: i32) {
        self.pointers.retain(|p| p.id != id);
        self.click_candidate = false;
        self.resume_after_release();
    }

    pub fn wheel(&mut self, delta: f64) -> InputAction {
        InputAction::Zoom {
            delta: delta * self.config.wheel_zoom_speed / self.config.pinch_zoom_speed,
        }
    }

    fn resume_after_release(&mut self) {
        match self.pointers.len() {
            0 => {
                self.gesture = Gesture::Idle;
                self.press_origin = None;
                self.click_candidate = false;
            }
            1 => self.gesture = Gesture::Drag,
            _ => {}
        }
    }

    fn within_click_threshold(&self, origin: Vec2, pos: Vec2) -> bool {
        let d = pos - origin;
        d.x.abs() <= self.config.click_threshold_px && d.y.abs() <= self.config.click_threshold_px
    }

    fn all_touch(&self) -> bool {
        self.pointers.iter().all(|p| p.kind != PointerKind::Mouse)
    }

    fn pinch_distance(&self) -> f64 {
        match self.pointers.as_slice() {
            [a, b, ..] => (b.last - a.last).length(),
            _ => 0.0,
        }
    }
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{InputAction, InputAdapter, PointerKind};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_press_is_a_click() {
        let mut input = InputAdapter::default();
        input.pointer_down(1, PointerKind::Mouse, Vec2::new(100.0, 100.0));
        assert!(input.is_dragging());
        input.pointer_move(1, Vec2::new(103.0, 98.0));
        let action = input.pointer_up(1, Vec2::new(104.0, 97.0));
        assert_eq!(action, Some(InputAction::Click { x: 104.0, y: 97.0 }));
        assert!(!input.is_dragging());
    }

    #[test]
    fn long_drag_is_not_a_click() {
        let mut input = InputAdapter::default();
        input.pointer_down(1, PointerKind::Touch, Vec2::new(0.0, 0.0));
        assert_eq!(
            input.pointer_move(1, Vec2::new(20.0, 0.0)),
            Some(InputAction::Orbit { dx: 20.0, dy: 0.0 })
        );
        // coming back near the origin does not revive the click
        input.pointer_move(1, Vec2::new(1.0, 0.0));
        assert_eq!(input.pointer_up(1, Vec2::new(1.0, 0.0)), None);
    }

    #[test]
    fn mouse_drag_rotates_body() {
        let mut input = InputAdapter::default();
        input.pointer_down(7, PointerKind::Mouse, Vec2::new(0.0, 0.0));
        assert_eq!(
            input.pointer_move(7, Vec2::new(-4.0, 9.0)),
            Some(InputAction::RotateBody { dx: -4.0, dy: 9.0 })
        );
    }

    #[test]
    fn pinch_apart_zooms_in() {
        let mut input = InputAdapter::default();
        input.pointer_down(1, PointerKind::Touch, Vec2::new(0.0, 0.0));
        input.pointer_down(2, PointerKind::Touch, Vec2::new(100.0, 0.0));
        assert_eq!(
            input.pointer_move(2, Vec2::new(130.0, 0.0)),
            Some(InputAction::Zoom { delta: -30.0 })
        );

        // lifting one finger resumes orbiting with the other
        assert_eq!(input.pointer_up(2, Vec2::new(130.0, 0.0)), None);
        assert_eq!(
            input.pointer_move(1, Vec2::new(5.0, 5.0)),
            Some(InputAction::Orbit { dx: 5.0, dy: 5.0 })
        );
        assert_eq!(input.pointer_up(1, Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn wheel_is_scaled_to_pinch_units() {
        let mut input = InputAdapter::default();
        match input.wheel(100.0) {
            InputAction::Zoom { delta } => assert!((delta - 20.0).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cancelled_pointer_never_clicks() {
        let mut input = InputAdapter::default();
        input.pointer_down(1, PointerKind::Touch, Vec2::new(0.0, 0.0));
        input.pointer_cancel(1);
        assert!(!input.is_dragging());
        assert_eq!(input.pointer_up(1, Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn unknown_pointer_moves_are_ignored() {
        let mut input = InputAdapter::default();
        assert_eq!(input.pointer_move(3, Vec2::new(1.0, 1.0)), None);
    }
}
