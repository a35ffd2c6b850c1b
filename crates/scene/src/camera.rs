//! Spherical orbit camera and its eased transitions.

use foundation::math::{Spherical, Vec2, Vec3, ease_in_out_quad};
use foundation::time::Duration;
use runtime::{Animation, Status};

use crate::picking::Ray;

pub const DEFAULT_FOV_Y_DEG: f64 = 45.0;

/// Clamp ranges and input gains of an [`OrbitCamera`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitLimits {
    pub min_radius: f64,
    pub max_radius: f64,
    /// Radians from +Y; must stay strictly inside `(0, π)`.
    pub min_polar: f64,
    pub max_polar: f64,
    /// Radians per unit of orbit delta.
    pub rotate_speed: f64,
    /// Log-scale radius change per unit of zoom delta.
    pub zoom_speed: f64,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_radius: 1.5,
            max_radius: 60.0,
            min_polar: 0.15,
            max_polar: std::f64::consts::PI - 0.15,
            rotate_speed: 0.005,
            zoom_speed: 0.005,
        }
    }
}

impl OrbitLimits {
    fn clamp(&self, mut s: Spherical) -> Spherical {
        s.radius = s.radius.clamp(self.min_radius, self.max_radius);
        s.phi = s.phi.clamp(self.min_polar, self.max_polar);
        s
    }
}

/// Camera orbiting `target` on a sphere.
///
/// `eye` and `look_at` are the rendered pose. Outside of transitions
/// `look_at == target` and `eye == target + spherical`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    spherical: Spherical,
    target: Vec3,
    limits: OrbitLimits,
    eye: Vec3,
    look_at: Vec3,
    fov_y_deg: f64,
}

impl OrbitCamera {
    pub fn new(eye: Vec3, target: Vec3, limits: OrbitLimits) -> Self {
        let mut camera = Self {
            spherical: Spherical::from_offset(eye - target),
            target,
            limits,
            eye,
            look_at: target,
            fov_y_deg: DEFAULT_FOV_Y_DEG,
        };
        camera.spherical = limits.clamp(camera.spherical);
        camera.update_eye();
        camera
    }

    pub fn with_fov(mut self, fov_y_deg: f64) -> Self {
        self.fov_y_deg = fov_y_deg;
        self
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn limits(&self) -> &OrbitLimits {
        &self.limits
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn fov_y_deg(&self) -> f64 {
        self.fov_y_deg
    }

    /// Orbit around the target.
    pub fn apply_delta(&mut self, d_theta: f64, d_phi: f64) {
        if !d_theta.is_finite() || !d_phi.is_finite() {
            return;
        }
        let speed = self.limits.rotate_speed;
        self.spherical.theta += d_theta * speed;
        self.spherical.phi = (self.spherical.phi - d_phi * speed)
            .clamp(self.limits.min_polar, self.limits.max_polar);
        self.update_eye();
    }

    /// Exponential zoom; positive deltas move away from the target.
    pub fn apply_zoom_delta(&mut self, delta: f64) {
        let factor = (delta * self.limits.zoom_speed).exp();
        if factor.is_finite() {
            self.spherical.radius = (self.spherical.radius * factor)
                .clamp(self.limits.min_radius, self.limits.max_radius);
        } else {
            self.spherical.radius = self.limits.max_radius;
        }
        self.update_eye();
    }

    /// Moves the orbit center, keeping radius and angles.
    pub fn retarget(&mut self, target: Vec3) {
        self.target = target;
        self.update_eye();
    }

    /// Replaces the clamp ranges and re-clamps the current orbit.
    pub fn set_limits(&mut self, limits: OrbitLimits) {
        self.limits = limits;
        self.spherical = limits.clamp(self.spherical);
        self.update_eye();
    }

    /// Sets the rendered pose directly. Orbit state is untouched until
    /// [`OrbitCamera::sync_from_pose`].
    pub fn set_pose(&mut self, eye: Vec3, look_at: Vec3) {
        self.eye = eye;
        self.look_at = look_at;
    }

    /// Re-derives target and spherical coordinates from the rendered pose.
    pub fn sync_from_pose(&mut self) {
        self.target = self.look_at;
        self.spherical = self.limits.clamp(Spherical::from_offset(self.eye - self.target));
        self.update_eye();
    }

    /// Pick ray through a point in normalized device coordinates.
    pub fn ray_through(&self, ndc: Vec2, aspect: f64) -> Ray {
        let forward = (self.look_at - self.eye).normalized().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
        let right = forward.cross(Vec3::Y).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
        let up = right.cross(forward);
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        let dir = forward + right * (ndc.x * tan_half * aspect) + up * (ndc.y * tan_half);
        Ray::new(self.eye, dir)
    }

    fn update_eye(&mut self) {
        self.eye = self.target + self.spherical.to_offset();
        self.look_at = self.target;
    }
}

/// Access to the camera inside an animation context.
pub trait HasCamera {
    fn camera(&self) -> &OrbitCamera;
    fn camera_mut(&mut self) -> &mut OrbitCamera;
}

impl HasCamera for OrbitCamera {
    fn camera(&self) -> &OrbitCamera {
        self
    }

    fn camera_mut(&mut self) -> &mut OrbitCamera {
        self
    }
}

type Completion<Ctx> = Box<dyn FnOnce(&mut Ctx)>;

/// Eased move of the camera pose, with a completion hook run exactly once.
pub struct CameraTransition<Ctx> {
    from_eye: Vec3,
    from_look_at: Vec3,
    to_eye: Vec3,
    to_look_at: Vec3,
    duration: Duration,
    elapsed_s: f64,
    on_complete: Option<Completion<Ctx>>,
}

impl<Ctx> CameraTransition<Ctx> {
    pub const LABEL: &'static str = "camera";

    /// Starts from the camera's current pose.
    pub fn new(camera: &OrbitCamera, to_eye: Vec3, to_look_at: Vec3, duration: Duration) -> Self {
        Self {
            from_eye: camera.eye(),
            from_look_at: camera.look_at(),
            to_eye,
            to_look_at,
            duration,
            elapsed_s: 0.0,
            on_complete: None,
        }
    }

    /// Moves along the current view direction to `radius` from the target.
    pub fn to_radius(camera: &OrbitCamera, radius: f64, duration: Duration) -> Self {
        let target = camera.target();
        let dir = (camera.eye() - target)
            .normalized()
            .unwrap_or(Vec3::new(0.0, 0.0, 1.0));
        Self::new(camera, target + dir * radius, target, duration)
    }

    pub fn on_complete(mut self, f: impl FnOnce(&mut Ctx) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn target_pose(&self) -> (Vec3, Vec3) {
        (self.to_eye, self.to_look_at)
    }
}

impl<Ctx: HasCamera> Animation<Ctx> for CameraTransition<Ctx> {
    fn label(&self) -> &'static str {
        Self::LABEL
    }

    fn progress(&self) -> f64 {
        self.duration.progress(self.elapsed_s)
    }

    fn advance(&mut self, dt_s: f64, ctx: &mut Ctx) -> Status {
        self.elapsed_s += dt_s.max(0.0);
        let progress = self.progress();
        let eased = ease_in_out_quad(progress);
        ctx.camera_mut().set_pose(
            self.from_eye.lerp(self.to_eye, eased),
            self.from_look_at.lerp(self.to_look_at, eased),
        );
        if progress >= 1.0 {
            Status::Done
        } else {
            Status::Running
        }
    }

    fn finish(&mut self, ctx: &mut Ctx) {
        ctx.camera_mut().set_pose(self.to_eye, self.to_look_at);
        ctx.camera_mut().sync_from_pose();
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut Ctx) {
        ctx.camera_mut().sync_from_pose();
        self.on_complete = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraTransition, OrbitCamera, OrbitLimits};
    use foundation::math::{Vec2, Vec3};
    use foundation::time::Duration;
    use proptest::prelude::*;
    use runtime::{Animation, Status};
    use std::cell::Cell;
    use std::rc::Rc;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(Vec3::new(0.0, 0.0, 3.5), Vec3::ZERO, OrbitLimits::default())
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn starts_on_the_equator_facing_target() {
        let cam = camera();
        assert!((cam.spherical().radius - 3.5).abs() < 1e-12);
        assert!((cam.spherical().phi - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(close(cam.look_at(), Vec3::ZERO));
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut cam = camera();
        cam.apply_delta(0.0, 10_000.0);
        assert_eq!(cam.spherical().phi, cam.limits().min_polar);
        cam.apply_delta(0.0, -10_000.0);
        assert_eq!(cam.spherical().phi, cam.limits().max_polar);
    }

    #[test]
    fn non_finite_orbit_deltas_are_ignored() {
        let mut cam = camera();
        cam.apply_delta(0.3, 0.1);
        let eye = cam.eye();
        cam.apply_delta(f64::NAN, 0.0);
        cam.apply_delta(0.0, f64::INFINITY);
        cam.apply_delta(f64::NEG_INFINITY, f64::NAN);
        assert_eq!(cam.eye(), eye);
        assert!(cam.spherical().theta.is_finite());
    }

    #[test]
    fn zoom_is_exponential_and_clamped() {
        let mut cam = camera();
        cam.apply_zoom_delta(100.0);
        assert!((cam.spherical().radius - 3.5 * 0.5f64.exp()).abs() < 1e-9);
        cam.apply_zoom_delta(1.0e6);
        assert_eq!(cam.spherical().radius, 60.0);
        cam.apply_zoom_delta(-1.0e6);
        assert_eq!(cam.spherical().radius, 1.5);
    }

    #[test]
    fn retarget_keeps_orbit_geometry() {
        let mut cam = camera();
        let before = cam.spherical();
        cam.retarget(Vec3::new(2.0, 1.5, 0.5));
        assert_eq!(cam.spherical(), before);
        assert!(close(cam.eye(), Vec3::new(2.0, 1.5, 4.0)));
        assert!(close(cam.look_at(), Vec3::new(2.0, 1.5, 0.5)));
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_through(Vec2::ZERO, 16.0 / 9.0);
        let dir = ray.dir.normalized().unwrap();
        assert!(close(dir, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn transition_eases_and_completes_once() {
        let mut cam = camera();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut transition = CameraTransition::new(
            &cam,
            Vec3::new(0.0, 0.0, 8.0),
            Vec3::ZERO,
            Duration::from_millis(1000.0),
        )
        .on_complete(move |_: &mut OrbitCamera| seen.set(seen.get() + 1));

        assert_eq!(transition.advance(0.25, &mut cam), Status::Running);
        // eased(0.25) = 0.125
        assert!((cam.eye().z - (3.5 + 4.5 * 0.125)).abs() < 1e-9);

        assert_eq!(transition.advance(0.75, &mut cam), Status::Done);
        transition.finish(&mut cam);
        transition.finish(&mut cam);
        assert_eq!(calls.get(), 1);
        assert!((cam.spherical().radius - 8.0).abs() < 1e-9);
    }

    #[test]
    fn to_radius_keeps_direction() {
        let mut cam = camera();
        cam.apply_delta(100.0, 0.0);
        let dir = cam.eye().normalized().unwrap();
        let transition = CameraTransition::<OrbitCamera>::to_radius(&cam, 1.8, Duration::from_millis(1000.0));
        let (eye, look_at) = transition.target_pose();
        assert!(close(eye, dir * 1.8));
        assert!(close(look_at, Vec3::ZERO));
    }

    proptest! {
        #[test]
        fn orbit_stays_within_limits(
            deltas in prop::collection::vec((-1.0e4f64..1.0e4, -1.0e4f64..1.0e4, -1.0e4f64..1.0e4), 1..32)
        ) {
            let mut cam = camera();
            let limits = *cam.limits();
            for (d_theta, d_phi, zoom) in deltas {
                cam.apply_delta(d_theta, d_phi);
                cam.apply_zoom_delta(zoom);
                let s = cam.spherical();
                prop_assert!(s.phi >= limits.min_polar && s.phi <= limits.max_polar);
                prop_assert!(s.radius >= limits.min_radius && s.radius <= limits.max_radius);
            }
        }
    }
}
