use super::Vec3;

/// Spherical coordinates around an origin, Y-up.
///
/// - `phi` is the polar angle measured from +Y.
/// - `theta` is the azimuth around +Y, measured from +Z toward +X.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spherical {
    pub radius: f64,
    pub theta: f64,
    pub phi: f64,
}

impl Spherical {
    pub fn new(radius: f64, theta: f64, phi: f64) -> Self {
        Self { radius, theta, phi }
    }

    /// Spherical coordinates of `offset` relative to the origin.
    ///
    /// A zero offset yields zero angles.
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        Self::new(radius, theta, phi)
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}
