use super::Vec3;

/// Position on a Y-up sphere for a latitude/longitude in degrees.
///
/// Longitude 0 faces +Z; the north pole is +Y.
pub fn lat_lon_to_vec3(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = lon_deg.to_radians();

    Vec3::new(
        -radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
        radius * phi.sin() * theta.cos(),
    )
}

/// Body rotation (radians) that brings `lat`/`lon` in front of a viewer on +Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceRotation {
    pub rot_x: f64,
    pub rot_y: f64,
}

pub fn surface_rotation(lat_deg: f64, lon_deg: f64) -> SurfaceRotation {
    SurfaceRotation {
        rot_x: -lat_deg.to_radians(),
        rot_y: lon_deg.to_radians(),
    }
}
