use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// A sphere that can be hit by a pick ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickCandidate<T> {
    pub target: T,
    pub center: Vec3,
    pub radius: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit<T> {
    pub target: T,
    pub distance: f64,
    pub point: Vec3,
}

/// Deterministic ray picking against bounding spheres.
///
/// Ordering contract:
/// - Hits are returned nearest first along the (normalized) ray.
/// - Hits at the same distance keep candidate order.
///
/// Spheres containing the ray origin report the exit point.
pub fn pick<T: Copy>(ray: Ray, candidates: &[PickCandidate<T>]) -> Vec<PickHit<T>> {
    let Some(dir) = ray.dir.normalized() else {
        return Vec::new();
    };
    let ray = Ray::new(ray.origin, dir);

    let mut hits: Vec<(usize, PickHit<T>)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, c)| {
            let t = ray_sphere_hit_t(&ray, c.center, c.radius)?;
            Some((
                index,
                PickHit {
                    target: c.target,
                    distance: t,
                    point: ray.at(t),
                },
            ))
        })
        .collect();

    hits.sort_by(|(ia, a), (ib, b)| a.distance.total_cmp(&b.distance).then_with(|| ia.cmp(ib)));
    hits.into_iter().map(|(_, hit)| hit).collect()
}

/// Nearest hit, if any.
pub fn pick_nearest<T: Copy>(ray: Ray, candidates: &[PickCandidate<T>]) -> Option<PickHit<T>> {
    pick(ray, candidates).into_iter().next()
}

fn ray_sphere_hit_t(ray: &Ray, center: Vec3, radius: f64) -> Option<f64> {
    if radius <= 0.0 {
        return None;
    }
    // |o + t·d - c|² = r² with |d| = 1.
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    let far = -b + sqrt_disc;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{PickCandidate, Ray, pick, pick_nearest};
    use foundation::math::Vec3;

    fn sphere(target: u32, x: f64, radius: f64) -> PickCandidate<u32> {
        PickCandidate {
            target,
            center: Vec3::new(x, 0.0, 0.0),
            radius,
        }
    }

    #[test]
    fn ray_picks_nearest_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        let hits = pick(ray, &[sphere(1, 10.0, 1.0), sphere(2, 5.0, 1.0)]);
        assert_eq!(hits.iter().map(|h| h.target).collect::<Vec<_>>(), [2, 1]);
        assert!((hits[0].distance - 4.0).abs() < 1e-12);
        assert!((hits[0].point.x - 4.0).abs() < 1e-12);
    }

    #[test]
    fn tie_breaks_by_candidate_order() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let hit = pick_nearest(ray, &[sphere(7, 5.0, 1.0), sphere(3, 5.0, 1.0)]).expect("hit");
        assert_eq!(hit.target, 7);
    }

    #[test]
    fn misses_and_spheres_behind_are_ignored() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let off_axis = PickCandidate {
            target: 1,
            center: Vec3::new(5.0, 3.0, 0.0),
            radius: 1.0,
        };
        assert!(pick(ray, &[off_axis, sphere(2, -5.0, 1.0)]).is_empty());
    }

    #[test]
    fn zero_direction_hits_nothing() {
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(pick(ray, &[sphere(1, 0.0, 1.0)]).is_empty());
    }
}
