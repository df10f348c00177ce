use crate::ecs::types::Transform3D;
use glam::Vec3;

const MIN_EXTENT: f32 = 0.0001;

/// Distance along the ray to the first hit on an oriented box with local half extents `half`.
///
/// The box is scaled by the transform, so a photo zoomed to scale 4 picks over its full zoomed area.
/// Returns the exit distance when the ray starts inside the box.
pub fn ray_hit_obb(origin: Vec3, dir: Vec3, transform: &Transform3D, half: Vec3) -> Option<f32> {
    if !transform.scale.is_finite() || !transform.translation.is_finite() || !dir.is_finite() {
        return None;
    }
    let dir = dir.try_normalize()?;
    let extents = (half * transform.scale.abs()).max(Vec3::splat(MIN_EXTENT));
    // Work in the box frame; rotation keeps lengths so distances stay in world units.
    let to_local = transform.rotation.inverse();
    let local_origin = to_local * (origin - transform.translation);
    let local_dir = to_local * dir;
    slab_distance(local_origin, local_dir, extents)
}

/// Slab test against the axis aligned box `[-extents, extents]`.
pub fn slab_distance(origin: Vec3, dir: Vec3, extents: Vec3) -> Option<f32> {
    let mut near = 0.0_f32;
    let mut far = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, e) = (origin[axis], dir[axis], extents[axis]);
        if d.abs() < 1e-6 {
            if o.abs() > e {
                return None;
            }
            continue;
        }
        let (a, b) = ((-e - o) / d, (e - o) / d);
        near = near.max(a.min(b));
        far = far.min(a.max(b));
        if near > far {
            return None;
        }
    }
    (far >= 0.0).then_some(if near > 0.0 { near } else { far })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn ray_hits_unit_box_head_on() {
        let transform = Transform3D::default();
        let hit = ray_hit_obb(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, &transform, Vec3::splat(0.5));
        assert!((hit.expect("hit") - 4.5).abs() < 1e-4);
    }

    #[test]
    fn thin_plane_rotated_edge_on_is_missed() {
        let transform = Transform3D {
            translation: Vec3::ZERO,
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            scale: Vec3::ONE,
        };
        let half = Vec3::new(1.0, 1.0, 0.001);
        let miss = ray_hit_obb(Vec3::new(0.5, 0.0, 5.0), Vec3::NEG_Z, &transform, half);
        assert!(miss.is_none());
    }

    #[test]
    fn ray_starting_inside_reports_exit() {
        let distance = slab_distance(Vec3::ZERO, Vec3::X, Vec3::splat(2.0));
        assert_eq!(distance, Some(2.0));
        assert_eq!(slab_distance(Vec3::new(5.0, 0.0, 0.0), Vec3::X, Vec3::ONE), None);
    }

    #[test]
    fn scaled_box_grows_hit_area() {
        let transform = Transform3D { scale: Vec3::new(4.0, 4.0, 1.0), ..Default::default() };
        let half = Vec3::new(1.0, 1.0, 0.01);
        assert!(ray_hit_obb(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z, &transform, half).is_some());
        assert!(ray_hit_obb(Vec3::new(5.0, 0.0, 5.0), Vec3::NEG_Z, &transform, half).is_none());
    }
}
