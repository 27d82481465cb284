//! Ray-vs-box exit intersection in local space
//!
//! Used for volumes the ray is known to start inside, like reflection
//! probe boxes: the interesting distance is where the ray leaves the
//! volume, not where it enters.

use crate::foundation::math::{Mat4, Vec3, Vec4};

/// Distance along the ray to where it exits the box, or -1.0
///
/// The box is the unit cube spanning [-1, 1] in its local space;
/// `world_to_local` maps world coordinates into that space. The hit point
/// is `ray_origin + ray_direction * t` for the returned `t`.
///
/// The ray must start inside the box: if the transformed origin lies
/// outside the cube on any axis the function returns `-1.0` without
/// computing an entry intersection. Zero direction components divide to
/// ±infinity, which propagates through the plane reduction per IEEE
/// float semantics.
pub fn intersect_ray_inside_box(
    ray_origin: Vec3,
    ray_direction: Vec3,
    world_to_local: &Mat4,
) -> f32 {
    let local_origin =
        (world_to_local * Vec4::new(ray_origin.x, ray_origin.y, ray_origin.z, 1.0)).xyz();
    let aabb_check = local_origin.abs();
    if aabb_check.x.max(aabb_check.y).max(aabb_check.z) > 1.0 {
        return -1.0;
    }

    let local_direction = world_to_local.fixed_view::<3, 3>(0, 0) * ray_direction;

    let first_plane =
        (Vec3::new(-1.0, -1.0, -1.0) - local_origin).component_div(&local_direction);
    let second_plane =
        (Vec3::new(1.0, 1.0, 1.0) - local_origin).component_div(&local_direction);
    let furthest_plane = first_plane.zip_map(&second_plane, f32::max);
    furthest_plane.x.min(furthest_plane.y).min(furthest_plane.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    #[test]
    fn test_axis_ray_from_center() {
        let t = intersect_ray_inside_box(
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            &Mat4::identity(),
        );
        assert!((t - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_outside_origin_returns_sentinel() {
        let t = intersect_ray_inside_box(
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            &Mat4::identity(),
        );
        assert_eq!(t, -1.0);
    }

    #[test]
    fn test_zero_direction_components_propagate() {
        // The y/z planes divide to infinity and lose the min reduction
        let t = intersect_ray_inside_box(
            Vec3::new(0.5, 0.25, -0.25),
            Vec3::new(1.0, 0.0, 0.0),
            &Mat4::identity(),
        );
        assert!((t - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_diagonal_ray() {
        let direction = Vec3::new(1.0, 1.0, 1.0).normalize();
        let t = intersect_ray_inside_box(Vec3::zeros(), direction, &Mat4::identity());
        assert!((t - 3.0_f32.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_negative_direction_picks_far_plane() {
        let t = intersect_ray_inside_box(
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            &Mat4::identity(),
        );
        assert!((t - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_scaled_box() {
        // Local scale 0.5 makes the box a ±2 cube in world space
        let world_to_local = Mat4::new_scaling(0.5);
        let t = intersect_ray_inside_box(
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
            &world_to_local,
        );
        assert!((t - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_translated_box() {
        // Box centered at (3, 0, 0) in world space
        let world_to_local = Mat4::new_translation(&Vec3::new(-3.0, 0.0, 0.0));

        let inside = intersect_ray_inside_box(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            &world_to_local,
        );
        assert!((inside - 1.0).abs() < EPSILON);

        let outside = intersect_ray_inside_box(
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            &world_to_local,
        );
        assert_eq!(outside, -1.0);
    }

    #[test]
    fn test_origin_just_outside_face() {
        let t = intersect_ray_inside_box(
            Vec3::new(1.0001, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            &Mat4::identity(),
        );
        assert_eq!(t, -1.0);
    }
}
