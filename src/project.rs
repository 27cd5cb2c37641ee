use serde::Serialize;

use crate::vec3::Vec3;

pub const PERSPECTIVE_DISTANCE: f32 = 600.0;

/// Anything at or beyond this depth is off-screen: excluded from hit-testing
/// and solid rendering.
pub const CULL_DEPTH: f32 = -500.0;

/// Between this and the cull depth, nodes render as faint unlabeled dust.
pub const DUST_DEPTH: f32 = -300.0;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projected {
    pub screen_x: f32,
    pub screen_y: f32,
    pub depth: f32,
    pub perspective: f32,
}

/// Perspective projection with a fixed rotation order: about X, then Y. Both
/// the interactive renderer and the static export call this per node per
/// frame, which keeps the two visually identical.
pub fn project(position: Vec3, rot_x: f32, rot_y: f32) -> Projected {
    let rotated = position.rotated_x(rot_x).rotated_y(rot_y);
    let perspective = PERSPECTIVE_DISTANCE / (PERSPECTIVE_DISTANCE + rotated.z);

    Projected {
        screen_x: rotated.x * perspective,
        screen_y: rotated.y * perspective,
        depth: rotated.z,
        perspective,
    }
}

pub fn is_culled(depth: f32) -> bool {
    depth <= CULL_DEPTH
}

pub fn is_dust(depth: f32) -> bool {
    !is_culled(depth) && depth <= DUST_DEPTH
}

/// Painter's-algorithm draw order: indices sorted by ascending depth, so
/// consumers draw farthest first and nearer nodes occlude them.
pub fn depth_order(projected: &[Projected]) -> Vec<usize> {
    let mut order = (0..projected.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| projected[a].depth.total_cmp(&projected[b].depth));
    order
}

#[cfg(test)]
mod tests {
    use crate::vec3::vec3;

    use super::*;

    #[test]
    fn identity_rotation_of_a_flat_point_is_the_identity() {
        let projected = project(vec3(120.0, -45.0, 0.0), 0.0, 0.0);
        assert_eq!(projected.screen_x, 120.0);
        assert_eq!(projected.screen_y, -45.0);
        assert_eq!(projected.depth, 0.0);
        assert_eq!(projected.perspective, 1.0);
    }

    #[test]
    fn depth_tracks_the_rotated_z() {
        let projected = project(vec3(0.0, 0.0, 200.0), 0.0, 0.0);
        assert_eq!(projected.depth, 200.0);
        assert!((projected.perspective - 0.75).abs() < 1e-6);
        assert_eq!(projected.screen_x, 0.0);
    }

    #[test]
    fn rotation_moves_depth_between_axes() {
        // A quarter turn about Y sends +x to +z.
        let projected = project(vec3(100.0, 0.0, 0.0), 0.0, std::f32::consts::FRAC_PI_2);
        assert!(projected.screen_x.abs() < 1e-3);
        assert!((projected.depth - 100.0).abs() < 1e-3);
    }

    #[test]
    fn draw_order_is_ascending_by_depth() {
        let projected = vec![
            project(vec3(0.0, 0.0, 50.0), 0.0, 0.0),
            project(vec3(0.0, 0.0, -120.0), 0.0, 0.0),
            project(vec3(0.0, 0.0, 10.0), 0.0, 0.0),
        ];

        assert_eq!(depth_order(&projected), vec![1, 2, 0]);
    }

    #[test]
    fn cull_and_dust_thresholds() {
        assert!(is_culled(-500.0));
        assert!(is_culled(-650.0));
        assert!(!is_culled(-499.0));

        assert!(is_dust(-300.0));
        assert!(is_dust(-499.0));
        assert!(!is_dust(-500.0));
        assert!(!is_dust(-299.0));
        assert!(!is_dust(0.0));
    }
}
