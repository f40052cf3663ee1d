//! Steering geometry for pursuit
//!
//! Headings live on the horizontal (XZ) plane. The detour logic treats the
//! struck obstacle as a box, inflates its ground-level corners by the agent's
//! footprint and picks the cheapest of the four box edges as a route around it.

use glam::Vec3;

use super::probe::ObstacleBounds;

/// Project a vector onto the horizontal plane
#[inline]
#[must_use]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal unit vector from `from` towards `to`, nudged by `deflection`.
///
/// Returns `None` when the result has no usable length.
#[must_use]
pub fn direct_heading(from: Vec3, to: Vec3, deflection: Vec3) -> Option<Vec3> {
    horizontal(to - from + deflection).try_normalize()
}

/// Corner pairs forming the four box edges, as indices into [`detour_corners`].
///
/// corner1–corner3, corner3–corner4, corner4–corner2, corner2–corner1.
pub const EDGE_CORNERS: [(usize, usize); 4] = [(0, 2), (2, 3), (3, 1), (1, 0)];

/// Ground-level corners of an obstacle, pushed outward by `footprint`.
///
/// Order: (+x,+z), (-x,+z), (+x,-z), (-x,-z).
#[must_use]
pub fn detour_corners(bounds: &ObstacleBounds, footprint: Vec3) -> [Vec3; 4] {
    let c = bounds.center;
    let e = bounds.half_extents;
    let y = bounds.floor();
    let corner = |sx: f32, sz: f32| {
        Vec3::new(
            c.x + sx * (e.x + footprint.x),
            y,
            c.z + sz * (e.z + footprint.z),
        )
    };

    [
        corner(1.0, 1.0),
        corner(-1.0, 1.0),
        corner(1.0, -1.0),
        corner(-1.0, -1.0),
    ]
}

/// One candidate route along an obstacle edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetourEdge {
    /// Edge endpoint nearer the agent
    pub near: Vec3,
    /// Edge endpoint farther from the agent
    pub far: Vec3,
    /// Truncated length of agent → near → far → target
    pub cost: u32,
}

impl DetourEdge {
    /// Order the endpoints relative to `agent` and price the route to `target`.
    ///
    /// Equidistant endpoints keep their given order.
    #[must_use]
    pub fn new(agent: Vec3, target: Vec3, a: Vec3, b: Vec3) -> Self {
        let (near, far) = if agent.distance(a) > agent.distance(b) {
            (b, a)
        } else {
            (a, b)
        };

        let length = agent.distance(near) + near.distance(far) + far.distance(target);

        Self {
            near,
            far,
            cost: length as u32,
        }
    }
}

/// The route chosen around an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detour {
    /// Index of the chosen edge in [`EDGE_CORNERS`] order
    pub index: usize,
    /// The chosen edge
    pub edge: DetourEdge,
    /// Heading towards the edge's near corner, if it is strictly nearer
    pub heading: Option<Vec3>,
}

/// Price all four edges of an obstacle for a trip from `agent` to `target`.
#[must_use]
pub fn detour_edges(
    agent: Vec3,
    target: Vec3,
    bounds: &ObstacleBounds,
    footprint: Vec3,
) -> [DetourEdge; 4] {
    let corners = detour_corners(bounds, footprint);
    EDGE_CORNERS.map(|(a, b)| DetourEdge::new(agent, target, corners[a], corners[b]))
}

/// Pick the cheapest route around an obstacle. Ties go to the earliest edge.
#[must_use]
pub fn select_detour(
    agent: Vec3,
    target: Vec3,
    bounds: &ObstacleBounds,
    footprint: Vec3,
) -> Detour {
    let edges = detour_edges(agent, target, bounds, footprint);

    // min_by_key keeps the first of equal minima
    let (index, edge) = edges
        .into_iter()
        .enumerate()
        .min_by_key(|(_, edge)| edge.cost)
        .unwrap_or((0, edges[0]));

    let heading = if agent.distance(edge.near) < agent.distance(edge.far) {
        horizontal(edge.near - agent).try_normalize()
    } else {
        None
    };

    Detour {
        index,
        edge,
        heading,
    }
}

/// Yaw-only rotation whose forward (local -Z) points along `direction`.
#[must_use]
pub fn look_rotation(direction: Vec3) -> glam::Quat {
    glam::Quat::from_rotation_y((-direction.x).atan2(-direction.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_1_SQRT_2;

    const FOOTPRINT: Vec3 = Vec3::new(0.5, 0.0, 0.5);

    fn scenario_bounds() -> ObstacleBounds {
        ObstacleBounds::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(2.0, 1.0, 2.0))
    }

    #[test]
    fn test_horizontal_drops_height() {
        assert_eq!(horizontal(Vec3::new(1.0, 5.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_direct_heading() {
        let from = Vec3::new(1.0, 3.0, 1.0);
        let heading = direct_heading(from, Vec3::new(4.0, 0.0, 5.0), Vec3::ZERO).unwrap();

        assert!((heading - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_direct_heading_degenerate() {
        // Target straight above the agent
        assert!(direct_heading(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO).is_none());
    }

    #[test]
    fn test_direct_heading_deflected() {
        let heading = direct_heading(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::X).unwrap();

        assert!((heading - Vec3::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2)).length() < 1e-5);
    }

    #[test]
    fn test_corners_inflated_by_footprint() {
        let corners = detour_corners(&scenario_bounds(), FOOTPRINT);

        let expected = [
            Vec3::new(2.5, -1.0, 7.5),
            Vec3::new(-2.5, -1.0, 7.5),
            Vec3::new(2.5, -1.0, 2.5),
            Vec3::new(-2.5, -1.0, 2.5),
        ];
        for (corner, expected) in corners.iter().zip(expected) {
            assert!((*corner - expected).length() < 1e-5, "{corner} != {expected}");
        }
    }

    #[test]
    fn test_edge_orders_near_first() {
        let edge = DetourEdge::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 8.0),
            Vec3::new(0.0, 0.0, 2.0),
        );

        assert_eq!(edge.near, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(edge.far, Vec3::new(0.0, 0.0, 8.0));
        // 2 + 6 + 2
        assert_eq!(edge.cost, 10);
    }

    #[test]
    fn test_edge_cost_truncates() {
        let edge = DetourEdge::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 3.9),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 2.0),
        );

        assert_eq!(edge.cost, 3);
    }

    #[test]
    fn test_scenario_edge_costs() {
        let edges = detour_edges(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 10.0),
            &scenario_bounds(),
            FOOTPRINT,
        );
        let costs: Vec<u32> = edges.iter().map(|e| e.cost).collect();

        assert_eq!(costs, vec![12, 16, 12, 16]);
    }

    #[test]
    fn test_scenario_detour_heads_to_near_corner() {
        let detour = select_detour(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 10.0),
            &scenario_bounds(),
            FOOTPRINT,
        );

        // Edges 0 and 2 tie; the first one wins
        assert_eq!(detour.index, 0);
        assert!((detour.edge.near - Vec3::new(2.5, -1.0, 2.5)).length() < 1e-5);
        assert!((detour.edge.far - Vec3::new(2.5, -1.0, 7.5)).length() < 1e-5);

        let heading = detour.heading.unwrap();
        assert!((heading - Vec3::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2)).length() < 1e-5);
    }

    #[test]
    fn test_detour_prefers_cheaper_side() {
        // Obstacle shifted right, so going around the left is shorter
        let bounds = ObstacleBounds::new(Vec3::new(1.0, 0.0, 5.0), Vec3::new(2.0, 1.0, 2.0));
        let detour = select_detour(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), &bounds, FOOTPRINT);

        assert_eq!(detour.index, 2);
        assert!(detour.heading.unwrap().x < 0.0);
    }

    #[test]
    fn test_equidistant_edge_keeps_heading() {
        // Target behind the agent: the edge facing the agent is cheapest,
        // but both of its corners are equally far away
        let detour = select_detour(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, -20.0),
            &ObstacleBounds::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 2.0)),
            FOOTPRINT,
        );

        assert_eq!(detour.index, 1);
        assert!(detour.heading.is_none());
    }

    #[test]
    fn test_look_rotation_forward() {
        let diagonal = Vec3::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2);
        for direction in [Vec3::Z, Vec3::NEG_Z, Vec3::X, diagonal] {
            let forward = look_rotation(direction) * Vec3::NEG_Z;
            assert!((forward - direction).length() < 1e-5, "{forward} != {direction}");
        }
    }
}
