//! Triangle/triangle intersection by separating axes.
//!
//! Two triangles are disjoint iff their projections are disjoint on at
//! least one candidate axis. Candidates are both face normals, the nine
//! edge/edge cross products, and the in-plane edge normals of each
//! triangle (needed when the triangles are coplanar). Touching triangles
//! count as intersecting.

use strata_math::Vec3;

const AXIS_EPSILON_SQ: f32 = 1.0e-12;

/// Returns true if the closed triangles `a` and `b` share at least one point.
pub fn triangles_intersect(a: &[Vec3; 3], b: &[Vec3; 3]) -> bool {
    let edges_a = edges(a);
    let edges_b = edges(b);
    let normal_a = edges_a[0].cross(edges_a[1]);
    let normal_b = edges_b[0].cross(edges_b[1]);

    if separated_on(normal_a, a, b) || separated_on(normal_b, a, b) {
        return false;
    }

    for ea in &edges_a {
        for eb in &edges_b {
            if separated_on(ea.cross(*eb), a, b) {
                return false;
            }
        }
    }

    for ea in &edges_a {
        if separated_on(normal_a.cross(*ea), a, b) {
            return false;
        }
    }
    for eb in &edges_b {
        if separated_on(normal_b.cross(*eb), a, b) {
            return false;
        }
    }

    true
}

#[inline]
fn edges(t: &[Vec3; 3]) -> [Vec3; 3] {
    [t[1] - t[0], t[2] - t[1], t[0] - t[2]]
}

#[inline]
fn project(axis: Vec3, t: &[Vec3; 3]) -> (f32, f32) {
    let p0 = axis.dot(t[0]);
    let p1 = axis.dot(t[1]);
    let p2 = axis.dot(t[2]);
    (p0.min(p1).min(p2), p0.max(p1).max(p2))
}

#[inline]
fn separated_on(axis: Vec3, a: &[Vec3; 3], b: &[Vec3; 3]) -> bool {
    if axis.length_squared() < AXIS_EPSILON_SQ {
        return false;
    }
    let (min_a, max_a) = project(axis, a);
    let (min_b, max_b) = project(axis, b);
    max_a < min_b || max_b < min_a
}
