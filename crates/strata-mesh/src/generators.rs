//! Procedural mesh generators for tests and demo scenes.
//!
//! These generators produce deterministic, resolution-configurable meshes
//! with consistent counter-clockwise winding.

use strata_math::Vec3;

use crate::mesh::TriangleMesh;

/// Generates a flat rectangular quad grid in the XY plane.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y,
/// centered at the origin at Z=0.
///
/// # Example
/// ```
/// use strata_mesh::generators::quad_grid;
/// let mesh = quad_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);  // 3×3 vertices
/// assert_eq!(mesh.face_count(), 8);    // 2×2 quads × 2 tris each
/// ```
pub fn quad_grid(cols: usize, rows: usize, width: f32, height: f32) -> TriangleMesh {
    let verts_x = cols + 1;
    let verts_y = rows + 1;
    let mut mesh = TriangleMesh::with_capacity(verts_x * verts_y, cols * rows * 2);

    let half_w = width / 2.0;
    let half_h = height / 2.0;

    for j in 0..verts_y {
        for i in 0..verts_x {
            let u = i as f32 / cols as f32;
            let v = j as f32 / rows as f32;
            mesh.push_vertex(Vec3::new(-half_w + u * width, half_h - v * height, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(cols * rows * 2);
    for j in 0..rows {
        for i in 0..cols {
            let top_left = (j * verts_x + i) as u32;
            let top_right = top_left + 1;
            let bot_left = top_left + verts_x as u32;
            let bot_right = bot_left + 1;

            faces.push([top_left, bot_left, top_right]);
            faces.push([top_right, bot_left, bot_right]);
        }
    }
    push_faces(&mut mesh, &faces);

    mesh
}

/// Generates a UV sphere centered at the origin.
///
/// # Arguments
/// - `radius`: Sphere radius in meters.
/// - `stacks`: Number of horizontal slices (latitude divisions).
/// - `slices`: Number of vertical slices (longitude divisions).
pub fn uv_sphere(radius: f32, stacks: usize, slices: usize) -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity((stacks + 1) * (slices + 1), stacks * slices * 2);

    for i in 0..=stacks {
        let phi = std::f32::consts::PI * i as f32 / stacks as f32;
        for j in 0..=slices {
            let theta = 2.0 * std::f32::consts::PI * j as f32 / slices as f32;
            mesh.push_vertex(Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }

    let mut faces = Vec::with_capacity(stacks * slices * 2);
    for i in 0..stacks {
        for j in 0..slices {
            let a = (i * (slices + 1) + j) as u32;
            let b = a + (slices + 1) as u32;

            // Skip degenerate triangles at poles
            if i != 0 {
                faces.push([a, b, a + 1]);
            }
            if i != stacks - 1 {
                faces.push([a + 1, b, b + 1]);
            }
        }
    }
    push_faces(&mut mesh, &faces);

    mesh
}

/// A mesh holding exactly one triangle.
pub fn single_triangle(a: Vec3, b: Vec3, c: Vec3) -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(3, 1);
    let ia = mesh.push_vertex(a);
    let ib = mesh.push_vertex(b);
    let ic = mesh.push_vertex(c);
    push_faces(&mut mesh, &[[ia, ib, ic]]);
    mesh
}

// Generators only emit indices of vertices they just pushed.
fn push_faces(mesh: &mut TriangleMesh, faces: &[[u32; 3]]) {
    for &tri in faces {
        mesh.push_face_unchecked(tri);
    }
}
