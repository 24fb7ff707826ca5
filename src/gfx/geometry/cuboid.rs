//! # Cuboid Generation
//!
//! Builds a flat-shaded, textured box. Each face owns its own four vertices so
//! edges stay hard; corners are never shared between faces with different
//! normals.

use cgmath::Vector3;

use super::Mesh;
use crate::gfx::scene::vertex::TexturedVertex;

const VERTEX_COUNT: usize = 4 * 6;
const INDEX_COUNT: usize = 3 * 12;

/// First vertex of the side-face top ring.
const TOP_RING_START: u16 = 4;
/// First vertex of the side-face bottom ring.
const BOTTOM_RING_START: u16 = TOP_RING_START + 8;
/// First vertex of the bottom face.
const BOTTOM_FACE_START: u16 = BOTTOM_RING_START + 8;

/// Generate a cuboid centered at the origin.
///
/// The box spans `±dimensions / 2` on each axis. The result always holds 24
/// vertices and 36 indices, wound clockwise when viewed from outside.
///
/// `flip_v` replaces every V coordinate by `1 - V` to compensate for a
/// texture origin at the bottom-left instead of the top-left; positions and
/// normals are untouched.
///
/// Non-positive dimensions are not rejected. They yield zero-area triangles,
/// and callers that care must validate before building.
pub fn build_cuboid(dimensions: Vector3<f32>, flip_v: bool) -> Mesh {
    let half = dimensions * 0.5;

    let corners: [[f32; 3]; 8] = [
        [-half.x, half.y, -half.z],
        [half.x, half.y, -half.z],
        [half.x, half.y, half.z],
        [-half.x, half.y, half.z],
        [-half.x, -half.y, -half.z],
        [half.x, -half.y, -half.z],
        [half.x, -half.y, half.z],
        [-half.x, -half.y, half.z],
    ];

    // Top, then the four sides in ring order, then bottom.
    let normals: [[f32; 3]; 6] = [
        [0.0, 1.0, 0.0],
        [0.0, 0.0, -1.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    let mut vertices = Vec::with_capacity(VERTEX_COUNT);

    // Top face
    for i in 0..4 {
        vertices.push(TexturedVertex {
            position: corners[i],
            normal: normals[0],
            uv: quad_uv(i),
        });
    }

    // Side faces: one edge pair per face along the top, then along the bottom.
    push_ring(&mut vertices, &corners, &normals, 0, 1.0);
    push_ring(&mut vertices, &corners, &normals, 4, 0.0);

    // Bottom face, reversed so it still winds clockwise from below.
    for i in 0..4 {
        vertices.push(TexturedVertex {
            position: corners[7 - i],
            normal: normals[5],
            uv: quad_uv(i),
        });
    }

    if flip_v {
        for vertex in vertices.iter_mut() {
            vertex.uv[1] = 1.0 - vertex.uv[1];
        }
    }

    let mut indices = Vec::with_capacity(INDEX_COUNT);

    // Top face
    indices.extend_from_slice(&[0, 1, 2, 2, 3, 0]);

    // Side faces
    for k in (0..8).step_by(2) {
        let top = TOP_RING_START + k;
        let bottom = BOTTOM_RING_START + k;
        indices.extend_from_slice(&[top, bottom + 1, top + 1, top, bottom, bottom + 1]);
    }

    // Bottom face
    let b = BOTTOM_FACE_START;
    indices.extend_from_slice(&[b, b + 1, b + 2, b + 2, b + 3, b]);

    Mesh { vertices, indices }
}

/// Canonical quad UVs for corner `i` in traversal order 0..4.
fn quad_uv(i: usize) -> [f32; 2] {
    let u = if i == 1 || i == 2 { 1.0 } else { 0.0 };
    let v = if i == 2 || i == 3 { 1.0 } else { 0.0 };
    [u, v]
}

/// Pushes the 8 vertices of one horizontal ring of side-face edges.
///
/// Face `i` gets corners `first + i` and `first + (i + 1) % 4`, carrying the
/// normal of side `i`.
fn push_ring(
    vertices: &mut Vec<TexturedVertex>,
    corners: &[[f32; 3]; 8],
    normals: &[[f32; 3]; 6],
    first: usize,
    v: f32,
) {
    for i in 0..4 {
        let normal = normals[i + 1];
        vertices.push(TexturedVertex {
            position: corners[first + i],
            normal,
            uv: [0.0, v],
        });
        vertices.push(TexturedVertex {
            position: corners[first + (i + 1) % 4],
            normal,
            uv: [1.0, v],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{triangle_area, triangle_cross};
    use cgmath::InnerSpace;

    fn unit() -> Vector3<f32> {
        Vector3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_cuboid_counts() {
        for dims in [unit(), Vector3::new(4.0, 4.0, 4.0), Vector3::new(0.5, 3.0, 12.0)] {
            let cube = build_cuboid(dims, false);
            assert_eq!(cube.vertex_count(), 24);
            assert_eq!(cube.indices.len(), 36);
            assert_eq!(cube.triangle_count(), 12);
            assert!(cube.is_well_formed());
            assert!(cube.indices.iter().all(|&i| i < 24));
        }
    }

    #[test]
    fn test_cuboid_triangles_have_area() {
        let cube = build_cuboid(Vector3::new(2.0, 3.0, 0.25), false);
        for [a, b, c] in cube.triangles() {
            assert!(triangle_area(a, b, c) > 0.0);
        }
    }

    #[test]
    fn test_cuboid_winds_clockwise_from_outside() {
        let cube = build_cuboid(Vector3::new(2.0, 1.0, 3.0), false);
        for [a, b, c] in cube.triangles() {
            // All three vertices of a triangle belong to the same face.
            assert_eq!(a.normal, b.normal);
            assert_eq!(b.normal, c.normal);

            // Clockwise seen from the outward side means the right-hand
            // normal points inward.
            let cross = triangle_cross(a, b, c);
            assert!(cross.dot(Vector3::from(a.normal)) < 0.0);
        }
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let cube = build_cuboid(Vector3::new(2.0, 2.0, 2.0), false);
        for vertex in &cube.vertices {
            let position = Vector3::from(vertex.position);
            let normal = Vector3::from(vertex.normal);
            assert!((normal.magnitude() - 1.0).abs() < 1e-6);
            assert!(position.dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_cuboid_top_and_bottom_faces() {
        let cube = build_cuboid(Vector3::new(4.0, 4.0, 4.0), false);

        for vertex in &cube.vertices[0..4] {
            assert_eq!(vertex.position[1], 2.0);
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
        for vertex in &cube.vertices[20..24] {
            assert_eq!(vertex.position[1], -2.0);
            assert_eq!(vertex.normal, [0.0, -1.0, 0.0]);
        }
    }

    #[test]
    fn test_side_faces_do_not_share_vertices_with_caps() {
        let cube = build_cuboid(unit(), false);
        for tri in cube.indices.chunks_exact(3).skip(2).take(8) {
            assert!(tri.iter().all(|&i| (4..20).contains(&i)));
        }
        for tri in cube.indices.chunks_exact(3).take(2) {
            assert!(tri.iter().all(|&i| i < 4));
        }
        for tri in cube.indices.chunks_exact(3).skip(10) {
            assert!(tri.iter().all(|&i| (20..24).contains(&i)));
        }
    }

    #[test]
    fn test_each_face_owns_four_vertices() {
        let cube = build_cuboid(unit(), false);
        for normal in [
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ] {
            let count = cube.vertices.iter().filter(|v| v.normal == normal).count();
            assert_eq!(count, 4);
        }
    }

    #[test]
    fn test_flip_v_complements_only_v() {
        let dims = Vector3::new(3.0, 1.5, 2.0);
        let plain = build_cuboid(dims, false);
        let flipped = build_cuboid(dims, true);

        assert_eq!(plain.indices, flipped.indices);
        for (a, b) in plain.vertices.iter().zip(flipped.vertices.iter()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.uv[0], b.uv[0]);
            assert_eq!(b.uv[1], 1.0 - a.uv[1]);
        }
    }

    #[test]
    fn test_side_uv_seams() {
        let cube = build_cuboid(unit(), false);
        // Top ring at v = 1, bottom ring at v = 0, u alternating across each edge pair.
        for (offset, v) in [(4usize, 1.0), (12usize, 0.0)] {
            for pair in cube.vertices[offset..offset + 8].chunks_exact(2) {
                assert_eq!(pair[0].uv, [0.0, v]);
                assert_eq!(pair[1].uv, [1.0, v]);
            }
        }
    }

    #[test]
    fn test_degenerate_dimensions_do_not_fail() {
        let flat = build_cuboid(Vector3::new(1.0, 0.0, 1.0), false);
        assert_eq!(flat.vertex_count(), 24);
        assert_eq!(flat.indices.len(), 36);
        assert!(flat.is_well_formed());

        let degenerate = flat
            .triangles()
            .filter(|[a, b, c]| triangle_area(a, b, c) == 0.0)
            .count();
        // The four side faces collapse; top and bottom stay intact.
        assert_eq!(degenerate, 8);

        let inverted = build_cuboid(Vector3::new(-1.0, 1.0, 1.0), false);
        assert!(inverted.is_well_formed());
    }
}
