use crate::{GemMesh, VertexAttribute, VertexAttributeKind, VertexLayout};
use itertools::iproduct;
use std::f32::consts::PI;
use zerocopy::{AsBytes, FromBytes};

#[repr(C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, Default)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl VertexLayout for MeshVertex {
    fn vertex_layout() -> Vec<VertexAttribute> {
        vec![
            VertexAttribute::new(0, 0, VertexAttributeKind::Float3),
            VertexAttribute::new(1, 12, VertexAttributeKind::Float3),
        ]
    }
}

/// Flat triangle list for a latitude/longitude sphere.
pub fn uv_sphere(radius: f32, segments: u32) -> Vec<MeshVertex> {
    let point = |lat: u32, lon: u32| {
        let theta = PI * lat as f32 / segments as f32;
        let phi = 2.0 * PI * lon as f32 / segments as f32;

        let normal = [
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        ];

        MeshVertex {
            position: [radius * normal[0], radius * normal[1], radius * normal[2]],
            normal,
        }
    };

    let mut vertices = Vec::with_capacity((segments * segments * 6) as usize);

    for (lat, lon) in iproduct!(0..segments, 0..segments) {
        let a = point(lat, lon);
        let b = point(lat + 1, lon);
        let c = point(lat + 1, lon + 1);
        let d = point(lat, lon + 1);

        vertices.extend_from_slice(&[a, b, c]);
        vertices.extend_from_slice(&[a, c, d]);
    }

    vertices
}

/// Flat triangle list for a unit cube centered on the origin.
pub fn unit_cube() -> Vec<MeshVertex> {
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(36);

    for &(normal, u, v) in &faces {
        let corner = |s: f32, t: f32| {
            let mut position = [0.0f32; 3];

            for axis in 0..3 {
                position[axis] = 0.5 * (normal[axis] + s * u[axis] + t * v[axis]);
            }

            MeshVertex { position, normal }
        };

        let a = corner(-1.0, -1.0);
        let b = corner(1.0, -1.0);
        let c = corner(1.0, 1.0);
        let d = corner(-1.0, 1.0);

        vertices.extend_from_slice(&[a, b, c]);
        vertices.extend_from_slice(&[a, c, d]);
    }

    vertices
}

/// Interleaves a decoded mesh into the upload layout.
pub fn mesh_vertices(mesh: &GemMesh) -> Vec<MeshVertex> {
    assert_eq!(mesh.positions.len(), mesh.normals.len());

    mesh.positions
        .chunks_exact(3)
        .zip(mesh.normals.chunks_exact(3))
        .map(|(position, normal)| MeshVertex {
            position: [position[0], position[1], position[2]],
            normal: [normal[0], normal[1], normal[2]],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_tessellation_is_complete() {
        let vertices = uv_sphere(5.0, 32);

        assert_eq!(vertices.len(), 32 * 32 * 6);

        for vertex in &vertices {
            let [x, y, z] = vertex.position;
            let radius = (x * x + y * y + z * z).sqrt();

            assert!((radius - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cube_spans_the_unit_extent() {
        let vertices = unit_cube();

        assert_eq!(vertices.len(), 36);

        for vertex in &vertices {
            for axis in 0..3 {
                assert!(vertex.position[axis].abs() <= 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn mesh_vertices_interleave_attributes() {
        let mesh = GemMesh {
            name: String::from("gem"),
            positions: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 1.0, 0.0],
        };

        let vertices = mesh_vertices(&mesh);

        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[1].normal, [0.0, 1.0, 0.0]);
    }
}
