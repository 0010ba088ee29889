use crate::GemMesh;
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to parse OBJ data: {0}")]
    Parse(#[from] tobj::LoadError),
    #[error("OBJ data contains no geometry")]
    Empty,
}

/// Decodes wavefront OBJ data into one triangle mesh per sub-object.
///
/// Indexed geometry is expanded into flat triangle lists so the meshes
/// upload directly as non-indexed vertex buffers. Sub-objects without
/// normals get flat per-face normals computed from their winding.
pub fn decode_obj(bytes: &[u8]) -> Result<Vec<GemMesh>, MeshError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    // material libraries are irrelevant here, resolve them all as empty
    let (models, _) = tobj::load_obj_buf(&mut Cursor::new(bytes), &options, |_| {
        Ok(Default::default())
    })?;

    let mut meshes = Vec::with_capacity(models.len());

    // the parser emits a placeholder model for geometry-less input
    for model in models.iter().filter(|m| !m.mesh.indices.is_empty()) {
        let mesh = &model.mesh;

        let mut positions = Vec::with_capacity(mesh.indices.len() * 3);
        let mut normals = Vec::with_capacity(mesh.indices.len() * 3);

        let has_normals = !mesh.normals.is_empty();

        for &index in &mesh.indices {
            let index = index as usize;

            positions.extend_from_slice(&mesh.positions[3 * index..3 * index + 3]);

            if has_normals {
                normals.extend_from_slice(&mesh.normals[3 * index..3 * index + 3]);
            }
        }

        if !has_normals {
            compute_flat_normals(&positions, &mut normals);
        }

        meshes.push(GemMesh {
            name: model.name.clone(),
            positions,
            normals,
        });
    }

    if meshes.is_empty() {
        return Err(MeshError::Empty);
    }

    Ok(meshes)
}

fn compute_flat_normals(positions: &[f32], normals: &mut Vec<f32>) {
    normals.clear();
    normals.reserve(positions.len());

    for triangle in positions.chunks_exact(9) {
        let e1 = [
            triangle[3] - triangle[0],
            triangle[4] - triangle[1],
            triangle[5] - triangle[2],
        ];

        let e2 = [
            triangle[6] - triangle[0],
            triangle[7] - triangle[1],
            triangle[8] - triangle[2],
        ];

        let mut normal = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];

        let length =
            (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();

        if length > 0.0 {
            normal[0] /= length;
            normal[1] /= length;
            normal[2] /= length;
        }

        for _ in 0..3 {
            normals.extend_from_slice(&normal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GEMS: &str = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
o second
v 0 0 1
v 1 0 1
v 0 1 1
v 1 1 1
f 4 5 6
f 5 7 6
";

    #[test]
    fn one_mesh_per_named_sub_object() {
        let meshes = decode_obj(TWO_GEMS.as_bytes()).unwrap();

        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[0].name, "first");
        assert_eq!(meshes[1].name, "second");
    }

    #[test]
    fn indexed_faces_expand_to_flat_triangles() {
        let meshes = decode_obj(TWO_GEMS.as_bytes()).unwrap();

        assert_eq!(meshes[0].vertex_count(), 3);
        assert_eq!(meshes[1].vertex_count(), 6);

        assert_eq!(meshes[0].positions.len(), meshes[0].normals.len());
        assert_eq!(meshes[1].positions.len(), meshes[1].normals.len());
    }

    #[test]
    fn missing_normals_are_computed_from_winding() {
        let meshes = decode_obj(TWO_GEMS.as_bytes()).unwrap();

        // counter-clockwise in the z = 1 plane faces +z
        for normal in meshes[1].normals.chunks(3) {
            assert!((normal[2] - 1.0).abs() < 1e-6, "normal: {:?}", normal);
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        match decode_obj(b"# nothing here\n") {
            Err(MeshError::Empty) => {}
            other => panic!("unexpected result: {:?}", other.map(|m| m.len())),
        }

        // vertices alone make no triangles either
        match decode_obj(b"o shell\nv 0 0 0\nv 1 0 0\nv 0 1 0\n") {
            Err(MeshError::Empty) => {}
            other => panic!("unexpected result: {:?}", other.map(|m| m.len())),
        }
    }
}
