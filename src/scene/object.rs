use crate::Side;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Per-frame yaw increment applied to every gem while auto-rotate is on.
pub const GEM_SPIN_Y: f32 = 0.005;

/// Triangle geometry of one named sub-object from the gem mesh.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GemMesh {
    pub name: String,

    /// Flat xyz triples, one per triangle corner.
    #[serde(skip)]
    pub positions: Vec<f32>,

    /// Flat xyz triples matching `positions`.
    #[serde(skip)]
    pub normals: Vec<f32>,
}

impl GemMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// A gem instance placed in the scene.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GemObject {
    /// Index into the scene's mesh list.
    pub geometry: usize,
    pub rotation_y: f32,
}

impl GemObject {
    /// Sides in submission order. The front hull must land in the target
    /// before the interior so the premultiplied blend composites correctly.
    pub const DRAW_ORDER: [Side; 2] = [Side::Front, Side::Back];

    pub fn spin(&mut self) {
        self.rotation_y += GEM_SPIN_Y;
    }
}

/// Wireframe reference cube, off by default.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct DebugCube {
    #[default(false)]
    pub enabled: bool,

    #[default(10.0)]
    pub size: f32,
}
