use crate::unpack_rgb;
use serde::{Deserialize, Serialize};

/// Face set a material applies to.
///
/// Every gem is drawn twice, once per side, so interior refraction shows
/// through the translucent hull.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Front,
    Back,
}

/// Physically based material parameters for one side of a gem.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct GemMaterial {
    /// Packed 0xRRGGBB base color.
    pub color: u32,
    pub reflectivity: f32,
    pub opacity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub env_map_intensity: f32,
    pub side: Side,
}

impl GemMaterial {
    /// Material of the outward-facing hull.
    pub fn front() -> Self {
        Self {
            color: 0x0000ff,
            reflectivity: 1.0,
            opacity: 0.25,
            metalness: 0.0,
            roughness: 0.0,
            env_map_intensity: 10.0,
            side: Side::Front,
        }
    }

    /// Material of the interior, drawn on back faces.
    pub fn back() -> Self {
        Self {
            color: 0x0000ff,
            reflectivity: 1.0,
            opacity: 0.5,
            metalness: 1.0,
            roughness: 0.0,
            env_map_intensity: 5.0,
            side: Side::Back,
        }
    }

    pub fn resolve_color(&self) -> [f32; 3] {
        unpack_rgb(self.color)
    }
}

/// The material pair shared by all gems in the scene.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct GemMaterials {
    pub front: GemMaterial,
    pub back: GemMaterial,
}

impl Default for GemMaterials {
    fn default() -> Self {
        Self {
            front: GemMaterial::front(),
            back: GemMaterial::back(),
        }
    }
}

impl GemMaterials {
    /// Applies the same base color to both sides.
    pub fn set_color(&mut self, color: u32) {
        self.front.color = color;
        self.back.color = color;
    }

    /// Applies the same reflectivity to both sides.
    pub fn set_reflectivity(&mut self, reflectivity: f32) {
        self.front.reflectivity = reflectivity;
        self.back.reflectivity = reflectivity;
    }

    pub fn for_side(&self, side: Side) -> &GemMaterial {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_differ_only_where_intended() {
        let materials = GemMaterials::default();

        assert_eq!(materials.front.color, materials.back.color);
        assert_eq!(materials.front.reflectivity, materials.back.reflectivity);
        assert_eq!(materials.front.roughness, materials.back.roughness);

        assert_eq!(materials.front.opacity, 0.25);
        assert_eq!(materials.back.opacity, 0.5);
        assert_eq!(materials.front.metalness, 0.0);
        assert_eq!(materials.back.metalness, 1.0);
        assert_eq!(materials.front.env_map_intensity, 10.0);
        assert_eq!(materials.back.env_map_intensity, 5.0);
    }

    #[test]
    fn shared_parameters_stay_in_lockstep() {
        let mut materials = GemMaterials::default();

        materials.set_color(0x008800);
        materials.set_reflectivity(0.3);

        assert_eq!(materials.front.color, 0x008800);
        assert_eq!(materials.back.color, 0x008800);
        assert_eq!(materials.front.reflectivity, 0.3);
        assert_eq!(materials.back.reflectivity, 0.3);
    }
}
