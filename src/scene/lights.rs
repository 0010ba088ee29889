use serde::{Deserialize, Serialize};

/// A white point light illuminating the gems.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct PointLight {
    pub position: [f32; 3],
    /// Packed 0xRRGGBB color.
    pub color: u32,
    pub intensity: f32,
}

/// The fixed lighting rig.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Lights {
    /// Packed 0xRRGGBB ambient term.
    pub ambient: u32,
    pub points: Vec<PointLight>,
}

impl Default for Lights {
    fn default() -> Self {
        let positions: [[f32; 3]; 4] = [
            [150.0, 10.0, 0.0],
            [-150.0, 0.0, 0.0],
            [0.0, -10.0, -150.0],
            [0.0, 0.0, 150.0],
        ];

        Self {
            ambient: 0x222222,
            points: positions
                .iter()
                .map(|&position| PointLight {
                    position,
                    color: 0xffffff,
                    intensity: 1.0,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_surrounds_the_origin() {
        let lights = Lights::default();

        assert_eq!(lights.ambient, 0x222222);
        assert_eq!(lights.points.len(), 4);

        for light in &lights.points {
            assert_eq!(light.color, 0xffffff);
            assert_eq!(light.intensity, 1.0);
        }
    }
}
