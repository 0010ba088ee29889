use serde::{Deserialize, Serialize};

/// Per-frame pitch increment of the background sphere.
pub const BACKGROUND_SPIN_X: f32 = 0.005;

/// Per-frame yaw increment of the background sphere.
pub const BACKGROUND_SPIN_Y: f32 = 0.01;

/// Edge length of the square offscreen background target.
pub const BACKGROUND_TARGET_SIZE: u32 = 512;

/// Vertical field of view of the background camera, in degrees.
pub const BACKGROUND_CAMERA_FOV: f32 = 50.0;

/// Distance of the background camera from the sphere center.
pub const BACKGROUND_CAMERA_Z: f32 = 8.0;

/// Radius of the normal-shaded sphere filling the background frame.
pub const BACKGROUND_SPHERE_RADIUS: f32 = 5.0;

/// Latitude and longitude subdivisions of the background sphere.
pub const BACKGROUND_SPHERE_SEGMENTS: u32 = 32;

/// Orientation of the tumbling background sphere.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Background {
    pub rotation_x: f32,
    pub rotation_y: f32,
}

impl Background {
    /// Advances the tumble by one frame.
    pub fn advance(&mut self) {
        self.rotation_x += BACKGROUND_SPIN_X;
        self.rotation_y += BACKGROUND_SPIN_Y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tumble_rates_are_independent() {
        let mut background = Background::default();

        for _ in 0..10 {
            background.advance();
        }

        assert!((background.rotation_x - 0.05).abs() < 1e-6);
        assert!((background.rotation_y - 0.1).abs() < 1e-6);
    }
}
