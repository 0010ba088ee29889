use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Main viewing camera, always aimed at the scene origin.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Camera {
    #[default([0.0, -10.0, 70.0])]
    pub position: [f32; 3],

    /// Vertical field of view in degrees.
    #[default(40.0)]
    pub fov: f32,

    #[default(1.0)]
    pub near: f32,

    #[default(1000.0)]
    pub far: f32,
}

impl Camera {
    pub fn distance(&self) -> f32 {
        let [x, y, z] = self.position;

        (x * x + y * y + z * z).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose_frames_the_gems() {
        let camera = Camera::default();

        assert_eq!(camera.position, [0.0, -10.0, 70.0]);
        assert_eq!(camera.fov, 40.0);
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 1000.0);
    }
}
