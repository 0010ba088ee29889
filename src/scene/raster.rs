use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Canvas raster dimensions in physical pixels.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Raster {
    #[default(1)]
    pub width: u32,

    #[default(1)]
    pub height: u32,
}

impl Raster {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
