use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Clear color of the primary pass, when the backdrop blit is disabled.
pub const CLEAR_COLOR: u32 = 0xda_da_da;

/// Clear color of the offscreen background pass.
pub const BACKGROUND_CLEAR_COLOR: u32 = 0xff_ff_ff;

/// Gem tint selectable from the parameter panel.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(rename_all = "kebab-case")]
pub enum GemColor {
    Blue,
    Red,
    Green,
    White,
    #[default]
    Black,
}

impl GemColor {
    /// Resolved palette entry for this tint, packed as 0xRRGGBB.
    ///
    /// White and black map to light and dark grey respectively; a pure
    /// white or black gem reads as a flat silhouette under the PBR shading.
    pub fn palette(self) -> u32 {
        match self {
            Self::Blue => 0x00_00_88,
            Self::Red => 0x88_00_00,
            Self::Green => 0x00_88_00,
            Self::White => 0x88_88_88,
            Self::Black => 0x0f_0f_0f,
        }
    }

    /// Palette entry as normalized RGB.
    pub fn resolve(self) -> [f32; 3] {
        unpack_rgb(self.palette())
    }
}

/// Projection used by the main camera.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(rename_all = "kebab-case")]
pub enum Projection {
    #[default]
    Normal,
    Orthographic,
}

/// Live-tunable viewer parameters.
///
/// The record is written by the host's parameter panel and read every frame
/// by the render loop; none of the fields are change-tracked because their
/// application is an idempotent projection onto material and display state.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Settings {
    #[default(1.0)]
    pub reflectivity: f32,

    #[default(2.0)]
    pub exposure: f32,

    #[default(true)]
    pub auto_rotate: bool,

    #[default(false)]
    pub background: bool,

    pub gem_color: GemColor,

    pub projection: Projection,
}

/// Unpacks a 0xRRGGBB color into normalized RGB.
pub fn unpack_rgb(packed: u32) -> [f32; 3] {
    [
        ((packed >> 16) & 0xff) as f32 / 255.0,
        ((packed >> 8) & 0xff) as f32 / 255.0,
        (packed & 0xff) as f32 / 255.0,
    ]
}
