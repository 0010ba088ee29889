use crate::{Device, GemMaterial};
use js_sys::Error;
use zerocopy::{AsBytes, FromBytes};

#[repr(align(16), C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, Default)]
pub struct MaterialData {
    // (rgb, opacity)
    color_opacity: [f32; 4],
    // (reflectivity, metalness, env intensity, roughness)
    shading: [f32; 4],
}

impl Device {
    pub(crate) fn update_material(&mut self, material: &GemMaterial) -> Result<(), Error> {
        let [r, g, b] = material.resolve_color();

        self.material_buffer.write(&MaterialData {
            color_opacity: [r, g, b, material.opacity],
            shading: [
                material.reflectivity,
                material.metalness,
                material.env_map_intensity,
                material.roughness,
            ],
        })
    }
}
