use crate::{unpack_rgb, Device, Lights};
use js_sys::Error;
use zerocopy::{AsBytes, FromBytes};

/// Point light count baked into the gem shader.
pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(align(16), C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, Default)]
pub struct LightData {
    ambient: [f32; 4],
    position: [[f32; 4]; MAX_POINT_LIGHTS],
    color: [[f32; 4]; MAX_POINT_LIGHTS],
}

impl Device {
    pub(crate) fn update_lights(&mut self, lights: &Lights) -> Result<(), Error> {
        if lights.points.len() > MAX_POINT_LIGHTS {
            return Err(Error::new("too many point lights in scene"));
        }

        let mut data = LightData::default();

        let [r, g, b] = unpack_rgb(lights.ambient);
        data.ambient = [r, g, b, 1.0];

        for (index, light) in lights.points.iter().enumerate() {
            let [x, y, z] = light.position;
            let [r, g, b] = unpack_rgb(light.color);

            data.position[index] = [x, y, z, 1.0];
            data.color[index] = [
                r * light.intensity,
                g * light.intensity,
                b * light.intensity,
                1.0,
            ];
        }

        self.lights_buffer.write(&data)
    }
}
