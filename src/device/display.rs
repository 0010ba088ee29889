use crate::Device;
use js_sys::Error;
use zerocopy::{AsBytes, FromBytes};

#[repr(align(16), C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, Default)]
pub struct DisplayData {
    // (exposure, 0, 0, 0)
    params: [f32; 4],
}

impl Device {
    pub(crate) fn update_display(&mut self, exposure: f32) -> Result<(), Error> {
        self.display_buffer.write(&DisplayData {
            params: [exposure, 0.0, 0.0, 0.0],
        })
    }
}
