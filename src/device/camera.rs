#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{Camera, Device, Projection, BACKGROUND_CAMERA_FOV, BACKGROUND_CAMERA_Z};
use cgmath::prelude::*;
use cgmath::{ortho, perspective, Deg, Matrix4, Point3, Vector3};
use js_sys::Error;
use zerocopy::{AsBytes, FromBytes};

#[repr(align(16), C)]
#[derive(AsBytes, FromBytes, Clone, Copy, Debug, Default)]
pub struct CameraData {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
}

impl Device {
    pub(crate) fn update_camera(
        &mut self,
        camera: &Camera,
        aspect: f32,
        projection: Projection,
    ) -> Result<(), Error> {
        let eye: Point3<f32> = camera.position.into();

        let view = Matrix4::look_at(eye, Point3::origin(), Vector3::unit_y());

        let proj = match projection {
            Projection::Normal => perspective(Deg(camera.fov), aspect, camera.near, camera.far),
            Projection::Orthographic => {
                // frustum sized to match the perspective view at the origin
                let half_h = camera.distance() * (Deg(camera.fov / 2.0)).tan();
                let half_w = half_h * aspect;

                ortho(-half_w, half_w, -half_h, half_h, camera.near, camera.far)
            }
        };

        self.camera_buffer.write(&CameraData {
            view_proj: (proj * view).into(),
            eye: [camera.position[0], camera.position[1], camera.position[2], 1.0],
        })
    }

    pub(crate) fn update_background_camera(&mut self) -> Result<(), Error> {
        let eye = Point3::new(0.0, 0.0, BACKGROUND_CAMERA_Z);

        let view = Matrix4::look_at(eye, Point3::origin(), Vector3::unit_y());
        let proj = perspective(Deg(BACKGROUND_CAMERA_FOV), 1.0, 0.1, 100.0);

        self.background_camera_buffer.write(&CameraData {
            view_proj: (proj * view).into(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        })
    }
}
