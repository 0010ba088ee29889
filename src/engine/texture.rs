#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{AsAttachment, AsBindTarget, BindTarget};
use js_sys::{Object, Uint16Array, Uint8Array};
use std::marker::PhantomData;
use web_sys::{WebGl2RenderingContext as Context, WebGlTexture};

pub trait Boolean {
    const VALUE: bool;
}

pub struct True;
pub struct False;

impl Boolean for True {
    const VALUE: bool = true;
}
impl Boolean for False {
    const VALUE: bool = false;
}

pub trait RenderTarget {}

pub struct Color;
pub struct DepthStencil;

impl RenderTarget for Color {}
impl RenderTarget for DepthStencil {}

#[derive(Debug)]
pub struct Texture<T> {
    gl: Context,

    handle: Option<WebGlTexture>,
    layout: (usize, usize, usize),
    format: PhantomData<T>,
}

impl<T> Texture<T> {
    pub fn new(gl: Context) -> Self {
        Self {
            gl,
            handle: None,
            layout: (0, 0, 0),
            format: PhantomData,
        }
    }

    pub fn cols(&self) -> usize {
        self.layout.0
    }

    pub fn rows(&self) -> usize {
        self.layout.1
    }

    pub fn levels(&self) -> usize {
        self.layout.2
    }

    pub fn invalidate(&mut self) {
        self.layout = (0, 0, 0);
        self.handle = None;
    }

    pub fn reset(&mut self) {
        if let Some(texture_handle) = &self.handle {
            self.gl.delete_texture(Some(texture_handle));
        }

        self.invalidate();
    }

    pub fn is_invalid(&self) -> bool {
        self.handle.is_none()
    }

    /// Full mip pyramid depth for the given dimensions.
    pub fn mip_levels(cols: usize, rows: usize) -> usize {
        let extent = cols.max(rows).max(1);

        1 + (63 - (extent as u64).leading_zeros() as usize)
    }

    fn create_texture(&mut self, cols: usize, rows: usize, levels: usize) -> bool {
        assert!(cols > 0 && rows > 0, "invalid texture layout requested");

        if self.layout != (cols, rows, levels) || self.handle.is_none() {
            if let Some(texture_handle) = &self.handle {
                self.gl.delete_texture(Some(texture_handle));
            }

            self.handle = self.gl.create_texture();
            self.layout = (cols, rows, levels);

            false
        } else {
            true
        }
    }
}

impl<T: TextureFormat> Texture<T> {
    fn filter_mode_for_format(&self) -> i32 {
        if T::Filterable::VALUE {
            Context::LINEAR as i32
        } else {
            Context::NEAREST as i32
        }
    }

    fn min_filter_mode(&self) -> i32 {
        if self.levels() > 1 && T::Filterable::VALUE {
            Context::LINEAR_MIPMAP_LINEAR as i32
        } else {
            self.filter_mode_for_format()
        }
    }

    fn set_texture_parameters(&mut self) {
        let target = Context::TEXTURE_2D;

        self.gl.tex_parameteri(
            target,
            Context::TEXTURE_MAG_FILTER,
            self.filter_mode_for_format(),
        );

        self.gl
            .tex_parameteri(target, Context::TEXTURE_MIN_FILTER, self.min_filter_mode());

        // horizontal wrap for equirectangular longitude, clamped latitude
        self.gl
            .tex_parameteri(target, Context::TEXTURE_WRAP_S, Context::REPEAT as i32);

        self.gl.tex_parameteri(
            target,
            Context::TEXTURE_WRAP_T,
            Context::CLAMP_TO_EDGE as i32,
        );
    }

    pub fn create(&mut self, cols: usize, rows: usize) {
        self.create_with_levels(cols, rows, 1)
    }

    /// Allocates immutable storage holding a partial or full mip pyramid.
    pub fn create_mipmapped(&mut self, cols: usize, rows: usize, levels: usize) {
        assert!(levels >= 1 && levels <= Self::mip_levels(cols, rows));

        self.create_with_levels(cols, rows, levels)
    }

    fn create_with_levels(&mut self, cols: usize, rows: usize, levels: usize) {
        if self.create_texture(cols, rows, levels) {
            return; // texture already created
        }

        self.gl
            .bind_texture(Context::TEXTURE_2D, self.handle.as_ref());

        self.gl.tex_storage_2d(
            Context::TEXTURE_2D,
            levels as i32,
            T::GL_INTERNAL_FORMAT,
            cols as i32,
            rows as i32,
        );

        self.set_texture_parameters();
    }

    pub fn upload(&mut self, cols: usize, rows: usize, data: &[T::Data]) {
        self.create(cols, rows);
        self.upload_level(0, cols, rows, data);
    }

    /// Uploads one mip level of previously allocated storage.
    pub fn upload_level(&mut self, level: usize, cols: usize, rows: usize, data: &[T::Data]) {
        assert!(level < self.levels());

        self.gl
            .bind_texture(Context::TEXTURE_2D, self.handle.as_ref());

        self.gl
            .tex_sub_image_2d_with_i32_and_i32_and_u32_and_type_and_opt_array_buffer_view(
                Context::TEXTURE_2D,
                level as i32,
                0,
                0,
                cols as i32,
                rows as i32,
                T::GL_FORMAT,
                T::GL_TYPE,
                Some(&T::into_texture_source_data(cols, rows, data)),
            )
            .unwrap();
    }
}

impl<T: TextureFormat> AsAttachment for Texture<T> {
    type Target = T::Renderable;

    fn as_attachment(&self) -> Option<&WebGlTexture> {
        self.handle.as_ref()
    }

    fn attachment_dimensions(&self) -> (usize, usize) {
        (self.cols(), self.rows())
    }
}

impl<T: TextureFormat> AsBindTarget for Texture<T> {
    fn bind_target(&self) -> BindTarget {
        BindTarget::Texture(self.handle.as_ref())
    }
}

impl<T> Drop for Texture<T> {
    fn drop(&mut self) {
        if let Some(texture_handle) = &self.handle {
            self.gl.delete_texture(Some(texture_handle));
        }
    }
}

pub trait TextureFormat {
    type Data;

    type Filterable: Boolean;
    type Renderable: RenderTarget;

    const GL_INTERNAL_FORMAT: u32;
    const GL_FORMAT: u32;
    const GL_TYPE: u32;

    fn into_texture_source_data(_cols: usize, _rows: usize, _data: &[Self::Data]) -> Object {
        unimplemented!("texture data upload is not yet implemented for this texture format")
    }
}

#[derive(Debug)]
pub struct RGBA8;
#[derive(Debug)]
pub struct RGBA16F;
#[derive(Debug)]
pub struct D24S8;

impl TextureFormat for RGBA8 {
    type Data = u8;

    type Filterable = True;
    type Renderable = Color;

    const GL_INTERNAL_FORMAT: u32 = Context::RGBA8;
    const GL_FORMAT: u32 = Context::RGBA;
    const GL_TYPE: u32 = Context::UNSIGNED_BYTE;

    fn into_texture_source_data(cols: usize, rows: usize, data: &[Self::Data]) -> Object {
        assert!(data.len() == cols * rows * 4);

        Uint8Array::from(data).into()
    }
}

impl TextureFormat for RGBA16F {
    type Data = u16;

    type Filterable = True;
    type Renderable = Color;

    const GL_INTERNAL_FORMAT: u32 = Context::RGBA16F;
    const GL_FORMAT: u32 = Context::RGBA;
    const GL_TYPE: u32 = Context::HALF_FLOAT;

    fn into_texture_source_data(cols: usize, rows: usize, data: &[Self::Data]) -> Object {
        assert!(data.len() == cols * rows * 4);

        Uint16Array::from(data).into()
    }
}

impl TextureFormat for D24S8 {
    type Data = u32;

    type Filterable = False;
    type Renderable = DepthStencil;

    const GL_INTERNAL_FORMAT: u32 = Context::DEPTH24_STENCIL8;
    const GL_FORMAT: u32 = Context::DEPTH_STENCIL;
    const GL_TYPE: u32 = Context::UNSIGNED_INT_24_8;
}
