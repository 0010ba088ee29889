use js_sys::Error;
use web_sys::WebGl2RenderingContext as Context;

use crate::*;
use cgmath::{Matrix4, Rad};

#[derive(Debug)]
pub struct Device {
    pub(crate) gl: Context,

    pub(crate) background_program: Shader,
    pub(crate) gem_program: Shader,
    pub(crate) backdrop_program: Shader,

    pub(crate) camera_buffer: UniformBuffer<CameraData>,
    pub(crate) background_camera_buffer: UniformBuffer<CameraData>,
    pub(crate) material_buffer: UniformBuffer<MaterialData>,
    pub(crate) lights_buffer: UniformBuffer<LightData>,
    pub(crate) display_buffer: UniformBuffer<DisplayData>,
    pub(crate) environment_buffer: UniformBuffer<EnvironmentData>,

    pub(crate) background_target: Texture<RGBA8>,
    pub(crate) background_depth: Texture<D24S8>,
    pub(crate) background_fbo: Framebuffer,

    pub(crate) envmap_texture: Texture<RGBA16F>,

    pub(crate) sphere_vertices: VertexArray<[MeshVertex]>,
    pub(crate) cube_vertices: VertexArray<[MeshVertex]>,
    pub(crate) gem_vertices: Vec<VertexArray<[MeshVertex]>>,
}

impl Device {
    /// Creates a new device using a WebGL2 context.
    pub fn new(gl: &Context) -> Result<Self, Error> {
        Ok(Self {
            gl: gl.clone(),

            background_program: Shader::new(gl.clone(), &shaders::VS_MESH, &shaders::FS_NORMAL),
            gem_program: Shader::new(gl.clone(), &shaders::VS_MESH, &shaders::FS_GEM),
            backdrop_program: Shader::new(
                gl.clone(),
                &shaders::VS_FULLSCREEN,
                &shaders::FS_BACKDROP,
            ),
            camera_buffer: UniformBuffer::new(gl.clone()),
            background_camera_buffer: UniformBuffer::new(gl.clone()),
            material_buffer: UniformBuffer::new(gl.clone()),
            lights_buffer: UniformBuffer::new(gl.clone()),
            display_buffer: UniformBuffer::new(gl.clone()),
            environment_buffer: UniformBuffer::new(gl.clone()),
            background_target: Texture::new(gl.clone()),
            background_depth: Texture::new(gl.clone()),
            background_fbo: Framebuffer::new(gl.clone()),
            envmap_texture: Texture::new(gl.clone()),
            sphere_vertices: VertexArray::new(gl.clone()),
            cube_vertices: VertexArray::new(gl.clone()),
            gem_vertices: vec![],
        })
    }

    /// Updates this device to render a given scene or returns an error.
    pub fn update(&mut self, scene: &mut Scene) -> Result<bool, Error> {
        let mut invalidated = false;

        invalidated |= Dirty::clean(&mut scene.raster, |raster| {
            if raster.width == 0 || raster.height == 0 {
                return Err(Error::new("raster dimensions must be nonzero"));
            }

            Ok(())
        })?;

        invalidated |= Dirty::clean(&mut scene.lights, |lights| {
            self.update_lights(lights)?;

            Ok(())
        })?;

        invalidated |= Dirty::clean(&mut scene.meshes, |meshes| {
            self.gem_vertices.clear();

            for mesh in meshes.iter() {
                let mut vertices = VertexArray::new(self.gl.clone());

                vertices.upload(&mesh_vertices(mesh));

                self.gem_vertices.push(vertices);
            }

            Ok(())
        })?;

        let assets = &scene.assets;

        invalidated |= Dirty::clean(&mut scene.environment, |environment| {
            self.update_environment(environment, assets)?;

            Ok(())
        })?;

        if self.sphere_vertices.vertex_count() == 0 {
            self.sphere_vertices.upload(&uv_sphere(
                BACKGROUND_SPHERE_RADIUS,
                BACKGROUND_SPHERE_SEGMENTS,
            ));
        }

        if self.cube_vertices.vertex_count() == 0 {
            self.cube_vertices.upload(&unit_cube());
        }

        if self.background_target.is_invalid() {
            let size = BACKGROUND_TARGET_SIZE as usize;

            self.background_target.create(size, size);
            self.background_depth.create(size, size);

            self.background_fbo
                .rebuild(&[&self.background_target], Some(&self.background_depth))?;
        }

        self.gem_program
            .set_define("POINT_LIGHT_COUNT", MAX_POINT_LIGHTS);

        self.background_program.rebuild()?;
        self.gem_program.rebuild()?;
        self.backdrop_program.rebuild()?;

        Ok(invalidated)
    }

    /// Renders the tumbling sphere into the offscreen background target.
    pub fn render_background(&mut self, scene: &Scene) -> Result<(), Error> {
        self.update_background_camera()?;

        let [r, g, b] = unpack_rgb(BACKGROUND_CLEAR_COLOR);

        self.background_fbo.clear(0, [r, g, b, 1.0]);
        self.background_fbo.clear_depth_stencil(1.0, 0);

        let model = Matrix4::from_angle_y(Rad(scene.background.rotation_y))
            * Matrix4::from_angle_x(Rad(scene.background.rotation_x));

        let size = BACKGROUND_TARGET_SIZE as i32;

        let command = self.background_program.begin_draw();

        command.set_framebuffer(&self.background_fbo);
        command.set_viewport(0, 0, size, size);
        command.bind(&self.background_camera_buffer, "Camera");
        command.enable_depth_test(true);

        // the camera looks through the hull at the sphere interior
        command.set_cull_side(Side::Back);

        command.set_vertex_array(&self.sphere_vertices);
        command.set_uniform_mat4("model", model.as_ref());
        command.draw_triangles(0, self.sphere_vertices.triangle_count());

        Ok(())
    }

    /// Renders the scene into the context's canvas.
    pub fn render(&mut self, scene: &Scene) -> Result<(), Error> {
        let raster = *scene.raster;

        let width = raster.width as i32;
        let height = raster.height as i32;

        self.update_camera(&scene.camera, raster.aspect_ratio(), scene.settings.projection)?;
        self.update_display(scene.settings.exposure)?;

        let [r, g, b] = unpack_rgb(CLEAR_COLOR);

        self.gl.bind_framebuffer(Context::DRAW_FRAMEBUFFER, None);
        self.gl.viewport(0, 0, width, height);
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear_depth(1.0);
        self.gl
            .clear(Context::COLOR_BUFFER_BIT | Context::DEPTH_BUFFER_BIT);

        if scene.settings.background {
            let command = self.backdrop_program.begin_draw();

            command.set_canvas_framebuffer();
            command.set_viewport(0, 0, width, height);
            command.bind(&self.background_target, "backdrop");
            command.unset_vertex_array();
            command.draw_triangles(0, 1);
        }

        for object in &scene.objects {
            let model = Matrix4::from_angle_y(Rad(object.rotation_y));

            for &side in &GemObject::DRAW_ORDER {
                self.update_material(scene.materials.for_side(side))?;

                let vertices = match self.gem_vertices.get(object.geometry) {
                    Some(vertices) => vertices,
                    None => continue,
                };

                let command = self.gem_program.begin_draw();

                command.set_canvas_framebuffer();
                command.set_viewport(0, 0, width, height);
                command.bind(&self.camera_buffer, "Camera");
                command.bind(&self.material_buffer, "Material");
                command.bind(&self.lights_buffer, "Lights");
                command.bind(&self.display_buffer, "Display");
                command.bind(&self.environment_buffer, "Environment");
                command.bind(&self.envmap_texture, "env_equirect");
                command.bind(&self.background_target, "env_backdrop");
                command.enable_depth_test(true);
                command.set_blend_mode(BlendMode::Premultiplied);
                command.set_cull_side(side);
                command.set_vertex_array(vertices);
                command.set_uniform_mat4("model", model.as_ref());
                command.draw_triangles(0, vertices.triangle_count());
            }
        }

        if scene.debug_cube.enabled {
            let model = Matrix4::from_scale(scene.debug_cube.size);

            let command = self.background_program.begin_draw();

            command.set_canvas_framebuffer();
            command.set_viewport(0, 0, width, height);
            command.bind(&self.camera_buffer, "Camera");
            command.enable_depth_test(true);
            command.set_vertex_array(&self.cube_vertices);
            command.set_uniform_mat4("model", model.as_ref());
            command.draw_triangles(0, self.cube_vertices.triangle_count());
        }

        Ok(())
    }
}
