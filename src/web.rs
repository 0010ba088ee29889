#[allow(unused_imports)]
use log::{debug, error, info, warn};

use crate::{decode_hdr, decode_obj, Device, GemColor, Projection, Scene, Settings};
use js_sys::Error;
use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::WebGl2RenderingContext;

/// Default mesh asset fetched by `start`.
pub const GEM_MESH_URL: &str =
    "https://raw.githubusercontent.com/mrdoob/three.js/master/examples/models/obj/emerald.obj";

/// Default radiance map asset fetched by `start`.
pub const ENVIRONMENT_HDR_URL: &str =
    "https://raw.githubusercontent.com/mrdoob/three.js/master/examples/textures/equirectangular/royal_esplanade_1k.hdr";

/// WASM binding for the gem viewer.
#[wasm_bindgen]
pub struct Viewer {
    device: Device,
    scene: Rc<RefCell<Scene>>,
}

#[wasm_bindgen]
impl Viewer {
    /// Creates a viewer rendering into the given WebGL2 context.
    #[wasm_bindgen(constructor)]
    pub fn new(context: &WebGl2RenderingContext) -> Result<Viewer, JsValue> {
        Ok(Self {
            device: Device::new(context)?,
            scene: Rc::new(RefCell::new(Scene::new())),
        })
    }

    /// Begins fetching the gem mesh and the radiance map.
    ///
    /// The viewer renders with whatever has arrived so far, so this can be
    /// called after the render loop is already running. Fetch failures are
    /// logged and leave the affected asset in its unloaded state.
    pub fn start(&self) {
        spawn_asset_fetches(self.scene.clone());
    }

    /// Installs gem geometry from raw OBJ data.
    pub fn load_gem_data(&self, data: &[u8]) -> Result<(), JsValue> {
        install_gem_data(&mut self.scene.borrow_mut(), data)
            .map_err(|error| Error::new(&error).into())
    }

    /// Installs a radiance map from raw Radiance HDR data.
    ///
    /// Returns false if an environment map was already installed, in which
    /// case the data is ignored.
    pub fn load_environment_data(&self, data: &[u8]) -> Result<bool, JsValue> {
        install_environment_data(&mut self.scene.borrow_mut(), data)
            .map_err(|error| Error::new(&error).into())
    }

    /// Advances the scene by one frame and renders both passes.
    pub fn render_frame(&mut self) -> Result<(), JsValue> {
        let mut scene = self.scene.borrow_mut();

        scene.advance();
        scene.apply_settings();

        self.device.update(&mut scene)?;
        scene.prune_consumed_assets();

        self.device.render_background(&scene)?;
        self.device.render(&scene)?;

        Ok(())
    }

    pub fn set_dimensions(&self, width: u32, height: u32) {
        let mut scene = self.scene.borrow_mut();

        if scene.raster.width != width {
            scene.raster.width = width;
        }

        if scene.raster.height != height {
            scene.raster.height = height;
        }
    }

    pub fn set_camera_position(&self, x: f32, y: f32, z: f32) {
        self.scene.borrow_mut().camera.position = [x, y, z];
    }

    pub fn set_reflectivity(&self, reflectivity: f32) {
        self.scene.borrow_mut().settings.reflectivity = reflectivity;
    }

    pub fn set_exposure(&self, exposure: f32) {
        self.scene.borrow_mut().settings.exposure = exposure;
    }

    pub fn set_auto_rotate(&self, auto_rotate: bool) {
        self.scene.borrow_mut().settings.auto_rotate = auto_rotate;
    }

    pub fn set_background(&self, background: bool) {
        self.scene.borrow_mut().settings.background = background;
    }

    pub fn set_gem_color(&self, name: &str) -> Result<(), JsValue> {
        self.scene.borrow_mut().settings.gem_color = parse_gem_color(name)?;

        Ok(())
    }

    pub fn set_projection(&self, name: &str) -> Result<(), JsValue> {
        self.scene.borrow_mut().settings.projection = match name {
            "normal" => Projection::Normal,
            "orthographic" => Projection::Orthographic,
            _ => return Err(Error::new("unknown projection").into()),
        };

        Ok(())
    }

    pub fn set_debug_cube(&self, enabled: bool) {
        self.scene.borrow_mut().debug_cube.enabled = enabled;
    }

    pub fn settings_json(&self) -> Result<JsValue, JsValue> {
        as_json(&self.scene.borrow().settings)
    }

    pub fn set_settings_json(&self, json: &JsValue) -> Result<(), JsValue> {
        self.scene.borrow_mut().settings = from_json::<Settings>(json)?;

        Ok(())
    }

    pub fn gem_count(&self) -> usize {
        self.scene.borrow().objects.len()
    }

    pub fn environment_loaded(&self) -> bool {
        !self.scene.borrow().environment.is_fallback()
    }
}

fn install_gem_data(scene: &mut Scene, data: &[u8]) -> Result<(), String> {
    let meshes = decode_obj(data).map_err(|error| error.to_string())?;

    info!("loaded gem mesh with {} sub-objects", meshes.len());

    scene.insert_gem_meshes(meshes);

    Ok(())
}

fn install_environment_data(scene: &mut Scene, data: &[u8]) -> Result<bool, String> {
    let image = decode_hdr(data).map_err(|error| error.to_string())?;

    info!("loaded {}x{} radiance map", image.width, image.height);

    Ok(scene.set_environment_image(image))
}

fn parse_gem_color(name: &str) -> Result<GemColor, JsValue> {
    match name {
        "blue" => Ok(GemColor::Blue),
        "red" => Ok(GemColor::Red),
        "green" => Ok(GemColor::Green),
        "white" => Ok(GemColor::White),
        "black" => Ok(GemColor::Black),
        _ => Err(Error::new("unknown gem color").into()),
    }
}

fn as_json<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    Ok(JsValue::from_serde(value).map_err(|e| Error::new(&e.to_string()))?)
}

fn from_json<T: DeserializeOwned>(json: &JsValue) -> Result<T, JsValue> {
    Ok(json.into_serde().map_err(|e| Error::new(&e.to_string()))?)
}

#[cfg(target_arch = "wasm32")]
fn spawn_asset_fetches(scene: Rc<RefCell<Scene>>) {
    let mesh_scene = scene.clone();

    wasm_bindgen_futures::spawn_local(async move {
        match fetch_bytes(GEM_MESH_URL).await {
            Ok(bytes) => {
                if let Err(error) = install_gem_data(&mut mesh_scene.borrow_mut(), &bytes) {
                    error!("failed to decode gem mesh: {}", error);
                }
            }
            Err(_) => error!("failed to fetch {}", GEM_MESH_URL),
        }
    });

    wasm_bindgen_futures::spawn_local(async move {
        match fetch_bytes(ENVIRONMENT_HDR_URL).await {
            Ok(bytes) => {
                if let Err(error) = install_environment_data(&mut scene.borrow_mut(), &bytes) {
                    error!("failed to decode environment map: {}", error);
                }
            }
            Err(_) => error!("failed to fetch {}", ENVIRONMENT_HDR_URL),
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_asset_fetches(_scene: Rc<RefCell<Scene>>) {}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, JsValue> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| Error::new("no window available"))?;

    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;

    if !response.ok() {
        return Err(Error::new(&format!("request failed: {}", response.status())).into());
    }

    let buffer = JsFuture::from(response.array_buffer()?).await?;

    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Returns a version string for the WASM module.
#[wasm_bindgen]
pub fn version() -> String {
    concat!("Lapidary v", env!("CARGO_PKG_VERSION"), " (WebGL2)").to_owned()
}

/// Configures browser logging functionality.
///
/// This function is safe to call more than once and will do nothing should it
/// be called more than once; this lets it co-exist nicely with hot reloaders.
#[wasm_bindgen]
pub fn initialize_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init();
}
