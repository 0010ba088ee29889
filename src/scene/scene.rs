use crate::{
    Background, Camera, DebugCube, Dirty, Environment, GemMaterials, GemMesh, GemObject,
    HdrImage, Lights, Raster, Settings,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asset handle. Just an identifier into the scene's asset map.
pub type Asset = String;

/// Asset key under which loaded environment pixels are stored.
pub const ENVIRONMENT_ASSET: &str = "environment.rgbe";

/// All viewer state, change-tracked where uploads are expensive.
///
/// Settings, camera and materials are reprojected onto the GPU every frame
/// and need no tracking; geometry, lights and the environment source are
/// wrapped in `Dirty` so the device only rebuilds them on change.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Scene {
    pub camera: Camera,
    pub raster: Dirty<Raster>,
    pub lights: Dirty<Lights>,
    pub settings: Settings,
    pub environment: Dirty<Environment>,
    pub meshes: Dirty<Vec<GemMesh>>,
    pub objects: Vec<GemObject>,
    pub materials: GemMaterials,
    pub background: Background,
    pub debug_cube: DebugCube,

    /// Bulk binary data referenced by other fields, not serialized.
    #[serde(skip)]
    pub assets: HashMap<Asset, Vec<u8>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks all tracked fields as dirty, forcing a full device refresh.
    pub fn dirty_all_fields(&mut self) {
        Dirty::dirty(&mut self.raster);
        Dirty::dirty(&mut self.lights);
        Dirty::dirty(&mut self.environment);
        Dirty::dirty(&mut self.meshes);
    }

    /// Advances all animated state by one frame.
    pub fn advance(&mut self) {
        self.background.advance();

        if self.settings.auto_rotate {
            for object in &mut self.objects {
                object.spin();
            }
        }
    }

    /// Projects the live settings onto the material pair. Idempotent, so
    /// it is safe to call once per frame regardless of what changed.
    pub fn apply_settings(&mut self) {
        let settings = self.settings;

        self.materials.set_color(settings.gem_color.palette());
        self.materials.set_reflectivity(settings.reflectivity);
    }

    /// Installs decoded gem geometry and instantiates one object per
    /// sub-object. The object list only ever grows; earlier objects keep
    /// their geometry and accumulated rotation.
    pub fn insert_gem_meshes(&mut self, meshes: Vec<GemMesh>) {
        let base = self.meshes.len();

        self.objects.extend((0..meshes.len()).map(|index| GemObject {
            geometry: base + index,
            rotation_y: 0.0,
        }));

        self.meshes.extend(meshes);
    }

    /// Installs a decoded radiance map as the environment, returning false
    /// if a map was already installed.
    pub fn set_environment_image(&mut self, image: HdrImage) -> bool {
        if !self.environment.is_fallback() {
            return false;
        }

        self.assets
            .insert(ENVIRONMENT_ASSET.to_owned(), image.pixels);

        self.environment
            .set_equirect(ENVIRONMENT_ASSET.to_owned(), image.width, image.height)
    }

    /// Drops bulk asset data once the device no longer needs it uploaded.
    pub fn prune_consumed_assets(&mut self) {
        if Dirty::as_dirty(&self.environment).is_none() {
            self.assets.remove(ENVIRONMENT_ASSET);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvironmentSource;

    fn mesh(name: &str) -> GemMesh {
        GemMesh {
            name: name.to_owned(),
            positions: vec![0.0; 9],
            normals: vec![0.0; 9],
        }
    }

    fn image() -> HdrImage {
        HdrImage {
            width: 4,
            height: 2,
            pixels: vec![0; 4 * 2 * 4],
        }
    }

    #[test]
    fn starts_empty_with_the_default_rig() {
        let scene = Scene::new();

        assert!(scene.objects.is_empty());
        assert!(scene.meshes.is_empty());
        assert!(scene.environment.is_fallback());
        assert_eq!(scene.lights.points.len(), 4);
    }

    #[test]
    fn one_object_per_sub_object() {
        let mut scene = Scene::new();

        scene.insert_gem_meshes(vec![mesh("a"), mesh("b"), mesh("c")]);

        assert_eq!(scene.objects.len(), 3);

        for (index, object) in scene.objects.iter().enumerate() {
            assert_eq!(object.geometry, index);
            assert_eq!(object.rotation_y, 0.0);
        }
    }

    #[test]
    fn repeat_loads_grow_the_object_list() {
        let mut scene = Scene::new();

        scene.insert_gem_meshes(vec![mesh("a"), mesh("b")]);
        scene.advance();

        scene.insert_gem_meshes(vec![mesh("c")]);

        assert_eq!(scene.objects.len(), 3);
        assert_eq!(scene.meshes.len(), 3);

        // earlier objects keep their rotation, the new one starts fresh
        assert!((scene.objects[0].rotation_y - 0.005).abs() < 1e-6);
        assert_eq!(scene.objects[2].geometry, 2);
        assert_eq!(scene.objects[2].rotation_y, 0.0);
    }

    #[test]
    fn advance_only_spins_gems_while_auto_rotate_is_on() {
        let mut scene = Scene::new();
        scene.insert_gem_meshes(vec![mesh("a")]);

        scene.advance();
        assert!((scene.objects[0].rotation_y - 0.005).abs() < 1e-6);

        scene.settings.auto_rotate = false;
        scene.advance();
        assert!((scene.objects[0].rotation_y - 0.005).abs() < 1e-6);

        // the background keeps tumbling either way
        assert!((scene.background.rotation_y - 0.02).abs() < 1e-6);
    }

    #[test]
    fn settings_project_onto_both_material_sides() {
        let mut scene = Scene::new();
        scene.settings.gem_color = crate::GemColor::Green;
        scene.settings.reflectivity = 0.4;

        scene.apply_settings();
        scene.apply_settings();

        assert_eq!(scene.materials.front.color, 0x008800);
        assert_eq!(scene.materials.back.color, 0x008800);
        assert_eq!(scene.materials.front.reflectivity, 0.4);
        assert_eq!(scene.materials.back.reflectivity, 0.4);
    }

    #[test]
    fn environment_image_installs_once() {
        let mut scene = Scene::new();

        assert!(scene.set_environment_image(image()));
        assert!(!scene.set_environment_image(image()));
        assert_eq!(scene.environment.generation(), 1);
    }

    #[test]
    fn asset_data_is_pruned_after_the_device_consumes_it() {
        let mut scene = Scene::new();
        scene.set_environment_image(image());

        assert!(scene.assets.contains_key(ENVIRONMENT_ASSET));

        // still dirty, the pixels must survive until uploaded
        scene.prune_consumed_assets();
        assert!(scene.assets.contains_key(ENVIRONMENT_ASSET));

        Dirty::clean(&mut scene.environment, |_| Ok(())).unwrap();
        scene.prune_consumed_assets();
        assert!(!scene.assets.contains_key(ENVIRONMENT_ASSET));

        match scene.environment.source() {
            EnvironmentSource::Equirect { width, height, .. } => {
                assert_eq!(*width, 4);
                assert_eq!(*height, 2);
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }
}
