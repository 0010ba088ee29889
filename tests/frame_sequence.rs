use approx::assert_relative_eq;
use lapidary::{decode_hdr, decode_obj, GemColor, GemObject, Scene, Side, GEM_SPIN_Y};

const TWO_GEMS: &str = "\
o crown
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o pavilion
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";

fn hdr_bytes() -> Vec<u8> {
    let mut bytes = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 2 +X 2\n".to_vec();

    for _ in 0..4 {
        bytes.extend_from_slice(&[128, 128, 128, 136]);
    }

    bytes
}

fn load_gems(scene: &mut Scene) {
    scene.insert_gem_meshes(decode_obj(TWO_GEMS.as_bytes()).unwrap());
}

fn load_environment(scene: &mut Scene) -> bool {
    scene.set_environment_image(decode_hdr(&hdr_bytes()).unwrap())
}

#[test]
fn empty_scene_still_renders_the_rig() {
    let mut scene = Scene::new();

    for _ in 0..3 {
        scene.advance();
        scene.apply_settings();
    }

    assert!(scene.objects.is_empty());
    assert!(scene.environment.is_fallback());
    assert_eq!(scene.lights.points.len(), 4);
}

#[test]
fn gems_appear_once_the_mesh_arrives() {
    let mut scene = Scene::new();

    scene.advance();
    load_gems(&mut scene);

    assert_eq!(scene.objects.len(), 2);

    // each gem draws its two sides, hull first
    assert_eq!(GemObject::DRAW_ORDER, [Side::Front, Side::Back]);
}

#[test]
fn environment_map_installs_exactly_once() {
    let mut scene = Scene::new();

    assert!(load_environment(&mut scene));
    assert_eq!(scene.environment.generation(), 1);

    // a second arrival must not disturb the installed map
    assert!(!load_environment(&mut scene));
    assert_eq!(scene.environment.generation(), 1);
}

#[test]
fn load_order_does_not_matter() {
    let mut mesh_first = Scene::new();
    load_gems(&mut mesh_first);
    load_environment(&mut mesh_first);

    let mut environment_first = Scene::new();
    load_environment(&mut environment_first);
    load_gems(&mut environment_first);

    assert_eq!(mesh_first.objects, environment_first.objects);
    assert_eq!(
        mesh_first.environment.generation(),
        environment_first.environment.generation()
    );
}

#[test]
fn auto_rotate_advances_yaw_per_frame() {
    let mut scene = Scene::new();
    load_gems(&mut scene);

    for _ in 0..100 {
        scene.advance();
    }

    for object in &scene.objects {
        assert_relative_eq!(object.rotation_y, 100.0 * GEM_SPIN_Y, epsilon = 1e-5);
    }

    scene.settings.auto_rotate = false;

    for _ in 0..100 {
        scene.advance();
    }

    for object in &scene.objects {
        assert_relative_eq!(object.rotation_y, 100.0 * GEM_SPIN_Y, epsilon = 1e-5);
    }
}

#[test]
fn background_tumbles_regardless_of_settings() {
    let mut scene = Scene::new();
    scene.settings.auto_rotate = false;

    for _ in 0..10 {
        scene.advance();
    }

    assert_relative_eq!(scene.background.rotation_x, 0.05, epsilon = 1e-6);
    assert_relative_eq!(scene.background.rotation_y, 0.1, epsilon = 1e-6);
}

#[test]
fn both_material_sides_track_the_selected_color() {
    let mut scene = Scene::new();

    for &(color, packed) in &[
        (GemColor::Blue, 0x000088u32),
        (GemColor::Red, 0x880000),
        (GemColor::Green, 0x008800),
        (GemColor::White, 0x888888),
        (GemColor::Black, 0x0f0f0f),
    ] {
        scene.settings.gem_color = color;
        scene.apply_settings();

        assert_eq!(scene.materials.front.color, packed);
        assert_eq!(scene.materials.back.color, packed);
    }
}

#[test]
fn side_specific_parameters_survive_reprojection() {
    let mut scene = Scene::new();
    scene.settings.reflectivity = 0.7;

    for _ in 0..5 {
        scene.advance();
        scene.apply_settings();
    }

    assert_eq!(scene.materials.front.reflectivity, 0.7);
    assert_eq!(scene.materials.back.reflectivity, 0.7);

    assert_eq!(scene.materials.front.opacity, 0.25);
    assert_eq!(scene.materials.back.opacity, 0.5);
    assert_eq!(scene.materials.front.metalness, 0.0);
    assert_eq!(scene.materials.back.metalness, 1.0);
    assert_eq!(scene.materials.front.env_map_intensity, 10.0);
    assert_eq!(scene.materials.back.env_map_intensity, 5.0);
}

#[test]
fn pruning_keeps_the_installed_environment_descriptor() {
    let mut scene = Scene::new();
    load_environment(&mut scene);

    // nothing consumed the upload yet
    scene.prune_consumed_assets();
    assert!(!scene.environment.is_fallback());
    assert_eq!(scene.environment.generation(), 1);
}
