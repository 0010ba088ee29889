//! GLSL shader sources and the interface metadata used to bind them.

#[derive(Debug)]
pub struct ShaderInfo {
    pub name: &'static str,
    pub code: &'static str,
    pub defines: &'static [&'static str],
    pub uniform_blocks: &'static [&'static str],
    pub texture_units: &'static [&'static str],
}

pub static VS_MESH: ShaderInfo = ShaderInfo {
    name: "vs_mesh.glsl",
    code: include_str!("vs_mesh.glsl"),
    defines: &[],
    uniform_blocks: &["Camera"],
    texture_units: &[],
};

pub static VS_FULLSCREEN: ShaderInfo = ShaderInfo {
    name: "vs_fullscreen.glsl",
    code: include_str!("vs_fullscreen.glsl"),
    defines: &[],
    uniform_blocks: &[],
    texture_units: &[],
};

pub static FS_NORMAL: ShaderInfo = ShaderInfo {
    name: "fs_normal.glsl",
    code: include_str!("fs_normal.glsl"),
    defines: &[],
    uniform_blocks: &[],
    texture_units: &[],
};

pub static FS_GEM: ShaderInfo = ShaderInfo {
    name: "fs_gem.glsl",
    code: include_str!("fs_gem.glsl"),
    defines: &["POINT_LIGHT_COUNT"],
    uniform_blocks: &["Camera", "Material", "Lights", "Display", "Environment"],
    texture_units: &["env_equirect", "env_backdrop"],
};

pub static FS_BACKDROP: ShaderInfo = ShaderInfo {
    name: "fs_backdrop.glsl",
    code: include_str!("fs_backdrop.glsl"),
    defines: &[],
    uniform_blocks: &[],
    texture_units: &["backdrop"],
};

/// Resolves an `#include <...>` directive to its source.
pub fn header_source(name: &str) -> Option<&'static str> {
    match name {
        "envmap.glsl" => Some(include_str!("envmap.glsl")),
        "tonemap.glsl" => Some(include_str!("tonemap.glsl")),
        _ => None,
    }
}
