use std::path::Path;

use cgmath::{Deg, Matrix4 as Mat4, Vector3 as Vec3};

use crate::material::MaterialLibrary;
use crate::renderer::light::PointLight;
use crate::shapes::{MeshLibrary, ShapeKind};
use crate::texture::TextureLibrary;

/// Placement of one draw. Rotation is in degrees about X, then Y, then Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: [f32; 3],
    pub rotation_deg: [f32; 3],
    pub position: [f32; 3],
}

impl Transform {
    pub fn new(scale: [f32; 3], rotation_deg: [f32; 3], position: [f32; 3]) -> Self {
        Self {
            scale,
            rotation_deg,
            position,
        }
    }

    /// `T · Rx · Ry · Rz · S`
    pub fn model_matrix(&self) -> Mat4<f32> {
        let [sx, sy, sz] = self.scale;
        let [rx, ry, rz] = self.rotation_deg;
        Mat4::from_translation(Vec3::from(self.position))
            * Mat4::from_angle_x(Deg(rx))
            * Mat4::from_angle_y(Deg(ry))
            * Mat4::from_angle_z(Deg(rz))
            * Mat4::from_nonuniform_scale(sx, sy, sz)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Texture { tag: &'static str, uv_scale: [f32; 2] },
    /// RGBA; alpha is carried but every part of the scene is opaque.
    Color([f32; 4]),
}

impl Surface {
    pub fn texture(tag: &'static str) -> Self {
        Surface::Texture {
            tag,
            uv_scale: [1.0, 1.0],
        }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Surface::Color([r, g, b, 1.0])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub label: &'static str,
    pub shape: ShapeKind,
    pub transform: Transform,
    pub material: &'static str,
    pub surface: Surface,
}

/// Texture tags and the files they are loaded from, relative to the texture directory.
pub fn texture_manifest() -> [(&'static str, &'static str); 14] {
    [
        ("metal_table", "metal_table.jpg"),
        ("blue_vase", "blue_vase.jpg"),
        ("blue_vase3", "blue_vase3.jpg"),
        ("tiger_wood", "tiger_wood.jpg"),
        ("pink_matte", "pink_matte.jpg"),
        ("pink_matte2", "pink_matte2.jpg"),
        ("ruby4", "ruby4.jpg"),
        ("ruby6", "ruby6.jpg"),
        ("ruby8", "ruby8.jpg"),
        ("ruby9", "ruby9.jpg"),
        ("trash1", "trash1.jpg"),
        ("can_skin", "can_skin.jpg"),
        ("matte_rubber", "matte_rubber.jpg"),
        ("porcelain_vase", "porcelain_vase.jpg"),
    ]
}

/// Positions of the four coloured marker cubes, which double as lights 0..3.
pub const LIGHT_POSITIONS: [[f32; 3]; 4] = [
    [-100.0, 40.0, 50.0],
    [-150.0, 40.0, -25.0],
    [100.0, 20.0, 10.0],
    [20.0, 50.0, -100.0],
];

const LIGHT_MARKER_COLORS: [[f32; 3]; 4] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
];

pub fn scene_lights() -> Vec<PointLight> {
    vec![
        PointLight::new(LIGHT_POSITIONS[0]).focus(50.0, 0.4),
        PointLight::new(LIGHT_POSITIONS[1])
            .ambient([0.0, 0.0, 0.1])
            .focus(30.0, 0.1),
        PointLight::new(LIGHT_POSITIONS[2])
            .ambient([0.0, 0.0, 0.3])
            .diffuse([0.0, 0.0, 0.2])
            .specular([0.0, 0.0, 2.0])
            .focus(100.0, 1.0),
        PointLight::new(LIGHT_POSITIONS[3]).focus(12.0, 0.2),
        PointLight::new([-30.0, 40.0, 30.0])
            .specular([0.3, 0.3, 0.3])
            .focus(30.0, 0.3),
    ]
}

fn draw(
    label: &'static str,
    shape: ShapeKind,
    scale: [f32; 3],
    rotation_deg: [f32; 3],
    position: [f32; 3],
    material: &'static str,
    surface: Surface,
) -> DrawCommand {
    DrawCommand {
        label,
        shape,
        transform: Transform::new(scale, rotation_deg, position),
        material,
        surface,
    }
}

const BLACK: Surface = Surface::Color([0.0, 0.0, 0.0, 1.0]);
const GREY: Surface = Surface::Color([0.5, 0.5, 0.5, 1.0]);
const CHARCOAL: Surface = Surface::Color([0.1, 0.1, 0.1, 1.0]);

fn vase() -> Vec<DrawCommand> {
    use ShapeKind::*;
    vec![
        draw("vase body", Sphere, [2.0, 2.0, 2.0], [0.0, 0.0, 0.0], [0.0, 2.0, -8.4], "porcelaine", Surface::texture("blue_vase")),
        draw("vase neck", Cylinder, [0.7, 3.0, 0.7], [0.0, 0.0, 0.0], [0.0, 2.0, -8.4], "porcelaine", Surface::texture("blue_vase3")),
        draw("vase opening", Cylinder, [0.7, 0.2, 0.7], [0.0, 0.0, 0.0], [0.0, 4.9, -8.4], "void", BLACK),
        draw("vase lip", Torus, [0.8, 0.8, 0.8], [90.0, 0.0, 0.0], [0.0, 5.0, -8.4], "porcelaine", Surface::texture("blue_vase3")),
        draw("vase foot", Torus, [0.6, 1.0, 0.6], [90.0, 0.0, 0.0], [0.0, 0.14, -8.85], "porcelaine", Surface::texture("blue_vase3")),
    ]
}

fn jug() -> Vec<DrawCommand> {
    use ShapeKind::*;
    vec![
        draw("jug body", Cylinder, [2.5, 5.0, 2.5], [180.0, 0.0, 0.0], [-5.0, 5.0, -12.4], "shiny", Surface::texture("tiger_wood")),
        draw("jug shoulder", TaperedCylinder, [2.5, 0.6, 2.5], [0.0, 0.0, 0.0], [-5.0, 5.0, -12.4], "porcelaine", Surface::texture("tiger_wood")),
        draw("jug rim", Cylinder, [1.9, 1.5, 1.9], [0.0, 0.0, 0.0], [-5.0, 4.3, -12.4], "dull", GREY),
        draw("jug opening", Cylinder, [1.8, 1.5, 1.8], [0.0, 0.0, 0.0], [-5.0, 4.32, -12.4], "void", BLACK),
        draw("jug base ring", Torus, [2.15, 2.15, 0.5], [90.0, 0.0, 0.0], [-5.0, 0.5, -12.4], "dull", CHARCOAL),
    ]
}

fn trash_can() -> Vec<DrawCommand> {
    use ShapeKind::*;
    vec![
        draw("can body", TaperedCylinder, [3.5, 5.4, 3.5], [180.0, -90.0, 0.0], [4.0, 5.2, -12.4], "shinyish", Surface::texture("can_skin")),
        draw("can opening", Cylinder, [3.2, 0.2, 3.2], [180.0, -90.0, 0.0], [4.0, 5.23, -12.4], "void", BLACK),
        draw("can top ring", Torus, [2.96, 2.96, 0.5], [90.0, 0.0, 0.0], [4.0, 5.1, -12.4], "shiny", CHARCOAL),
        draw("can bottom ring", Torus, [1.6, 1.6, 0.5], [90.0, 0.0, 0.0], [4.0, 0.08, -12.4], "shiny", CHARCOAL),
    ]
}

fn weights() -> Vec<DrawCommand> {
    use ShapeKind::*;
    let plate = Surface::texture("pink_matte2");
    vec![
        draw("weight handle", Cylinder, [0.6, 5.0, 0.6], [90.0, 0.0, -90.0], [4.0, 0.8, -6.4], "dull", Surface::texture("pink_matte")),
        draw("weight left block", Box, [1.1, 1.0, 1.6], [90.0, 0.0, -90.0], [3.5, 0.8, -6.4], "dull", plate),
        draw("weight right block", Box, [1.1, 1.0, 1.6], [90.0, 0.0, -90.0], [8.5, 0.8, -6.4], "dull", plate),
        draw("weight right front", Prism, [1.6, 1.0, 0.4], [0.0, 0.0, 90.0], [8.5, 0.8, -5.65], "dull", plate),
        draw("weight right back", Prism, [1.6, 1.0, 0.4], [180.0, 0.0, 90.0], [8.5, 0.8, -7.15], "dull", plate),
        draw("weight left front", Prism, [1.6, 1.0, 0.4], [0.0, 0.0, 90.0], [3.5, 0.8, -5.65], "dull", plate),
        draw("weight left back", Prism, [1.6, 1.0, 0.4], [180.0, 0.0, 90.0], [3.5, 0.8, -7.15], "dull", plate),
    ]
}

fn console() -> Vec<DrawCommand> {
    use ShapeKind::*;
    let flat = [90.0, 90.0, 90.0];
    let mut parts = vec![
        draw("console base", Box, [0.2, 5.0, 2.0], [180.0, 0.0, 90.0], [10.0, 0.1, -12.4], "shiny", Surface::texture("ruby8")),
        draw("console inner", Box, [0.2, 4.9, 1.9], [180.0, 0.0, 90.0], [10.0, 0.15, -12.4], "shiny", Surface::texture("ruby6")),
        draw("console base lid", Box, [0.15, 5.0, 2.0], [180.0, 0.0, 90.0], [10.0, 0.3, -12.4], "shiny", Surface::texture("ruby6")),
        draw("console bottom screen", Box, [0.2, 2.5, 1.4], [180.0, 0.0, 90.0], [10.0, 0.3, -12.2], "shiny", Surface::texture("ruby9")),
        draw("console button strip", Box, [0.2, 2.5, 0.2], [180.0, 0.0, 90.0], [10.0, 0.32, -11.55], "shiny", GREY),
        draw("console top frame", Box, [0.2, 5.0, 2.0], [90.0, 0.0, 90.0], [10.0, 1.4, -13.33], "shiny", Surface::texture("ruby8")),
        draw("console top screen", Box, [0.2, 3.2, 1.6], [90.0, 0.0, 90.0], [10.0, 1.2, -13.32], "shiny", Surface::texture("ruby9")),
        draw("console hinge", Box, [0.2, 4.0, 0.25], [45.0, 0.0, 90.0], [10.0, 0.4, -13.28], "shiny", GREY),
        draw("joystick base", Cylinder, [0.35, 0.1, 0.35], flat, [8.15, 0.4, -12.6], "porcelaine", GREY),
        draw("joystick cap", Cylinder, [0.25, 0.1, 0.25], flat, [8.15, 0.45, -12.6], "porcelaine", Surface::texture("ruby9")),
        draw("d-pad horizontal", Box, [0.5, 0.2, 0.15], flat, [8.15, 0.32, -11.8], "porcelaine", GREY),
        draw("d-pad vertical", Box, [0.15, 0.2, 0.5], flat, [8.15, 0.32, -11.8], "porcelaine", GREY),
        // the buttons reference a material tag no library defines
        draw("home button", Box, [0.15, 0.2, 0.15], flat, [11.5, 0.32, -11.6], "shinyMaterial", GREY),
    ];
    let buttons = [
        ("button top", [11.9, 0.4, -12.65]),
        ("button bottom", [11.9, 0.4, -12.1]),
        ("button right", [12.15, 0.4, -12.37]),
        ("button left", [11.65, 0.4, -12.37]),
    ];
    parts.extend(buttons.into_iter().map(|(label, position)| {
        draw(label, Cylinder, [0.14, 0.1, 0.14], flat, position, "shinyMaterial", GREY)
    }));
    parts
}

fn light_markers() -> Vec<DrawCommand> {
    LIGHT_POSITIONS
        .iter()
        .zip(LIGHT_MARKER_COLORS)
        .map(|(position, [r, g, b])| {
            draw(
                "light marker",
                ShapeKind::Box,
                [15.0, 15.0, 15.0],
                [90.0, 90.0, 90.0],
                *position,
                "porcelaine",
                Surface::rgb(r, g, b),
            )
        })
        .collect()
}

/// The desk scene in draw order.
pub fn build_scene() -> Vec<DrawCommand> {
    let mut commands = vec![draw(
        "desk",
        ShapeKind::Plane,
        [12.0, 1.0, 8.0],
        [0.0, 0.0, 0.0],
        [2.5, 0.0, -12.0],
        "dull",
        Surface::texture("metal_table"),
    )];
    commands.extend(vase());
    commands.extend(jug());
    commands.extend(trash_can());
    commands.extend(weights());
    commands.extend(console());
    commands.extend(light_markers());
    commands
}

/// Everything a frame needs: the draw list plus the resources it refers to.
pub struct Scene {
    pub commands: Vec<DrawCommand>,
    pub lights: Vec<PointLight>,
    pub meshes: MeshLibrary,
    pub materials: MaterialLibrary,
    pub textures: TextureLibrary,
}

impl Scene {
    pub fn load(texture_dir: &Path) -> Self {
        let textures = TextureLibrary::load_all(texture_dir, &texture_manifest());
        Self::with_textures(textures)
    }

    pub fn with_textures(textures: TextureLibrary) -> Self {
        let scene = Self {
            commands: build_scene(),
            lights: scene_lights(),
            meshes: MeshLibrary::new(),
            materials: MaterialLibrary::with_scene_presets(),
            textures,
        };
        log::info!(
            "scene ready: {} draws, {} lights, {} textures",
            scene.commands.len(),
            scene.lights.len(),
            scene.textures.len()
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4 as Vec4};

    #[test]
    fn draw_list_has_every_part() {
        let scene = build_scene();
        assert_eq!(scene.len(), 1 + 5 + 5 + 4 + 7 + 17 + 4);
        assert_eq!(scene[0].label, "desk");
        assert_eq!(scene.iter().filter(|c| c.label == "light marker").count(), 4);
    }

    #[test]
    fn textured_parts_use_manifest_tags() {
        let manifest = texture_manifest();
        for command in build_scene() {
            if let Surface::Texture { tag, .. } = command.surface {
                assert!(manifest.iter().any(|(t, _)| *t == tag), "{tag} not in manifest");
            }
        }
    }

    #[test]
    fn openings_use_void() {
        let scene = build_scene();
        let openings: Vec<_> = scene.iter().filter(|c| c.material == "void").collect();
        assert_eq!(openings.len(), 3);
        assert!(openings.iter().all(|c| c.surface == BLACK));
    }

    #[test]
    fn model_matrix_scales_then_rotates_then_translates() {
        let t = Transform::new([2.0, 1.0, 1.0], [0.0, 0.0, 90.0], [10.0, 0.0, 0.0]);
        let p = t.model_matrix() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> moved (10,2,0)
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
        assert!(p.z.abs() < 1e-5);
    }

    #[test]
    fn x_rotation_applies_last() {
        // Ry(90) then Rx(90): +z -> +x under Ry, and Rx keeps x
        let t = Transform::new([1.0, 1.0, 1.0], [90.0, 90.0, 0.0], [0.0, 0.0, 0.0]);
        let p = (t.model_matrix() * Vec4::new(0.0, 0.0, 1.0, 0.0)).truncate();
        assert!((p - Vec3::unit_x()).magnitude() < 1e-5, "{p:?}");
    }

    #[test]
    fn lights_match_marker_positions() {
        let lights = scene_lights();
        assert_eq!(lights.len(), 5);
        for (light, position) in lights.iter().zip(LIGHT_POSITIONS) {
            assert_eq!(light.position, Vec3::from(position));
        }
        assert_eq!(lights[2].diffuse, Vec3::new(0.0, 0.0, 0.2));
    }
}
