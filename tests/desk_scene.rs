use std::path::PathBuf;

use desk_scene::app::{self, Invocation};
use desk_scene::config::AppConfig;
use desk_scene::material::MaterialLibrary;
use desk_scene::scene::{Scene, build_scene};
use desk_scene::shapes::{MeshLibrary, ShapeKind};
use desk_scene::texture::TextureLibrary;

fn small_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.window.width = 160;
    config.window.height = 120;
    config.textures.dir = PathBuf::from("no-such-texture-dir");
    config
}

fn untextured_scene() -> Scene {
    Scene::with_textures(TextureLibrary::new())
}

#[test]
fn every_draw_resolves_its_resources() {
    let meshes = MeshLibrary::new();
    let materials = MaterialLibrary::with_scene_presets();
    let mut unknown = Vec::new();
    for command in build_scene() {
        assert!(!meshes.get(command.shape).is_empty(), "{}", command.label);
        if materials.find(command.material).is_none() {
            unknown.push(command.material);
        }
    }
    // only the handheld's buttons use the undefined tag
    assert_eq!(unknown.len(), 5);
    assert!(unknown.iter().all(|tag| *tag == "shinyMaterial"));
}

#[test]
fn scene_uses_most_shapes() {
    let used: Vec<ShapeKind> = build_scene().iter().map(|c| c.shape).collect();
    for kind in [
        ShapeKind::Plane,
        ShapeKind::Box,
        ShapeKind::Cylinder,
        ShapeKind::TaperedCylinder,
        ShapeKind::Sphere,
        ShapeKind::Torus,
        ShapeKind::Prism,
    ] {
        assert!(used.contains(&kind), "{kind:?} unused");
    }
}

#[test]
fn headless_frame_shows_the_desk() {
    let config = small_config();
    let scene = untextured_scene();
    let frame = app::render_still(&config, &scene, false);
    assert_eq!((frame.width, frame.height), (160, 120));

    let clear = desk_scene::config::rgb_to_argb(config.render.clear_color);
    let covered = frame.data.iter().filter(|&&c| c != clear).count();
    assert!(covered > frame.data.len() / 10, "only {covered} pixels drawn");
}

#[test]
fn orthographic_frame_differs_from_perspective() {
    let config = small_config();
    let scene = untextured_scene();
    let perspective = app::render_still(&config, &scene, false);
    let orthographic = app::render_still(&config, &scene, true);
    assert_ne!(perspective.data, orthographic.data);

    let clear = desk_scene::config::rgb_to_argb(config.render.clear_color);
    assert!(orthographic.data.iter().any(|&c| c != clear));
}

#[test]
fn ssaa_keeps_output_size() {
    let mut config = small_config();
    config.render.ssaa = 2;
    let frame = app::render_still(&config, &untextured_scene(), false);
    assert_eq!((frame.width, frame.height), (160, 120));
}

#[test]
fn snapshot_writes_png() {
    let dir = std::env::temp_dir().join(format!("desk-scene-snapshot-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let config_path = dir.join("config.json");
    std::fs::write(
        &config_path,
        r#"{ "window": { "width": 64, "height": 48 }, "textures": { "dir": "missing" } }"#,
    )
    .unwrap();
    let output = dir.join("frame.png");

    app::run(Invocation::Snapshot {
        output: output.clone(),
        config: Some(config_path),
        orthographic: true,
    })
    .unwrap();

    let img = image::open(&output).unwrap();
    assert_eq!((img.width(), img.height()), (64, 48));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn broken_config_is_reported() {
    let dir = std::env::temp_dir().join(format!("desk-scene-badcfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let config_path = dir.join("config.json");
    std::fs::write(&config_path, "{ not json").unwrap();

    let err = app::run(Invocation::Snapshot {
        output: dir.join("never.png"),
        config: Some(config_path),
        orthographic: false,
    })
    .unwrap_err();
    assert!(matches!(err, desk_scene::Error::ConfigParse { .. }));
    std::fs::remove_dir_all(&dir).ok();
}
