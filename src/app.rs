use std::path::{Path, PathBuf};

use minifb::{KeyRepeat, MouseMode, Window, WindowOptions};

use crate::camera::Camera;
use crate::config::{AppConfig, ProjectionConfig};
use crate::controls::{Command, FrameClock, MouseTracker, command_for, movements};
use crate::error::{Error, Result};
use crate::framebuffer::FrameBuffer;
use crate::renderer::{RenderOptions, Renderer};
use crate::scene::Scene;

pub const USAGE: &str = "usage: desk-scene [config.json]\n       desk-scene --snapshot <out.png> [config.json] [--ortho]";

#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Interactive {
        config: Option<PathBuf>,
    },
    Snapshot {
        output: PathBuf,
        config: Option<PathBuf>,
        orthographic: bool,
    },
}

/// Parses the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut output = None;
    let mut config = None;
    let mut orthographic = false;
    let mut snapshot = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--snapshot" => {
                snapshot = true;
                let path = iter
                    .next()
                    .ok_or_else(|| Error::Usage(format!("--snapshot needs an output path\n{USAGE}")))?;
                output = Some(PathBuf::from(path));
            }
            "--ortho" => orthographic = true,
            "-h" | "--help" => return Err(Error::Usage(USAGE.to_string())),
            flag if flag.starts_with("--") => {
                return Err(Error::Usage(format!("unknown option {flag}\n{USAGE}")));
            }
            path if config.is_none() => config = Some(PathBuf::from(path)),
            extra => return Err(Error::Usage(format!("unexpected argument {extra}\n{USAGE}"))),
        }
    }

    match (snapshot, output) {
        (true, Some(output)) => Ok(Invocation::Snapshot {
            output,
            config,
            orthographic,
        }),
        _ if orthographic => Err(Error::Usage(format!("--ortho only applies to --snapshot\n{USAGE}"))),
        _ => Ok(Invocation::Interactive { config }),
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path),
        None => Ok(AppConfig::default()),
    }
}

pub fn run(invocation: Invocation) -> Result<()> {
    match invocation {
        Invocation::Interactive { config } => run_interactive(&load_config(config.as_deref())?),
        Invocation::Snapshot {
            output,
            config,
            orthographic,
        } => {
            let config = load_config(config.as_deref())?;
            let scene = Scene::load(&config.textures.dir);
            render_still(&config, &scene, orthographic).save_to_image(&output)
        }
    }
}

/// Switches the camera lens, keeping the aspect ratio of the current output.
pub fn set_projection(renderer: &mut Renderer, lens: &ProjectionConfig, orthographic: bool) {
    let (w, h) = renderer.output_size();
    let aspect = w as f32 / h.max(1) as f32;
    if orthographic {
        renderer.camera.set_orthographic(lens.ortho_half_height, aspect, lens.near, lens.far);
    } else {
        renderer.camera.set_perspective(lens.fovy, aspect, lens.near, lens.far);
    }
    log::info!("{} projection", if orthographic { "orthographic" } else { "perspective" });
}

fn make_renderer(config: &AppConfig, scene: &Scene, width: usize, height: usize) -> Renderer {
    let mut camera = Camera::from_config(config);
    camera.set_aspect(width as f32 / height.max(1) as f32);
    let mut renderer = Renderer::new(camera, width, height, RenderOptions::from_config(config));
    renderer.set_lights(scene.lights.clone());
    renderer
}

/// One frame from the configured starting camera.
pub fn render_still(config: &AppConfig, scene: &Scene, orthographic: bool) -> FrameBuffer {
    let (width, height) = (config.window.width, config.window.height);
    let mut renderer = make_renderer(config, scene, width, height);
    if orthographic {
        set_projection(&mut renderer, &config.projection, true);
    }
    renderer.render_scene(scene);
    renderer.resolve()
}

pub fn run_interactive(config: &AppConfig) -> Result<()> {
    let scene = Scene::load(&config.textures.dir);
    let (width, height) = (config.window.width, config.window.height);

    let mut window = Window::new(
        &config.window.title,
        width,
        height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(config.window.target_fps);

    let mut renderer = make_renderer(config, &scene, width, height);
    let mut mouse = MouseTracker::new();
    let mut clock = FrameClock::new();
    let mut screenshots = 0usize;

    log::info!("WASD/QE move, mouse looks, scroll sets speed, P/O switch projection, L lighting, F12 screenshot, Esc quits");

    'frames: while window.is_open() {
        let delta_time = clock.tick();

        for key in window.get_keys_pressed(KeyRepeat::No) {
            match command_for(key) {
                Some(Command::Quit) => break 'frames,
                Some(Command::Perspective) => set_projection(&mut renderer, &config.projection, false),
                Some(Command::Orthographic) => set_projection(&mut renderer, &config.projection, true),
                Some(Command::ToggleLighting) => {
                    renderer.options.lighting = !renderer.options.lighting;
                    log::info!("lighting {}", if renderer.options.lighting { "on" } else { "off" });
                }
                Some(Command::Screenshot) => {
                    let path = PathBuf::from(format!("screenshot_{screenshots:03}.png"));
                    match renderer.resolve().save_to_image(&path) {
                        Ok(()) => screenshots += 1,
                        Err(e) => log::error!("screenshot failed: {e}"),
                    }
                }
                None => {}
            }
        }

        for movement in movements(&window.get_keys()) {
            renderer.camera.process_keyboard(movement, delta_time);
        }

        match window.get_mouse_pos(MouseMode::Pass) {
            Some((x, y)) => {
                if let Some((dx, dy)) = mouse.update(x, y) {
                    renderer.camera.process_mouse_movement(dx, dy);
                }
            }
            None => mouse.reset(),
        }
        if let Some((_, scroll_y)) = window.get_scroll_wheel() {
            renderer.camera.process_mouse_scroll(scroll_y);
        }

        let (w, h) = window.get_size();
        renderer.resize(w, h);
        renderer.render_scene(&scene);

        let frame = renderer.resolve();
        window.update_with_buffer(&frame.data, frame.width, frame.height)?;
        log::trace!("frame in {:.1} ms", delta_time * 1000.0);
    }

    log::info!("window closed");
    Ok(())
}
