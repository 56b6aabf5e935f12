pub mod clip;
pub mod fragment_shader;
pub mod light;
pub mod vertex_shader;

use cgmath::{Matrix, Matrix4 as Mat4, SquareMatrix, Vector2 as Vec2, Vector3 as Vec3};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::config::{AppConfig, rgb_to_argb};
use crate::framebuffer::FrameBuffer;
use crate::material::ObjectMaterial;
use crate::rasterizer;
use crate::scene::{DrawCommand, Scene, Surface};
use crate::texture::Texture;
use crate::vertex::{ClipSpaceVertex, RasterPoint, RasterTriangle, Triangle};

use self::clip::{Clipper, NearPlaneClipper};
use self::fragment_shader::{FragmentData, FragmentShader, NormalDebugShader, PhongShader, UnlitShader};
use self::light::PointLight;
use self::vertex_shader::{DefaultVertexShader, VertexShader, VertexShaderUniforms};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Viewport {
    /// NDC to screen space, y pointing down, depth remapped to [0, 1].
    fn transform(&self, clip_triangle: &[ClipSpaceVertex; 3]) -> RasterTriangle {
        let vertices = clip_triangle.map(|clip_v| {
            let inv_w = 1.0 / clip_v.position.w;
            let ndc = clip_v.position.truncate() * inv_w;

            let screen_x = (ndc.x + 1.0) * 0.5 * self.w as f32 + self.x as f32;
            let screen_y = self.h as f32 - (ndc.y + 1.0) * 0.5 * self.h as f32 + self.y as f32;

            RasterPoint {
                pos: Vec2::new(screen_x, screen_y),
                z: (ndc.z + 1.0) * 0.5,
                inv_w,
                world_pos: clip_v.world_pos * inv_w,
                normal: clip_v.normal * inv_w,
                uv: clip_v.uv * inv_w,
                color: clip_v.color * inv_w,
            }
        });
        RasterTriangle { vertices }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    Phong,
    Normal,
}

impl ShadingMode {
    pub fn from_name(name: &str) -> Self {
        match name {
            "phong" => ShadingMode::Phong,
            "normal" => ShadingMode::Normal,
            other => {
                log::warn!("unknown shader {other:?}, using phong");
                ShadingMode::Phong
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub clear_color: u32,
    pub cull_back_faces: bool,
    pub lighting: bool,
    pub shading: ShadingMode,
    pub ssaa: usize,
}

impl RenderOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            clear_color: rgb_to_argb(config.render.clear_color),
            cull_back_faces: config.render.cull_back_faces,
            lighting: config.render.lighting,
            shading: ShadingMode::from_name(&config.render.shader),
            ssaa: config.ssaa_factor(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Per-draw state shared by every fragment of one command.
pub struct SurfaceParams<'a> {
    pub material: &'a ObjectMaterial,
    pub texture: Option<&'a Texture>,
    pub uv_scale: Vec2<f32>,
    pub tint: Vec3<f32>,
    pub camera_pos: Vec3<f32>,
}

pub struct Renderer {
    pub camera: Camera,
    pub framebuffer: FrameBuffer,
    pub options: RenderOptions,
    viewport: Viewport,
    lights: Vec<PointLight>,
}

impl Renderer {
    /// `width` and `height` are the output size; the internal target is
    /// `ssaa` times larger on each axis.
    pub fn new(camera: Camera, width: usize, height: usize, options: RenderOptions) -> Self {
        let ssaa = options.ssaa.max(1);
        let (w, h) = (width * ssaa, height * ssaa);
        Self {
            camera,
            framebuffer: FrameBuffer::new(w, h),
            options,
            viewport: Viewport {
                x: 0,
                y: 0,
                w: w as i32,
                h: h as i32,
            },
            lights: Vec::new(),
        }
    }

    pub fn set_lights(&mut self, lights: Vec<PointLight>) {
        self.lights = lights;
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn output_size(&self) -> (usize, usize) {
        let ssaa = self.options.ssaa.max(1);
        (self.framebuffer.width / ssaa, self.framebuffer.height / ssaa)
    }

    /// Reallocates the targets for a new output size and updates the camera aspect.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == self.output_size() || width == 0 || height == 0 {
            return;
        }
        let ssaa = self.options.ssaa.max(1);
        let (w, h) = (width * ssaa, height * ssaa);
        self.framebuffer = FrameBuffer::new(w, h);
        self.viewport = Viewport {
            x: 0,
            y: 0,
            w: w as i32,
            h: h as i32,
        };
        self.camera.set_aspect(width as f32 / height as f32);
        log::debug!("resized to {width}x{height} (internal {w}x{h})");
    }

    pub fn fragment_shader(&self) -> Box<dyn FragmentShader> {
        match (self.options.shading, self.options.lighting) {
            (ShadingMode::Normal, _) => Box::new(NormalDebugShader),
            (ShadingMode::Phong, true) => Box::new(PhongShader {
                lights: self.lights.clone(),
            }),
            (ShadingMode::Phong, false) => Box::new(UnlitShader),
        }
    }

    /// Clears the targets and draws every command of `scene`.
    pub fn render_scene(&mut self, scene: &Scene) {
        self.framebuffer.clear(self.options.clear_color);
        let shader = self.fragment_shader();
        for command in &scene.commands {
            let mesh = scene.meshes.get(command.shape);
            let material = scene.materials.resolve(command.material);
            let (texture, uv_scale, tint) = match command.surface {
                Surface::Texture { tag, uv_scale } => {
                    let texture = scene.textures.find(tag);
                    if texture.is_none() {
                        log::trace!("{}: texture {tag:?} not loaded", command.label);
                    }
                    (texture, Vec2::from(uv_scale), Vec3::new(1.0, 1.0, 1.0))
                }
                Surface::Color([r, g, b, _]) => (None, Vec2::new(1.0, 1.0), Vec3::new(r, g, b)),
            };
            let surface = SurfaceParams {
                material: &material,
                texture,
                uv_scale,
                tint,
                camera_pos: self.camera.position(),
            };
            self.draw(mesh, command, &surface, &*shader);
        }
    }

    /// Downsampled copy of the frame at the output size.
    pub fn resolve(&self) -> FrameBuffer {
        self.framebuffer.ssaa(self.options.ssaa.max(1))
    }

    /// Runs one command through the pipeline without clearing.
    pub fn draw(&mut self, mesh: &[Triangle], command: &DrawCommand, surface: &SurfaceParams, shader: &dyn FragmentShader) {
        let model = command.transform.model_matrix();
        let Some(inverse) = model.invert() else {
            log::warn!("{}: singular model matrix, skipped", command.label);
            return;
        };
        let normal_matrix = inverse.transpose();
        let mvp_matrix: Mat4<f32> = self.camera.get_view_proj_mat() * model;

        let uniforms = VertexShaderUniforms {
            model_matrix: &model,
            mvp_matrix: &mvp_matrix,
            normal_matrix: &normal_matrix,
        };
        let vertex_shader = DefaultVertexShader;
        let clipper = NearPlaneClipper;
        let viewport = self.viewport;
        let cull = self.options.cull_back_faces;

        let raster_triangles: Vec<RasterTriangle> = mesh
            .par_iter()
            .flat_map_iter(|triangle| {
                let clip_space = vertex_shader.shade_triangle(triangle, &uniforms);
                clipper
                    .clip_triangle(&clip_space)
                    .into_iter()
                    .map(move |clipped| viewport.transform(&clipped))
                    .filter(move |raster| !cull || raster.is_front_facing())
            })
            .collect();

        for triangle in &raster_triangles {
            self.rasterize_triangle(triangle, surface, shader);
        }
    }

    fn rasterize_triangle(&mut self, triangle: &RasterTriangle, surface: &SurfaceParams, shader: &dyn FragmentShader) {
        let points = &triangle.vertices;
        let corners = [points[0].pos, points[1].pos, points[2].pos];
        let Some((min_x, min_y, max_x, max_y)) =
            rasterizer::get_box(&corners, self.framebuffer.width, self.framebuffer.height)
        else {
            return;
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !rasterizer::is_inside_triangle(&corners, &p) {
                    continue;
                }
                let Some(bary) = rasterizer::get_barycentric_coords(&corners, &p) else {
                    return;
                };
                let depth = rasterizer::interpolate_depth(points, bary);
                if !(0.0..=1.0).contains(&depth) || depth >= self.framebuffer.depth_at(x, y) {
                    continue;
                }

                let fragment = rasterizer::interpolate(points, bary);
                let data = FragmentData {
                    world_pos: fragment.world_pos,
                    normal: fragment.normal,
                    uv: Vec2::new(fragment.uv.x * surface.uv_scale.x, fragment.uv.y * surface.uv_scale.y),
                    color: Vec3::new(
                        fragment.color.x * surface.tint.x,
                        fragment.color.y * surface.tint.y,
                        fragment.color.z * surface.tint.z,
                    ),
                    texture: surface.texture,
                    material: surface.material,
                    camera_pos: surface.camera_pos,
                };
                let c = shader.shade(data);
                self.framebuffer.put_pixel(x, y, rgb_to_argb([c.x, c.y, c.z]), depth);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;
    use crate::shapes::ShapeKind;
    use crate::texture::TextureLibrary;
    use cgmath::Deg;

    fn camera(aspect: f32) -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Deg(-90.0), Deg(0.0), aspect, 0.1, 100.0)
    }

    fn single(command: DrawCommand) -> Scene {
        let mut scene = Scene::with_textures(TextureLibrary::new());
        scene.commands = vec![command];
        scene
    }

    fn red_box(position: [f32; 3]) -> DrawCommand {
        DrawCommand {
            label: "box",
            shape: ShapeKind::Box,
            transform: Transform::new([2.0, 2.0, 2.0], [0.0, 0.0, 0.0], position),
            material: "porcelaine",
            surface: Surface::rgb(1.0, 0.0, 0.0),
        }
    }

    fn unlit() -> RenderOptions {
        RenderOptions {
            lighting: false,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn box_in_front_covers_centre() {
        let mut renderer = Renderer::new(camera(1.0), 64, 64, unlit());
        renderer.render_scene(&single(red_box([0.0, 0.0, 0.0])));
        let fb = renderer.resolve();
        assert_eq!(fb.pixel(32, 32), 0xFFFF0000);
        assert_eq!(fb.pixel(0, 0), RenderOptions::default().clear_color);
    }

    #[test]
    fn box_behind_camera_draws_nothing() {
        let mut renderer = Renderer::new(camera(1.0), 32, 32, unlit());
        renderer.render_scene(&single(red_box([0.0, 0.0, 20.0])));
        let clear = renderer.options.clear_color;
        assert!(renderer.framebuffer.data.iter().all(|&c| c == clear));
    }

    #[test]
    fn box_straddling_near_plane_is_clipped_not_dropped() {
        let mut renderer = Renderer::new(camera(1.0), 32, 32, unlit());
        // camera sits inside the box; the far faces remain visible
        renderer.render_scene(&single(red_box([0.0, 0.0, 5.0])));
        assert_eq!(renderer.framebuffer.pixel(16, 16), 0xFFFF0000);
    }

    #[test]
    fn nearer_surface_wins() {
        let mut renderer = Renderer::new(camera(1.0), 32, 32, unlit());
        let mut scene = single(red_box([0.0, 0.0, -5.0]));
        let mut green = red_box([0.0, 0.0, 0.0]);
        green.surface = Surface::rgb(0.0, 1.0, 0.0);
        scene.commands.push(green);
        renderer.render_scene(&scene);
        assert_eq!(renderer.framebuffer.pixel(16, 16), 0xFF00FF00);
    }

    #[test]
    fn ssaa_resolves_to_output_size() {
        let options = RenderOptions { ssaa: 2, ..unlit() };
        let mut renderer = Renderer::new(camera(1.5), 30, 20, options);
        assert_eq!((renderer.framebuffer.width, renderer.framebuffer.height), (60, 40));
        renderer.render_scene(&single(red_box([0.0, 0.0, 0.0])));
        let fb = renderer.resolve();
        assert_eq!((fb.width, fb.height), (30, 20));
    }

    #[test]
    fn resize_updates_aspect() {
        let mut renderer = Renderer::new(camera(1.0), 40, 40, unlit());
        renderer.resize(80, 40);
        assert_eq!(renderer.output_size(), (80, 40));
        assert!((renderer.camera.get_frustum().aspect() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn culling_keeps_front_faces() {
        let options = RenderOptions {
            cull_back_faces: true,
            ..unlit()
        };
        let mut renderer = Renderer::new(camera(1.0), 32, 32, options);
        renderer.render_scene(&single(red_box([0.0, 0.0, 0.0])));
        assert_eq!(renderer.framebuffer.pixel(16, 16), 0xFFFF0000);
    }

    #[test]
    fn culling_hides_inside_of_box() {
        let options = RenderOptions {
            cull_back_faces: true,
            ..unlit()
        };
        let mut renderer = Renderer::new(camera(1.0), 32, 32, options);
        renderer.render_scene(&single(red_box([0.0, 0.0, 5.0])));
        let clear = renderer.options.clear_color;
        assert!(renderer.framebuffer.data.iter().all(|&c| c == clear));
    }

    #[test]
    fn lights_are_kept_and_unknown_shaders_fall_back() {
        let mut renderer = Renderer::new(camera(1.0), 8, 8, unlit());
        renderer.set_lights(vec![PointLight::new([0.0, 10.0, 0.0])]);
        assert_eq!(renderer.lights().len(), 1);
        assert_eq!(ShadingMode::from_name("toon"), ShadingMode::Phong);
    }
}
