use cgmath::{ElementWise, InnerSpace, Vector2 as Vec2, Vector3 as Vec3, Zero};

use crate::material::ObjectMaterial;
use crate::renderer::light::PointLight;
use crate::texture::Texture;

#[derive(Debug)]
pub struct FragmentData<'a> {
    pub world_pos: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
    /// Interpolated vertex colour already tinted by the surface colour.
    pub color: Vec3<f32>,
    pub texture: Option<&'a Texture>,
    pub material: &'a ObjectMaterial,
    pub camera_pos: Vec3<f32>,
}

impl FragmentData<'_> {
    pub fn base_color(&self) -> Vec3<f32> {
        match self.texture {
            Some(tex) => tex.sample(self.uv).mul_element_wise(self.color),
            None => self.color,
        }
    }
}

pub trait FragmentShader: Sync {
    /// Returns linear RGB in `0.0..=1.0`.
    fn shade(&self, data: FragmentData) -> Vec3<f32>;
}

fn clamp_color(c: Vec3<f32>) -> Vec3<f32> {
    Vec3::new(c.x.clamp(0.0, 1.0), c.y.clamp(0.0, 1.0), c.z.clamp(0.0, 1.0))
}

fn reflect(incident: Vec3<f32>, normal: Vec3<f32>) -> Vec3<f32> {
    incident - normal * 2.0 * normal.dot(incident)
}

/// Phong lighting summed over every point light.
pub struct PhongShader {
    pub lights: Vec<PointLight>,
}

impl FragmentShader for PhongShader {
    fn shade(&self, data: FragmentData) -> Vec3<f32> {
        let material = data.material;
        let normal = if data.normal.magnitude2() > 0.0 {
            data.normal.normalize()
        } else {
            data.normal
        };
        let to_eye = data.camera_pos - data.world_pos;
        let view_dir = if to_eye.magnitude2() > 0.0 { to_eye.normalize() } else { Vec3::zero() };

        let mut ambient = material.ambient_color * material.ambient_strength;
        let mut diffuse = Vec3::zero();
        let mut specular = Vec3::zero();

        for light in &self.lights {
            ambient += light.ambient;

            let to_light = light.position - data.world_pos;
            if to_light.magnitude2() == 0.0 {
                continue;
            }
            let light_dir = to_light.normalize();

            let diff = normal.dot(light_dir).max(0.0);
            diffuse += light.diffuse.mul_element_wise(material.diffuse_color) * diff;

            let reflect_dir = reflect(-light_dir, normal);
            let spec = view_dir.dot(reflect_dir).max(0.0).powf(light.focal_strength);
            specular += light.specular.mul_element_wise(material.specular_color)
                * (light.specular_intensity * spec * material.specular_weight());
        }

        clamp_color(data.base_color().mul_element_wise(ambient + diffuse + specular))
    }
}

/// Surface colour only; used when lighting is switched off.
pub struct UnlitShader;

impl FragmentShader for UnlitShader {
    fn shade(&self, data: FragmentData) -> Vec3<f32> {
        clamp_color(data.base_color())
    }
}

pub struct NormalDebugShader;

impl FragmentShader for NormalDebugShader {
    fn shade(&self, data: FragmentData) -> Vec3<f32> {
        clamp_color((data.normal + Vec3::new(1.0, 1.0, 1.0)) * 0.5)
    }
}
