use cgmath::Vector3 as Vec3;

/// Point light with separate ambient, diffuse and specular colours. The
/// specular lobe exponent is `focal_strength`, scaled by `specular_intensity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3<f32>,
    pub ambient: Vec3<f32>,
    pub diffuse: Vec3<f32>,
    pub specular: Vec3<f32>,
    pub focal_strength: f32,
    pub specular_intensity: f32,
}

impl PointLight {
    pub fn new(position: [f32; 3]) -> Self {
        Self {
            position: position.into(),
            ambient: Vec3::new(0.0, 0.0, 0.0),
            diffuse: Vec3::new(0.0, 0.0, 0.0),
            specular: Vec3::new(0.0, 0.0, 0.0),
            focal_strength: 32.0,
            specular_intensity: 0.0,
        }
    }

    pub fn ambient(mut self, rgb: [f32; 3]) -> Self {
        self.ambient = rgb.into();
        self
    }

    pub fn diffuse(mut self, rgb: [f32; 3]) -> Self {
        self.diffuse = rgb.into();
        self
    }

    pub fn specular(mut self, rgb: [f32; 3]) -> Self {
        self.specular = rgb.into();
        self
    }

    pub fn focus(mut self, focal_strength: f32, specular_intensity: f32) -> Self {
        self.focal_strength = focal_strength;
        self.specular_intensity = specular_intensity;
        self
    }
}
