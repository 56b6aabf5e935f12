use std::collections::HashMap;

use cgmath::Vector3 as Vec3;

/// Highest shininess among the presets; specular weight is shininess / this.
pub const MAX_SHININESS: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectMaterial {
    pub ambient_color: Vec3<f32>,
    pub ambient_strength: f32,
    pub diffuse_color: Vec3<f32>,
    pub specular_color: Vec3<f32>,
    pub shininess: f32,
}

impl Default for ObjectMaterial {
    fn default() -> Self {
        Self::with_shine(0.5, 16.0)
    }
}

impl ObjectMaterial {
    // the presets only differ in ambient strength and shininess
    fn with_shine(ambient_strength: f32, shininess: f32) -> Self {
        Self {
            ambient_color: Vec3::new(0.3, 0.3, 0.3),
            ambient_strength,
            diffuse_color: Vec3::new(0.8, 0.7, 0.2),
            specular_color: Vec3::new(0.5, 0.5, 0.5),
            shininess,
        }
    }

    pub fn shiny() -> Self {
        Self::with_shine(0.7, 50.0)
    }

    pub fn shinyish() -> Self {
        Self::with_shine(0.5, 25.0)
    }

    pub fn porcelaine() -> Self {
        Self::with_shine(0.5, 16.0)
    }

    pub fn dull() -> Self {
        Self::with_shine(0.6, 1.0)
    }

    /// Absorbs everything; used for the dark openings of the vase, jug and can.
    pub fn void() -> Self {
        Self {
            ambient_color: Vec3::new(0.0, 0.0, 0.0),
            ambient_strength: 0.0,
            diffuse_color: Vec3::new(0.0, 0.0, 0.0),
            specular_color: Vec3::new(0.0, 0.0, 0.0),
            shininess: 0.0,
        }
    }

    pub fn specular_weight(&self) -> f32 {
        (self.shininess / MAX_SHININESS).clamp(0.0, 1.0)
    }
}

pub struct MaterialLibrary {
    materials: HashMap<String, ObjectMaterial>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    pub fn with_scene_presets() -> Self {
        let mut library = Self::new();
        library.insert("shiny", ObjectMaterial::shiny());
        library.insert("shinyish", ObjectMaterial::shinyish());
        library.insert("porcelaine", ObjectMaterial::porcelaine());
        library.insert("dull", ObjectMaterial::dull());
        library.insert("void", ObjectMaterial::void());
        library
    }

    pub fn insert(&mut self, tag: &str, material: ObjectMaterial) {
        self.materials.insert(tag.to_string(), material);
    }

    pub fn find(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.get(tag)
    }

    /// Like `find`, but falls back to the default material.
    pub fn resolve(&self, tag: &str) -> ObjectMaterial {
        match self.find(tag) {
            Some(material) => *material,
            None => {
                log::warn!("no material tagged {tag:?}, using the default");
                ObjectMaterial::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::with_scene_presets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_registered() {
        let library = MaterialLibrary::with_scene_presets();
        assert_eq!(library.len(), 5);
        assert_eq!(library.find("shiny").unwrap().shininess, 50.0);
        assert_eq!(library.find("shinyish").unwrap().ambient_strength, 0.5);
        assert_eq!(library.find("dull").unwrap().ambient_strength, 0.6);
        assert_eq!(library.find("void").unwrap().specular_weight(), 0.0);
    }

    #[test]
    fn unknown_tag_resolves_to_default() {
        let library = MaterialLibrary::with_scene_presets();
        assert!(library.find("shinyMaterial").is_none());
        assert_eq!(library.resolve("shinyMaterial"), ObjectMaterial::default());
    }

    #[test]
    fn specular_weight_is_normalised() {
        assert_eq!(ObjectMaterial::shiny().specular_weight(), 1.0);
        assert!((ObjectMaterial::dull().specular_weight() - 0.02).abs() < 1e-6);
    }
}
