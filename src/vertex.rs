use cgmath::{InnerSpace, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4, Zero};

/// Model-space vertex as produced by the shape generators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredVertex {
    pub pos: Vec3<f32>,
    pub color: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
}

impl ColoredVertex {
    pub fn new(pos: Vec3<f32>, normal: Vec3<f32>, uv: Vec2<f32>) -> Self {
        Self {
            pos,
            color: Vec3::new(1.0, 1.0, 1.0),
            normal,
            uv,
        }
    }
}

impl Default for ColoredVertex {
    fn default() -> Self {
        ColoredVertex {
            pos: Vec3::zero(),
            color: Vec3::new(1.0, 1.0, 1.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
            uv: Vec2::zero(),
        }
    }
}

/// Output of the vertex stage.
#[derive(Debug, Clone, Copy)]
pub struct ClipSpaceVertex {
    pub position: Vec4<f32>,
    pub world_pos: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
    pub color: Vec3<f32>,
}

impl ClipSpaceVertex {
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position + (other.position - self.position) * t,
            world_pos: self.world_pos + (other.world_pos - self.world_pos) * t,
            normal: self.normal + (other.normal - self.normal) * t,
            uv: self.uv + (other.uv - self.uv) * t,
            color: self.color + (other.color - self.color) * t,
        }
    }
}

/// Screen-space point handed to the rasterizer. Attributes are stored
/// pre-divided by w so they can be interpolated perspective-correctly.
#[derive(Debug, Clone, Copy)]
pub struct RasterPoint {
    pub pos: Vec2<f32>,
    pub z: f32,
    pub inv_w: f32,
    pub world_pos: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
    pub color: Vec3<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct RasterTriangle {
    pub vertices: [RasterPoint; 3],
}

impl RasterTriangle {
    /// Twice the signed screen-space area. Screen y points down, so
    /// counter-clockwise triangles come out negative.
    pub fn signed_area(&self) -> f32 {
        let [a, b, c] = self.vertices.map(|v| v.pos);
        let (ab, ac) = (b - a, c - a);
        ab.x * ac.y - ab.y * ac.x
    }

    pub fn is_front_facing(&self) -> bool {
        self.signed_area() < 0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [ColoredVertex; 3],
    pub normal: Vec3<f32>,
}

impl Triangle {
    fn compute_normal(v0: &ColoredVertex, v1: &ColoredVertex, v2: &ColoredVertex) -> Vec3<f32> {
        let edge1 = v1.pos - v0.pos;
        let edge2 = v2.pos - v0.pos;
        let n = edge1.cross(edge2);
        if n.magnitude2() > f32::EPSILON * f32::EPSILON {
            n.normalize()
        } else {
            // degenerate (e.g. the pole of a sphere); fall back to the vertex normals
            (v0.normal + v1.normal + v2.normal).normalize()
        }
    }

    pub fn new(v0: ColoredVertex, v1: ColoredVertex, v2: ColoredVertex) -> Self {
        let normal = Self::compute_normal(&v0, &v1, &v2);
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }

    pub fn get_center(&self) -> Vec3<f32> {
        (self.vertices[0].pos + self.vertices[1].pos + self.vertices[2].pos) / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32, z: f32) -> ColoredVertex {
        ColoredVertex::new(Vec3::new(x, y, z), Vec3::new(0.0, 0.0, 1.0), Vec2::zero())
    }

    #[test]
    fn ccw_triangle_faces_positive_z() {
        let tri = Triangle::new(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0));
        assert!((tri.normal.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_uses_vertex_normals() {
        let tri = Triangle::new(v(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        assert!((tri.normal.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn screen_winding_flips_with_y() {
        let point = |x: f32, y: f32| RasterPoint {
            pos: Vec2::new(x, y),
            z: 0.5,
            inv_w: 1.0,
            world_pos: Vec3::zero(),
            normal: Vec3::zero(),
            uv: Vec2::zero(),
            color: Vec3::zero(),
        };
        // counter-clockwise on a y-up screen
        let front = RasterTriangle {
            vertices: [point(0.0, 0.0), point(1.0, 0.0), point(0.0, -1.0)],
        };
        assert!(front.is_front_facing());
        let back = RasterTriangle {
            vertices: [point(0.0, 0.0), point(0.0, -1.0), point(1.0, 0.0)],
        };
        assert!(!back.is_front_facing());
    }

    #[test]
    fn center_is_average() {
        let tri = Triangle::new(v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(0.0, 3.0, 0.0));
        assert_eq!(tri.get_center(), Vec3::new(1.0, 1.0, 0.0));
    }
}
