use crate::vertex::{ClipSpaceVertex, Triangle};
use cgmath::{InnerSpace, Matrix4 as Mat4};

pub struct VertexShaderUniforms<'a> {
    pub model_matrix: &'a Mat4<f32>,
    pub mvp_matrix: &'a Mat4<f32>,
    pub normal_matrix: &'a Mat4<f32>,
}

pub trait VertexShader: Sync {
    /// Model-space triangle in, clip-space triangle out.
    fn shade_triangle(&self, triangle: &Triangle, uniforms: &VertexShaderUniforms) -> [ClipSpaceVertex; 3];
}

pub struct DefaultVertexShader;

impl VertexShader for DefaultVertexShader {
    fn shade_triangle(&self, triangle: &Triangle, uniforms: &VertexShaderUniforms) -> [ClipSpaceVertex; 3] {
        triangle.vertices.map(|v| {
            let normal = (*uniforms.normal_matrix * v.normal.extend(0.0)).truncate();
            ClipSpaceVertex {
                position: *uniforms.mvp_matrix * v.pos.extend(1.0),
                world_pos: (*uniforms.model_matrix * v.pos.extend(1.0)).truncate(),
                normal: if normal.magnitude2() > 0.0 { normal.normalize() } else { normal },
                uv: v.uv,
                color: v.color,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::ColoredVertex;
    use cgmath::{Matrix, SquareMatrix, Vector2 as Vec2, Vector3 as Vec3};

    #[test]
    fn normals_follow_non_uniform_scale() {
        // a 45° face squashed along x should tilt its normal towards x
        let n = Vec3::new(1.0, 1.0, 0.0).normalize();
        let v = |x: f32, y: f32, z: f32| ColoredVertex::new(Vec3::new(x, y, z), n, Vec2::new(0.0, 0.0));
        let tri = Triangle::new(v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(0.0, 1.0, -1.0));

        let model = Mat4::from_nonuniform_scale(0.5, 1.0, 1.0);
        let normal_matrix = model.invert().unwrap().transpose();
        let mvp = Mat4::identity();
        let uniforms = VertexShaderUniforms {
            model_matrix: &model,
            mvp_matrix: &mvp,
            normal_matrix: &normal_matrix,
        };

        let out = DefaultVertexShader.shade_triangle(&tri, &uniforms);
        assert!((out[0].world_pos.x - 0.5).abs() < 1e-6);
        assert!((out[0].normal.magnitude() - 1.0).abs() < 1e-5);
        assert!(out[0].normal.x > out[0].normal.y);
        assert_eq!(out[0].position.w, 1.0);
    }
}
