use crate::vertex::ClipSpaceVertex;

/// Smallest `w` a vertex may keep after clipping before the perspective divide.
pub const W_EPSILON: f32 = 1e-5;

pub trait Clipper {
    /// Takes one clip-space triangle and returns the zero or more triangles
    /// that survive.
    fn clip_triangle(&self, triangle: &[ClipSpaceVertex; 3]) -> Vec<[ClipSpaceVertex; 3]>;
}

/// Clips against the near plane (`z > -w`). With a perspective projection
/// this also keeps `w` positive; triangles left with `w <= ε` are dropped.
pub struct NearPlaneClipper;

impl NearPlaneClipper {
    fn distance(v: &ClipSpaceVertex) -> f32 {
        v.position.z + v.position.w
    }
}

impl Clipper for NearPlaneClipper {
    fn clip_triangle(&self, triangle: &[ClipSpaceVertex; 3]) -> Vec<[ClipSpaceVertex; 3]> {
        let d = triangle.map(|v| Self::distance(&v));
        let inside = d.iter().filter(|&&dist| dist >= 0.0).count();

        let triangles = match inside {
            0 => return Vec::new(),
            3 => vec![*triangle],
            _ => {
                // one edge pass of Sutherland-Hodgman; yields 3 or 4 vertices
                let mut polygon = Vec::with_capacity(4);
                for i in 0..3 {
                    let j = (i + 1) % 3;
                    let (cur, next) = (&triangle[i], &triangle[j]);
                    if d[i] >= 0.0 {
                        polygon.push(*cur);
                    }
                    if (d[i] >= 0.0) != (d[j] >= 0.0) {
                        let t = d[i] / (d[i] - d[j]);
                        polygon.push(cur.lerp(next, t));
                    }
                }
                (1..polygon.len() - 1)
                    .map(|k| [polygon[0], polygon[k], polygon[k + 1]])
                    .collect()
            }
        };

        triangles
            .into_iter()
            .filter(|tri| tri.iter().all(|v| v.position.w > W_EPSILON))
            .collect()
    }
}
