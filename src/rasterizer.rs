use crate::vertex::RasterPoint;
use cgmath::{Vector2 as Vec2, Vector3 as Vec3, dot};

/// Attributes of one covered pixel after perspective-correct interpolation.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub depth: f32,
    pub world_pos: Vec3<f32>,
    pub normal: Vec3<f32>,
    pub uv: Vec2<f32>,
    pub color: Vec3<f32>,
}

/// Weights of `vertices[0..3]` at `p`, or `None` for a zero-area triangle.
pub fn get_barycentric_coords(
    vertices: &[Vec2<f32>; 3],
    p: &Vec2<f32>,
) -> Option<(f32, f32, f32)> {
    let v0 = vertices[1] - vertices[0];
    let v1 = vertices[2] - vertices[0];
    let v2 = *p - vertices[0];

    let d00 = dot(v0, v0);
    let d01 = dot(v0, v1);
    let d11 = dot(v1, v1);
    let d20 = dot(v2, v0);
    let d21 = dot(v2, v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < 1e-8 {
        return None;
    }

    let b1 = (d11 * d20 - d01 * d21) / denom;
    let b2 = (d00 * d21 - d01 * d20) / denom;
    Some((1.0 - b1 - b2, b1, b2))
}

/// Screen depth is affine in screen space, so it is interpolated linearly.
pub fn interpolate_depth(points: &[RasterPoint; 3], bary: (f32, f32, f32)) -> f32 {
    let (b0, b1, b2) = bary;
    points[0].z * b0 + points[1].z * b1 + points[2].z * b2
}

pub fn interpolate(points: &[RasterPoint; 3], bary: (f32, f32, f32)) -> Fragment {
    let (b0, b1, b2) = bary;
    let inv_w = points[0].inv_w * b0 + points[1].inv_w * b1 + points[2].inv_w * b2;
    let w = if inv_w.abs() > f32::EPSILON { 1.0 / inv_w } else { 1.0 };

    Fragment {
        depth: interpolate_depth(points, bary),
        world_pos: (points[0].world_pos * b0 + points[1].world_pos * b1 + points[2].world_pos * b2) * w,
        normal: (points[0].normal * b0 + points[1].normal * b1 + points[2].normal * b2) * w,
        uv: (points[0].uv * b0 + points[1].uv * b1 + points[2].uv * b2) * w,
        color: (points[0].color * b0 + points[1].color * b1 + points[2].color * b2) * w,
    }
}

/// Pixel bounds of the triangle clamped to a `width x height` target, or
/// `None` when it lies entirely outside.
pub fn get_box(vertices: &[Vec2<f32>; 3], width: usize, height: usize) -> Option<(usize, usize, usize, usize)> {
    if width == 0 || height == 0 {
        return None;
    }
    // f32::min/max drop a NaN operand, so reject before folding
    if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
        return None;
    }
    let mut min_x = vertices[0].x;
    let mut max_x = vertices[0].x;
    let mut min_y = vertices[0].y;
    let mut max_y = vertices[0].y;

    for v in vertices.iter().skip(1) {
        min_x = min_x.min(v.x);
        max_x = max_x.max(v.x);
        min_y = min_y.min(v.y);
        max_y = max_y.max(v.y);
    }

    if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
        return None;
    }

    Some((
        min_x.floor().max(0.0) as usize,
        min_y.floor().max(0.0) as usize,
        (max_x.ceil() as usize).min(width - 1),
        (max_y.ceil() as usize).min(height - 1),
    ))
}

/// Edge-function test; accepts either winding.
pub fn is_inside_triangle(vertices: &[Vec2<f32>; 3], p: &Vec2<f32>) -> bool {
    let v0 = vertices[1] - vertices[0];
    let v1 = vertices[2] - vertices[1];
    let v2 = vertices[0] - vertices[2];

    let p0 = *p - vertices[0];
    let p1 = *p - vertices[1];
    let p2 = *p - vertices[2];

    let cross0 = v0.x * p0.y - v0.y * p0.x;
    let cross1 = v1.x * p1.y - v1.y * p1.x;
    let cross2 = v2.x * p2.y - v2.y * p2.x;

    (cross0 >= 0.0 && cross1 >= 0.0 && cross2 >= 0.0)
        || (cross0 <= 0.0 && cross1 <= 0.0 && cross2 <= 0.0)
}
