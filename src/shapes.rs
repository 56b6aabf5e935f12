use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector2 as Vec2, Vector3 as Vec3};

use crate::vertex::{ColoredVertex, Triangle};

pub type Mesh = Vec<Triangle>;

const SEGMENTS: usize = 32;
const STACKS: usize = 16;
const TORUS_MAIN_RADIUS: f32 = 1.0;
const TORUS_TUBE_RADIUS: f32 = 0.2;
const TAPER_TOP_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Plane,
    Cylinder,
    Cone,
    Prism,
    Pyramid4,
    Sphere,
    TaperedCylinder,
    Torus,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Box,
        ShapeKind::Plane,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
        ShapeKind::Prism,
        ShapeKind::Pyramid4,
        ShapeKind::Sphere,
        ShapeKind::TaperedCylinder,
        ShapeKind::Torus,
    ];

    pub fn build(self) -> Mesh {
        match self {
            ShapeKind::Box => unit_box(),
            ShapeKind::Plane => plane(),
            ShapeKind::Cylinder => lathe(1.0, 1.0, SEGMENTS),
            ShapeKind::Cone => lathe(1.0, 0.0, SEGMENTS),
            ShapeKind::Prism => prism(),
            ShapeKind::Pyramid4 => pyramid4(),
            ShapeKind::Sphere => sphere(STACKS, SEGMENTS),
            ShapeKind::TaperedCylinder => lathe(1.0, TAPER_TOP_RADIUS, SEGMENTS),
            ShapeKind::Torus => torus(TORUS_MAIN_RADIUS, TORUS_TUBE_RADIUS, SEGMENTS, STACKS),
        }
    }
}

/// Every basic mesh the scene draws, generated once at start-up.
pub struct MeshLibrary {
    meshes: HashMap<ShapeKind, Mesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        let meshes: HashMap<ShapeKind, Mesh> =
            ShapeKind::ALL.iter().map(|kind| (*kind, kind.build())).collect();
        let total: usize = meshes.values().map(Vec::len).sum();
        log::debug!("generated {} meshes, {} triangles", meshes.len(), total);
        Self { meshes }
    }

    pub fn get(&self, kind: ShapeKind) -> &[Triangle] {
        self.meshes.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for MeshLibrary {
    fn default() -> Self {
        Self::new()
    }
}

fn vert(pos: Vec3<f32>, normal: Vec3<f32>, u: f32, v: f32) -> ColoredVertex {
    ColoredVertex::new(pos, normal, Vec2::new(u, v))
}

// a-b-c-d counter-clockwise seen from the side the face points to
fn push_quad(mesh: &mut Mesh, a: ColoredVertex, b: ColoredVertex, c: ColoredVertex, d: ColoredVertex) {
    mesh.push(Triangle::new(a, b, c));
    mesh.push(Triangle::new(a, c, d));
}

/// Flat rectangle centred on `center`; `u × v` must point along `normal`.
fn push_face(mesh: &mut Mesh, center: Vec3<f32>, normal: Vec3<f32>, u: Vec3<f32>, v: Vec3<f32>) {
    let a = center - u - v;
    let b = center + u - v;
    let c = center + u + v;
    let d = center - u + v;
    push_quad(
        mesh,
        vert(a, normal, 0.0, 0.0),
        vert(b, normal, 1.0, 0.0),
        vert(c, normal, 1.0, 1.0),
        vert(d, normal, 0.0, 1.0),
    );
}

fn unit_box() -> Mesh {
    let mut mesh = Mesh::with_capacity(12);
    let faces = [
        (Vec3::unit_x(), Vec3::new(0.0, 0.0, -1.0), Vec3::unit_y()),
        (-Vec3::unit_x(), Vec3::unit_z(), Vec3::unit_y()),
        (Vec3::unit_y(), Vec3::unit_x(), Vec3::new(0.0, 0.0, -1.0)),
        (-Vec3::unit_y(), Vec3::unit_x(), Vec3::unit_z()),
        (Vec3::unit_z(), Vec3::unit_x(), Vec3::unit_y()),
        (-Vec3::unit_z(), -Vec3::unit_x(), Vec3::unit_y()),
    ];
    for (normal, u, v) in faces {
        push_face(&mut mesh, normal * 0.5, normal, u * 0.5, v * 0.5);
    }
    mesh
}

fn plane() -> Mesh {
    let mut mesh = Mesh::with_capacity(2);
    push_face(
        &mut mesh,
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::unit_y(),
        Vec3::unit_x(),
        Vec3::new(0.0, 0.0, -1.0),
    );
    mesh
}

/// Surface of revolution around +Y from radius `r_bottom` at y = 0 to
/// `r_top` at y = 1, capped at both ends. Covers cylinder, cone and the
/// tapered cylinder.
fn lathe(r_bottom: f32, r_top: f32, segments: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let ring = |i: usize| {
        let theta = TAU * i as f32 / segments as f32;
        (theta.cos(), -theta.sin())
    };
    let slope = r_bottom - r_top;

    for i in 0..segments {
        let (x0, z0) = ring(i);
        let (x1, z1) = ring(i + 1);
        let u0 = i as f32 / segments as f32;
        let u1 = (i + 1) as f32 / segments as f32;
        let n0 = Vec3::new(x0, slope, z0).normalize();
        let n1 = Vec3::new(x1, slope, z1).normalize();

        let a = vert(Vec3::new(x0 * r_bottom, 0.0, z0 * r_bottom), n0, u0, 0.0);
        let b = vert(Vec3::new(x1 * r_bottom, 0.0, z1 * r_bottom), n1, u1, 0.0);
        let c = vert(Vec3::new(x1 * r_top, 1.0, z1 * r_top), n1, u1, 1.0);
        let d = vert(Vec3::new(x0 * r_top, 1.0, z0 * r_top), n0, u0, 1.0);
        if r_top > 0.0 {
            push_quad(&mut mesh, a, b, c, d);
        } else {
            mesh.push(Triangle::new(a, b, c));
        }

        let bottom_center = vert(Vec3::new(0.0, 0.0, 0.0), -Vec3::unit_y(), 0.5, 0.5);
        let cap = |x: f32, z: f32, r: f32, y: f32, n: Vec3<f32>| {
            vert(Vec3::new(x * r, y, z * r), n, 0.5 + 0.5 * x, 0.5 - 0.5 * z)
        };
        mesh.push(Triangle::new(
            bottom_center,
            cap(x1, z1, r_bottom, 0.0, -Vec3::unit_y()),
            cap(x0, z0, r_bottom, 0.0, -Vec3::unit_y()),
        ));
        if r_top > 0.0 {
            let top_center = vert(Vec3::new(0.0, 1.0, 0.0), Vec3::unit_y(), 0.5, 0.5);
            mesh.push(Triangle::new(
                top_center,
                cap(x0, z0, r_top, 1.0, Vec3::unit_y()),
                cap(x1, z1, r_top, 1.0, Vec3::unit_y()),
            ));
        }
    }
    mesh
}

fn sphere(stacks: usize, slices: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let point = |j: usize, i: usize| {
        let phi = PI * j as f32 / stacks as f32;
        let theta = TAU * i as f32 / slices as f32;
        let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), -phi.sin() * theta.sin());
        vert(n, n, i as f32 / slices as f32, 1.0 - j as f32 / stacks as f32)
    };

    for j in 0..stacks {
        for i in 0..slices {
            let a = point(j + 1, i);
            let b = point(j + 1, i + 1);
            let c = point(j, i + 1);
            let d = point(j, i);
            // the pole rows collapse one edge of the quad
            if j != 0 {
                mesh.push(Triangle::new(a, c, d));
            }
            if j != stacks - 1 {
                mesh.push(Triangle::new(a, b, c));
            }
        }
    }
    mesh
}

/// Ring in the XY plane; the scene rotates it 90° about X to lay it flat.
fn torus(main_radius: f32, tube_radius: f32, rings: usize, sides: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let point = |i: usize, j: usize| {
        let theta = TAU * i as f32 / rings as f32;
        let phi = TAU * j as f32 / sides as f32;
        let normal = Vec3::new(phi.cos() * theta.cos(), phi.cos() * theta.sin(), phi.sin());
        let center = Vec3::new(main_radius * theta.cos(), main_radius * theta.sin(), 0.0);
        vert(
            center + normal * tube_radius,
            normal,
            i as f32 / rings as f32,
            j as f32 / sides as f32,
        )
    };

    for i in 0..rings {
        for j in 0..sides {
            push_quad(&mut mesh, point(i, j), point(i + 1, j), point(i + 1, j + 1), point(i, j + 1));
        }
    }
    mesh
}

fn prism() -> Mesh {
    let mut mesh = Mesh::new();
    let profile = [
        Vec2::new(-0.5f32, -0.5),
        Vec2::new(0.5, -0.5),
        Vec2::new(0.0, 0.5),
    ];
    let front = Vec3::unit_z();
    let back = -Vec3::unit_z();
    let at = |p: Vec2<f32>, z: f32| Vec3::new(p.x, p.y, z);

    mesh.push(Triangle::new(
        vert(at(profile[0], 0.5), front, 0.0, 0.0),
        vert(at(profile[1], 0.5), front, 1.0, 0.0),
        vert(at(profile[2], 0.5), front, 0.5, 1.0),
    ));
    mesh.push(Triangle::new(
        vert(at(profile[0], -0.5), back, 1.0, 0.0),
        vert(at(profile[2], -0.5), back, 0.5, 1.0),
        vert(at(profile[1], -0.5), back, 0.0, 0.0),
    ));

    for i in 0..3 {
        let p0 = profile[i];
        let p1 = profile[(i + 1) % 3];
        let edge = p1 - p0;
        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize();
        push_quad(
            &mut mesh,
            vert(at(p0, -0.5), normal, 0.0, 0.0),
            vert(at(p1, -0.5), normal, 1.0, 0.0),
            vert(at(p1, 0.5), normal, 1.0, 1.0),
            vert(at(p0, 0.5), normal, 0.0, 1.0),
        );
    }
    mesh
}

fn pyramid4() -> Mesh {
    let mut mesh = Mesh::new();
    push_face(
        &mut mesh,
        Vec3::new(0.0, -0.5, 0.0),
        -Vec3::unit_y(),
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.5),
    );

    let apex = Vec3::new(0.0, 0.5, 0.0);
    let base = [
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(-0.5, -0.5, -0.5),
    ];
    for i in 0..4 {
        let p0 = base[i];
        let p1 = base[(i + 1) % 4];
        let normal = (p1 - p0).cross(apex - p0).normalize();
        mesh.push(Triangle::new(
            vert(p0, normal, 0.0, 0.0),
            vert(p1, normal, 1.0, 0.0),
            vert(apex, normal, 0.5, 1.0),
        ));
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(kind: ShapeKind, mesh: &[Triangle]) {
        for tri in mesh {
            for v in &tri.vertices {
                assert!((v.normal.magnitude() - 1.0).abs() < 1e-4, "{kind:?}: {:?}", v.normal);
            }
        }
    }

    // vertex normals and winding have to agree or lighting and culling disagree
    fn assert_winding_matches_normals(kind: ShapeKind, mesh: &[Triangle]) {
        for tri in mesh {
            let avg = tri.vertices.iter().fold(Vec3::new(0.0, 0.0, 0.0), |acc, v| acc + v.normal);
            assert!(tri.normal.dot(avg) > 0.0, "{kind:?} triangle at {:?}", tri.get_center());
        }
    }

    #[test]
    fn every_shape_is_generated() {
        let library = MeshLibrary::new();
        for kind in ShapeKind::ALL {
            let mesh = library.get(kind);
            assert!(!mesh.is_empty(), "{kind:?} is empty");
            assert_unit_normals(kind, mesh);
            assert_winding_matches_normals(kind, mesh);
        }
    }

    #[test]
    fn convex_shapes_face_outward() {
        let centers = [
            (ShapeKind::Box, Vec3::new(0.0, 0.0, 0.0)),
            (ShapeKind::Sphere, Vec3::new(0.0, 0.0, 0.0)),
            (ShapeKind::Cylinder, Vec3::new(0.0, 0.5, 0.0)),
            (ShapeKind::TaperedCylinder, Vec3::new(0.0, 0.5, 0.0)),
            (ShapeKind::Cone, Vec3::new(0.0, 0.3, 0.0)),
            (ShapeKind::Prism, Vec3::new(0.0, -0.1, 0.0)),
            (ShapeKind::Pyramid4, Vec3::new(0.0, -0.2, 0.0)),
        ];
        for (kind, center) in centers {
            for tri in kind.build() {
                let outward = tri.get_center() - center;
                assert!(tri.normal.dot(outward) > 0.0, "{kind:?} at {:?}", tri.get_center());
            }
        }
    }

    #[test]
    fn box_is_unit_sized() {
        let mesh = ShapeKind::Box.build();
        assert_eq!(mesh.len(), 12);
        for tri in &mesh {
            for v in &tri.vertices {
                assert!(v.pos.x.abs() <= 0.5 + 1e-6);
                assert!(v.pos.y.abs() <= 0.5 + 1e-6);
                assert!(v.pos.z.abs() <= 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn plane_faces_up_and_spans_two_units() {
        let mesh = ShapeKind::Plane.build();
        assert_eq!(mesh.len(), 2);
        for tri in &mesh {
            assert!((tri.normal.y - 1.0).abs() < 1e-6);
            for v in &tri.vertices {
                assert_eq!(v.pos.y, 0.0);
                assert!((v.pos.x.abs() - 1.0).abs() < 1e-6);
                assert!((v.pos.z.abs() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn cylinder_spans_zero_to_one() {
        let mesh = ShapeKind::Cylinder.build();
        let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
        for v in mesh.iter().flat_map(|t| t.vertices.iter()) {
            min_y = min_y.min(v.pos.y);
            max_y = max_y.max(v.pos.y);
            let r = (v.pos.x * v.pos.x + v.pos.z * v.pos.z).sqrt();
            assert!(r <= 1.0 + 1e-5);
        }
        assert_eq!(min_y, 0.0);
        assert_eq!(max_y, 1.0);
    }

    #[test]
    fn tapered_cylinder_narrows_to_half() {
        let mesh = ShapeKind::TaperedCylinder.build();
        for v in mesh.iter().flat_map(|t| t.vertices.iter()).filter(|v| v.pos.y == 1.0) {
            let r = (v.pos.x * v.pos.x + v.pos.z * v.pos.z).sqrt();
            assert!(r <= TAPER_TOP_RADIUS + 1e-5);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        for v in ShapeKind::Sphere.build().iter().flat_map(|t| t.vertices.iter()) {
            assert!((v.pos.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn torus_lies_in_xy_plane() {
        for tri in ShapeKind::Torus.build() {
            for v in &tri.vertices {
                assert!(v.pos.z.abs() <= TORUS_TUBE_RADIUS + 1e-5);
                let ring = (v.pos.x * v.pos.x + v.pos.y * v.pos.y).sqrt();
                assert!((ring - TORUS_MAIN_RADIUS).abs() <= TORUS_TUBE_RADIUS + 1e-5);
            }
        }
    }
}
