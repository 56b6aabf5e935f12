use cgmath::{Deg, InnerSpace, Matrix4 as Mat4, Point3, Vector3 as Vec3};

use crate::config::AppConfig;

pub const YAW: f32 = -90.0;
pub const PITCH: f32 = 0.0;
pub const SPEED: f32 = 2.5;
pub const SENSITIVITY: f32 = 0.1;
pub const ZOOM: f32 = 45.0;

pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 50.0;
pub const SCROLL_SPEED_STEP: f32 = 0.5;

pub const MIN_FOVY: f32 = 1.0;
pub const MAX_FOVY: f32 = 179.0;
pub const MIN_NEAR: f32 = 1e-4;
pub const MIN_DEPTH_GAP: f32 = 1e-3;
pub const MIN_HALF_HEIGHT: f32 = 1e-3;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;
pub const DEFAULT_HALF_HEIGHT: f32 = 10.0;

// fixed skew that turns the plain ortho box into the tilted desk view
pub const ORTHO_TILT_DEG: f32 = 52.5;
pub const ORTHO_X_CORRECTION: f32 = 0.77;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective { fovy: Deg<f32> },
    Orthographic { half_height: f32 },
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

fn sanitize_fovy(fovy: Deg<f32>) -> Deg<f32> {
    if fovy.0.is_finite() {
        Deg(fovy.0.clamp(MIN_FOVY, MAX_FOVY))
    } else {
        Deg(ZOOM)
    }
}

/// Returns `(near, far)` with `far > near > 0`.
fn sanitize_depth_range(near: f32, far: f32) -> (f32, f32) {
    let near = if near.is_finite() { near.max(MIN_NEAR) } else { DEFAULT_NEAR };
    let min_far = near + MIN_DEPTH_GAP.max(near * MIN_DEPTH_GAP);
    let far = if far.is_finite() { far.max(min_far) } else { DEFAULT_FAR.max(min_far) };
    (near, far)
}

fn sanitize_half_height(half_height: f32) -> f32 {
    if half_height.is_finite() {
        half_height.max(MIN_HALF_HEIGHT)
    } else {
        DEFAULT_HALF_HEIGHT
    }
}

#[derive(Debug, Clone)]
pub struct Frustum {
    projection: Projection,
    near: f32,
    aspect: f32,
    far: f32,
    mat: Mat4<f32>,
}

impl Frustum {
    #[rustfmt::skip]
    pub fn perspective(fovy: Deg<f32>, aspect: f32, near: f32, far: f32) -> Self {
        let aspect = sanitize_aspect(aspect);
        let fovy = sanitize_fovy(fovy);
        let (near, far) = sanitize_depth_range(near, far);
        let tan_half_fovy = (fovy.0.to_radians() / 2.0).tan();
        let a = 1.0 / (aspect * tan_half_fovy);
        let b = 1.0 / tan_half_fovy;
        let c = -(far + near) / (far - near);
        let d = -2.0 * far * near / (far - near);

        let mat = Mat4::new(
            a,    0.0,   0.0,   0.0,
            0.0,  b,     0.0,   0.0,
            0.0,  0.0,   c,    -1.0,
            0.0,  0.0,   d,     0.0,
        );

        Self {
            projection: Projection::Perspective { fovy },
            near,
            aspect,
            far,
            mat,
        }
    }

    /// Ortho box skewed into a pseudo-isometric view: `scale * rotate * ortho`.
    pub fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        let aspect = sanitize_aspect(aspect);
        let half_height = sanitize_half_height(half_height);
        let (near, far) = sanitize_depth_range(near, far);
        let ortho = cgmath::ortho(
            -aspect * half_height,
            aspect * half_height,
            -half_height,
            half_height,
            near,
            far,
        );
        let tilt = Deg(ORTHO_TILT_DEG);
        let rotation = Mat4::from_angle_x(tilt);
        let scaling = Mat4::from_nonuniform_scale(
            ORTHO_X_CORRECTION,
            1.0 / ORTHO_TILT_DEG.to_radians().sin(),
            1.0,
        );

        Self {
            projection: Projection::Orthographic { half_height },
            near,
            aspect,
            far,
            mat: scaling * rotation * ortho,
        }
    }

    pub fn with_aspect(&self, aspect: f32) -> Self {
        match self.projection {
            Projection::Perspective { fovy } => Self::perspective(fovy, aspect, self.near, self.far),
            Projection::Orthographic { half_height } => {
                Self::orthographic(half_height, aspect, self.near, self.far)
            }
        }
    }

    pub fn get_mat(&self) -> &Mat4<f32> {
        &self.mat
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }
}

/// Fly camera driven by mouse look, scroll speed and WASDQE movement.
#[derive(Debug, Clone)]
pub struct Camera {
    frustum: Frustum,
    pub(crate) position: Vec3<f32>,
    front: Vec3<f32>,
    up: Vec3<f32>,
    right: Vec3<f32>,
    world_up: Vec3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    movement_speed: f32,
    mouse_sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3<f32>, yaw: Deg<f32>, pitch: Deg<f32>, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            frustum: Frustum::perspective(Deg(ZOOM), aspect, near, far),
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::unit_y(),
            right: Vec3::unit_x(),
            world_up: Vec3::unit_y(),
            yaw,
            pitch: Deg(pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT)),
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
        };
        camera.update_camera_vectors();
        camera
    }

    /// Builds a camera facing `front`, deriving yaw and pitch from it so the
    /// first mouse movement continues from this orientation.
    pub fn looking_along(position: Vec3<f32>, front: Vec3<f32>, aspect: f32, near: f32, far: f32) -> Self {
        let (yaw, pitch) = if front.magnitude2() > f32::EPSILON {
            let f = front.normalize();
            (
                Deg(f.z.atan2(f.x).to_degrees()),
                Deg(f.y.clamp(-1.0, 1.0).asin().to_degrees()),
            )
        } else {
            (Deg(YAW), Deg(PITCH))
        };
        Self::new(position, yaw, pitch, aspect, near, far)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let cam = &config.camera;
        let lens = &config.projection;
        let mut camera = Self::looking_along(
            cam.position.into(),
            cam.front.into(),
            config.aspect(),
            lens.near,
            lens.far,
        );
        camera.movement_speed = cam.speed.clamp(MIN_SPEED, MAX_SPEED);
        camera.mouse_sensitivity = cam.sensitivity;
        if lens.start_orthographic {
            camera.set_orthographic(lens.ortho_half_height, config.aspect(), lens.near, lens.far);
        } else {
            camera.set_perspective(lens.fovy, config.aspect(), lens.near, lens.far);
        }
        camera
    }

    fn update_camera_vectors(&mut self) {
        let yaw = self.yaw.0.to_radians();
        let pitch = self.pitch.0.to_radians();
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        if !x_offset.is_finite() || !y_offset.is_finite() {
            return;
        }
        self.yaw += Deg(x_offset * self.mouse_sensitivity);
        self.pitch = Deg((self.pitch.0 + y_offset * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT));
        self.update_camera_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        if !y_offset.is_finite() {
            return;
        }
        self.movement_speed =
            (self.movement_speed + y_offset * SCROLL_SPEED_STEP).clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let dt = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    pub fn get_view_mat(&self) -> Mat4<f32> {
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);
        Mat4::look_at_rh(eye, eye + self.front, self.up)
    }

    pub fn set_perspective(&mut self, fovy_deg: f32, aspect: f32, near: f32, far: f32) {
        self.frustum = Frustum::perspective(Deg(fovy_deg), aspect, near, far);
    }

    pub fn set_orthographic(&mut self, half_height: f32, aspect: f32, near: f32, far: f32) {
        self.frustum = Frustum::orthographic(half_height, aspect, near, far);
    }

    /// Rebuilds the active projection for a new viewport shape.
    pub fn set_aspect(&mut self, aspect: f32) {
        if (sanitize_aspect(aspect) - self.frustum.aspect()).abs() > f32::EPSILON {
            self.frustum = self.frustum.with_aspect(aspect);
        }
    }

    pub fn get_frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn get_proj_mat(&self) -> &Mat4<f32> {
        self.frustum.get_mat()
    }

    pub fn get_view_proj_mat(&self) -> Mat4<f32> {
        self.frustum.get_mat() * self.get_view_mat()
    }

    pub fn is_orthographic(&self) -> bool {
        self.frustum.is_orthographic()
    }

    pub fn position(&self) -> Vec3<f32> {
        self.position
    }

    pub fn front(&self) -> Vec3<f32> {
        self.front
    }

    pub fn up(&self) -> Vec3<f32> {
        self.up
    }

    pub fn right(&self) -> Vec3<f32> {
        self.right
    }

    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    pub fn speed(&self) -> f32 {
        self.movement_speed
    }

    /// Field of view of the perspective lens, `None` while orthographic.
    pub fn zoom(&self) -> Option<Deg<f32>> {
        match self.frustum.projection() {
            Projection::Perspective { fovy } => Some(fovy),
            Projection::Orthographic { .. } => None,
        }
    }
}
