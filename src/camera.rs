use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

const DEFAULT_UP: Vec3 = Vec3::Y;

/// Pixel dimensions of the surface the scene is presented on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0 {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }

    /// Converts a pixel position (origin top-left) into normalized device coordinates.
    pub fn to_ndc(&self, screen: Vec2) -> Option<Vec2> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x = (screen.x / self.width as f32) * 2.0 - 1.0;
        let y = -(screen.y / self.height as f32) * 2.0 + 1.0;
        Some(Vec2::new(x, y))
    }
}

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { position, target, up: DEFAULT_UP, fov_y_radians, near, far }
    }

    /// Unit view direction; falls back to -Z when position and target coincide.
    pub fn forward(&self) -> Vec3 {
        let dir = (self.target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            Vec3::NEG_Z
        } else {
            dir
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self, viewport: Viewport) -> Mat4 {
        self.projection_matrix(viewport.aspect()) * self.view_matrix()
    }

    /// World-space ray from the camera through a point given in normalized device coordinates.
    pub fn ndc_ray(&self, ndc: Vec2, viewport: Viewport) -> Option<(Vec3, Vec3)> {
        let clip = Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let inv_view_proj = self.view_projection(viewport).inverse();
        let world = inv_view_proj * clip;
        if world.w.abs() < f32::EPSILON {
            return None;
        }
        let dir = ((world.truncate() / world.w) - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        Some((self.position, dir))
    }

    /// Projects a world point to normalized device coordinates; `None` when it sits behind the camera.
    pub fn project_ndc(&self, point: Vec3, viewport: Viewport) -> Option<Vec2> {
        let clip = self.view_projection(viewport) * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(ndc.x, ndc.y))
    }
}

/// Orbit controller storing yaw/pitch around a target, with distance clamps.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw_radians: f32,
    pub pitch_radians: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3, radius: f32, min_radius: f32, max_radius: f32) -> Self {
        let min_radius = min_radius.max(0.01);
        let max_radius = max_radius.max(min_radius);
        Self {
            target,
            radius: radius.clamp(min_radius, max_radius),
            yaw_radians: 0.0,
            pitch_radians: 0.0,
            min_radius,
            max_radius,
        }
    }

    /// Recovers yaw/pitch/radius from an explicit eye position.
    pub fn from_position(position: Vec3, target: Vec3, min_radius: f32, max_radius: f32) -> Self {
        let offset = position - target;
        let mut orbit = Self::new(target, offset.length(), min_radius, max_radius);
        if offset.length_squared() > f32::EPSILON {
            let distance = offset.length();
            orbit.yaw_radians = offset.x.atan2(offset.z);
            orbit.pitch_radians = (-offset.y / distance).clamp(-1.0, 1.0).asin();
        }
        orbit
    }

    pub fn eye(&self) -> Vec3 {
        let rotation = Quat::from_euler(glam::EulerRot::YXZ, self.yaw_radians, self.pitch_radians, 0.0);
        self.target + rotation * Vec3::new(0.0, 0.0, self.radius)
    }

    pub fn apply_to(&self, camera: &mut Camera3D) {
        camera.position = self.eye();
        camera.target = self.target;
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw_radians = crate::wrap_angle(self.yaw_radians + delta.x);
        self.pitch_radians = (self.pitch_radians + delta.y)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = (self.radius * factor.max(0.0)).clamp(self.min_radius, self.max_radius);
    }
}
