use crate::animation::{Pose, Transition};
use crate::camera::{Camera3D, OrbitCamera, Viewport};
use crate::config::SceneConfig;
use crate::events::CursorIcon;
use crate::layout::CellCoord;
use crate::textures::TextureInfo;
use bevy_ecs::prelude::*;
use glam::{EulerRot, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------- Components ----------
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}
impl Default for Transform3D {
    fn default() -> Self {
        Self { translation: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}
impl Transform3D {
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Default::default() }
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Opacity(pub f32);

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visible(pub bool);

/// Half extents of an entity's local box, used for ray picking.
#[derive(Component, Clone, Copy, Debug)]
pub struct PickBounds {
    pub half: Vec3,
}

#[derive(Component, Clone, Debug)]
pub struct GridCell {
    pub coord: CellCoord,
    pub label: String,
    pub hero: bool,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct LabelSprite {
    pub translation: Vec3,
    pub size: Vec2,
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureSlot {
    Pending,
    Loaded(TextureInfo),
    Placeholder,
}

/// Pending collection of one entity: waits for its stagger slot, then captures the live pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollectPlan {
    pub starts_at: f32,
    pub target: Vec3,
    pub end_scale: Vec3,
    pub transition: Option<Transition>,
}

impl CollectPlan {
    pub fn new(starts_at: f32, target: Vec3, end_scale: Vec3) -> Self {
        Self { starts_at, target, end_scale, transition: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhotoPhase {
    Idle { launch_at: f32 },
    FlyingIn(Transition),
    Active,
    Selecting(Transition),
    Selected,
    Deselecting(Transition),
    Collecting(CollectPlan),
}

impl PhotoPhase {
    pub fn name(&self) -> &'static str {
        match self {
            PhotoPhase::Idle { .. } => "idle",
            PhotoPhase::FlyingIn(_) => "flying_in",
            PhotoPhase::Active => "active",
            PhotoPhase::Selecting(_) => "selecting",
            PhotoPhase::Selected => "selected",
            PhotoPhase::Deselecting(_) => "deselecting",
            PhotoPhase::Collecting(_) => "collecting",
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, PhotoPhase::Selecting(_) | PhotoPhase::Selected)
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self,
            PhotoPhase::Idle { .. }
                | PhotoPhase::FlyingIn(_)
                | PhotoPhase::Selecting(_)
                | PhotoPhase::Deselecting(_)
                | PhotoPhase::Collecting(_)
        )
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self, PhotoPhase::Collecting(_))
    }

    pub fn is_pickable(&self) -> bool {
        !matches!(self, PhotoPhase::Idle { .. } | PhotoPhase::Collecting(_))
    }

    /// Fly-in still pending or running.
    pub fn is_arriving(&self) -> bool {
        matches!(self, PhotoPhase::Idle { .. } | PhotoPhase::FlyingIn(_))
    }
}

#[derive(Component, Clone, Debug)]
pub struct Photo {
    pub index: usize,
    pub name: String,
    pub source: String,
    pub origin: Vec3,
    pub home: Vec3,
    pub base_size: f32,
    pub phase: PhotoPhase,
    pub texture: TextureSlot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleShape {
    Sphere,
    Octahedron,
    Shard,
}

impl ParticleShape {
    pub const ALL: [ParticleShape; 3] = [ParticleShape::Sphere, ParticleShape::Octahedron, ParticleShape::Shard];

    /// Local half extents for a shape of nominal `size`.
    pub fn half_extents(self, size: f32) -> Vec3 {
        match self {
            ParticleShape::Sphere | ParticleShape::Octahedron => Vec3::splat(size),
            ParticleShape::Shard => Vec3::new(size, size * 0.7, size * 0.8) * 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JewelColor {
    pub name: &'static str,
    pub hex: u32,
    pub metallic: bool,
}

impl JewelColor {
    pub fn rgb(&self) -> Vec3 {
        Vec3::new(
            ((self.hex >> 16) & 0xff) as f32 / 255.0,
            ((self.hex >> 8) & 0xff) as f32 / 255.0,
            (self.hex & 0xff) as f32 / 255.0,
        )
    }
}

pub const JEWEL_PALETTE: [JewelColor; 8] = [
    JewelColor { name: "gold", hex: 0xffd700, metallic: true },
    JewelColor { name: "metallic_red", hex: 0xff6b6b, metallic: true },
    JewelColor { name: "metallic_green", hex: 0x4caf50, metallic: true },
    JewelColor { name: "silver", hex: 0xc0c0c0, metallic: true },
    JewelColor { name: "crimson", hex: 0xff1744, metallic: false },
    JewelColor { name: "amber", hex: 0xffc107, metallic: false },
    JewelColor { name: "purple", hex: 0x9c27b0, metallic: false },
    JewelColor { name: "cyan", hex: 0x00bcd4, metallic: false },
];

#[derive(Component, Clone, Copy, Debug)]
pub struct Particle {
    pub index: usize,
    pub shape: ParticleShape,
    pub color: JewelColor,
    pub size: f32,
    pub reference: Vec3,
}

/// Free spin plus floating drift, both in per-second units.
#[derive(Component, Clone, Copy, Debug)]
pub struct ParticleMotion {
    pub angles: Vec3,
    pub spin: Vec3,
    pub drift: Vec3,
}

impl ParticleMotion {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.angles.x, self.angles.y, self.angles.z)
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Sparkle {
    pub phase: f32,
    pub speed: f32,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct ParticleSurface {
    pub metallic: bool,
    pub base_emissive: f32,
    pub base_reflectivity: f32,
    pub emissive_intensity: f32,
    pub reflectivity: f32,
    pub roughness: f32,
}

impl ParticleSurface {
    pub fn for_color(color: &JewelColor) -> Self {
        if color.metallic {
            Self {
                metallic: true,
                base_emissive: 0.3,
                base_reflectivity: 4.0,
                emissive_intensity: 0.3,
                reflectivity: 4.0,
                roughness: 0.05,
            }
        } else {
            Self {
                metallic: false,
                base_emissive: 0.4,
                base_reflectivity: 2.0,
                emissive_intensity: 0.4,
                reflectivity: 2.0,
                roughness: 0.1,
            }
        }
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum ParticlePhase {
    Floating,
    Collecting(CollectPlan),
}

// ---------- Resources ----------
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct SceneClock {
    pub elapsed: f32,
    pub delta: f32,
}

impl SceneClock {
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.delta = dt;
        self.elapsed += dt;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollectionWindow {
    pub finishes_at: f32,
    pub reveal: Option<String>,
}

#[derive(Resource, Clone, Debug)]
pub struct SceneState {
    pub box_open: bool,
    pub photos_animating: bool,
    pub selected: Option<Entity>,
    pub anchor: Vec3,
    pub cursor: CursorIcon,
    pub collection: Option<CollectionWindow>,
}

impl SceneState {
    pub fn new(anchor: Vec3) -> Self {
        Self {
            box_open: false,
            photos_animating: false,
            selected: None,
            anchor,
            cursor: CursorIcon::Pointer,
            collection: None,
        }
    }
}

#[derive(Resource, Clone, Debug)]
pub struct ViewCamera {
    pub camera: Camera3D,
    pub orbit: OrbitCamera,
    pub viewport: Viewport,
}

impl ViewCamera {
    pub fn from_config(config: &SceneConfig) -> Self {
        let cam = &config.camera;
        let camera =
            Camera3D::new(cam.position, cam.target, cam.fov_y_degrees.to_radians(), cam.near, cam.far);
        let orbit = OrbitCamera::from_position(cam.position, cam.target, cam.min_distance, cam.max_distance);
        Self { camera, orbit, viewport: Viewport::new(cam.viewport[0], cam.viewport[1]) }
    }

    pub fn sync_from_orbit(&mut self) {
        self.orbit.apply_to(&mut self.camera);
    }
}

#[derive(Resource, Clone, Debug)]
pub struct SceneSettings(pub SceneConfig);

#[derive(Resource)]
pub struct SceneRng(pub StdRng);

impl SceneRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

// ---------- Snapshots ----------
#[derive(Clone, Debug)]
pub struct PhotoInfo {
    pub entity: Entity,
    pub index: usize,
    pub name: String,
    pub source: String,
    pub phase: PhotoPhase,
    pub home: Vec3,
    pub pose: Pose,
    pub yaw: f32,
    pub texture: TextureSlot,
}

impl PhotoInfo {
    pub fn is_selected(&self) -> bool {
        self.phase.is_selected()
    }

    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }
}

#[derive(Clone, Debug)]
pub struct ParticleInfo {
    pub entity: Entity,
    pub shape: ParticleShape,
    /// Linear RGB in `[0, 1]`.
    pub color: Vec3,
    pub metallic: bool,
    pub half_extents: Vec3,
    pub translation: Vec3,
    pub reference: Vec3,
    pub scale: f32,
    pub opacity: f32,
    pub emissive_intensity: f32,
    pub reflectivity: f32,
    pub roughness: f32,
    pub collecting: bool,
}

#[derive(Clone, Debug)]
pub struct CellInfo {
    pub entity: Entity,
    pub label: String,
    pub translation: Vec3,
    pub visible: bool,
    pub label_visible: bool,
    pub label_translation: Vec3,
    pub hero: bool,
}
