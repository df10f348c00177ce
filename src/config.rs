use crate::layout::CellCoord;
use anyhow::{bail, Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_HERO_LABEL: &str = "B2-2";

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "GridConfig::default_spacing")]
    pub spacing: f32,
    #[serde(default = "GridConfig::default_cube_size")]
    pub cube_size: f32,
    #[serde(default = "GridConfig::default_hero_label")]
    pub hero_label: String,
    #[serde(default = "GridConfig::default_anchor")]
    pub anchor: Vec3,
    #[serde(default = "GridConfig::default_label_lift")]
    pub label_lift: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_position")]
    pub position: Vec3,
    #[serde(default = "CameraConfig::default_target")]
    pub target: Vec3,
    #[serde(default = "CameraConfig::default_fov_y_degrees")]
    pub fov_y_degrees: f32,
    #[serde(default = "CameraConfig::default_near")]
    pub near: f32,
    #[serde(default = "CameraConfig::default_far")]
    pub far: f32,
    #[serde(default = "CameraConfig::default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "CameraConfig::default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "CameraConfig::default_reset_position")]
    pub reset_position: Vec3,
    #[serde(default)]
    pub reset_target: Vec3,
    #[serde(default = "CameraConfig::default_viewport")]
    pub viewport: [u32; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticleConfig {
    #[serde(default = "ParticleConfig::default_count")]
    pub count: u32,
    #[serde(default)]
    pub center: Vec3,
    #[serde(default = "ParticleConfig::default_min_radius")]
    pub min_radius: f32,
    #[serde(default = "ParticleConfig::default_max_radius")]
    pub max_radius: f32,
    #[serde(default = "ParticleConfig::default_height_range")]
    pub height_range: f32,
    /// Distance from the reference point past which float drift reflects.
    #[serde(default = "ParticleConfig::default_float_radius")]
    pub float_radius: f32,
    #[serde(default = "ParticleConfig::default_float_height")]
    pub float_height: f32,
    /// Frame rate the per-frame motion constants were tuned for.
    #[serde(default = "ParticleConfig::default_reference_fps")]
    pub reference_fps: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoConfig {
    #[serde(default = "PhotoConfig::default_count")]
    pub count: u32,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default = "PhotoConfig::default_source_dir")]
    pub source_dir: String,
    #[serde(default = "PhotoConfig::default_ring_radius")]
    pub ring_radius: f32,
    #[serde(default)]
    pub ring_height: f32,
    #[serde(default = "PhotoConfig::default_height_variation")]
    pub height_variation: f32,
    #[serde(default = "PhotoConfig::default_base_size")]
    pub base_size: f32,
    #[serde(default = "PhotoConfig::default_size_variation")]
    pub size_variation: f32,
    #[serde(default = "PhotoConfig::default_spawn_stagger")]
    pub spawn_stagger: f32,
    #[serde(default = "PhotoConfig::default_fly_in_duration")]
    pub fly_in_duration: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "SelectionConfig::default_scale")]
    pub scale: f32,
    #[serde(default = "SelectionConfig::default_camera_distance")]
    pub camera_distance: f32,
    #[serde(default = "SelectionConfig::default_select_duration")]
    pub select_duration: f32,
    #[serde(default = "SelectionConfig::default_deselect_duration")]
    pub deselect_duration: f32,
    /// Camera distance at which a ring photo renders at scale 1.
    #[serde(default = "SelectionConfig::default_base_distance")]
    pub base_distance: f32,
    #[serde(default = "SelectionConfig::default_min_scale")]
    pub min_scale: f32,
    #[serde(default = "SelectionConfig::default_max_scale")]
    pub max_scale: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectConfig {
    #[serde(default = "CollectConfig::default_duration")]
    pub duration: f32,
    #[serde(default = "CollectConfig::default_photo_stagger")]
    pub photo_stagger: f32,
    #[serde(default = "CollectConfig::default_particle_stagger")]
    pub particle_stagger: f32,
    #[serde(default = "CollectConfig::default_grace_period")]
    pub grace_period: f32,
    #[serde(default = "CollectConfig::default_photo_end_scale")]
    pub photo_end_scale: f32,
    #[serde(default = "CollectConfig::default_particle_end_scale")]
    pub particle_end_scale: f32,
}

/// Cell revealed once the box is collected after accepting a given photo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RevealRule {
    pub photo_number: usize,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub particles: ParticleConfig,
    #[serde(default)]
    pub photos: PhotoConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default = "SceneConfig::default_reveal_rules")]
    pub reveal_rules: Vec<RevealRule>,
}

#[derive(Debug, Clone, Default)]
pub struct SceneConfigOverrides {
    pub photo_count: Option<u32>,
    pub particle_count: Option<u32>,
    pub seed: Option<u64>,
}

impl GridConfig {
    const fn default_spacing() -> f32 {
        2.5
    }

    const fn default_cube_size() -> f32 {
        1.0
    }

    fn default_hero_label() -> String {
        DEFAULT_HERO_LABEL.to_string()
    }

    const fn default_anchor() -> Vec3 {
        Vec3::new(0.0, -8.0, 0.0)
    }

    const fn default_label_lift() -> f32 {
        0.7
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: Self::default_spacing(),
            cube_size: Self::default_cube_size(),
            hero_label: Self::default_hero_label(),
            anchor: Self::default_anchor(),
            label_lift: Self::default_label_lift(),
        }
    }
}

impl CameraConfig {
    const fn default_position() -> Vec3 {
        Vec3::new(15.0, -2.0, 15.0)
    }

    const fn default_target() -> Vec3 {
        Vec3::new(0.0, -8.0, 0.0)
    }

    const fn default_fov_y_degrees() -> f32 {
        75.0
    }

    const fn default_near() -> f32 {
        0.1
    }

    const fn default_far() -> f32 {
        1000.0
    }

    const fn default_min_distance() -> f32 {
        3.0
    }

    const fn default_max_distance() -> f32 {
        30.0
    }

    const fn default_reset_position() -> Vec3 {
        Vec3::new(12.0, 12.0, 12.0)
    }

    const fn default_viewport() -> [u32; 2] {
        [1280, 720]
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Self::default_position(),
            target: Self::default_target(),
            fov_y_degrees: Self::default_fov_y_degrees(),
            near: Self::default_near(),
            far: Self::default_far(),
            min_distance: Self::default_min_distance(),
            max_distance: Self::default_max_distance(),
            reset_position: Self::default_reset_position(),
            reset_target: Vec3::ZERO,
            viewport: Self::default_viewport(),
        }
    }
}

impl ParticleConfig {
    const fn default_count() -> u32 {
        800
    }

    const fn default_min_radius() -> f32 {
        3.0
    }

    const fn default_max_radius() -> f32 {
        15.0
    }

    const fn default_height_range() -> f32 {
        7.0
    }

    const fn default_float_radius() -> f32 {
        12.0
    }

    const fn default_float_height() -> f32 {
        6.0
    }

    const fn default_reference_fps() -> f32 {
        60.0
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: Self::default_count(),
            center: Vec3::ZERO,
            min_radius: Self::default_min_radius(),
            max_radius: Self::default_max_radius(),
            height_range: Self::default_height_range(),
            float_radius: Self::default_float_radius(),
            float_height: Self::default_float_height(),
            reference_fps: Self::default_reference_fps(),
        }
    }
}

impl PhotoConfig {
    const fn default_count() -> u32 {
        9
    }

    fn default_source_dir() -> String {
        "photos".to_string()
    }

    const fn default_ring_radius() -> f32 {
        8.0
    }

    const fn default_height_variation() -> f32 {
        3.0
    }

    const fn default_base_size() -> f32 {
        2.0
    }

    const fn default_size_variation() -> f32 {
        0.5
    }

    const fn default_spawn_stagger() -> f32 {
        0.1
    }

    const fn default_fly_in_duration() -> f32 {
        2.0
    }

    /// Image source for the photo at `index`, falling back to `<source_dir>/<hero>-<n>.png`.
    pub fn source_for(&self, index: usize, hero_label: &str) -> String {
        match self.sources.get(index) {
            Some(source) => source.clone(),
            None => format!("{}/{}-{}.png", self.source_dir, hero_label, index + 1),
        }
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            count: Self::default_count(),
            sources: Vec::new(),
            source_dir: Self::default_source_dir(),
            ring_radius: Self::default_ring_radius(),
            ring_height: 0.0,
            height_variation: Self::default_height_variation(),
            base_size: Self::default_base_size(),
            size_variation: Self::default_size_variation(),
            spawn_stagger: Self::default_spawn_stagger(),
            fly_in_duration: Self::default_fly_in_duration(),
        }
    }
}

impl SelectionConfig {
    const fn default_scale() -> f32 {
        4.0
    }

    const fn default_camera_distance() -> f32 {
        12.0
    }

    const fn default_select_duration() -> f32 {
        0.5
    }

    const fn default_deselect_duration() -> f32 {
        0.8
    }

    const fn default_base_distance() -> f32 {
        15.0
    }

    const fn default_min_scale() -> f32 {
        0.5
    }

    const fn default_max_scale() -> f32 {
        2.0
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            scale: Self::default_scale(),
            camera_distance: Self::default_camera_distance(),
            select_duration: Self::default_select_duration(),
            deselect_duration: Self::default_deselect_duration(),
            base_distance: Self::default_base_distance(),
            min_scale: Self::default_min_scale(),
            max_scale: Self::default_max_scale(),
        }
    }
}

impl CollectConfig {
    const fn default_duration() -> f32 {
        1.5
    }

    const fn default_photo_stagger() -> f32 {
        0.05
    }

    const fn default_particle_stagger() -> f32 {
        0.005
    }

    const fn default_grace_period() -> f32 {
        2.0
    }

    const fn default_photo_end_scale() -> f32 {
        0.1
    }

    const fn default_particle_end_scale() -> f32 {
        0.01
    }
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            duration: Self::default_duration(),
            photo_stagger: Self::default_photo_stagger(),
            particle_stagger: Self::default_particle_stagger(),
            grace_period: Self::default_grace_period(),
            photo_end_scale: Self::default_photo_end_scale(),
            particle_end_scale: Self::default_particle_end_scale(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            grid: GridConfig::default(),
            camera: CameraConfig::default(),
            particles: ParticleConfig::default(),
            photos: PhotoConfig::default(),
            selection: SelectionConfig::default(),
            collect: CollectConfig::default(),
            reveal_rules: Self::default_reveal_rules(),
        }
    }
}

impl SceneConfig {
    fn default_reveal_rules() -> Vec<RevealRule> {
        vec![
            RevealRule { photo_number: 4, label: "C2-2".to_string() },
            RevealRule { photo_number: 6, label: "B1-2".to_string() },
        ]
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: SceneConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        cfg.validate().with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(cfg)
    }

    /// Rejects settings the scene cannot start from.
    pub fn validate(&self) -> Result<()> {
        if CellCoord::parse(&self.grid.hero_label).is_none() {
            bail!(
                "hero_label '{}' does not name a grid cell (expected labels like A1-1 .. C3-3)",
                self.grid.hero_label
            );
        }
        for rule in &self.reveal_rules {
            if CellCoord::parse(&rule.label).is_none() {
                bail!("reveal rule for photo {} names unknown cell '{}'", rule.photo_number, rule.label);
            }
        }
        Ok(())
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &SceneConfigOverrides) {
        if let Some(count) = overrides.photo_count {
            self.photos.count = count;
        }
        if let Some(count) = overrides.particle_count {
            self.particles.count = count;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
    }

    pub fn reveal_label_for(&self, photo_number: usize) -> Option<&str> {
        self.reveal_rules
            .iter()
            .find(|rule| rule.photo_number == photo_number)
            .map(|rule| rule.label.as_str())
    }
}

impl SceneConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.photo_count.is_none() && self.particle_count.is_none() && self.seed.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.photo_count.is_some() {
            fields.push("photos");
        }
        if self.particle_count.is_some() {
            fields.push("particles");
        }
        if self.seed.is_some() {
            fields.push("seed");
        }
        fields
    }
}
