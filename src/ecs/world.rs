use super::profiler::{SystemProfiler, SystemTimingSummary};
use super::systems::*;
use super::types::*;
use crate::animation::{Easing, Pose, Transition};
use crate::camera::{Camera3D, OrbitCamera, Viewport};
use crate::config::{ParticleConfig, PhotoConfig, SceneConfig, DEFAULT_HERO_LABEL};
use crate::events::{CursorIcon, EventBus, ReleasedKind, SceneEvent};
use crate::input::{PointerAction, PointerEvent};
use crate::layout::{cell_position, distance_scale, ring_position, CellCoord};
use crate::textures::{TextureError, TextureInfo, TextureRequest, TextureRequests};
use bevy_ecs::prelude::{Entity, Schedule, With, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use glam::{EulerRot, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::TAU;

const LABEL_SIZE: Vec2 = Vec2::new(1.2, 0.6);
const PHOTO_THICKNESS: f32 = 0.01;

fn flat_scale(value: f32) -> Vec3 {
    Vec3::new(value, value, 1.0)
}

type ParticleBundle = (Particle, ParticleMotion, Sparkle, ParticleSurface, ParticlePhase, Transform3D, Opacity);

fn particle_bundle(index: usize, origin: Vec3, config: &ParticleConfig, rng: &mut StdRng) -> ParticleBundle {
    let fps = config.reference_fps;
    let angle = rng.gen_range(0.0..TAU);
    let radius = if config.max_radius > config.min_radius {
        rng.gen_range(config.min_radius..config.max_radius)
    } else {
        config.min_radius
    };
    let height = if config.height_range > 0.0 {
        rng.gen_range(-config.height_range..config.height_range)
    } else {
        0.0
    };
    let translation = origin + Vec3::new(angle.cos() * radius, height, angle.sin() * radius);

    let color = JEWEL_PALETTE[rng.gen_range(0..JEWEL_PALETTE.len())];
    let shape = ParticleShape::ALL[rng.gen_range(0..ParticleShape::ALL.len())];
    let size = (rng.gen::<f32>() * 0.15 + 0.08) * 0.5;

    let motion = ParticleMotion {
        angles: Vec3::new(rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU)),
        spin: Vec3::new(rng.gen_range(-0.01..0.01), rng.gen_range(-0.01..0.01), rng.gen_range(-0.01..0.01))
            * fps,
        drift: Vec3::new(rng.gen_range(-0.004..0.004), rng.gen_range(0.002..0.007), rng.gen_range(-0.004..0.004))
            * fps,
    };
    let sparkle = Sparkle { phase: rng.gen_range(0.0..TAU), speed: rng.gen_range(0.02..0.05) * fps };
    let transform = Transform3D { translation, rotation: motion.rotation(), scale: Vec3::ONE };
    (
        Particle { index, shape, color, size, reference: translation },
        motion,
        sparkle,
        ParticleSurface::for_color(&color),
        ParticlePhase::Floating,
        transform,
        Opacity(1.0),
    )
}

fn photo_base_size(config: &PhotoConfig, rng: &mut StdRng) -> f32 {
    config.base_size + (rng.gen::<f32>() - 0.5) * config.size_variation
}

// ---------- World container ----------
/// Owns every piece of gift box scene state and the per-frame schedule that advances it.
pub struct SceneWorld {
    pub world: World,
    schedule: Schedule,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl SceneWorld {
    pub fn new(config: SceneConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(SceneClock::default());
        world.insert_resource(SceneState::new(config.grid.anchor));
        world.insert_resource(ViewCamera::from_config(&config));
        world.insert_resource(SceneRng::new(config.seed));
        world.insert_resource(EventBus::default());
        world.insert_resource(TextureRequests::default());
        world.insert_resource(SystemProfiler::default());
        world.insert_resource(SceneSettings(config));

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                sys_launch_photos,
                sys_drive_photo_transitions,
                sys_track_photo_arrivals,
                sys_float_particles,
                sys_sparkle_particles,
                sys_collect_particles,
                sys_billboard_photos,
            )
                .chain(),
        );

        let mut scene = Self { world, schedule };
        scene.build_grid();
        scene
    }

    pub fn settings(&self) -> &SceneConfig {
        &self.world.resource::<SceneSettings>().0
    }

    pub fn elapsed(&self) -> f32 {
        self.world.resource::<SceneClock>().elapsed
    }

    fn state(&self) -> &SceneState {
        self.world.resource::<SceneState>()
    }

    fn emit(&mut self, event: SceneEvent) {
        self.world.resource_mut::<EventBus>().push(event);
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.world.resource_mut::<EventBus>().drain()
    }

    /// Advances the scene clock by `dt` seconds and runs one frame.
    pub fn update(&mut self, dt: f32) {
        self.world.resource_mut::<SceneClock>().advance(dt);
        self.schedule.run(&mut self.world);
        let now = self.elapsed();
        let due = self.state().collection.as_ref().filter(|window| now >= window.finishes_at).cloned();
        if let Some(window) = due {
            self.finish_collection(window);
        }
    }

    pub fn system_timings(&self) -> Vec<SystemTimingSummary> {
        self.world.resource::<SystemProfiler>().summaries()
    }

    // ---------- Grid ----------
    /// Respawns all 27 cells; only the hero is visible and it sits on the anchor.
    pub fn build_grid(&mut self) -> usize {
        let existing: Vec<Entity> =
            self.world.query_filtered::<Entity, With<GridCell>>().iter(&self.world).collect();
        for entity in existing {
            self.world.despawn(entity);
        }
        let mut grid = self.settings().grid.clone();
        if CellCoord::parse(&grid.hero_label).is_none() {
            tracing::warn!(
                label = %grid.hero_label,
                fallback = DEFAULT_HERO_LABEL,
                "hero label does not name a grid cell; using fallback"
            );
            grid.hero_label = DEFAULT_HERO_LABEL.to_string();
        }
        let hero = CellCoord::parse(&grid.hero_label);
        let mut spawned = 0;
        for coord in CellCoord::all() {
            let is_hero = Some(coord) == hero;
            let translation = cell_position(coord, &grid);
            self.world.spawn((
                GridCell { coord, label: coord.label(), hero: is_hero },
                Transform3D::from_translation(translation),
                Visible(is_hero),
                PickBounds { half: Vec3::splat(grid.cube_size * 0.5) },
                LabelSprite {
                    translation: translation + Vec3::new(0.0, grid.label_lift, 0.0),
                    size: LABEL_SIZE,
                    visible: is_hero,
                },
            ));
            spawned += 1;
        }
        let anchor = hero.map(|coord| cell_position(coord, &grid)).unwrap_or(grid.anchor);
        self.world.resource_mut::<SceneState>().anchor = anchor;
        spawned
    }

    pub fn hero_entity(&mut self) -> Option<Entity> {
        self.world
            .query::<(Entity, &GridCell)>()
            .iter(&self.world)
            .find(|(_, cell)| cell.hero)
            .map(|(entity, _)| entity)
    }

    /// Box position used as the default collection target.
    pub fn anchor(&self) -> Vec3 {
        self.state().anchor
    }

    fn show_cell(&mut self, entity: Entity) {
        if let Some(mut visible) = self.world.get_mut::<Visible>(entity) {
            visible.0 = true;
        }
        if let Some(mut sprite) = self.world.get_mut::<LabelSprite>(entity) {
            sprite.visible = true;
        }
    }

    /// Shows the cell and its label; `false` for labels that name no cell.
    pub fn reveal_cell(&mut self, label: &str) -> bool {
        let found = self
            .world
            .query::<(Entity, &GridCell)>()
            .iter(&self.world)
            .find(|(_, cell)| cell.label == label)
            .map(|(entity, _)| entity);
        let Some(entity) = found else {
            tracing::debug!(label, "reveal ignored: unknown cell");
            return false;
        };
        self.show_cell(entity);
        tracing::info!(label, "cell revealed");
        self.emit(SceneEvent::CellRevealed { label: label.to_string() });
        true
    }

    pub fn reveal_all(&mut self) -> usize {
        let cells: Vec<Entity> =
            self.world.query_filtered::<Entity, With<GridCell>>().iter(&self.world).collect();
        for &entity in &cells {
            self.show_cell(entity);
        }
        cells.len()
    }

    // ---------- Opening ----------
    /// Opens the hero box: particles fill the scene center and photos fly out of the anchor.
    pub fn open_box(&mut self) -> bool {
        if self.state().box_open {
            tracing::debug!("open ignored: box already open");
            return false;
        }
        let config = self.settings().clone();
        let anchor = self.anchor();
        {
            let mut state = self.world.resource_mut::<SceneState>();
            state.box_open = true;
            state.photos_animating = true;
            state.selected = None;
        }
        let particles = self.spawn_particles(config.particles.center, config.particles.count as usize).len();
        let photos = self.open_photos(anchor, config.photos.count as usize).len();
        tracing::info!(photos, particles, "box opened");
        self.emit(SceneEvent::BoxOpened { photos, particles });
        true
    }

    pub fn spawn_particles(&mut self, origin: Vec3, count: usize) -> Vec<Entity> {
        let config = self.settings().particles.clone();
        let start = self.particle_count();
        let bundles: Vec<ParticleBundle> = {
            let mut rng = self.world.resource_mut::<SceneRng>();
            (0..count).map(|i| particle_bundle(start + i, origin, &config, &mut rng.0)).collect()
        };
        self.world.spawn_batch(bundles).collect()
    }

    /// Releases every particle immediately.
    pub fn clear_particles(&mut self) -> usize {
        let particles: Vec<Entity> =
            self.world.query_filtered::<Entity, With<Particle>>().iter(&self.world).collect();
        for &entity in &particles {
            self.release(entity, ReleasedKind::Particle);
        }
        particles.len()
    }

    /// Replaces the photo ring with `count` photos launching from `origin` one stagger step apart.
    pub fn open_photos(&mut self, origin: Vec3, count: usize) -> Vec<Entity> {
        let existing: Vec<Entity> = self.world.query_filtered::<Entity, With<Photo>>().iter(&self.world).collect();
        for entity in existing {
            self.release(entity, ReleasedKind::Photo);
        }
        let config = self.settings().clone();
        let hero = config.grid.hero_label.clone();
        let now = self.elapsed();
        let mut spawned = Vec::with_capacity(count);
        for index in 0..count {
            let base_size = {
                let mut rng = self.world.resource_mut::<SceneRng>();
                photo_base_size(&config.photos, &mut rng.0)
            };
            let source = config.photos.source_for(index, &hero);
            let photo = Photo {
                index,
                name: format!("{hero}-{}", index + 1),
                source: source.clone(),
                origin,
                home: ring_position(index, count, &config.photos),
                base_size,
                phase: PhotoPhase::Idle { launch_at: now + index as f32 * config.photos.spawn_stagger },
                texture: TextureSlot::Pending,
            };
            let entity = self
                .world
                .spawn((
                    photo,
                    Transform3D::from_translation(origin),
                    Opacity(0.0),
                    PickBounds { half: Vec3::new(base_size * 0.5, base_size * 0.5, PHOTO_THICKNESS) },
                ))
                .id();
            self.world.resource_mut::<TextureRequests>().push(entity, source);
            spawned.push(entity);
        }
        spawned
    }

    fn release(&mut self, entity: Entity, kind: ReleasedKind) {
        if self.world.despawn(entity) {
            self.emit(SceneEvent::EntityReleased { entity, kind });
        }
    }

    // ---------- Selection ----------
    pub fn selected_photo(&self) -> Option<Entity> {
        self.state().selected
    }

    pub fn photo_entity(&mut self, index: usize) -> Option<Entity> {
        self.world
            .query::<(Entity, &Photo)>()
            .iter(&self.world)
            .find(|(_, photo)| photo.index == index)
            .map(|(entity, _)| entity)
    }

    pub fn select_photo_index(&mut self, index: usize) -> bool {
        match self.photo_entity(index) {
            Some(entity) => self.select_photo(entity),
            None => false,
        }
    }

    /// Zooms `entity` in front of the camera, handing the selection over from any other photo.
    pub fn select_photo(&mut self, entity: Entity) -> bool {
        let Some(photo) = self.world.get::<Photo>(entity) else {
            return false;
        };
        if !photo.phase.is_pickable() || photo.phase.is_selected() {
            tracing::debug!(index = photo.index, phase = photo.phase.name(), "select ignored");
            return false;
        }
        if self.state().selected.is_some_and(|current| current != entity) {
            self.deselect_photo();
        }
        let view = self.world.resource::<ViewCamera>();
        let target = view.camera.position + view.camera.forward() * self.settings().selection.camera_distance;
        let selection = self.settings().selection.clone();
        let now = self.elapsed();
        let from = self.current_pose(entity);
        let to = Pose::new(target, flat_scale(selection.scale), 1.0);
        if let Some(mut photo) = self.world.get_mut::<Photo>(entity) {
            photo.phase = PhotoPhase::Selecting(Transition::new(
                from,
                to,
                now,
                selection.select_duration,
                Easing::CubicOut,
            ));
        }
        self.world.resource_mut::<SceneState>().selected = Some(entity);
        true
    }

    /// Sends the selected photo back to its ring slot and hides the dialog.
    pub fn deselect_photo(&mut self) -> bool {
        let Some(entity) = self.world.resource_mut::<SceneState>().selected.take() else {
            return false;
        };
        let Some(home) = self.world.get::<Photo>(entity).map(|photo| photo.home) else {
            return false;
        };
        let selection = self.settings().selection.clone();
        let eye = self.world.resource::<ViewCamera>().camera.position;
        let now = self.elapsed();
        let from = self.current_pose(entity);
        let to = Pose::new(home, flat_scale(distance_scale(home.distance(eye), &selection)), 1.0);
        if let Some(mut photo) = self.world.get_mut::<Photo>(entity) {
            photo.phase = PhotoPhase::Deselecting(Transition::new(
                from,
                to,
                now,
                selection.deselect_duration,
                Easing::CubicInOut,
            ));
        }
        self.emit(SceneEvent::HidePhotoDialog);
        true
    }

    fn current_pose(&self, entity: Entity) -> Pose {
        let transform = self.world.get::<Transform3D>(entity).copied().unwrap_or_default();
        let opacity = self.world.get::<Opacity>(entity).map(|o| o.0).unwrap_or(0.0);
        Pose::new(transform.translation, transform.scale, opacity)
    }

    /// Dialog "yes": collects everything into the anchor and reveals the cell tied to the chosen photo.
    pub fn accept_selection(&mut self) -> bool {
        let photo_number = self
            .state()
            .selected
            .and_then(|entity| self.world.get::<Photo>(entity))
            .map(|photo| photo.index + 1);
        let reveal = photo_number.and_then(|n| self.settings().reveal_label_for(n)).map(str::to_string);
        tracing::info!(?photo_number, reveal = ?reveal, "selection accepted");
        self.start_collection(None, reveal)
    }

    /// Dialog "no" or close.
    pub fn reject_selection(&mut self) -> bool {
        self.deselect_photo()
    }

    // ---------- Billboard ----------
    pub fn billboard_photos(&mut self, eye: Vec3) {
        let selection = self.settings().selection.clone();
        let mut query = self.world.query::<(&Photo, &mut Transform3D)>();
        for (photo, mut transform) in query.iter_mut(&mut self.world) {
            billboard_photo(photo, &mut transform, eye, &selection);
        }
    }

    // ---------- Collection ----------
    /// Pulls every live photo and particle into `target` (the anchor when `None`).
    pub fn collect(&mut self, target: Option<Vec3>) -> bool {
        self.start_collection(target, None)
    }

    fn start_collection(&mut self, target: Option<Vec3>, reveal: Option<String>) -> bool {
        let target = target.unwrap_or_else(|| self.anchor());
        let config = self.settings().collect.clone();
        let now = self.elapsed();

        let mut photos: Vec<(usize, Entity)> = self
            .world
            .query::<(Entity, &Photo)>()
            .iter(&self.world)
            .filter(|(_, photo)| !photo.phase.is_collecting())
            .map(|(entity, photo)| (photo.index, entity))
            .collect();
        let mut particles: Vec<(usize, Entity)> = self
            .world
            .query::<(Entity, &Particle, &ParticlePhase)>()
            .iter(&self.world)
            .filter(|(_, _, phase)| matches!(phase, ParticlePhase::Floating))
            .map(|(entity, particle, _)| (particle.index, entity))
            .collect();
        if photos.is_empty() && particles.is_empty() {
            tracing::debug!("collect ignored: nothing to collect");
            return false;
        }
        photos.sort_unstable_by_key(|(index, _)| *index);
        particles.sort_unstable_by_key(|(index, _)| *index);

        // The window never closes before the last staggered transition lands.
        let duration = config.duration.max(0.0);
        let mut finishes_at = now + config.grace_period;
        for (slot, &(_, entity)) in photos.iter().enumerate() {
            let plan = CollectPlan::new(
                now + slot as f32 * config.photo_stagger,
                target,
                flat_scale(config.photo_end_scale),
            );
            finishes_at = finishes_at.max(plan.starts_at + duration);
            if let Some(mut photo) = self.world.get_mut::<Photo>(entity) {
                photo.phase = PhotoPhase::Collecting(plan);
            }
        }
        for (slot, &(_, entity)) in particles.iter().enumerate() {
            let plan = CollectPlan::new(
                now + slot as f32 * config.particle_stagger,
                target,
                Vec3::splat(config.particle_end_scale),
            );
            finishes_at = finishes_at.max(plan.starts_at + duration);
            if let Some(mut phase) = self.world.get_mut::<ParticlePhase>(entity) {
                *phase = ParticlePhase::Collecting(plan);
            }
        }

        {
            let mut state = self.world.resource_mut::<SceneState>();
            state.selected = None;
            state.photos_animating = true;
            let previous = state.collection.take();
            if let Some(window) = &previous {
                finishes_at = finishes_at.max(window.finishes_at);
            }
            let reveal = reveal.or_else(|| previous.and_then(|window| window.reveal));
            state.collection = Some(CollectionWindow { finishes_at, reveal });
        }
        tracing::info!(photos = photos.len(), particles = particles.len(), finishes_at, "collection started");
        self.emit(SceneEvent::CollectionStarted { photos: photos.len(), particles: particles.len() });
        true
    }

    fn finish_collection(&mut self, window: CollectionWindow) {
        let photos: Vec<Entity> = self.world.query_filtered::<Entity, With<Photo>>().iter(&self.world).collect();
        let particles: Vec<Entity> =
            self.world.query_filtered::<Entity, With<Particle>>().iter(&self.world).collect();
        let leftovers = photos.len() + particles.len();
        for entity in photos {
            self.release(entity, ReleasedKind::Photo);
        }
        for entity in particles {
            self.release(entity, ReleasedKind::Particle);
        }
        {
            let mut state = self.world.resource_mut::<SceneState>();
            state.box_open = false;
            state.selected = None;
            state.photos_animating = false;
            state.collection = None;
        }
        tracing::info!(leftovers, "collection finished");
        self.emit(SceneEvent::HidePhotoDialog);
        self.emit(SceneEvent::CollectionFinished);
        if let Some(label) = window.reveal {
            self.reveal_cell(&label);
        }
    }

    // ---------- Pointer routing ----------
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<PointerAction> {
        match event {
            PointerEvent::Down { ndc } => Some(self.pointer_down(ndc)),
            PointerEvent::Move { ndc } => {
                self.pointer_move(ndc);
                None
            }
        }
    }

    /// Routes a click given in normalized device coordinates.
    pub fn pointer_down(&mut self, ndc: Vec2) -> PointerAction {
        let Some((origin, dir)) = self.pointer_ray(ndc) else {
            return PointerAction::Ignored;
        };
        if !self.state().box_open {
            if self.hit_hero(origin, dir) && self.open_box() {
                return PointerAction::OpenedBox;
            }
            return PointerAction::Ignored;
        }
        if let Some(entity) = self.pick_photo(origin, dir) {
            let selected = self.world.get::<Photo>(entity).is_some_and(|photo| photo.phase.is_selected());
            if selected {
                return PointerAction::AlreadySelected(entity);
            }
            if self.select_photo(entity) {
                return PointerAction::Selected(entity);
            }
            return PointerAction::Ignored;
        }
        if self.deselect_photo() {
            PointerAction::Deselected
        } else {
            PointerAction::Ignored
        }
    }

    /// Updates the hover cursor; returns the new cursor when it changed.
    pub fn pointer_move(&mut self, ndc: Vec2) -> Option<CursorIcon> {
        let state = self.state();
        if !state.box_open || state.photos_animating {
            return None;
        }
        let (origin, dir) = self.pointer_ray(ndc)?;
        let cursor =
            if self.pick_photo(origin, dir).is_some() { CursorIcon::Pointer } else { CursorIcon::Default };
        {
            let mut state = self.world.resource_mut::<SceneState>();
            if state.cursor == cursor {
                return None;
            }
            state.cursor = cursor;
        }
        self.emit(SceneEvent::CursorChanged { cursor });
        Some(cursor)
    }

    pub fn cursor(&self) -> CursorIcon {
        self.state().cursor
    }

    fn pointer_ray(&self, ndc: Vec2) -> Option<(Vec3, Vec3)> {
        let view = self.world.resource::<ViewCamera>();
        view.camera.ndc_ray(ndc, view.viewport)
    }

    fn hit_hero(&mut self, origin: Vec3, dir: Vec3) -> bool {
        self.world
            .query::<(&GridCell, &Visible, &Transform3D, &PickBounds)>()
            .iter(&self.world)
            .filter(|(cell, visible, _, _)| cell.hero && visible.0)
            .any(|(_, _, transform, bounds)| ray_hit_obb(origin, dir, transform, bounds.half).is_some())
    }

    /// Nearest pickable photo along the ray.
    pub fn pick_photo(&mut self, origin: Vec3, dir: Vec3) -> Option<Entity> {
        self.world
            .query::<(Entity, &Photo, &Transform3D, &PickBounds)>()
            .iter(&self.world)
            .filter(|(_, photo, _, _)| photo.phase.is_pickable())
            .filter_map(|(entity, _, transform, bounds)| {
                ray_hit_obb(origin, dir, transform, bounds.half).map(|distance| (entity, distance))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(entity, _)| entity)
    }

    // ---------- Textures ----------
    pub fn take_texture_requests(&mut self) -> Vec<TextureRequest> {
        self.world.resource_mut::<TextureRequests>().take()
    }

    /// Applies a host texture result; results for released photos are dropped.
    pub fn resolve_texture(&mut self, entity: Entity, result: Result<TextureInfo, TextureError>) -> bool {
        let event = {
            let Some(mut photo) = self.world.get_mut::<Photo>(entity) else {
                tracing::debug!(entity = entity.index(), "texture result for released photo ignored");
                return false;
            };
            let source = photo.source.clone();
            match result {
                Ok(info) => {
                    photo.texture = TextureSlot::Loaded(info);
                    SceneEvent::TextureLoaded { entity, source }
                }
                Err(err) => {
                    photo.texture = TextureSlot::Placeholder;
                    tracing::warn!(source = %source, error = %err, "photo texture failed; keeping placeholder");
                    SceneEvent::TextureFailed { entity, source, reason: err.to_string() }
                }
            }
        };
        self.emit(event);
        true
    }

    // ---------- Camera ----------
    pub fn camera(&self) -> &Camera3D {
        &self.world.resource::<ViewCamera>().camera
    }

    pub fn orbit(&self) -> &OrbitCamera {
        &self.world.resource::<ViewCamera>().orbit
    }

    pub fn viewport(&self) -> Viewport {
        self.world.resource::<ViewCamera>().viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.world.resource_mut::<ViewCamera>().viewport = viewport;
    }

    pub fn set_camera(&mut self, position: Vec3, target: Vec3) {
        let mut view = self.world.resource_mut::<ViewCamera>();
        let (min, max) = (view.orbit.min_radius, view.orbit.max_radius);
        view.orbit = OrbitCamera::from_position(position, target, min, max);
        let eye = view.orbit.eye();
        view.camera.target = target;
        view.camera.position = eye;
    }

    pub fn orbit_camera(&mut self, delta: Vec2) {
        let mut view = self.world.resource_mut::<ViewCamera>();
        view.orbit.orbit(delta);
        view.sync_from_orbit();
    }

    pub fn zoom_camera(&mut self, factor: f32) {
        let mut view = self.world.resource_mut::<ViewCamera>();
        view.orbit.zoom(factor);
        view.sync_from_orbit();
    }

    pub fn reset_camera(&mut self) {
        let camera = self.settings().camera.clone();
        self.set_camera(camera.reset_position, camera.reset_target);
    }

    // ---------- Queries ----------
    pub fn is_box_open(&self) -> bool {
        self.state().box_open
    }

    pub fn is_photos_animating(&self) -> bool {
        self.state().photos_animating
    }

    pub fn is_collecting(&self) -> bool {
        self.state().collection.is_some()
    }

    /// Scene time at which the running collection closes the box.
    pub fn collection_deadline(&self) -> Option<f32> {
        self.state().collection.as_ref().map(|window| window.finishes_at)
    }

    pub fn photo_count(&mut self) -> usize {
        self.world.query::<&Photo>().iter(&self.world).count()
    }

    pub fn particle_count(&mut self) -> usize {
        self.world.query::<&Particle>().iter(&self.world).count()
    }

    pub fn photos(&mut self) -> Vec<PhotoInfo> {
        let mut infos: Vec<PhotoInfo> = self
            .world
            .query::<(Entity, &Photo, &Transform3D, &Opacity)>()
            .iter(&self.world)
            .map(|(entity, photo, transform, opacity)| PhotoInfo {
                entity,
                index: photo.index,
                name: photo.name.clone(),
                source: photo.source.clone(),
                phase: photo.phase,
                home: photo.home,
                pose: Pose::new(transform.translation, transform.scale, opacity.0),
                yaw: yaw_of(transform.rotation),
                texture: photo.texture,
            })
            .collect();
        infos.sort_by_key(|info| info.index);
        infos
    }

    pub fn particles(&mut self) -> Vec<ParticleInfo> {
        let mut infos: Vec<(usize, ParticleInfo)> = self
            .world
            .query::<(Entity, &Particle, &Transform3D, &Opacity, &ParticleSurface, &ParticlePhase)>()
            .iter(&self.world)
            .map(|(entity, particle, transform, opacity, surface, phase)| {
                let info = ParticleInfo {
                    entity,
                    shape: particle.shape,
                    color: particle.color.rgb(),
                    metallic: particle.color.metallic,
                    half_extents: particle.shape.half_extents(particle.size) * transform.scale,
                    translation: transform.translation,
                    reference: particle.reference,
                    scale: transform.scale.x,
                    opacity: opacity.0,
                    emissive_intensity: surface.emissive_intensity,
                    reflectivity: surface.reflectivity,
                    roughness: surface.roughness,
                    collecting: matches!(phase, ParticlePhase::Collecting(_)),
                };
                (particle.index, info)
            })
            .collect();
        infos.sort_by_key(|(index, _)| *index);
        infos.into_iter().map(|(_, info)| info).collect()
    }

    pub fn cells(&mut self) -> Vec<CellInfo> {
        let mut cells: Vec<(CellCoord, CellInfo)> = self
            .world
            .query::<(Entity, &GridCell, &Transform3D, &Visible, &LabelSprite)>()
            .iter(&self.world)
            .map(|(entity, cell, transform, visible, sprite)| {
                let info = CellInfo {
                    entity,
                    label: cell.label.clone(),
                    translation: transform.translation,
                    visible: visible.0,
                    label_visible: sprite.visible,
                    label_translation: sprite.translation,
                    hero: cell.hero,
                };
                (cell.coord, info)
            })
            .collect();
        cells.sort_by_key(|(coord, _)| (coord.layer, coord.row, coord.col));
        cells.into_iter().map(|(_, info)| info).collect()
    }

    pub fn cell(&mut self, label: &str) -> Option<CellInfo> {
        self.cells().into_iter().find(|cell| cell.label == label)
    }
}

fn yaw_of(rotation: Quat) -> f32 {
    rotation.to_euler(EulerRot::YXZ).0
}
