use crate::cli::{CliOverrides, MIN_FRAME_STEP};
use crate::config::SceneConfig;
use crate::ecs::SceneWorld;
use crate::events::SceneEvent;
use crate::scenario::{apply_action, Scenario, ScenarioPlayer};
use crate::textures::{FileTextureLoader, TextureLoader, TextureRequest};
use anyhow::{bail, Result};
use std::fmt;

const DEFAULT_CONFIG_PATH: &str = "config/scene.json";
const DEFAULT_DT: f32 = 1.0 / 60.0;
const DEFAULT_TAIL: f32 = 3.0;

/// Totals gathered while a session plays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub scenario: String,
    pub frames: u64,
    pub elapsed: f32,
    pub actions: usize,
    pub events: usize,
    pub photos_launched: usize,
    pub photos_arrived: usize,
    pub dialogs_shown: usize,
    pub textures_loaded: usize,
    pub textures_failed: usize,
    pub released: usize,
    pub collections: usize,
    pub revealed: Vec<String>,
    pub box_open: bool,
    pub photos_remaining: usize,
    pub particles_remaining: usize,
}

impl SessionSummary {
    fn record(&mut self, event: &SceneEvent) {
        self.events += 1;
        match event {
            SceneEvent::PhotoLaunched { .. } => self.photos_launched += 1,
            SceneEvent::PhotoArrived { .. } => self.photos_arrived += 1,
            SceneEvent::ShowPhotoDialog { .. } => self.dialogs_shown += 1,
            SceneEvent::TextureLoaded { .. } => self.textures_loaded += 1,
            SceneEvent::TextureFailed { .. } => self.textures_failed += 1,
            SceneEvent::EntityReleased { .. } => self.released += 1,
            SceneEvent::CollectionFinished => self.collections += 1,
            SceneEvent::CellRevealed { label } => self.revealed.push(label.clone()),
            _ => {}
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario '{}': {} frames, {:.2}s", self.scenario, self.frames, self.elapsed)?;
        writeln!(f, "  actions={} events={}", self.actions, self.events)?;
        writeln!(
            f,
            "  photos launched={} arrived={} dialogs={} textures ok={} failed={}",
            self.photos_launched, self.photos_arrived, self.dialogs_shown, self.textures_loaded, self.textures_failed
        )?;
        writeln!(f, "  released={} collections={} revealed={:?}", self.released, self.collections, self.revealed)?;
        write!(
            f,
            "  box_open={} photos_remaining={} particles_remaining={}",
            self.box_open, self.photos_remaining, self.particles_remaining
        )
    }
}

/// Drives a scene through a scenario at a fixed timestep, servicing texture requests one frame late.
pub struct Session<L: TextureLoader> {
    scene: SceneWorld,
    player: ScenarioPlayer,
    loader: L,
    in_flight: Vec<TextureRequest>,
    summary: SessionSummary,
    end_time: f32,
}

impl<L: TextureLoader> Session<L> {
    pub fn new(config: SceneConfig, scenario: Scenario, loader: L, tail: f32) -> Self {
        let end_time = scenario.end_time() + tail.max(0.0);
        let summary = SessionSummary { scenario: scenario.display_name().to_string(), ..Default::default() };
        Self {
            scene: SceneWorld::new(config),
            player: ScenarioPlayer::new(scenario),
            loader,
            in_flight: Vec::new(),
            summary,
            end_time,
        }
    }

    pub fn scene(&self) -> &SceneWorld {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneWorld {
        &mut self.scene
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// All steps fired, the tail has elapsed and no collection is still landing.
    pub fn is_finished(&self) -> bool {
        self.player.is_finished() && self.scene.elapsed() >= self.end_time && !self.scene.is_collecting()
    }

    pub fn step(&mut self, dt: f32) {
        for request in std::mem::take(&mut self.in_flight) {
            let result = self.loader.load(&request.source);
            self.scene.resolve_texture(request.entity, result);
        }
        self.in_flight = self.scene.take_texture_requests();

        for action in self.player.due(self.scene.elapsed()) {
            let outcome = apply_action(&mut self.scene, &action);
            tracing::info!(at = self.scene.elapsed(), ?action, outcome = %outcome.describe(), "scenario action");
            self.summary.actions += 1;
        }

        self.scene.update(dt);
        for event in self.scene.drain_events() {
            tracing::debug!(%event, "scene event");
            self.summary.record(&event);
        }
        self.summary.frames += 1;
    }

    /// Fixed steps of `dt` needed to cover the scenario, its tail and any running collection.
    pub fn frame_budget(&self, dt: f32) -> u64 {
        let until = self.scene.collection_deadline().map_or(self.end_time, |deadline| deadline.max(self.end_time));
        (until / dt).ceil() as u64 + 1
    }

    pub fn run(mut self, dt: f32) -> Result<SessionSummary> {
        if !(dt.is_finite() && dt >= MIN_FRAME_STEP) {
            bail!("Frame step must be at least {MIN_FRAME_STEP}s, got {dt}");
        }
        // Bounded by frame count: an f32 clock stops advancing once dt drops below its precision.
        while !self.is_finished() && self.summary.frames < self.frame_budget(dt) {
            self.step(dt);
        }
        if !self.player.is_finished() {
            tracing::warn!(pending = self.player.remaining(), "session ended before every scenario step fired");
        }
        for timing in self.scene.system_timings() {
            tracing::debug!(
                system = timing.name,
                avg_ms = timing.window_average_ms,
                max_ms = timing.max_ms,
                samples = timing.samples,
                "system timing"
            );
        }
        Ok(self.finish())
    }

    pub fn finish(mut self) -> SessionSummary {
        self.summary.elapsed = self.scene.elapsed();
        self.summary.box_open = self.scene.is_box_open();
        self.summary.photos_remaining = self.scene.photo_count();
        self.summary.particles_remaining = self.scene.particle_count();
        self.summary
    }
}

pub fn run() -> Result<SessionSummary> {
    run_with_overrides(CliOverrides::default())
}

pub fn run_with_overrides(cli: CliOverrides) -> Result<SessionSummary> {
    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::load_or_default(DEFAULT_CONFIG_PATH),
    };
    let overrides = cli.config_overrides();
    if !overrides.is_empty() {
        tracing::info!(fields = ?overrides.applied_fields(), "applying command line overrides");
        config.apply_overrides(&overrides);
    }
    let scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::tour(),
    };
    tracing::info!(
        scenario = scenario.display_name(),
        steps = scenario.steps.len(),
        photos = config.photos.count,
        particles = config.particles.count,
        "starting session"
    );
    let loader = FileTextureLoader::new(".");
    tracing::debug!(root = %loader.root().display(), "texture loader ready");
    let session = Session::new(config, scenario, loader, cli.tail.unwrap_or(DEFAULT_TAIL));
    let summary = session.run(cli.dt.unwrap_or(DEFAULT_DT))?;
    tracing::info!(frames = summary.frames, elapsed = summary.elapsed, "session finished");
    Ok(summary)
}
