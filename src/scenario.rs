use crate::ecs::SceneWorld;
use crate::input::PointerAction;
use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Pointer position used for clicks that should land on empty space.
const EMPTY_NDC: Vec2 = Vec2::new(-0.98, 0.98);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioAction {
    ClickHero,
    ClickPhoto { index: usize },
    ClickEmpty,
    HoverPhoto { index: usize },
    HoverEmpty,
    Accept,
    Reject,
    Collect {
        #[serde(default)]
        target: Option<Vec3>,
    },
    Reveal { label: String },
    RevealAll,
    Orbit { dx: f32, dy: f32 },
    Zoom { factor: f32 },
    ResetCamera,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioStep {
    /// Scene time in seconds at which the action fires.
    pub at: f32,
    #[serde(flatten)]
    pub action: ScenarioAction,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse scenario file {}", path.display()))?;
        Ok(scenario.sorted())
    }

    /// Open the box, pick the fourth photo once the ring settles, then accept it.
    pub fn tour() -> Self {
        let steps = vec![
            ScenarioStep { at: 0.2, action: ScenarioAction::ClickHero },
            ScenarioStep { at: 3.5, action: ScenarioAction::HoverPhoto { index: 3 } },
            ScenarioStep { at: 3.6, action: ScenarioAction::ClickPhoto { index: 3 } },
            ScenarioStep { at: 4.5, action: ScenarioAction::Accept },
        ];
        Self { name: Some("tour".to_string()), steps }
    }

    fn sorted(mut self) -> Self {
        self.steps.sort_by(|a, b| a.at.partial_cmp(&b.at).unwrap_or(std::cmp::Ordering::Equal));
        self
    }

    pub fn end_time(&self) -> f32 {
        self.steps.iter().map(|step| step.at).fold(0.0, f32::max)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

/// Walks a scenario's steps in time order.
#[derive(Debug, Clone)]
pub struct ScenarioPlayer {
    steps: Vec<ScenarioStep>,
    next: usize,
}

impl ScenarioPlayer {
    pub fn new(scenario: Scenario) -> Self {
        Self { steps: scenario.sorted().steps, next: 0 }
    }

    /// Actions whose time has come, in order; each is returned once.
    pub fn due(&mut self, now: f32) -> Vec<ScenarioAction> {
        let mut out = Vec::new();
        while let Some(step) = self.steps.get(self.next) {
            if step.at > now {
                break;
            }
            out.push(step.action.clone());
            self.next += 1;
        }
        out
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.steps.len()
    }

    pub fn remaining(&self) -> usize {
        self.steps.len() - self.next
    }
}

/// Result of applying one scenario action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Pointer(PointerAction),
    Applied(bool),
    Missing,
}

impl ActionOutcome {
    pub fn describe(&self) -> String {
        match self {
            ActionOutcome::Pointer(action) => action.as_str().to_string(),
            ActionOutcome::Applied(changed) => if *changed { "applied" } else { "no-op" }.to_string(),
            ActionOutcome::Missing => "target missing".to_string(),
        }
    }
}

fn project(scene: &SceneWorld, point: Vec3) -> Option<Vec2> {
    scene.camera().project_ndc(point, scene.viewport())
}

fn photo_ndc(scene: &mut SceneWorld, index: usize) -> Option<Vec2> {
    let point = scene.photos().into_iter().find(|photo| photo.index == index)?.pose.translation;
    project(scene, point)
}

pub fn apply_action(scene: &mut SceneWorld, action: &ScenarioAction) -> ActionOutcome {
    match action {
        ScenarioAction::ClickHero => {
            let anchor = scene.anchor();
            match project(scene, anchor) {
                Some(ndc) => ActionOutcome::Pointer(scene.pointer_down(ndc)),
                None => ActionOutcome::Missing,
            }
        }
        ScenarioAction::ClickPhoto { index } => match photo_ndc(scene, *index) {
            Some(ndc) => ActionOutcome::Pointer(scene.pointer_down(ndc)),
            None => ActionOutcome::Missing,
        },
        ScenarioAction::ClickEmpty => ActionOutcome::Pointer(scene.pointer_down(EMPTY_NDC)),
        ScenarioAction::HoverPhoto { index } => match photo_ndc(scene, *index) {
            Some(ndc) => ActionOutcome::Applied(scene.pointer_move(ndc).is_some()),
            None => ActionOutcome::Missing,
        },
        ScenarioAction::HoverEmpty => ActionOutcome::Applied(scene.pointer_move(EMPTY_NDC).is_some()),
        ScenarioAction::Accept => ActionOutcome::Applied(scene.accept_selection()),
        ScenarioAction::Reject => ActionOutcome::Applied(scene.reject_selection()),
        ScenarioAction::Collect { target } => ActionOutcome::Applied(scene.collect(*target)),
        ScenarioAction::Reveal { label } => ActionOutcome::Applied(scene.reveal_cell(label)),
        ScenarioAction::RevealAll => ActionOutcome::Applied(scene.reveal_all() > 0),
        ScenarioAction::Orbit { dx, dy } => {
            scene.orbit_camera(Vec2::new(*dx, *dy));
            ActionOutcome::Applied(true)
        }
        ScenarioAction::Zoom { factor } => {
            scene.zoom_camera(*factor);
            ActionOutcome::Applied(true)
        }
        ScenarioAction::ResetCamera => {
            scene.reset_camera();
            ActionOutcome::Applied(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let json = r#"{
            "name": "pick",
            "steps": [
                { "at": 4.0, "action": "accept" },
                { "at": 0.1, "action": "click_hero" },
                { "at": 3.0, "action": "click_photo", "index": 2 },
                { "at": 5.0, "action": "collect", "target": [0.0, -8.0, 0.0] }
            ]
        }"#;
        let scenario: Scenario = serde_json::from_str::<Scenario>(json).expect("parse").sorted();
        assert_eq!(scenario.steps[0].action, ScenarioAction::ClickHero);
        assert_eq!(scenario.steps[1].action, ScenarioAction::ClickPhoto { index: 2 });
        assert_eq!(
            scenario.steps[3].action,
            ScenarioAction::Collect { target: Some(Vec3::new(0.0, -8.0, 0.0)) }
        );
        assert_eq!(scenario.end_time(), 5.0);
    }

    #[test]
    fn player_releases_each_step_once() {
        let mut player = ScenarioPlayer::new(Scenario::tour());
        assert!(player.due(0.1).is_empty());
        assert_eq!(player.due(0.2), vec![ScenarioAction::ClickHero]);
        assert!(player.due(0.3).is_empty());
        assert_eq!(player.due(10.0).len(), 3);
        assert!(player.is_finished());
    }

    #[test]
    fn unknown_action_is_rejected() {
        let json = r#"{ "steps": [ { "at": 1.0, "action": "explode" } ] }"#;
        assert!(serde_json::from_str::<Scenario>(json).is_err());
    }
}
