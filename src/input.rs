use crate::camera::Viewport;
use bevy_ecs::prelude::Entity;
use glam::Vec2;

/// What a pointer-down did to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    OpenedBox,
    Selected(Entity),
    AlreadySelected(Entity),
    Deselected,
    Ignored,
}

impl PointerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerAction::OpenedBox => "opened_box",
            PointerAction::Selected(_) => "selected",
            PointerAction::AlreadySelected(_) => "already_selected",
            PointerAction::Deselected => "deselected",
            PointerAction::Ignored => "ignored",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { ndc: Vec2 },
    Move { ndc: Vec2 },
}

/// Collects host pointer input in pixel space and hands it to the scene in NDC.
#[derive(Debug, Clone)]
pub struct PointerInput {
    viewport: Viewport,
    cursor: Option<Vec2>,
    events: Vec<PointerEvent>,
}

impl PointerInput {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, cursor: None, events: Vec::new() }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Last cursor position in NDC, if the pointer has been seen inside the viewport.
    pub fn cursor_ndc(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn cursor_moved(&mut self, screen: Vec2) {
        if let Some(ndc) = self.viewport.to_ndc(screen) {
            self.cursor = Some(ndc);
            self.events.push(PointerEvent::Move { ndc });
        }
    }

    pub fn pressed(&mut self, screen: Vec2) {
        if let Some(ndc) = self.viewport.to_ndc(screen) {
            self.cursor = Some(ndc);
            self.events.push(PointerEvent::Down { ndc });
        }
    }

    pub fn drain(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.events)
    }
}
