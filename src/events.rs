use bevy_ecs::prelude::{Entity, Resource};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorIcon {
    Default,
    Pointer,
}

impl CursorIcon {
    pub fn as_str(self) -> &'static str {
        match self {
            CursorIcon::Default => "default",
            CursorIcon::Pointer => "pointer",
        }
    }
}

/// Kind of scene entity whose render resources should be released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasedKind {
    Photo,
    Particle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    BoxOpened { photos: usize, particles: usize },
    PhotoLaunched { entity: Entity, index: usize },
    PhotoArrived { entity: Entity, index: usize },
    ShowPhotoDialog { entity: Entity, index: usize, name: String },
    HidePhotoDialog,
    CursorChanged { cursor: CursorIcon },
    TextureLoaded { entity: Entity, source: String },
    TextureFailed { entity: Entity, source: String, reason: String },
    EntityReleased { entity: Entity, kind: ReleasedKind },
    CollectionStarted { photos: usize, particles: usize },
    CollectionFinished,
    CellRevealed { label: String },
}

impl fmt::Display for SceneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneEvent::BoxOpened { photos, particles } => {
                write!(f, "BoxOpened photos={photos} particles={particles}")
            }
            SceneEvent::PhotoLaunched { entity, index } => {
                write!(f, "PhotoLaunched entity={} index={index}", entity.index())
            }
            SceneEvent::PhotoArrived { entity, index } => {
                write!(f, "PhotoArrived entity={} index={index}", entity.index())
            }
            SceneEvent::ShowPhotoDialog { entity, index, name } => {
                write!(f, "ShowPhotoDialog entity={} index={index} name={name}", entity.index())
            }
            SceneEvent::HidePhotoDialog => write!(f, "HidePhotoDialog"),
            SceneEvent::CursorChanged { cursor } => write!(f, "CursorChanged cursor={}", cursor.as_str()),
            SceneEvent::TextureLoaded { entity, source } => {
                write!(f, "TextureLoaded entity={} source={source}", entity.index())
            }
            SceneEvent::TextureFailed { entity, source, reason } => {
                write!(f, "TextureFailed entity={} source={source} reason={reason}", entity.index())
            }
            SceneEvent::EntityReleased { entity, kind } => {
                write!(f, "EntityReleased entity={} kind={kind:?}", entity.index())
            }
            SceneEvent::CollectionStarted { photos, particles } => {
                write!(f, "CollectionStarted photos={photos} particles={particles}")
            }
            SceneEvent::CollectionFinished => write!(f, "CollectionFinished"),
            SceneEvent::CellRevealed { label } => write!(f, "CellRevealed label={label}"),
        }
    }
}

#[derive(Default, Resource)]
pub struct EventBus {
    events: Vec<SceneEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SceneEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
