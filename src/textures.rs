use bevy_ecs::prelude::{Entity, Resource};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture source '{0}' not found")]
    NotFound(String),
    #[error("failed to decode texture '{source_ref}': {reason}")]
    Decode { source_ref: String, reason: String },
}

/// Metadata of a texture the host finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
}

impl TextureInfo {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRequest {
    pub entity: Entity,
    pub source: String,
}

#[derive(Default, Resource)]
pub struct TextureRequests {
    pending: Vec<TextureRequest>,
}

impl TextureRequests {
    pub fn push(&mut self, entity: Entity, source: impl Into<String>) {
        self.pending.push(TextureRequest { entity, source: source.into() });
    }

    pub fn take(&mut self) -> Vec<TextureRequest> {
        std::mem::take(&mut self.pending)
    }
}

/// Loads photo textures on behalf of the scene.
pub trait TextureLoader {
    fn load(&self, source: &str) -> Result<TextureInfo, TextureError>;
}

/// Resolves texture sources as image files below a root directory.
#[derive(Debug, Clone)]
pub struct FileTextureLoader {
    root: PathBuf,
}

impl FileTextureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl TextureLoader for FileTextureLoader {
    fn load(&self, source: &str) -> Result<TextureInfo, TextureError> {
        let path = self.resolve(source);
        if !path.exists() {
            return Err(TextureError::NotFound(source.to_string()));
        }
        let (width, height) = image::image_dimensions(&path)
            .map_err(|err| TextureError::Decode { source_ref: source.to_string(), reason: err.to_string() })?;
        Ok(TextureInfo { width, height })
    }
}
