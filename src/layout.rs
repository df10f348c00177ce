//! Pure placement math for the cube lattice and the photo ring.

use crate::config::{GridConfig, PhotoConfig, SelectionConfig};
use glam::Vec3;
use std::f32::consts::TAU;

pub const LAYERS: [char; 3] = ['C', 'B', 'A'];
pub const ROWS: [char; 3] = ['1', '2', '3'];
pub const COLS: [char; 3] = ['1', '2', '3'];

/// Index triple of a lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn label(&self) -> String {
        format!("{}{}-{}", LAYERS[self.layer], ROWS[self.row], COLS[self.col])
    }

    pub fn parse(label: &str) -> Option<Self> {
        let chars: Vec<char> = label.chars().collect();
        let [layer, row, '-', col] = chars.as_slice() else {
            return None;
        };
        Some(Self {
            layer: LAYERS.iter().position(|c| c == layer)?,
            row: ROWS.iter().position(|c| c == row)?,
            col: COLS.iter().position(|c| c == col)?,
        })
    }

    pub fn all() -> impl Iterator<Item = CellCoord> {
        (0..LAYERS.len()).flat_map(|layer| {
            (0..ROWS.len()).flat_map(move |row| (0..COLS.len()).map(move |col| CellCoord { layer, row, col }))
        })
    }

    /// Position inside the untransformed lattice, before the hero relocation.
    pub fn lattice_position(&self, spacing: f32) -> Vec3 {
        let x = self.col as f32;
        let y = 2.0 - self.row as f32;
        let z = 2.0 - self.layer as f32;
        Vec3::new(x, y, z) * spacing - Vec3::splat(spacing)
    }
}

/// Final cell position: the hero sits on the anchor, every other cell drops by the same
/// vertical offset so the lattice rests on the hero.
pub fn cell_position(coord: CellCoord, grid: &GridConfig) -> Vec3 {
    let lattice = coord.lattice_position(grid.spacing);
    let Some(hero) = CellCoord::parse(&grid.hero_label) else {
        return lattice;
    };
    if hero == coord {
        return grid.anchor;
    }
    let offset_y = grid.anchor.y - hero.lattice_position(grid.spacing).y;
    lattice + Vec3::new(0.0, offset_y, 0.0)
}

/// Vertical stagger of the ring; a pure function of index so every opening looks the same.
pub fn ring_height_offset(index: usize, variation: f32) -> f32 {
    let i = index as f32;
    (i * 1.5).sin() * variation * 0.8 + (i * 2.3).cos() * variation * 0.5
}

pub fn ring_position(index: usize, count: usize, photos: &PhotoConfig) -> Vec3 {
    let count = count.max(1);
    let angle = (index as f32 / count as f32) * TAU;
    Vec3::new(
        angle.cos() * photos.ring_radius,
        photos.ring_height + ring_height_offset(index, photos.height_variation),
        angle.sin() * photos.ring_radius,
    )
}

/// Perspective size cue: closer photos grow, clamped to the configured range.
pub fn distance_scale(distance: f32, selection: &SelectionConfig) -> f32 {
    if distance <= f32::EPSILON {
        return selection.max_scale;
    }
    (selection.base_distance / distance).clamp(selection.min_scale, selection.max_scale)
}

/// Yaw turning a photo at `from` toward `eye` around the vertical axis only.
pub fn billboard_yaw(from: Vec3, eye: Vec3) -> f32 {
    let dir = (eye - from).normalize_or_zero();
    dir.x.atan2(dir.z)
}
