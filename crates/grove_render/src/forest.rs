use glam::Vec2;

use crate::cull::Rect;

pub const TREES_PER_ROW: usize = 10;
/// Horizontal distance between tree origins, world units
pub const COLUMN_PITCH: f32 = 300.0;
/// Vertical distance between tree rows, world units
pub const ROW_PITCH: f32 = 400.0;

/// Grid cell of the tree at `index`
pub fn grid_position(index: usize) -> Vec2 {
    let column = index % TREES_PER_ROW;
    let row = index / TREES_PER_ROW;
    Vec2::new(column as f32 * COLUMN_PITCH, row as f32 * ROW_PITCH)
}

/// World positions of every tree in a forest, in instance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForestLayout {
    positions: Vec<Vec2>,
}

impl ForestLayout {
    pub fn grid(count: usize) -> Self {
        Self {
            positions: (0..count).map(grid_position).collect(),
        }
    }

    /// Layout for a single tree drawn at the world origin
    pub fn single() -> Self {
        Self { positions: vec![Vec2::ZERO] }
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.positions.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bounding box of the tree origins
    pub fn bounds(&self) -> Option<Rect> {
        Rect::enclosing(self.positions.iter().copied())
    }
}
