use glam::Vec2;

use crate::camera::Camera2D;

/// Extra screen pixels around the viewport before an instance is culled
pub const CULL_MARGIN: f32 = 50.0;

/// Axis-aligned rectangle, min inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing every point, or `None` for no points
    pub fn enclosing(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Rect::new(first, first), |rect, p| Rect::new(rect.min.min(p), rect.max.max(p))))
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(self.min - Vec2::splat(margin), self.max + Vec2::splat(margin))
    }
}

/// Screen-space visibility test for tree footprints
#[derive(Debug, Clone, Copy)]
pub struct ViewBounds {
    screen: Rect,
}

impl ViewBounds {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            screen: Rect::new(Vec2::ZERO, Vec2::new(width, height)).expand(margin),
        }
    }

    /// World-space footprint of a tree rooted at `origin` with radius `reach`.
    /// Trees grow upwards, so the box sits above the origin plus a little
    /// below it for the trunk stroke.
    pub fn tree_footprint(origin: Vec2, reach: f32) -> Rect {
        Rect::new(origin - Vec2::splat(reach), origin + Vec2::new(reach, reach * 0.1))
    }

    /// Project a world rectangle through the camera
    pub fn project(camera: &Camera2D, world: &Rect) -> Rect {
        Rect::new(camera.world_to_screen(world.min), camera.world_to_screen(world.max))
    }

    pub fn is_visible(&self, screen_rect: &Rect) -> bool {
        self.screen.intersects(screen_rect)
    }
}
