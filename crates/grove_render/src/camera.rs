use glam::Vec2;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// Wheel delta to zoom factor: scrolling down (positive delta) zooms out.
pub fn wheel_zoom_factor(delta_y: f32) -> f32 {
    1.0 - delta_y * 0.001
}

/// 2D pan/zoom camera.
///
/// `screen = world * scale + offset`. The transform is applied once per
/// frame by the surface, never baked into the generated geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera2D {
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scale
    }

    /// Convert a world-space length to screen pixels
    pub fn world_len_to_screen(&self, len: f32) -> f32 {
        len * self.scale
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor` keeping the world point under `screen_point` fixed.
    ///
    /// The resulting scale is clamped to `[MIN_ZOOM, MAX_ZOOM]`; the offset is
    /// recomputed from the clamped scale so the anchor never drifts.
    /// Returns false when nothing changed.
    pub fn zoom_at(&mut self, screen_point: Vec2, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }

        let anchor = self.screen_to_world(screen_point);
        let scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if scale == self.scale {
            return false;
        }

        self.scale = scale;
        self.offset = screen_point - anchor * scale;
        true
    }

    /// Place `world` at `screen` without changing the zoom.
    pub fn look_at(&mut self, world: Vec2, screen: Vec2) {
        self.offset = screen - world * self.scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip() {
        let camera = Camera2D { offset: Vec2::new(30.0, -12.0), scale: 2.5 };
        let world = Vec2::new(7.0, 11.0);
        let screen = camera.world_to_screen(world);
        assert_eq!(screen, Vec2::new(47.5, 15.5));
        assert!(camera.screen_to_world(screen).abs_diff_eq(world, 1e-5));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera2D::default();
        camera.zoom_at(Vec2::ZERO, 100.0);
        assert_eq!(camera.scale, MAX_ZOOM);
        camera.zoom_at(Vec2::ZERO, 1e-6);
        assert_eq!(camera.scale, MIN_ZOOM);
        assert!(!camera.zoom_at(Vec2::ZERO, 0.5));
    }

    #[test]
    fn test_bad_factors_ignored() {
        let mut camera = Camera2D::default();
        assert!(!camera.zoom_at(Vec2::ONE, f32::NAN));
        assert!(!camera.zoom_at(Vec2::ONE, -2.0));
        assert!(!camera.zoom_at(Vec2::ONE, 0.0));
        assert_eq!(camera, Camera2D::default());
    }

    #[test]
    fn test_wheel_factor() {
        assert_eq!(wheel_zoom_factor(0.0), 1.0);
        assert!((wheel_zoom_factor(100.0) - 0.9).abs() < 1e-6);
        assert!((wheel_zoom_factor(-100.0) - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_pan_and_look_at() {
        let mut camera = Camera2D { offset: Vec2::ZERO, scale: 2.0 };
        camera.pan(Vec2::new(5.0, -3.0));
        assert_eq!(camera.offset, Vec2::new(5.0, -3.0));
        camera.look_at(Vec2::new(10.0, 10.0), Vec2::new(100.0, 50.0));
        assert_eq!(camera.world_to_screen(Vec2::new(10.0, 10.0)), Vec2::new(100.0, 50.0));
    }

    proptest! {
        #[test]
        fn prop_zoom_keeps_point_under_cursor(
            ox in -2000.0f32..2000.0,
            oy in -2000.0f32..2000.0,
            scale in MIN_ZOOM..MAX_ZOOM,
            px in 0.0f32..1920.0,
            py in 0.0f32..1080.0,
            factor in 0.2f32..5.0,
        ) {
            let mut camera = Camera2D { offset: Vec2::new(ox, oy), scale };
            let point = Vec2::new(px, py);
            let before = camera.screen_to_world(point);
            camera.zoom_at(point, factor);
            let after = camera.world_to_screen(before);
            prop_assert!(after.abs_diff_eq(point, 0.05), "{after:?} drifted from {point:?}");
            prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&camera.scale));
        }
    }
}
