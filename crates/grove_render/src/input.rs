use std::time::{Duration, Instant};

use glam::Vec2;

use crate::camera::wheel_zoom_factor;

pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(16);

/// Pointer and touch input in screen pixels, already detached from the
/// windowing system that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Vec2 },
    PointerMove { position: Vec2 },
    PointerUp,
    Wheel { position: Vec2, delta_y: f32 },
    /// Active touch points after a finger went down
    TouchStart { touches: Vec<Vec2> },
    TouchMove { touches: Vec<Vec2> },
    /// Touch points still down after a finger lifted
    TouchEnd { touches: Vec<Vec2> },
}

/// What an input event asks the camera to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    Pan(Vec2),
    ZoomAt { point: Vec2, factor: f32 },
}

/// Leading-edge rate limiter.
///
/// The first call fires immediately; calls within `interval` of the last
/// fired call are dropped, never queued or replayed later.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn try_fire(&mut self, now: Instant) -> bool {
        let ready = match self.last_fired {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if ready {
            self.last_fired = Some(now);
        }
        ready
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

/// Turns raw pointer/touch events into camera actions.
///
/// Drag and wheel are throttled; pinch is not. A dropped drag event does
/// not move the anchor, so the next applied pan covers the full distance
/// and content stays under the finger.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    drag_anchor: Option<Vec2>,
    pinch_distance: Option<f32>,
    drag_throttle: Throttle,
    wheel_throttle: Throttle,
}

impl GestureTracker {
    pub fn new(throttle: Duration) -> Self {
        Self {
            drag_anchor: None,
            pinch_distance: None,
            drag_throttle: Throttle::new(throttle),
            wheel_throttle: Throttle::new(throttle),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn handle(&mut self, event: &InputEvent, now: Instant) -> Option<CameraAction> {
        match event {
            InputEvent::PointerDown { position } => {
                self.begin_drag(*position);
                None
            }
            InputEvent::PointerMove { position } => self.drag_to(*position, now),
            InputEvent::PointerUp => {
                self.drag_anchor = None;
                None
            }
            InputEvent::Wheel { position, delta_y } => {
                if !self.wheel_throttle.try_fire(now) {
                    return None;
                }
                Some(CameraAction::ZoomAt {
                    point: *position,
                    factor: wheel_zoom_factor(*delta_y),
                })
            }
            InputEvent::TouchStart { touches } | InputEvent::TouchEnd { touches } => {
                self.regroup_touches(touches);
                None
            }
            InputEvent::TouchMove { touches } => match touches.as_slice() {
                [single] => self.drag_to(*single, now),
                [a, b, ..] => self.pinch(*a, *b),
                [] => None,
            },
        }
    }

    fn begin_drag(&mut self, position: Vec2) {
        self.drag_anchor = Some(position);
        self.pinch_distance = None;
    }

    fn drag_to(&mut self, position: Vec2, now: Instant) -> Option<CameraAction> {
        let anchor = self.drag_anchor?;
        if !self.drag_throttle.try_fire(now) {
            return None;
        }
        self.drag_anchor = Some(position);
        Some(CameraAction::Pan(position - anchor))
    }

    fn pinch(&mut self, a: Vec2, b: Vec2) -> Option<CameraAction> {
        let distance = a.distance(b);
        let previous = self.pinch_distance.replace(distance)?;
        if previous <= f32::EPSILON || distance <= f32::EPSILON {
            return None;
        }
        Some(CameraAction::ZoomAt {
            point: (a + b) * 0.5,
            factor: distance / previous,
        })
    }

    /// Finger count changed: restart whichever gesture now applies.
    fn regroup_touches(&mut self, touches: &[Vec2]) {
        match touches {
            [] => {
                self.drag_anchor = None;
                self.pinch_distance = None;
            }
            [single] => self.begin_drag(*single),
            [a, b, ..] => {
                self.drag_anchor = None;
                self.pinch_distance = Some(a.distance(*b));
            }
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn test_throttle_leading_edge() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(Duration::from_millis(16));
        assert!(throttle.try_fire(t0));
        assert!(!throttle.try_fire(ms(t0, 5)));
        assert!(!throttle.try_fire(ms(t0, 15)));
        assert!(throttle.try_fire(ms(t0, 16)));
        // Window restarts from the last fired call, not the dropped ones
        assert!(!throttle.try_fire(ms(t0, 30)));
        assert!(throttle.try_fire(ms(t0, 32)));
        throttle.reset();
        assert!(throttle.try_fire(ms(t0, 33)));
    }

    #[test]
    fn test_drag_pans_by_delta() {
        let t0 = Instant::now();
        let mut gestures = GestureTracker::default();
        assert_eq!(gestures.handle(&InputEvent::PointerMove { position: Vec2::ONE }, t0), None);

        gestures.handle(&InputEvent::PointerDown { position: Vec2::new(10.0, 10.0) }, t0);
        let action = gestures.handle(&InputEvent::PointerMove { position: Vec2::new(15.0, 8.0) }, t0);
        assert_eq!(action, Some(CameraAction::Pan(Vec2::new(5.0, -2.0))));

        gestures.handle(&InputEvent::PointerUp, t0);
        assert!(!gestures.is_dragging());
    }

    #[test]
    fn test_dropped_moves_do_not_lose_distance() {
        let t0 = Instant::now();
        let mut gestures = GestureTracker::default();
        gestures.handle(&InputEvent::PointerDown { position: Vec2::ZERO }, t0);
        assert!(gestures.handle(&InputEvent::PointerMove { position: Vec2::new(1.0, 0.0) }, t0).is_some());
        assert!(gestures.handle(&InputEvent::PointerMove { position: Vec2::new(2.0, 0.0) }, ms(t0, 4)).is_none());
        assert!(gestures.handle(&InputEvent::PointerMove { position: Vec2::new(3.0, 0.0) }, ms(t0, 8)).is_none());
        let action = gestures.handle(&InputEvent::PointerMove { position: Vec2::new(4.0, 0.0) }, ms(t0, 20));
        assert_eq!(action, Some(CameraAction::Pan(Vec2::new(3.0, 0.0))));
    }

    #[test]
    fn test_wheel_throttled() {
        let t0 = Instant::now();
        let mut gestures = GestureTracker::default();
        let wheel = InputEvent::Wheel { position: Vec2::new(50.0, 60.0), delta_y: 100.0 };
        match gestures.handle(&wheel, t0) {
            Some(CameraAction::ZoomAt { point, factor }) => {
                assert_eq!(point, Vec2::new(50.0, 60.0));
                assert!((factor - 0.9).abs() < 1e-6);
            }
            other => panic!("expected zoom, got {other:?}"),
        }
        assert_eq!(gestures.handle(&wheel, ms(t0, 1)), None);
        assert!(gestures.handle(&wheel, ms(t0, 17)).is_some());
    }

    #[test]
    fn test_pinch_zooms_at_midpoint() {
        let t0 = Instant::now();
        let mut gestures = GestureTracker::default();
        gestures.handle(
            &InputEvent::TouchStart { touches: vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)] },
            t0,
        );
        let action = gestures.handle(
            &InputEvent::TouchMove { touches: vec![Vec2::new(-50.0, 0.0), Vec2::new(150.0, 0.0)] },
            t0,
        );
        assert_eq!(action, Some(CameraAction::ZoomAt { point: Vec2::new(50.0, 0.0), factor: 2.0 }));

        // Not throttled: an immediate second move still applies
        let action = gestures.handle(
            &InputEvent::TouchMove { touches: vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)] },
            t0,
        );
        assert_eq!(action, Some(CameraAction::ZoomAt { point: Vec2::new(50.0, 0.0), factor: 0.5 }));
    }

    #[test]
    fn test_lifting_a_finger_switches_to_drag() {
        let t0 = Instant::now();
        let mut gestures = GestureTracker::default();
        gestures.handle(&InputEvent::TouchStart { touches: vec![Vec2::ZERO, Vec2::new(10.0, 0.0)] }, t0);
        assert!(!gestures.is_dragging());
        gestures.handle(&InputEvent::TouchEnd { touches: vec![Vec2::new(10.0, 0.0)] }, t0);
        assert!(gestures.is_dragging());
        let action = gestures.handle(&InputEvent::TouchMove { touches: vec![Vec2::new(14.0, 3.0)] }, t0);
        assert_eq!(action, Some(CameraAction::Pan(Vec2::new(4.0, 3.0))));
        gestures.handle(&InputEvent::TouchEnd { touches: vec![] }, t0);
        assert!(!gestures.is_dragging());
    }
}
