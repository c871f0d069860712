use std::collections::BTreeMap;

use glam::Vec2;
use grove_render::InputEvent;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase};

/// Pixels of scroll per wheel notch on line-based devices
const LINE_HEIGHT: f32 = 100.0;

/// Turns winit's pointer vocabulary into [`InputEvent`]s.
///
/// winit reports the cursor position separately from button presses and
/// touches one finger at a time, so both are tracked here.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    cursor: Vec2,
    touches: BTreeMap<u64, Vec2>,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_moved(&mut self, position: Vec2) -> InputEvent {
        self.cursor = position;
        InputEvent::PointerMove { position }
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<InputEvent> {
        if button != MouseButton::Left {
            return None;
        }
        Some(match state {
            ElementState::Pressed => InputEvent::PointerDown { position: self.cursor },
            ElementState::Released => InputEvent::PointerUp,
        })
    }

    /// Positive `delta_y` zooms out, matching browser wheel deltas
    pub fn wheel(&self, delta: MouseScrollDelta) -> Option<InputEvent> {
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(position) => -position.y as f32,
        };
        if delta_y == 0.0 {
            return None;
        }
        Some(InputEvent::Wheel {
            position: self.cursor,
            delta_y,
        })
    }

    pub fn touch(&mut self, id: u64, phase: TouchPhase, location: Vec2) -> InputEvent {
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, location);
                InputEvent::TouchStart { touches: self.active() }
            }
            TouchPhase::Moved => {
                self.touches.insert(id, location);
                InputEvent::TouchMove { touches: self.active() }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&id);
                InputEvent::TouchEnd { touches: self.active() }
            }
        }
    }

    fn active(&self) -> Vec<Vec2> {
        self.touches.values().copied().collect()
    }
}
