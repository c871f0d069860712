use glam::Vec2;

use crate::palette::Color;

/// One primitive in world coordinates.
///
/// Commands are replayed in order by a surface after it applies the frame's
/// camera transform, so widths and radii are world units too. `Dot` is the
/// exception: it always covers exactly one screen pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Dot {
        at: Vec2,
        color: Color,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Color {
        match *self {
            DrawCommand::Line { color, .. }
            | DrawCommand::Circle { color, .. }
            | DrawCommand::Dot { color, .. } => color,
        }
    }
}
