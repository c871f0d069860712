pub mod rng;
pub mod palette;
pub mod draw;
pub mod tree;

pub use rng::ParkMiller;
pub use palette::{Color, Decay, FruitKind, Palette};
pub use draw::DrawCommand;
pub use tree::*;
