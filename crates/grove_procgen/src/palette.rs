use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// How far a tree has withered.
///
/// Serialized as the integer level `0..=2` so tree lists coming from the
/// backend can be read directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Decay {
    #[default]
    Healthy,
    Withered,
    Dying,
}

impl Decay {
    pub fn level(self) -> u8 {
        match self {
            Decay::Healthy => 0,
            Decay::Withered => 1,
            Decay::Dying => 2,
        }
    }

    /// One step further gone, or `None` at the cap.
    pub fn worsen(self) -> Option<Decay> {
        match self {
            Decay::Healthy => Some(Decay::Withered),
            Decay::Withered => Some(Decay::Dying),
            Decay::Dying => None,
        }
    }

    /// One step healthier, saturating at `Healthy`.
    pub fn heal(self) -> Decay {
        match self {
            Decay::Healthy | Decay::Withered => Decay::Healthy,
            Decay::Dying => Decay::Withered,
        }
    }

    /// Divisor applied to the render scale; withered trees draw smaller.
    pub fn shrink_divisor(self) -> f32 {
        match self {
            Decay::Healthy => 1.0,
            other => other.level() as f32 * 1.5,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Decay::Healthy => Palette::HEALTHY,
            Decay::Withered => Palette::WITHERED,
            Decay::Dying => Palette::DYING,
        }
    }
}

impl TryFrom<u8> for Decay {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Decay::Healthy),
            1 => Ok(Decay::Withered),
            2 => Ok(Decay::Dying),
            other => Err(format!("decay level {other} out of range 0..=2")),
        }
    }
}

impl From<Decay> for u8 {
    fn from(decay: Decay) -> u8 {
        decay.level()
    }
}

/// Trunk and leaf colours for one decay level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub trunk: Color,
    pub leaf: Color,
}

impl Palette {
    pub const HEALTHY: Palette = Palette {
        trunk: Color::rgb(0x8b, 0x45, 0x13),
        leaf: Color::rgb(0x22, 0x8b, 0x22),
    };
    pub const WITHERED: Palette = Palette {
        trunk: Color::rgb(0xa0, 0x52, 0x2d),
        leaf: Color::rgb(0xda, 0xa5, 0x20),
    };
    pub const DYING: Palette = Palette {
        trunk: Color::rgb(0x5c, 0x40, 0x33),
        leaf: Color::rgb(0x8b, 0x73, 0x55),
    };
}

/// Fruit colours: outer skin and highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FruitKind {
    Red,
    Orange,
}

impl FruitKind {
    pub fn skin(self) -> Color {
        match self {
            FruitKind::Red => Color::rgb(0xd6, 0x28, 0x28),
            FruitKind::Orange => Color::rgb(0xf7, 0x7f, 0x00),
        }
    }

    pub fn highlight(self) -> Color {
        match self {
            FruitKind::Red => Color::rgb(0xff, 0x8a, 0x80),
            FruitKind::Orange => Color::rgb(0xfc, 0xbf, 0x49),
        }
    }
}
