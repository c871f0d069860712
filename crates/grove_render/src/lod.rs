use serde::{Deserialize, Serialize};

/// How much geometry to produce for one tree this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailTier {
    /// Full recursive generation
    Full,
    /// Trunk and two strokes
    Simplified,
    /// One pixel
    Dot,
}

/// Picks a [`DetailTier`] from a tree's projected on-screen size.
///
/// `always_full` is the shipped policy: every visible tree renders in full.
/// Turning it off enables the size thresholds, which keep forests of tens
/// of thousands of trees tractable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodPolicy {
    pub always_full: bool,
    /// Footprints at least this many pixels across render in full
    pub full_min_px: f32,
    /// Footprints at least this many pixels across render simplified
    pub simplified_min_px: f32,
}

impl Default for LodPolicy {
    fn default() -> Self {
        Self {
            always_full: true,
            full_min_px: 48.0,
            simplified_min_px: 4.0,
        }
    }
}

impl LodPolicy {
    /// Size thresholds only, without the full-detail override
    pub fn by_size() -> Self {
        Self {
            always_full: false,
            ..Self::default()
        }
    }

    pub fn select(&self, screen_size: f32) -> DetailTier {
        if self.always_full || screen_size >= self.full_min_px {
            DetailTier::Full
        } else if screen_size >= self.simplified_min_px {
            DetailTier::Simplified
        } else {
            DetailTier::Dot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_always_full() {
        let policy = LodPolicy::default();
        assert_eq!(policy.select(0.1), DetailTier::Full);
        assert_eq!(policy.select(1000.0), DetailTier::Full);
    }

    #[test]
    fn test_size_tiers() {
        let policy = LodPolicy::by_size();
        assert_eq!(policy.select(200.0), DetailTier::Full);
        assert_eq!(policy.select(48.0), DetailTier::Full);
        assert_eq!(policy.select(20.0), DetailTier::Simplified);
        assert_eq!(policy.select(4.0), DetailTier::Simplified);
        assert_eq!(policy.select(1.5), DetailTier::Dot);
    }

    #[test]
    fn test_partial_config() {
        let policy: LodPolicy = serde_json::from_str(r#"{"always_full": false}"#).unwrap();
        assert_eq!(policy, LodPolicy::by_size());
    }
}
