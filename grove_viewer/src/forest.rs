use std::path::Path;

use grove_procgen::{Decay, TreeInstance, MAX_DEPTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, ViewerConfig};

/// Parse a JSON array of trees. Missing optional fields take their defaults
/// and out-of-range growth or decay is clamped.
pub fn parse_forest(path: &Path, text: &str) -> Result<Vec<TreeInstance>, ConfigError> {
    let trees: Vec<TreeInstance> = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(trees.into_iter().map(TreeInstance::normalized).collect())
}

pub fn load_forest(path: &Path) -> Result<Vec<TreeInstance>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_forest(path, &text)
}

/// Trees at assorted growth stages with a few withered ones mixed in
pub fn demo_forest(count: usize, rng: &mut impl Rng) -> Vec<TreeInstance> {
    (0..count)
        .map(|_| {
            let decay = match rng.gen_range(0..10) {
                0 => Decay::Dying,
                1 | 2 => Decay::Withered,
                _ => Decay::Healthy,
            };
            TreeInstance::new(rng.gen())
                .with_growth(rng.gen_range(1..=MAX_DEPTH))
                .with_decay(decay)
        })
        .collect()
}

/// The configured forest file, or a demo forest when none is set
pub fn initial_forest(config: &ViewerConfig) -> Result<Vec<TreeInstance>, ConfigError> {
    if let Some(path) = &config.forest_file {
        let trees = load_forest(path)?;
        log::info!("Loaded {} trees from {}", trees.len(), path.display());
        return Ok(trees);
    }

    let mut rng = match config.demo_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let trees = demo_forest(config.demo_trees, &mut rng);
    log::info!("Generated demo forest of {} trees", trees.len());
    Ok(trees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forest_file() {
        let json = r#"[
            { "seed": 12, "growthDepth": 4, "decayLevel": 1 },
            { "seed": 7, "growthDepth": 40 }
        ]"#;
        let trees = parse_forest(Path::new("forest.json"), json).unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].seed, 12);
        assert_eq!(trees[0].decay, Decay::Withered);
        assert_eq!(trees[1].growth_depth, MAX_DEPTH);
        assert_eq!(trees[1].decay, Decay::Healthy);
    }

    #[test]
    fn test_parse_forest_rejects_bad_decay() {
        let json = r#"[{ "seed": 1, "growthDepth": 2, "decayLevel": 9 }]"#;
        assert!(matches!(
            parse_forest(Path::new("forest.json"), json),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_demo_forest_is_reproducible() {
        let first = demo_forest(30, &mut StdRng::seed_from_u64(5));
        let second = demo_forest(30, &mut StdRng::seed_from_u64(5));
        assert_eq!(first, second);
        assert!(first.iter().all(|t| (1..=MAX_DEPTH).contains(&t.growth_depth)));
    }

    #[test]
    fn test_initial_forest_uses_demo_seed() {
        let config = ViewerConfig {
            demo_trees: 6,
            demo_seed: Some(42),
            ..ViewerConfig::default()
        };
        let trees = initial_forest(&config).unwrap();
        assert_eq!(trees.len(), 6);
        assert_eq!(trees, initial_forest(&config).unwrap());
    }
}
