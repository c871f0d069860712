use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::draw::DrawCommand;
use crate::palette::{Decay, FruitKind, Palette};
use crate::rng::ParkMiller;

/// Deepest recursion level a tree can reach; also the taper base for
/// branch length and width.
pub const MAX_DEPTH: u32 = 11;

/// Trunk length before taper and scale
const TRUNK_LENGTH: f32 = 3.0;
/// Upper bound (exclusive) of a random branch length before taper and scale
const MAX_BRANCH_LENGTH: f32 = 11.0;
/// Child split angle range in degrees
const SPLIT_ANGLE_MIN: f32 = 15.0;
const SPLIT_ANGLE_MAX: f32 = 23.0;
/// Chance that a branch on the fruit tier bears fruit
const FRUIT_CHANCE: f32 = 0.05;
/// Fruit sits this far past the branch tip, in leaf radii
const FRUIT_OFFSET: f32 = 0.5;

const DEFAULT_LEAF_SIZE: f32 = 3.0;
const DEFAULT_BRANCH_WIDTH: f32 = 0.8;

/// One tree as supplied by the caller and mutated by lifecycle commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeInstance {
    pub seed: u32,
    #[serde(default)]
    pub growth_depth: u32,
    #[serde(default, rename = "decayLevel")]
    pub decay: Decay,
    #[serde(default = "default_leaf_size")]
    pub leaf_size: f32,
    #[serde(default = "default_branch_width")]
    pub branch_width_factor: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_leaf_size() -> f32 {
    DEFAULT_LEAF_SIZE
}

fn default_branch_width() -> f32 {
    DEFAULT_BRANCH_WIDTH
}

fn default_scale() -> f32 {
    1.0
}

impl TreeInstance {
    /// A healthy sapling with nothing drawn yet
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            growth_depth: 0,
            decay: Decay::Healthy,
            leaf_size: DEFAULT_LEAF_SIZE,
            branch_width_factor: DEFAULT_BRANCH_WIDTH,
            scale: 1.0,
        }
    }

    pub fn with_growth(mut self, growth_depth: u32) -> Self {
        self.growth_depth = growth_depth.min(MAX_DEPTH);
        self
    }

    pub fn with_decay(mut self, decay: Decay) -> Self {
        self.decay = decay;
        self
    }

    /// Clamp fields that arrive out of range from external tree lists.
    pub fn normalized(mut self) -> Self {
        self.growth_depth = self.growth_depth.min(MAX_DEPTH);
        if !self.scale.is_finite() || self.scale <= 0.0 {
            self.scale = 1.0;
        }
        self
    }

    pub fn is_fully_grown(&self) -> bool {
        self.growth_depth >= MAX_DEPTH
    }

    /// Scale used for this render pass; withering shrinks the tree.
    pub fn effective_scale(&self) -> f32 {
        self.scale / self.decay.shrink_divisor()
    }

    /// Grow one level. Growing also heals one level of decay.
    ///
    /// Returns false without touching anything when already fully grown.
    pub fn grow(&mut self) -> bool {
        if self.is_fully_grown() {
            return false;
        }
        self.growth_depth += 1;
        self.leaf_size += 1.0;
        self.decay = self.decay.heal();
        true
    }

    /// Wither one level. Returns false at the cap.
    pub fn wither(&mut self) -> bool {
        match self.decay.worsen() {
            Some(next) => {
                self.decay = next;
                true
            }
            None => false,
        }
    }

    fn fruit_radius(&self) -> f32 {
        (self.leaf_size * 0.6).max(2.0)
    }

    /// Upper bound on the distance from the origin to anything this tree
    /// draws at its current growth, in world units.
    pub fn max_reach(&self) -> f32 {
        let scale = self.effective_scale();
        let mut length = 0.0;
        for depth in 0..self.growth_depth {
            let base = if depth == 0 { TRUNK_LENGTH } else { MAX_BRANCH_LENGTH };
            length += base * (MAX_DEPTH - depth) as f32;
        }
        let fruit = self.fruit_radius() * (1.0 + FRUIT_OFFSET);
        let stroke = MAX_DEPTH as f32 * self.branch_width_factor * 0.5;
        length * scale + self.leaf_size.max(fruit).max(stroke)
    }
}

/// A drawn branch, kept only for the duration of one generation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
    pub depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf {
    pub center: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fruit {
    pub center: Vec2,
    pub radius: f32,
    pub kind: FruitKind,
}

/// Output of one full-detail generation pass
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTree {
    pub branches: Vec<BranchSegment>,
    pub leaves: Vec<Leaf>,
    pub fruit: Vec<Fruit>,
    /// Draw commands in paint order
    pub commands: Vec<DrawCommand>,
    /// Smallest Y reached by any branch tip (Y grows downwards)
    pub tree_top: f32,
}

impl GeneratedTree {
    pub fn branches_at_depth(&self, depth: u32) -> usize {
        self.branches.iter().filter(|b| b.depth == depth).count()
    }
}

struct Grower<'a> {
    instance: &'a TreeInstance,
    rng: ParkMiller,
    scale: f32,
    palette: Palette,
    fruit_kind: FruitKind,
    out: GeneratedTree,
}

impl Grower<'_> {
    fn branch(&mut self, start: Vec2, angle: f32, depth: u32) {
        if depth >= self.instance.growth_depth {
            return;
        }

        let taper = (MAX_DEPTH - depth) as f32;
        let base = if depth == 0 {
            TRUNK_LENGTH
        } else {
            self.rng.range(0.0, MAX_BRANCH_LENGTH)
        };
        let direction = Vec2::from_angle(angle.to_radians());
        let end = start + direction * base * self.scale * taper;
        let width = taper * self.instance.branch_width_factor;

        self.out.branches.push(BranchSegment { start, end, width, depth });
        self.out.commands.push(DrawCommand::Line {
            from: start,
            to: end,
            width,
            color: self.palette.trunk,
        });
        self.out.tree_top = self.out.tree_top.min(end.y);

        if depth + 1 == self.instance.growth_depth {
            let leaf = Leaf { center: end, radius: self.instance.leaf_size };
            self.out.leaves.push(leaf);
            self.out.commands.push(DrawCommand::Circle {
                center: leaf.center,
                radius: leaf.radius,
                color: self.palette.leaf,
            });
        }

        // Fruit hangs off the global last tier, so only fully grown trees bear it.
        // The roll is drawn regardless of decay to keep the layout decay-independent.
        if depth == MAX_DEPTH - 1 {
            let bears = self.rng.chance(FRUIT_CHANCE);
            if bears && self.instance.decay == Decay::Healthy {
                self.place_fruit(end, direction);
            }
        }

        let left = self.rng.range(SPLIT_ANGLE_MIN, SPLIT_ANGLE_MAX);
        self.branch(end, angle - left, depth + 1);
        let right = self.rng.range(SPLIT_ANGLE_MIN, SPLIT_ANGLE_MAX);
        self.branch(end, angle + right, depth + 1);
    }

    fn place_fruit(&mut self, tip: Vec2, direction: Vec2) {
        let radius = self.instance.fruit_radius();
        let center = tip + direction * radius * FRUIT_OFFSET;
        let kind = self.fruit_kind;
        self.out.fruit.push(Fruit { center, radius, kind });
        self.out.commands.push(DrawCommand::Circle { center, radius, color: kind.skin() });
        self.out.commands.push(DrawCommand::Circle {
            center: center - Vec2::splat(radius * 0.3),
            radius: radius * 0.4,
            color: kind.highlight(),
        });
    }
}

/// Generate the full recursive tree for `instance` rooted at `origin`.
///
/// Pure: the same instance and origin always yield the same output, and a
/// fresh generator is seeded from `instance.seed` on every call.
pub fn generate_tree(instance: &TreeInstance, origin: Vec2) -> GeneratedTree {
    let mut rng = ParkMiller::new(instance.seed);
    let fruit_kind = if rng.chance(0.5) { FruitKind::Red } else { FruitKind::Orange };

    let mut grower = Grower {
        instance,
        rng,
        scale: instance.effective_scale(),
        palette: instance.decay.palette(),
        fruit_kind,
        out: GeneratedTree {
            branches: Vec::new(),
            leaves: Vec::new(),
            fruit: Vec::new(),
            commands: Vec::new(),
            tree_top: origin.y,
        },
    };
    grower.branch(origin, -90.0, 0);
    grower.out
}

/// Mid-distance stand-in: trunk and two angled strokes, no recursion and
/// no random draws.
pub fn simplified_tree(instance: &TreeInstance, origin: Vec2) -> Vec<DrawCommand> {
    if instance.growth_depth == 0 {
        return Vec::new();
    }

    let color = instance.decay.palette().trunk;
    let reach = instance.max_reach();
    let width = MAX_DEPTH as f32 * instance.branch_width_factor;
    let top = origin - Vec2::Y * reach * 0.5;
    let arm = reach * 0.35;

    vec![
        DrawCommand::Line { from: origin, to: top, width, color },
        DrawCommand::Line {
            from: top,
            to: top + Vec2::from_angle((-90.0f32 - 30.0).to_radians()) * arm,
            width: width * 0.5,
            color,
        },
        DrawCommand::Line {
            from: top,
            to: top + Vec2::from_angle((-90.0f32 + 30.0).to_radians()) * arm,
            width: width * 0.5,
            color,
        },
    ]
}

/// Far-distance stand-in: one screen pixel in trunk colour.
pub fn tree_dot(instance: &TreeInstance, origin: Vec2) -> DrawCommand {
    DrawCommand::Dot { at: origin, color: instance.decay.palette().trunk }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grown(seed: u32, depth: u32) -> TreeInstance {
        TreeInstance::new(seed).with_growth(depth)
    }

    #[test]
    fn test_seedling_draws_nothing() {
        let tree = generate_tree(&grown(12, 0), Vec2::ZERO);
        assert!(tree.branches.is_empty());
        assert!(tree.commands.is_empty());
        assert_eq!(tree.tree_top, 0.0);
    }

    #[test]
    fn test_first_levels() {
        let trunk_only = generate_tree(&grown(12, 1), Vec2::ZERO);
        assert_eq!(trunk_only.branches.len(), 1);
        assert_eq!(trunk_only.branches_at_depth(0), 1);
        assert_eq!(trunk_only.leaves.len(), 1);

        let forked = generate_tree(&grown(12, 2), Vec2::ZERO);
        assert_eq!(forked.branches_at_depth(0), 1);
        assert_eq!(forked.branches_at_depth(1), 2);
        assert_eq!(forked.leaves.len(), 2);
    }

    #[test]
    fn test_binary_branch_counts() {
        let tree = generate_tree(&grown(7, 6), Vec2::ZERO);
        for depth in 0..6 {
            assert_eq!(tree.branches_at_depth(depth), 1 << depth);
        }
        assert_eq!(tree.branches.len(), (1 << 6) - 1);
        assert_eq!(tree.leaves.len(), 1 << 5);
    }

    #[test]
    fn test_trunk_points_up() {
        let tree = generate_tree(&grown(99, 1), Vec2::new(10.0, 100.0));
        let trunk = tree.branches[0];
        assert!((trunk.end.x - 10.0).abs() < 1e-3);
        let expected = 100.0 - TRUNK_LENGTH * MAX_DEPTH as f32;
        assert!((trunk.end.y - expected).abs() < 1e-3);
        assert_eq!(tree.tree_top, trunk.end.y);
        assert_eq!(trunk.width, MAX_DEPTH as f32 * DEFAULT_BRANCH_WIDTH);
    }

    #[test]
    fn test_withering_shrinks() {
        let healthy = generate_tree(&grown(5, 1), Vec2::ZERO);
        let dying = generate_tree(&grown(5, 1).with_decay(Decay::Dying), Vec2::ZERO);
        let healthy_len = healthy.branches[0].end.length();
        let dying_len = dying.branches[0].end.length();
        assert!((healthy_len / dying_len - 3.0).abs() < 1e-3);
        assert_eq!(dying.commands[0].color(), Palette::DYING.trunk);
    }

    #[test]
    fn test_fruit_only_when_fully_grown() {
        let partial = (0..200).map(|seed| generate_tree(&grown(seed, MAX_DEPTH - 1), Vec2::ZERO));
        assert!(partial.into_iter().all(|t| t.fruit.is_empty()));

        let full = (0..20).map(|seed| generate_tree(&grown(seed, MAX_DEPTH), Vec2::ZERO));
        let fruit: usize = full.map(|t| t.fruit.len()).sum();
        // 1024 branches on the fruit tier per tree at 5%
        assert!(fruit > 0);
    }

    #[test]
    fn test_decayed_trees_never_fruit() {
        for seed in 0..20 {
            for decay in [Decay::Withered, Decay::Dying] {
                let tree = generate_tree(&grown(seed, MAX_DEPTH).with_decay(decay), Vec2::ZERO);
                assert!(tree.fruit.is_empty());
            }
        }
    }

    #[test]
    fn test_layout_independent_of_decay() {
        let healthy = generate_tree(&grown(31, MAX_DEPTH), Vec2::ZERO);
        let withered = generate_tree(&grown(31, MAX_DEPTH).with_decay(Decay::Withered), Vec2::ZERO);
        assert_eq!(healthy.branches.len(), withered.branches.len());
        for (h, w) in healthy.branches.iter().zip(&withered.branches) {
            // Same directions, shorter lengths
            let hd = (h.end - h.start).normalize_or_zero();
            let wd = (w.end - w.start).normalize_or_zero();
            assert!(hd.abs_diff_eq(wd, 1e-4));
        }
    }

    #[test]
    fn test_reach_bounds_geometry() {
        for seed in 0..30 {
            let instance = grown(seed, MAX_DEPTH);
            let tree = generate_tree(&instance, Vec2::ZERO);
            let reach = instance.max_reach();
            for branch in &tree.branches {
                assert!(branch.end.length() <= reach);
            }
            for fruit in &tree.fruit {
                assert!(fruit.center.length() + fruit.radius <= reach);
            }
        }
    }

    #[test]
    fn test_simplified_and_dot() {
        let instance = grown(3, 4).with_decay(Decay::Withered);
        let simple = simplified_tree(&instance, Vec2::ZERO);
        assert_eq!(simple.len(), 3);
        assert!(simple.iter().all(|c| c.color() == Palette::WITHERED.trunk));
        assert!(simplified_tree(&grown(3, 0), Vec2::ZERO).is_empty());

        match tree_dot(&instance, Vec2::new(4.0, 5.0)) {
            DrawCommand::Dot { at, color } => {
                assert_eq!(at, Vec2::new(4.0, 5.0));
                assert_eq!(color, Palette::WITHERED.trunk);
            }
            other => panic!("expected a dot, got {other:?}"),
        }
    }

    #[test]
    fn test_grow_and_wither_bounds() {
        let mut tree = TreeInstance::new(1);
        let mut grown_levels = 0;
        for _ in 0..50 {
            if tree.grow() {
                grown_levels += 1;
            }
        }
        assert_eq!(grown_levels, MAX_DEPTH);
        assert_eq!(tree.growth_depth, MAX_DEPTH);
        assert_eq!(tree.leaf_size, DEFAULT_LEAF_SIZE + MAX_DEPTH as f32);

        let mut tree = TreeInstance::new(1);
        assert!(tree.wither());
        assert!(tree.wither());
        assert!(!tree.wither());
        assert_eq!(tree.decay, Decay::Dying);
        assert!(tree.grow());
        assert_eq!(tree.decay, Decay::Withered);
        assert!(tree.grow());
        assert!(tree.grow());
        assert_eq!(tree.decay, Decay::Healthy);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"seed": 42, "growthDepth": 3, "decayLevel": 1}"#;
        let tree: TreeInstance = serde_json::from_str(json).unwrap();
        assert_eq!(tree.seed, 42);
        assert_eq!(tree.growth_depth, 3);
        assert_eq!(tree.decay, Decay::Withered);
        assert_eq!(tree.leaf_size, DEFAULT_LEAF_SIZE);
        assert_eq!(tree.scale, 1.0);

        let json = r#"{"seed": 1, "growthDepth": 40, "scale": 0}"#;
        let tree: TreeInstance = serde_json::from_str::<TreeInstance>(json).unwrap().normalized();
        assert_eq!(tree.growth_depth, MAX_DEPTH);
        assert_eq!(tree.scale, 1.0);
    }

    proptest! {
        #[test]
        fn prop_generation_is_deterministic(seed in any::<u32>(), depth in 0..=8u32, decay in 0..=2u8, scale in 0.1f32..3.0) {
            let instance = TreeInstance {
                scale,
                decay: Decay::try_from(decay).unwrap(),
                ..grown(seed, depth)
            };
            let a = generate_tree(&instance, Vec2::new(50.0, 80.0));
            let b = generate_tree(&instance, Vec2::new(50.0, 80.0));
            prop_assert_eq!(a, b);
        }
    }
}
