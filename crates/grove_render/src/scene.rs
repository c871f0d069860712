use glam::Vec2;
use grove_procgen::{generate_tree, simplified_tree, tree_dot, Color, DrawCommand, TreeInstance};

use crate::camera::Camera2D;
use crate::cull::{ViewBounds, CULL_MARGIN};
use crate::lod::{DetailTier, LodPolicy};

pub const SKY: Color = Color::rgb(0xe8, 0xf4, 0xfd);

/// Everything a surface needs to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub camera: Camera2D,
    pub clear: Color,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn empty(camera: Camera2D) -> Self {
        Self {
            camera,
            clear: SKY,
            commands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub culled: usize,
    pub full: usize,
    pub simplified: usize,
    pub dots: usize,
}

/// Build a frame from positioned trees.
///
/// Trees whose footprint falls outside the viewport (plus margin) are
/// skipped before any generation work, so culling costs nothing per tree
/// and never disturbs the shape of the trees that are drawn.
pub fn compose_frame<'a, I>(trees: I, camera: Camera2D, viewport: Vec2, lod: &LodPolicy) -> (Frame, FrameStats)
where
    I: IntoIterator<Item = (&'a TreeInstance, Vec2)>,
{
    let bounds = ViewBounds::new(viewport.x, viewport.y, CULL_MARGIN);
    let mut frame = Frame::empty(camera);
    let mut stats = FrameStats::default();

    for (instance, origin) in trees {
        let footprint = ViewBounds::tree_footprint(origin, instance.max_reach());
        let on_screen = ViewBounds::project(&camera, &footprint);
        if !bounds.is_visible(&on_screen) {
            stats.culled += 1;
            continue;
        }

        stats.drawn += 1;
        match lod.select(on_screen.size().x) {
            DetailTier::Full => {
                stats.full += 1;
                frame.commands.extend(generate_tree(instance, origin).commands);
            }
            DetailTier::Simplified => {
                stats.simplified += 1;
                frame.commands.extend(simplified_tree(instance, origin));
            }
            DetailTier::Dot => {
                stats.dots += 1;
                frame.commands.push(tree_dot(instance, origin));
            }
        }
    }

    (frame, stats)
}
