use std::time::{Duration, Instant};

use glam::Vec2;
use grove_procgen::TreeInstance;
use serde::{Deserialize, Serialize};

use crate::camera::{wheel_zoom_factor, Camera2D};
use crate::error::{RenderError, Result};
use crate::forest::ForestLayout;
use crate::input::{CameraAction, GestureTracker, InputEvent};
use crate::lod::LodPolicy;
use crate::scene::{compose_frame, Frame, FrameStats};
use crate::surface::{Container, Dimensions, Surface, SubscriptionId};

/// Synthetic wheel delta applied after every growth step: a slight
/// zoom-out anchored at the bottom-center, so the taller tree stays in view.
const GROW_NUDGE_DELTA: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One tree growing from the bottom edge of the viewport
    MainTree,
    /// Every tree on a grid
    Forest,
}

/// Resize events closer than this to the current size are ignored.
/// The height allowance absorbs mobile browser chrome sliding in and out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeTolerance {
    pub width: u32,
    pub height: u32,
}

impl Default for ResizeTolerance {
    fn default() -> Self {
        Self { width: 10, height: 80 }
    }
}

impl ResizeTolerance {
    pub fn absorbs(&self, current: Dimensions, next: Dimensions) -> bool {
        current.width.abs_diff(next.width) <= self.width && current.height.abs_diff(next.height) <= self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    pub throttle_ms: u64,
    pub resize_tolerance: ResizeTolerance,
    pub lod: LodPolicy,
    /// Distance in pixels between the main tree's base and the bottom edge
    pub ground_margin: f32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            throttle_ms: 16,
            resize_tolerance: ResizeTolerance::default(),
            lod: LodPolicy::default(),
            ground_margin: 20.0,
        }
    }
}

/// Everything that gets rebuilt from scratch on reset
struct ViewState<S> {
    surface: S,
    mode: ViewMode,
    options: RendererOptions,
    instances: Vec<TreeInstance>,
    layout: ForestLayout,
    camera: Camera2D,
    gestures: GestureTracker,
    viewport: Dimensions,
    auto_scale: f32,
    /// Forest: bounding box centered. Main tree: base pinned to the ground.
    centered: bool,
    loading: bool,
    focused: Option<u32>,
    stats: FrameStats,
}

impl<S: Surface> ViewState<S> {
    fn new(surface: S, instances: Vec<TreeInstance>, mode: ViewMode, options: RendererOptions) -> Self {
        let instances: Vec<TreeInstance> = instances.into_iter().map(TreeInstance::normalized).collect();
        let layout = layout_for(mode, instances.len());
        let gestures = GestureTracker::new(Duration::from_millis(options.throttle_ms));
        Self {
            surface,
            mode,
            options,
            instances,
            layout,
            camera: Camera2D::default(),
            gestures,
            viewport: Dimensions::default(),
            auto_scale: 1.0,
            centered: false,
            loading: false,
            focused: None,
            stats: FrameStats::default(),
        }
    }

    fn apply_size(&mut self, size: Dimensions) {
        self.viewport = size;
        self.surface.resize(size);
        if let Some(scale) = size.auto_scale() {
            self.auto_scale = scale;
        }
    }

    fn viewport_vec(&self) -> Vec2 {
        Vec2::new(self.viewport.width as f32, self.viewport.height as f32)
    }

    fn main_index(&self) -> Option<usize> {
        if self.instances.is_empty() {
            return None;
        }
        let focused = self
            .focused
            .and_then(|seed| self.instances.iter().position(|t| t.seed == seed));
        Some(focused.unwrap_or(0))
    }

    fn auto_center(&mut self) {
        let viewport = self.viewport_vec();
        match self.mode {
            ViewMode::Forest => {
                if self.centered || self.viewport.is_degenerate() {
                    return;
                }
                if let Some(bounds) = self.layout.bounds() {
                    self.camera.look_at(bounds.center(), viewport * 0.5);
                    self.centered = true;
                    log::debug!("Centered forest of {} trees", self.layout.len());
                }
            }
            ViewMode::MainTree => {
                // Horizontal every frame, vertical only on the first
                self.camera.offset.x = viewport.x * 0.5;
                if !self.centered && !self.viewport.is_degenerate() {
                    self.camera.offset.y = viewport.y - self.options.ground_margin;
                    self.centered = true;
                }
            }
        }
    }

    fn render(&mut self) {
        for instance in &mut self.instances {
            instance.scale = self.auto_scale;
        }
        self.auto_center();

        let (frame, stats) = if self.loading {
            (Frame::empty(self.camera), FrameStats::default())
        } else {
            let viewport = self.viewport_vec();
            match self.mode {
                ViewMode::Forest => {
                    let trees = self.instances.iter().zip(self.layout.positions().iter().copied());
                    compose_frame(trees, self.camera, viewport, &self.options.lod)
                }
                ViewMode::MainTree => {
                    let tree = self.main_index().map(|i| (&self.instances[i], Vec2::ZERO));
                    compose_frame(tree, self.camera, viewport, &self.options.lod)
                }
            }
        };

        self.surface.present(&frame);
        self.stats = stats;
        log::trace!(
            "Frame: {} drawn, {} culled, {} commands",
            stats.drawn,
            stats.culled,
            frame.commands.len()
        );
    }

    fn apply(&mut self, action: CameraAction) -> bool {
        match action {
            CameraAction::Pan(delta) => {
                self.camera.pan(delta);
                delta != Vec2::ZERO
            }
            CameraAction::ZoomAt { point, factor } => self.camera.zoom_at(point, factor),
        }
    }

    fn nudge_zoom(&mut self) {
        let bottom_center = Vec2::new(self.viewport.width as f32 * 0.5, self.viewport.height as f32);
        self.camera.zoom_at(bottom_center, wheel_zoom_factor(GROW_NUDGE_DELTA));
    }
}

fn layout_for(mode: ViewMode, count: usize) -> ForestLayout {
    match mode {
        ViewMode::Forest => ForestLayout::grid(count),
        ViewMode::MainTree => ForestLayout::single(),
    }
}

/// Draws a list of trees into a container and owns them while it lives.
///
/// Every command mutates state and redraws synchronously before returning;
/// there is no animation loop. The renderer subscribes to the container's
/// resize notifications on construction and unsubscribes when reset,
/// disposed or dropped.
pub struct TreeRenderer<C: Container> {
    container: C,
    subscription: SubscriptionId,
    state: ViewState<C::Surface>,
}

impl<C: Container> TreeRenderer<C> {
    pub fn new(instances: Vec<TreeInstance>, mut container: C, mode: ViewMode, options: RendererOptions) -> Result<Self> {
        let surface = container
            .attach_surface()
            .ok_or_else(|| RenderError::Initialization("container has no 2D drawing surface".into()))?;
        let subscription = container.subscribe_resize();

        let size = container.dimensions();
        let mut state = ViewState::new(surface, instances, mode, options);
        state.apply_size(size);
        log::info!(
            "Tree renderer ready: {} trees, {:?} mode, {}x{}",
            state.instances.len(),
            mode,
            size.width,
            size.height
        );
        state.render();

        Ok(Self {
            container,
            subscription,
            state,
        })
    }

    /// Grow the tree with `seed` by one level, heal one level of decay, and
    /// redraw. Returns false (and does not redraw) for unknown seeds or
    /// fully grown trees.
    pub fn grow_one_level(&mut self, seed: u32) -> bool {
        let Some(instance) = self.state.instances.iter_mut().find(|t| t.seed == seed) else {
            log::debug!("grow: no tree with seed {seed}");
            return false;
        };
        if !instance.grow() {
            log::debug!("grow: tree {seed} already fully grown");
            return false;
        }
        log::debug!(
            "Tree {seed} grew to depth {} (decay {})",
            instance.growth_depth,
            instance.decay.level()
        );

        self.state.nudge_zoom();
        self.state.render();
        true
    }

    /// Wither the tree with `seed` by one level and redraw. No-op at the cap.
    pub fn wither_tree(&mut self, seed: u32) -> bool {
        let Some(instance) = self.state.instances.iter_mut().find(|t| t.seed == seed) else {
            log::debug!("wither: no tree with seed {seed}");
            return false;
        };
        if !instance.wither() {
            log::debug!("wither: tree {seed} already dying");
            return false;
        }
        log::debug!("Tree {seed} withered to level {}", instance.decay.level());

        self.state.render();
        true
    }

    /// Pick up the container's current size. Degenerate sizes and changes
    /// within the tolerance are ignored. Returns true when a redraw happened.
    pub fn resize(&mut self) -> bool {
        let next = self.container.dimensions();
        if next.is_degenerate() {
            log::debug!("resize: ignoring degenerate size {}x{}", next.width, next.height);
            return false;
        }
        let current = self.state.viewport;
        if !current.is_degenerate() && self.state.options.resize_tolerance.absorbs(current, next) {
            return false;
        }

        log::info!(
            "Resized {}x{} -> {}x{}",
            current.width,
            current.height,
            next.width,
            next.height
        );
        self.state.apply_size(next);
        self.state.render();
        true
    }

    /// Tear down everything and rebuild against the same container with the
    /// current tree list. The camera, gestures and centering start over.
    pub fn reset(&mut self) -> Result<()> {
        let surface = self
            .container
            .attach_surface()
            .ok_or_else(|| RenderError::Initialization("container has no 2D drawing surface".into()))?;

        self.container.unsubscribe_resize(self.subscription);
        self.subscription = self.container.subscribe_resize();

        let instances = std::mem::take(&mut self.state.instances);
        let mut state = ViewState::new(surface, instances, self.state.mode, self.state.options.clone());
        state.focused = self.state.focused;
        state.apply_size(self.container.dimensions());
        state.render();
        self.state = state;

        log::info!("Tree renderer reset with {} trees", self.state.instances.len());
        Ok(())
    }

    /// Replace the tree list and redraw.
    ///
    /// While `is_loading` the frame is cleared without trees. `focused`
    /// picks the main tree, or in forest mode centers the camera on it.
    pub fn update(&mut self, instances: Vec<TreeInstance>, is_loading: bool, focused: Option<u32>) {
        let state = &mut self.state;
        state.instances = instances.into_iter().map(TreeInstance::normalized).collect();
        state.layout = layout_for(state.mode, state.instances.len());
        state.loading = is_loading;
        state.focused = focused;

        if state.mode == ViewMode::Forest {
            let target = focused
                .and_then(|seed| state.instances.iter().position(|t| t.seed == seed))
                .and_then(|index| state.layout.position(index));
            if let Some(world) = target {
                let viewport = state.viewport_vec();
                state.camera.look_at(world, viewport * 0.5);
                state.centered = true;
            }
        }

        log::debug!("Updated to {} trees (loading: {is_loading})", state.instances.len());
        state.render();
    }

    /// Feed one input event. Returns true when the camera moved and the
    /// frame was redrawn.
    pub fn handle_input(&mut self, event: &InputEvent, now: Instant) -> bool {
        let Some(action) = self.state.gestures.handle(event, now) else {
            return false;
        };
        if !self.state.apply(action) {
            return false;
        }
        self.state.render();
        true
    }

    /// Redraw without changing anything
    pub fn render(&mut self) {
        self.state.render();
    }

    /// Stop listening for resizes and hand the trees back
    pub fn dispose(mut self) -> Vec<TreeInstance> {
        std::mem::take(&mut self.state.instances)
    }

    pub fn instances(&self) -> &[TreeInstance] {
        &self.state.instances
    }

    pub fn find(&self, seed: u32) -> Option<&TreeInstance> {
        self.state.instances.iter().find(|t| t.seed == seed)
    }

    pub fn camera(&self) -> &Camera2D {
        &self.state.camera
    }

    pub fn mode(&self) -> ViewMode {
        self.state.mode
    }

    pub fn focused(&self) -> Option<u32> {
        self.state.focused
    }

    pub fn auto_scale(&self) -> f32 {
        self.state.auto_scale
    }

    pub fn viewport(&self) -> Dimensions {
        self.state.viewport
    }

    pub fn last_frame_stats(&self) -> FrameStats {
        self.state.stats
    }

    pub fn surface(&self) -> &C::Surface {
        &self.state.surface
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }
}

impl<C: Container> Drop for TreeRenderer<C> {
    fn drop(&mut self) {
        self.container.unsubscribe_resize(self.subscription);
        log::debug!("Tree renderer disposed");
    }
}
