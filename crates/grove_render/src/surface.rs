use crate::raster::PixelSurface;
use crate::scene::Frame;

/// Pixel dimensions of a container or surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Forest-wide tree scale for this viewport size
    pub fn auto_scale(&self) -> Option<f32> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.width.min(self.height) as f32 / 800.0)
    }
}

/// Handle returned by [`Container::subscribe_resize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Something that paints frames
pub trait Surface {
    /// Reallocate the backing store
    fn resize(&mut self, size: Dimensions);

    fn size(&self) -> Dimensions;

    /// Paint one frame, replacing whatever was there
    fn present(&mut self, frame: &Frame);
}

/// Host a renderer lives in: it knows its size, hands out a drawing
/// surface, and tracks who wants resize notifications.
pub trait Container {
    type Surface: Surface;

    fn dimensions(&self) -> Dimensions;

    /// `None` when no drawing context is available
    fn attach_surface(&mut self) -> Option<Self::Surface>;

    fn subscribe_resize(&mut self) -> SubscriptionId;

    fn unsubscribe_resize(&mut self, id: SubscriptionId);
}

impl<T: Container + ?Sized> Container for &mut T {
    type Surface = T::Surface;

    fn dimensions(&self) -> Dimensions {
        (**self).dimensions()
    }

    fn attach_surface(&mut self) -> Option<Self::Surface> {
        (**self).attach_surface()
    }

    fn subscribe_resize(&mut self) -> SubscriptionId {
        (**self).subscribe_resize()
    }

    fn unsubscribe_resize(&mut self, id: SubscriptionId) {
        (**self).unsubscribe_resize(id)
    }
}

/// Book-keeping for resize subscribers, shared by container implementations
#[derive(Debug, Default)]
pub struct ResizeListeners {
    next_id: u64,
    active: Vec<SubscriptionId>,
}

impl ResizeListeners {
    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.active.push(id);
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.active.retain(|active| *active != id);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Off-screen container rendering into a [`PixelSurface`].
///
/// Used for snapshots and tests; `set_dimensions` stands in for a window
/// resize.
#[derive(Debug, Default)]
pub struct HeadlessContainer {
    size: Dimensions,
    listeners: ResizeListeners,
}

impl HeadlessContainer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Dimensions::new(width, height),
            listeners: ResizeListeners::default(),
        }
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.size = Dimensions::new(width, height);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Container for HeadlessContainer {
    type Surface = PixelSurface;

    fn dimensions(&self) -> Dimensions {
        self.size
    }

    fn attach_surface(&mut self) -> Option<PixelSurface> {
        Some(PixelSurface::new(self.size.width, self.size.height))
    }

    fn subscribe_resize(&mut self) -> SubscriptionId {
        self.listeners.subscribe()
    }

    fn unsubscribe_resize(&mut self, id: SubscriptionId) {
        self.listeners.unsubscribe(id);
    }
}
