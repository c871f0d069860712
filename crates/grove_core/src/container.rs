use grove_render::{Container, Dimensions, PixelSurface, ResizeListeners, SubscriptionId};

/// Container backed by a winit window.
///
/// The event loop feeds it the window's physical size; the renderer reads it
/// back when told to resize.
#[derive(Debug, Default)]
pub struct WindowContainer {
    size: Dimensions,
    listeners: ResizeListeners,
}

impl WindowContainer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Dimensions::new(width, height),
            listeners: ResizeListeners::default(),
        }
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.size = Dimensions::new(width, height);
    }

    /// Whether a renderer is listening for resizes
    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl Container for WindowContainer {
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

#[cfg(test)]
mod tests {
    use super::*;
    use grove_procgen::TreeInstance;
    use grove_render::surface::Surface;
    use grove_render::{RendererOptions, TreeRenderer, ViewMode};

    #[test]
    fn test_surface_matches_window() {
        let mut container = WindowContainer::new(320, 200);
        let surface = container.attach_surface().unwrap();
        assert_eq!(surface.size(), Dimensions::new(320, 200));
    }

    #[test]
    fn test_renderer_follows_window_resize() {
        let container = WindowContainer::new(640, 480);
        let mut renderer = TreeRenderer::new(
            vec![TreeInstance::new(1).with_growth(3)],
            container,
            ViewMode::MainTree,
            RendererOptions::default(),
        )
        .unwrap();
        assert!(renderer.container().has_listeners());

        renderer.container_mut().set_dimensions(1024, 768);
        assert!(renderer.resize());
        assert_eq!(renderer.surface().size(), Dimensions::new(1024, 768));
        renderer.dispose();
    }
}
