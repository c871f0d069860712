use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use grove_render::{GraphicsContext, TreeRenderer};
use winit::{
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowBuilder,
};

pub mod container;
pub mod pointer;

pub use container::WindowContainer;
pub use pointer::PointerTranslator;

// Re-export winit key types for use in viewer code
pub use winit::keyboard::KeyCode;

/// Renderer type the windowed shell drives
pub type WindowRenderer = TreeRenderer<WindowContainer>;

/// What the key callback wants the event loop to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    /// Key was ignored, nothing changed
    Ignored,
    /// State changed, present the new frame
    Redraw,
    Exit,
}

type KeyCallback = Box<dyn FnMut(KeyCode, &mut WindowRenderer) -> AppControl + 'static>;

/// Main application structure that owns the window and the event loop
pub struct App {
    title: String,
    width: u32,
    height: u32,
    key_callback: Option<KeyCallback>,
}

impl App {
    /// Create a new App with the specified title and dimensions
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            key_callback: None,
        }
    }

    /// Set the callback invoked for every key press (repeats excluded)
    pub fn set_key_callback<F>(&mut self, callback: F)
    where
        F: FnMut(KeyCode, &mut WindowRenderer) -> AppControl + 'static,
    {
        self.key_callback = Some(Box::new(callback));
    }

    /// Run the event loop until the window closes.
    ///
    /// `build` receives the window's container and constructs the renderer
    /// that lives for the rest of the loop.
    pub fn run<F>(mut self, build: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: FnOnce(WindowContainer) -> grove_render::Result<WindowRenderer>,
    {
        // Entry points may already have installed a logger
        let _ = env_logger::try_init();

        let event_loop = EventLoop::new()?;

        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::PhysicalSize::new(self.width, self.height))
                .build(&event_loop)?,
        );
        let size = window.inner_size();
        log::info!("Window created: {} ({}x{})", self.title, size.width, size.height);

        let mut renderer = build(WindowContainer::new(size.width, size.height))?;
        let mut graphics_context = GraphicsContext::new(window.clone())?;
        let mut pointer = PointerTranslator::new();

        window.request_redraw();

        let result = event_loop.run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            let Event::WindowEvent { event, .. } = event else {
                return;
            };

            let input = match event {
                WindowEvent::CloseRequested => {
                    log::info!("Close requested, exiting...");
                    elwt.exit();
                    None
                }
                WindowEvent::Resized(physical_size) => {
                    graphics_context.resize(physical_size);
                    renderer
                        .container_mut()
                        .set_dimensions(physical_size.width, physical_size.height);
                    renderer.resize();
                    window.request_redraw();
                    None
                }
                WindowEvent::CursorMoved { position, .. } => {
                    Some(pointer.cursor_moved(Vec2::new(position.x as f32, position.y as f32)))
                }
                WindowEvent::MouseInput { state, button, .. } => pointer.mouse_button(button, state),
                WindowEvent::MouseWheel { delta, .. } => pointer.wheel(delta),
                WindowEvent::Touch(touch) => {
                    let location = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                    Some(pointer.touch(touch.id, touch.phase, location))
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed && !event.repeat {
                        if let (PhysicalKey::Code(code), Some(callback)) = (event.physical_key, &mut self.key_callback) {
                            match callback(code, &mut renderer) {
                                AppControl::Ignored => {}
                                AppControl::Redraw => window.request_redraw(),
                                AppControl::Exit => {
                                    log::info!("Exit requested, exiting...");
                                    elwt.exit();
                                }
                            }
                        }
                    }
                    None
                }
                WindowEvent::RedrawRequested => {
                    match graphics_context.present(renderer.surface()) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            graphics_context.reconfigure();
                            window.request_redraw();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory, exiting...");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("Dropped frame: {}", e),
                    }
                    None
                }
                _ => None,
            };

            if let Some(input) = input {
                if renderer.handle_input(&input, Instant::now()) {
                    window.request_redraw();
                }
            }
        });

        result.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}
