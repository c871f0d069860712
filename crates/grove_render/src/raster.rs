use std::path::Path;

use glam::Vec2;
use grove_procgen::{Color, DrawCommand};
use image::{Rgba, RgbaImage};

use crate::camera::Camera2D;
use crate::error::Result;
use crate::scene::Frame;
use crate::surface::{Dimensions, Surface};

/// CPU rasterizer behind both the window blit and headless snapshots.
///
/// Applies the frame camera once per frame: positions, stroke widths and
/// radii all scale with zoom, except dots which stay one pixel.
pub struct PixelSurface {
    image: RgbaImage,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA8 rows, top to bottom
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Some(Color { r, g, b, a })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        let fill = Rgba(color.to_array());
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    fn draw(&mut self, camera: &Camera2D, command: &DrawCommand) {
        match *command {
            DrawCommand::Line { from, to, width, color } => {
                let radius = (camera.world_len_to_screen(width) * 0.5).max(0.5);
                self.fill_capsule(camera.world_to_screen(from), camera.world_to_screen(to), radius, color);
            }
            DrawCommand::Circle { center, radius, color } => {
                let center = camera.world_to_screen(center);
                let radius = camera.world_len_to_screen(radius).max(0.5);
                self.fill_capsule(center, center, radius, color);
            }
            DrawCommand::Dot { at, color } => {
                let at = camera.world_to_screen(at).floor();
                if at.x >= 0.0 && at.y >= 0.0 {
                    self.blend(at.x as u32, at.y as u32, color);
                }
            }
        }
    }

    /// Every pixel whose center lies within `radius` of segment `a..b`
    fn fill_capsule(&mut self, a: Vec2, b: Vec2, radius: f32, color: Color) {
        let (width, height) = self.image.dimensions();
        let min = (a.min(b) - Vec2::splat(radius)).floor().max(Vec2::ZERO);
        let max = (a.max(b) + Vec2::splat(radius)).ceil().min(Vec2::new(width as f32, height as f32));
        if min.x >= max.x || min.y >= max.y {
            return;
        }

        let segment = b - a;
        let length_sq = segment.length_squared();
        let radius_sq = radius * radius;

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if length_sq > 0.0 {
                    ((p - a).dot(segment) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if p.distance_squared(a + segment * t) <= radius_sq {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn blend(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        let pixel = self.image.get_pixel_mut(x, y);
        if color.a == 255 {
            *pixel = Rgba(color.to_array());
            return;
        }
        let alpha = color.a as f32 / 255.0;
        let src = color.to_array();
        for channel in 0..3 {
            let dst = pixel.0[channel] as f32;
            pixel.0[channel] = (src[channel] as f32 * alpha + dst * (1.0 - alpha)).round() as u8;
        }
        pixel.0[3] = pixel.0[3].max(color.a);
    }
}

impl Surface for PixelSurface {
    fn resize(&mut self, size: Dimensions) {
        if self.image.dimensions() != (size.width, size.height) {
            self.image = RgbaImage::new(size.width, size.height);
        }
    }

    fn size(&self) -> Dimensions {
        let (width, height) = self.image.dimensions();
        Dimensions::new(width, height)
    }

    fn present(&mut self, frame: &Frame) {
        self.clear(frame.clear);
        for command in &frame.commands {
            self.draw(&frame.camera, command);
        }
    }
}
