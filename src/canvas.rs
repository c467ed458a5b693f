//! Raster canvas: an RGB8 buffer driven by plotters' bitmap backend.
//!
//! All translucent drawing alpha-blends directly onto the opaque buffer
//! (`out = bg * (1 - a) + fg * a`), so the finished buffer is already the
//! composited image and encodes straight to PNG. The buffer is exclusively
//! owned by one generation call; concurrent calls each allocate their own.

use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::prelude::*;

use crate::palette::Rgb;

/// Vertex count used to approximate ellipses with a polygon.
const ELLIPSE_STEPS: u32 = 64;

pub struct Canvas {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Allocate a canvas pre-filled with the opaque background color.
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self> {
        let mut canvas = Canvas {
            buffer: vec![0u8; (width * height * 3) as usize],
            width,
            height,
        };
        {
            let root = BitMapBackend::with_buffer(&mut canvas.buffer, (width, height))
                .into_drawing_area();
            root.fill(&to_plotters(background))
                .context("Failed to fill background")?;
            root.present().context("Failed to present background fill")?;
        }
        Ok(canvas)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opaque axis-aligned rectangle fill.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) -> Result<()> {
        let root =
            BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height)).into_drawing_area();
        root.draw(&Rectangle::new(
            [(x0, y0), (x1, y1)],
            to_plotters(color).filled(),
        ))
        .context("Failed to draw rectangle")?;
        root.present().context("Failed to present rectangle")?;
        Ok(())
    }

    /// Translucent filled polygon.
    pub fn fill_polygon(&mut self, points: &[(i32, i32)], color: Rgb, alpha: f64) -> Result<()> {
        let root =
            BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height)).into_drawing_area();
        root.draw(&Polygon::new(
            points.to_vec(),
            to_plotters(color).mix(alpha).filled(),
        ))
        .context("Failed to draw polygon")?;
        root.present().context("Failed to present polygon")?;
        Ok(())
    }

    /// Full-opacity polygon outline, closed back to the first vertex.
    pub fn stroke_polygon(
        &mut self,
        points: &[(i32, i32)],
        color: Rgb,
        stroke_width: u32,
    ) -> Result<()> {
        let mut path = points.to_vec();
        if let Some(&first) = path.first() {
            path.push(first);
        }
        let root =
            BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height)).into_drawing_area();
        root.draw(&PathElement::new(
            path,
            to_plotters(color).stroke_width(stroke_width),
        ))
        .context("Failed to draw outline")?;
        root.present().context("Failed to present outline")?;
        Ok(())
    }

    /// Translucent filled circle.
    pub fn fill_circle(
        &mut self,
        center: (i32, i32),
        radius: i32,
        color: Rgb,
        alpha: f64,
    ) -> Result<()> {
        let root =
            BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height)).into_drawing_area();
        root.draw(&Circle::new(
            center,
            radius,
            to_plotters(color).mix(alpha).filled(),
        ))
        .context("Failed to draw circle")?;
        root.present().context("Failed to present circle")?;
        Ok(())
    }

    /// Translucent filled axis-aligned ellipse, approximated by a polygon.
    pub fn fill_ellipse(
        &mut self,
        center: (i32, i32),
        rx: i32,
        ry: i32,
        color: Rgb,
        alpha: f64,
    ) -> Result<()> {
        let points: Vec<(i32, i32)> = (0..ELLIPSE_STEPS)
            .map(|k| {
                let angle = std::f64::consts::TAU * k as f64 / ELLIPSE_STEPS as f64;
                (
                    center.0 + (rx as f64 * angle.cos()).round() as i32,
                    center.1 + (ry as f64 * angle.sin()).round() as i32,
                )
            })
            .collect();
        self.fill_polygon(&points, color, alpha)
    }

    /// Finalize and encode the canvas as PNG.
    pub fn into_png(self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(
                    &self.buffer,
                    self.width,
                    self.height,
                    image::ColorType::Rgb8,
                )
                .context("Failed to encode PNG")?;
        }
        Ok(png_bytes)
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = ((y * self.width + x) * 3) as usize;
        Rgb(self.buffer[i], self.buffer[i + 1], self.buffer[i + 2])
    }
}

fn to_plotters(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_fill() {
        let canvas = Canvas::new(16, 16, Rgb(10, 15, 25)).unwrap();
        assert_eq!(canvas.pixel(0, 0), Rgb(10, 15, 25));
        assert_eq!(canvas.pixel(15, 15), Rgb(10, 15, 25));
    }

    #[test]
    fn test_opaque_rect_overwrites() {
        let mut canvas = Canvas::new(16, 16, Rgb(0, 0, 0)).unwrap();
        canvas.fill_rect(0, 0, 8, 8, Rgb(200, 100, 50)).unwrap();
        assert_eq!(canvas.pixel(2, 2), Rgb(200, 100, 50));
        assert_eq!(canvas.pixel(12, 12), Rgb(0, 0, 0));
    }

    #[test]
    fn test_translucent_polygon_blends() {
        let mut canvas = Canvas::new(16, 16, Rgb(0, 0, 0)).unwrap();
        let square = [(0, 0), (15, 0), (15, 15), (0, 15)];
        canvas.fill_polygon(&square, Rgb(255, 255, 255), 0.5).unwrap();
        let px = canvas.pixel(8, 8);
        // Half-alpha white over black lands near mid-gray.
        assert!(px.0 > 100 && px.0 < 155, "got {:?}", px);
    }

    #[test]
    fn test_png_signature() {
        let canvas = Canvas::new(16, 16, Rgb(10, 15, 25)).unwrap();
        let png = canvas.into_png().unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_identical_draws_identical_buffers() {
        let draw = || -> Vec<u8> {
            let mut canvas = Canvas::new(32, 32, Rgb(10, 15, 25)).unwrap();
            canvas
                .fill_polygon(&[(4, 4), (28, 6), (16, 28)], Rgb(255, 99, 132), 0.8)
                .unwrap();
            canvas.fill_circle((16, 16), 4, Rgb(255, 255, 255), 0.5).unwrap();
            canvas.into_png().unwrap()
        };
        assert_eq!(draw(), draw());
    }
}
