use std::path::Path;

use resvg::tiny_skia::{self, Paint, PathBuilder, Pixmap, Rect, Stroke};

use crate::color::Color;
use crate::error::{CanvasError, DrawError};
use crate::font::{FontSpec, TextAlign, TextBaseline};
use crate::transform::Transform;

use super::{all_finite, text_raster, DrawingSurface};

/// Per-save drawing state. Mirrors what a canvas context saves.
#[derive(Debug, Clone)]
struct DrawState {
    transform: Transform,
    fill: Color,
    stroke: Color,
    line_width: f32,
    font: FontSpec,
    align: TextAlign,
    baseline: TextBaseline,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            font: FontSpec::default(),
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
        }
    }
}

/// A raster drawing surface backed by a tiny-skia pixmap.
///
/// A zero-sized surface has no pixmap; every draw call on it is a no-op.
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
    width: u32,
    height: u32,
    client_size: Option<(f32, f32)>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, DrawError> {
        let mut surface = Self {
            pixmap: None,
            width: 0,
            height: 0,
            client_size: None,
            state: DrawState::default(),
            stack: Vec::new(),
        };
        surface.resize(width, height)?;
        Ok(surface)
    }

    /// Report a measured layout size used when the canvas has no explicit size.
    pub fn with_client_size(mut self, width: f32, height: f32) -> Self {
        self.client_size = Some((width, height));
        self
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// The straight-alpha RGBA value of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Copy the backing store into an `image` buffer with straight alpha.
    pub fn to_image(&self) -> crate::Result<image::RgbaImage> {
        let empty = || CanvasError::EmptyBackingStore {
            width: self.width,
            height: self.height,
        };
        let pixmap = self.pixmap.as_ref().ok_or_else(empty)?;
        let data = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        image::RgbaImage::from_raw(self.width, self.height, data).ok_or_else(empty)
    }

    /// Write the backing store to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        let img = self.to_image()?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| CanvasError::Export {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        paint
    }

    fn stroke_path(&mut self, path: tiny_skia::Path) {
        let width = self.state.line_width;
        let paint = Self::paint(self.state.stroke);
        let transform = self.state.transform.to_skia();
        if let Some(pixmap) = self.pixmap.as_mut() {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        if text.is_empty() || !all_finite(&[x, y]) {
            return;
        }
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let state = &self.state;
        let transform = state.transform.to_skia();
        text_raster::rasterize_text(text, &state.font, state.align, state.baseline, |gx, gy, w, h, alpha| {
            let coverage = Color {
                a: color.a * alpha as f32 / 255.0,
                ..color
            };
            if let Some(rect) = Rect::from_xywh(x + gx, y + gy, w, h) {
                pixmap.fill_rect(rect, &Self::paint(coverage), transform, None);
            }
        });
    }
}

/// Canvas rectangles accept negative sizes and extend left/up from the origin.
fn normalized_rect(x: f32, y: f32, width: f32, height: f32) -> Option<Rect> {
    if !all_finite(&[x, y, width, height]) || width == 0.0 || height == 0.0 {
        return None;
    }
    let (left, right) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
    let (top, bottom) = if height < 0.0 { (y + height, y) } else { (y, y + height) };
    Rect::from_ltrb(left, top, right, bottom)
}

impl DrawingSurface for PixmapSurface {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DrawError> {
        self.pixmap = if width == 0 || height == 0 {
            None
        } else {
            Some(Pixmap::new(width, height).ok_or_else(|| {
                DrawError::Surface(format!("cannot allocate a {}x{} backing store", width, height))
            })?)
        };
        self.width = width;
        self.height = height;
        self.state = DrawState::default();
        self.stack.clear();
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn client_size(&self) -> Option<(f32, f32)> {
        self.client_size
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn state_depth(&self) -> usize {
        self.stack.len()
    }

    fn translate(&mut self, x: f32, y: f32) {
        if all_finite(&[x, y]) {
            self.state.transform = self.state.transform.then(&Transform::translate(x, y));
        }
    }

    fn scale(&mut self, x: f32, y: f32) {
        if all_finite(&[x, y]) {
            self.state.transform = self.state.transform.then(&Transform::scale(x, y));
        }
    }

    fn rotate(&mut self, radians: f32) {
        if radians.is_finite() {
            self.state.transform = self.state.transform.then(&Transform::rotate(radians));
        }
    }

    fn set_fill_style(&mut self, color: &str) {
        match Color::parse(color) {
            Some(c) => self.state.fill = c,
            None => log::trace!("Ignoring fill style {:?}", color),
        }
    }

    fn set_stroke_style(&mut self, color: &str) {
        match Color::parse(color) {
            Some(c) => self.state.stroke = c,
            None => log::trace!("Ignoring stroke style {:?}", color),
        }
    }

    fn set_line_width(&mut self, width: f32) {
        // Zero, negative and non-finite widths are ignored.
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let Some(rect) = normalized_rect(x, y, width, height) else {
            return;
        };
        let paint = Self::paint(self.state.fill);
        let transform = self.state.transform.to_skia();
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_rect(rect, &paint, transform, None);
        }
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if let Some(rect) = normalized_rect(x, y, width, height) {
            self.stroke_path(PathBuilder::from_rect(rect));
        }
    }

    fn stroke_line(&mut self, start_x: f32, start_y: f32, end_x: f32, end_y: f32) {
        if !all_finite(&[start_x, start_y, end_x, end_y]) {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(start_x, start_y);
        pb.line_to(end_x, end_y);
        if let Some(path) = pb.finish() {
            self.stroke_path(path);
        }
    }

    fn set_font(&mut self, font: &FontSpec) {
        if font.size.is_finite() && font.size > 0.0 {
            self.state.font = font.clone();
        }
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.draw_text(text, x, y, self.state.fill);
    }

    // Glyph outlines are not exposed by the rasteriser, so stroked text is
    // painted as glyph coverage in the stroke colour.
    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        self.draw_text(text, x, y, self.state.stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_paints_pixels() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.set_fill_style("red");
        surface.fill_rect(2.0, 2.0, 4.0, 4.0);
        assert_eq!(surface.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(8, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn translate_moves_drawing() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.translate(5.0, 5.0);
        surface.fill_rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(surface.pixel(6, 6), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn negative_size_extends_backwards() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.fill_rect(6.0, 6.0, -4.0, -4.0);
        assert_eq!(surface.pixel(3, 3), Some([0, 0, 0, 255]));
    }

    #[test]
    fn nan_geometry_is_ignored() {
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        surface.fill_rect(f32::NAN, 0.0, 4.0, 4.0);
        surface.stroke_line(0.0, 0.0, f32::NAN, 4.0);
        assert!((0..4).all(|x| surface.pixel(x, 1) == Some([0, 0, 0, 0])));
    }

    #[test]
    fn invalid_color_keeps_previous_style() {
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        surface.set_fill_style("#00f");
        surface.set_fill_style("not a color");
        surface.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 255, 255]));
    }

    #[test]
    fn restore_rewinds_style_and_transform() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.save();
        surface.set_fill_style("red");
        surface.translate(5.0, 5.0);
        surface.restore();
        surface.fill_rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn zero_size_surface_is_inert() {
        let mut surface = PixmapSurface::new(0, 0).unwrap();
        surface.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert!(surface.pixmap().is_none());
        assert!(matches!(
            surface.to_image(),
            Err(CanvasError::EmptyBackingStore { .. })
        ));
    }

    #[test]
    fn resize_clears_pixels() {
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        surface.fill_rect(0.0, 0.0, 4.0, 4.0);
        surface.resize(4, 4).unwrap();
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn text_coverage_uses_fill_colour() {
        let mut surface = PixmapSurface::new(40, 20).unwrap();
        surface.set_fill_style("red");
        surface.fill_text("Hi", 2.0, 2.0);
        // Glyphs depend on installed fonts; whatever lands must be red.
        for y in 0..20 {
            for x in 0..40 {
                let [_, g, b, a] = surface.pixel(x, y).unwrap();
                assert!(a == 0 || (g == 0 && b == 0), "pixel {x},{y}");
            }
        }
    }
}
