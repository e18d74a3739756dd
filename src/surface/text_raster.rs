//! Text shaping and glyph coverage through cosmic-text.
//!
//! The font database is loaded once per thread and reused for every frame.

use std::cell::RefCell;

use cosmic_text::{Attrs, Buffer, Color as GlyphColor, FontSystem, Metrics, Shaping, SwashCache};

use crate::font::{FontSpec, TextAlign, TextBaseline};

const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Shaped size of a single line of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f32,
    pub line_height: f32,
    /// Distance from the top of the line box to the alphabetic baseline.
    pub baseline: f32,
}

impl TextMetrics {
    /// Offset from the drawing point to the top-left of the line box.
    pub fn origin_offset(&self, align: TextAlign, baseline: TextBaseline, size: f32) -> (f32, f32) {
        let dx = -self.width * align.offset_factor();
        let dy = match baseline {
            TextBaseline::Top => 0.0,
            TextBaseline::Hanging => -(self.baseline - size * 0.8).max(0.0),
            TextBaseline::Middle => -self.line_height * 0.5,
            TextBaseline::Alphabetic => -self.baseline,
            TextBaseline::Ideographic | TextBaseline::Bottom => -self.line_height,
        };
        (dx, dy)
    }
}

struct TextRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl TextRasterizer {
    fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    fn shape(&mut self, text: &str, font: &FontSpec) -> (Buffer, TextMetrics) {
        let size = font.size.max(1.0);
        let metrics = Metrics::new(size, size * LINE_HEIGHT_FACTOR);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new()
            .family(font.family_to_cosmic())
            .weight(font.weight.to_cosmic())
            .style(font.style.to_cosmic());
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, true);

        let mut measured = TextMetrics {
            width: 0.0,
            line_height: size * LINE_HEIGHT_FACTOR,
            baseline: size,
        };
        if let Some(run) = buffer.layout_runs().next() {
            measured.baseline = run.line_y - run.line_top;
            measured.line_height = run.line_height;
        }
        for run in buffer.layout_runs() {
            measured.width = measured.width.max(run.line_w);
        }
        (buffer, measured)
    }
}

thread_local! {
    static TEXT_RASTERIZER: RefCell<TextRasterizer> = RefCell::new(TextRasterizer::new());
}

/// Measure a single line of text in the given font.
pub fn measure_text(text: &str, font: &FontSpec) -> TextMetrics {
    TEXT_RASTERIZER.with_borrow_mut(|r| r.shape(text, font).1)
}

/// Rasterise text into coverage spans.
///
/// `paint` receives `(x, y, width, height, alpha)` in the same coordinate space
/// as the drawing point, already offset for alignment and baseline.
pub(crate) fn rasterize_text<F>(
    text: &str,
    font: &FontSpec,
    align: TextAlign,
    baseline: TextBaseline,
    mut paint: F,
) where
    F: FnMut(f32, f32, f32, f32, u8),
{
    TEXT_RASTERIZER.with_borrow_mut(|r| {
        let (buffer, metrics) = r.shape(text, font);
        let (dx, dy) = metrics.origin_offset(align, baseline, font.size);
        let TextRasterizer {
            font_system,
            swash_cache,
        } = r;
        buffer.draw(
            font_system,
            swash_cache,
            GlyphColor::rgb(0xFF, 0xFF, 0xFF),
            |x, y, w, h, color| {
                let alpha = color.a();
                if alpha > 0 {
                    paint(x as f32 + dx, y as f32 + dy, w as f32, h as f32, alpha);
                }
            },
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> TextMetrics {
        TextMetrics {
            width: 100.0,
            line_height: 24.0,
            baseline: 18.0,
        }
    }

    #[test]
    fn alignment_offsets() {
        let m = metrics();
        assert_eq!(m.origin_offset(TextAlign::Left, TextBaseline::Top, 20.0), (0.0, 0.0));
        assert_eq!(m.origin_offset(TextAlign::Center, TextBaseline::Middle, 20.0), (-50.0, -12.0));
        assert_eq!(m.origin_offset(TextAlign::Right, TextBaseline::Bottom, 20.0), (-100.0, -24.0));
        assert_eq!(m.origin_offset(TextAlign::Start, TextBaseline::Alphabetic, 20.0), (0.0, -18.0));
    }

    #[test]
    fn empty_text_has_no_width() {
        let m = measure_text("", &FontSpec::new("sans-serif", 16.0));
        assert_eq!(m.width, 0.0);
        assert!(m.line_height > 0.0);
    }
}
