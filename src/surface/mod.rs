//! Drawing-surface boundary.
//!
//! [`DrawingSurface`] is the small subset of an immediate-mode 2D canvas
//! context that the renderers need. Two backends ship with the crate:
//!
//! - [`RecordingSurface`] logs every call and tracks the current transform,
//!   for tests and for inspecting what a frame would draw.
//! - [`PixmapSurface`] rasterises into an RGBA backing store with tiny-skia and
//!   cosmic-text, and can export the result as PNG.
//!
//! Primitive operations never fail. Like a canvas context, they silently
//! ignore non-finite geometry and unparseable colours.

mod pixmap;
mod recording;
mod text_raster;

pub use pixmap::PixmapSurface;
pub use recording::{RecordingSurface, SurfaceCall};
pub use text_raster::{measure_text, TextMetrics};

use crate::error::DrawError;
use crate::font::{FontSpec, TextAlign, TextBaseline};

pub trait DrawingSurface {
    /// Resize the backing store. This clears the pixels and resets every
    /// piece of drawing state, including the save/restore stack.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DrawError>;

    /// Backing store width in device pixels.
    fn width(&self) -> u32;

    /// Backing store height in device pixels.
    fn height(&self) -> u32;

    /// Measured layout size of the surface, when the host can measure it.
    fn client_size(&self) -> Option<(f32, f32)> {
        None
    }

    fn save(&mut self);

    /// Pop the most recent saved state. Does nothing when the stack is empty.
    fn restore(&mut self);

    /// Number of states currently saved.
    fn state_depth(&self) -> usize;

    fn translate(&mut self, x: f32, y: f32);
    fn scale(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f32);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Stroke a single straight segment with the current stroke style.
    fn stroke_line(&mut self, start_x: f32, start_y: f32, end_x: f32, end_y: f32);

    fn set_font(&mut self, font: &FontSpec);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    fn stroke_text(&mut self, text: &str, x: f32, y: f32);
}

pub(crate) fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}
