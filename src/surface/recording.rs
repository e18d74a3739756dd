use crate::error::DrawError;
use crate::font::{FontSpec, TextAlign, TextBaseline};
use crate::transform::Transform;

use super::DrawingSurface;

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Resize { width: u32, height: u32 },
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Scale { x: f32, y: f32 },
    Rotate { radians: f32 },
    SetFillStyle(String),
    SetStrokeStyle(String),
    SetLineWidth(f32),
    FillRect { x: f32, y: f32, width: f32, height: f32 },
    StrokeRect { x: f32, y: f32, width: f32, height: f32 },
    StrokeLine { start_x: f32, start_y: f32, end_x: f32, end_y: f32 },
    /// The font as its CSS shorthand.
    SetFont(String),
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    FillText { text: String, x: f32, y: f32 },
    StrokeText { text: String, x: f32, y: f32 },
}

impl SurfaceCall {
    /// Whether the call puts pixels on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            SurfaceCall::FillRect { .. }
                | SurfaceCall::StrokeRect { .. }
                | SurfaceCall::StrokeLine { .. }
                | SurfaceCall::FillText { .. }
                | SurfaceCall::StrokeText { .. }
        )
    }
}

/// A call together with the state it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub call: SurfaceCall,
    /// Current transform after the call was applied.
    pub transform: Transform,
    /// Save/restore depth after the call was applied.
    pub depth: usize,
}

/// A drawing surface that records calls instead of rasterising them.
///
/// The log is kept across resizes, so every commit appends to it, starting
/// with its [`SurfaceCall::Resize`]. Call [`RecordingSurface::clear_records`]
/// between frames to inspect one frame at a time.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    client_size: Option<(f32, f32)>,
    transform: Transform,
    stack: Vec<Transform>,
    records: Vec<Recorded>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Report a measured layout size, as a host element with CSS size would.
    pub fn with_client_size(mut self, width: f32, height: f32) -> Self {
        self.client_size = Some((width, height));
        self
    }

    pub fn set_client_size(&mut self, size: Option<(f32, f32)>) {
        self.client_size = size;
    }

    pub fn records(&self) -> &[Recorded] {
        &self.records
    }

    pub fn calls(&self) -> impl Iterator<Item = &SurfaceCall> {
        self.records.iter().map(|r| &r.call)
    }

    /// Only the calls that put pixels on the surface, with their transforms.
    pub fn draws(&self) -> impl Iterator<Item = &Recorded> {
        self.records.iter().filter(|r| r.call.is_draw())
    }

    /// Empty the call log. The current transform and saved states are kept.
    pub fn clear_records(&mut self) {
        self.records.clear();
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    fn push(&mut self, call: SurfaceCall) {
        self.records.push(Recorded {
            call,
            transform: self.transform,
            depth: self.stack.len(),
        });
    }
}

impl DrawingSurface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DrawError> {
        self.width = width;
        self.height = height;
        self.transform = Transform::IDENTITY;
        self.stack.clear();
        self.push(SurfaceCall::Resize { width, height });
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
        self.stack.push(self.transform);
        self.push(SurfaceCall::Save);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
        self.push(SurfaceCall::Restore);
    }

    fn state_depth(&self) -> usize {
        self.stack.len()
    }

    fn translate(&mut self, x: f32, y: f32) {
        if super::all_finite(&[x, y]) {
            self.transform = self.transform.then(&Transform::translate(x, y));
        }
        self.push(SurfaceCall::Translate { x, y });
    }

    fn scale(&mut self, x: f32, y: f32) {
        if super::all_finite(&[x, y]) {
            self.transform = self.transform.then(&Transform::scale(x, y));
        }
        self.push(SurfaceCall::Scale { x, y });
    }

    fn rotate(&mut self, radians: f32) {
        if radians.is_finite() {
            self.transform = self.transform.then(&Transform::rotate(radians));
        }
        self.push(SurfaceCall::Rotate { radians });
    }

    fn set_fill_style(&mut self, color: &str) {
        self.push(SurfaceCall::SetFillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.push(SurfaceCall::SetStrokeStyle(color.to_string()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.push(SurfaceCall::SetLineWidth(width));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(SurfaceCall::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(SurfaceCall::StrokeRect {
            x,
            y,
            width,
            height,
        });
    }

    fn stroke_line(&mut self, start_x: f32, start_y: f32, end_x: f32, end_y: f32) {
        self.push(SurfaceCall::StrokeLine {
            start_x,
            start_y,
            end_x,
            end_y,
        });
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.push(SurfaceCall::SetFont(font.to_css()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(SurfaceCall::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(SurfaceCall::SetTextBaseline(baseline));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.push(SurfaceCall::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        self.push(SurfaceCall::StrokeText {
            text: text.to_string(),
            x,
            y,
        });
    }
}
