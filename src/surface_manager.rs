//! Surface Manager: owns one canvas's backing store and runs its commits.
//!
//! A commit, in order:
//!
//! 1. size the backing store: logical size × pixel ratio, falling back to the
//!    surface's measured client size when no explicit size is configured
//! 2. resize the backing store, which clears it and resets all surface state
//! 3. fill the background colour, if any
//! 4. scale uniformly by the pixel ratio, so renderers draw in logical units
//! 5. reconcile the declarative tree into a fresh snapshot and traverse it
//!
//! Without an attached surface a commit is deferred rather than failing.
//!
//! ```ignore
//! let mut canvas = CanvasSurface::new(CanvasConfig::new().width(500.0).pixel_ratio(2.0));
//! canvas.attach(PixmapSurface::new(0, 0)?, &mut host);
//! canvas.set_children(vec![rectangle(0.0, 0.0, 10.0, 10.0).fill("red").into()]);
//! canvas.commit()?;
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

use crate::element::Element;
use crate::error::DrawError;
use crate::platform::{ResizeObserver, ResizeSignal};
use crate::reconciler::RootContainer;
use crate::registry::RendererRegistry;
use crate::surface::DrawingSurface;
use crate::traversal::{self, BackingStore, FrameStats};

/// Unique identifier for each canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasId(u64);

impl CanvasId {
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        CanvasId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

bitflags! {
    /// Why the next commit is needed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChangeFlags: u8 {
        const CHILDREN = 1 << 0;
        const PIXEL_RATIO = 1 << 1;
        const SIZE = 1 << 2;
        const RESIZED = 1 << 3;
        const BACKGROUND = 1 << 4;
    }
}

/// Pick a pixel ratio for a device: 2 on high-density displays, else 1.
pub fn auto_pixel_ratio(device_pixel_ratio: f64) -> f32 {
    if device_pixel_ratio >= 2.0 {
        2.0
    } else {
        1.0
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Configuration for a canvas.
///
/// ```ignore
/// CanvasConfig::new()
///     .width(500.0)
///     .height(281.25)
///     .pixel_ratio(auto_pixel_ratio(2.0))
///     .background_color("white")
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Logical width. `None` uses the measured client width.
    pub width: Option<f32>,
    /// Logical height. `None` uses the measured client height.
    pub height: Option<f32>,
    pub pixel_ratio: f32,
    /// CSS colour painted under every frame.
    pub background_color: Option<String>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            pixel_ratio: 1.0,
            background_color: None,
        }
    }
}

impl CanvasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// The pixel ratio actually applied. Non-positive and non-finite ratios
    /// fall back to 1.
    pub fn effective_pixel_ratio(&self) -> f32 {
        if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        }
    }

    /// Backing-store size in device pixels.
    pub fn backing_size(&self, client_size: Option<(f32, f32)>) -> (u32, u32) {
        let ratio = self.effective_pixel_ratio();
        let (client_width, client_height) = client_size.unwrap_or((0.0, 0.0));
        let device = |logical: f32| {
            let px = (logical * ratio).floor();
            if px.is_finite() && px > 0.0 {
                px as u32
            } else {
                0
            }
        };
        (
            device(self.width.unwrap_or(client_width)),
            device(self.height.unwrap_or(client_height)),
        )
    }
}

/// Result of [`CanvasSurface::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The frame was drawn.
    Drawn(FrameStats),
    /// No surface is attached; the pending changes are kept for later.
    Deferred,
}

/// Receives the canvas's logical size whenever it changes.
pub type ResizeCallback = Box<dyn FnMut(Dimensions)>;

/// One canvas: configuration, declarative tree and (once attached) the
/// drawing surface it renders into.
pub struct CanvasSurface<S: DrawingSurface> {
    id: CanvasId,
    config: CanvasConfig,
    surface: Option<S>,
    registry: RendererRegistry,
    root: RootContainer,
    children: Vec<Element>,
    changes: ChangeFlags,
    resize_signal: ResizeSignal,
    on_resize: Option<ResizeCallback>,
    reported: Option<Dimensions>,
}

impl<S: DrawingSurface> CanvasSurface<S> {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            id: CanvasId::next(),
            config,
            surface: None,
            registry: RendererRegistry::builtin().clone(),
            root: RootContainer::new(),
            children: Vec::new(),
            changes: ChangeFlags::all(),
            resize_signal: ResizeSignal::new(),
            on_resize: None,
            reported: None,
        }
    }

    /// Draw with a custom registry instead of the built-in one.
    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Attach a drawing surface and start observing its size.
    pub fn attach(&mut self, surface: S, observer: &mut dyn ResizeObserver) {
        log::info!(
            "Attaching surface to {:?}: {}x{} backing",
            self.id,
            surface.width(),
            surface.height()
        );
        self.surface = Some(surface);
        observer.observe(self.resize_signal.clone());
        self.changes = ChangeFlags::all();
    }

    /// Detach the surface, stop observing and drop the rendered tree without
    /// drawing a final frame.
    pub fn detach(&mut self, observer: &mut dyn ResizeObserver) -> Option<S> {
        observer.disconnect();
        self.root.unmount();
        let surface = self.surface.take();
        if surface.is_some() {
            log::info!("Detached surface from {:?}", self.id);
        }
        surface
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn root(&self) -> &RootContainer {
        &self.root
    }

    pub fn set_children(&mut self, children: Vec<Element>) {
        self.children = children;
        self.changes |= ChangeFlags::CHILDREN;
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        if self.config.pixel_ratio != pixel_ratio {
            self.config.pixel_ratio = pixel_ratio;
            self.changes |= ChangeFlags::PIXEL_RATIO;
        }
    }

    /// Set or clear the explicit logical size.
    pub fn set_size(&mut self, width: Option<f32>, height: Option<f32>) {
        if self.config.width != width || self.config.height != height {
            self.config.width = width;
            self.config.height = height;
            self.changes |= ChangeFlags::SIZE;
        }
    }

    pub fn set_background_color(&mut self, color: Option<String>) {
        if self.config.background_color != color {
            self.config.background_color = color;
            self.changes |= ChangeFlags::BACKGROUND;
        }
    }

    /// Record that the surface's measured size changed.
    pub fn notify_resize(&mut self) {
        self.changes |= ChangeFlags::RESIZED;
    }

    /// The flag a [`ResizeObserver`] raises for this canvas.
    pub fn resize_signal(&self) -> ResizeSignal {
        self.resize_signal.clone()
    }

    /// Be told the logical size after every commit that changes it.
    pub fn on_resize<F: FnMut(Dimensions) + 'static>(&mut self, callback: F) {
        self.on_resize = Some(Box::new(callback));
    }

    pub fn changes(&self) -> ChangeFlags {
        if self.resize_signal.is_pending() {
            self.changes | ChangeFlags::RESIZED
        } else {
            self.changes
        }
    }

    pub fn needs_commit(&self) -> bool {
        !self.changes().is_empty()
    }

    /// Backing-store size the next commit will use, in device pixels.
    pub fn backing_dimensions(&self) -> Dimensions {
        let client = self.surface.as_ref().and_then(|s| s.client_size());
        let (width, height) = self.config.backing_size(client);
        Dimensions::new(width as f32, height as f32)
    }

    /// Logical size: the backing store divided by the pixel ratio.
    pub fn logical_dimensions(&self) -> Dimensions {
        let backing = self.backing_dimensions();
        let ratio = self.config.effective_pixel_ratio();
        Dimensions::new(backing.width / ratio, backing.height / ratio)
    }

    /// Draw a frame from the current tree.
    pub fn commit(&mut self) -> Result<CommitOutcome, DrawError> {
        if self.resize_signal.take() {
            self.changes |= ChangeFlags::RESIZED;
        }
        if self.surface.is_none() {
            log::trace!("{:?} has no surface, deferring commit", self.id);
            return Ok(CommitOutcome::Deferred);
        }

        let backing_dims = self.backing_dimensions();
        let logical = self.logical_dimensions();
        let ratio = self.config.effective_pixel_ratio();
        let (width, height) = (backing_dims.width as u32, backing_dims.height as u32);
        log::debug!(
            "Commit {:?} ({:?}): backing {}x{}, ratio {}",
            self.id,
            self.changes,
            width,
            height,
            ratio
        );
        let Some(surface) = self.surface.as_mut() else {
            return Ok(CommitOutcome::Deferred);
        };
        if surface.width() != width || surface.height() != height {
            log::info!("Resizing {:?} backing store to {}x{}", self.id, width, height);
        }
        // Changes stay pending until the backing store matches them.
        surface.resize(width, height)?;
        self.changes = ChangeFlags::empty();

        if let Some(color) = &self.config.background_color {
            surface.set_fill_style(color);
            surface.fill_rect(0.0, 0.0, width as f32, height as f32);
        }
        surface.scale(ratio, ratio);

        let snapshot = &self.root.update(&self.children).rendered;
        let result = traversal::traverse(
            snapshot,
            surface,
            &self.registry,
            BackingStore::new(width, height, ratio),
        );

        self.report_dimensions(logical);

        match result {
            Ok(stats) => Ok(CommitOutcome::Drawn(stats)),
            Err(err) => {
                log::error!("Frame for {:?} aborted: {}", self.id, err);
                Err(err)
            }
        }
    }

    fn report_dimensions(&mut self, logical: Dimensions) {
        if self.reported == Some(logical) {
            return;
        }
        self.reported = Some(logical);
        if let Some(callback) = self.on_resize.as_mut() {
            callback(logical);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_ratio_rounds_to_one_or_two() {
        assert_eq!(auto_pixel_ratio(1.0), 1.0);
        assert_eq!(auto_pixel_ratio(1.5), 1.0);
        assert_eq!(auto_pixel_ratio(2.0), 2.0);
        assert_eq!(auto_pixel_ratio(3.0), 2.0);
    }

    #[test]
    fn backing_size_scales_logical_size() {
        let config = CanvasConfig::new().width(500.0).height(281.25).pixel_ratio(2.0);
        assert_eq!(config.backing_size(None), (1000, 562));
    }

    #[test]
    fn backing_size_falls_back_to_client_size() {
        let config = CanvasConfig::new().pixel_ratio(2.0);
        assert_eq!(config.backing_size(Some((320.0, 200.0))), (640, 400));
        assert_eq!(config.backing_size(None), (0, 0));
        let mixed = CanvasConfig::new().width(100.0);
        assert_eq!(mixed.backing_size(Some((320.0, 200.0))), (100, 200));
    }

    #[test]
    fn invalid_pixel_ratio_falls_back_to_one() {
        assert_eq!(CanvasConfig::new().pixel_ratio(0.0).effective_pixel_ratio(), 1.0);
        assert_eq!(CanvasConfig::new().pixel_ratio(f32::NAN).effective_pixel_ratio(), 1.0);
    }

    #[test]
    fn canvas_ids_are_unique() {
        assert_ne!(CanvasId::next(), CanvasId::next());
    }
}
