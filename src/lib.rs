//! Declarative 2D canvas drawing.
//!
//! Describe a frame as a tree of [`Element`](element::Element)s (rectangles,
//! lines, text, transforms and repeats) and a [`CanvasSurface`] turns it into
//! drawing calls on an immediate-mode [`DrawingSurface`], frame after frame.

pub mod color;
pub mod element;
pub mod error;
pub mod font;
pub mod node;
pub mod platform;
pub mod reconciler;
pub mod registry;
pub mod renderers;
pub mod surface;
pub mod surface_manager;
pub mod timing;
pub mod transform;
pub mod traversal;

use std::path::PathBuf;
use std::time::Duration;

pub use error::{CanvasError, DrawError, Result};

use element::Element;
use platform::headless::DEFAULT_FRAME_INTERVAL;
use platform::HeadlessHost;
use surface::{DrawingSurface, PixmapSurface};
use surface_manager::{CanvasConfig, CanvasSurface, CommitOutcome};
use timing::{FrameClock, FrameSample, DEFAULT_FRAME_RATE_WINDOW};

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::element::{
        fragment, line, rectangle, repeat, rotate, scale, text, translate, Element, RepeatIndex,
    };
    pub use crate::font::{FontSpec, TextAlign, TextBaseline};
    pub use crate::node::{ElementNode, Node, PropValue, Props, TextNode};
    pub use crate::registry::{ElementType, RendererEntry, RendererRegistry};
    pub use crate::surface::{DrawingSurface, PixmapSurface, RecordingSurface, SurfaceCall};
    pub use crate::surface_manager::{
        auto_pixel_ratio, CanvasConfig, CanvasSurface, CommitOutcome, Dimensions,
    };
    pub use crate::timing::{FrameClock, FrameSample};
    pub use crate::transform::degrees_to_radians;
    pub use crate::traversal::SurfaceContext;
    pub use crate::{App, AppConfig, CanvasError, DrawError};
}

pub struct AppConfig {
    /// Logical canvas width.
    pub width: f32,
    /// Logical canvas height.
    pub height: f32,
    pub pixel_ratio: f32,
    pub background_color: Option<String>,
    /// Time between frame callbacks.
    pub frame_interval: Duration,
    /// Stop after this many frames. `None` runs until the process ends.
    pub frame_limit: Option<u64>,
    /// Timestamps averaged by the frame-rate meter.
    pub frame_rate_window: usize,
    /// Write the last frame here as PNG.
    pub output: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0 / 16.0 * 9.0,
            pixel_ratio: 1.0,
            background_color: Some("white".to_string()),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            frame_limit: None,
            frame_rate_window: DEFAULT_FRAME_RATE_WINDOW,
            output: None,
        }
    }
}

/// Runs a scene against a headless raster surface, one commit per frame.
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.config.width = width;
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.config.height = height;
        self
    }

    pub fn pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.config.pixel_ratio = pixel_ratio;
        self
    }

    pub fn background_color(mut self, color: Option<String>) -> Self {
        self.config.background_color = color;
        self
    }

    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.config.frame_interval = interval;
        self
    }

    pub fn frame_limit(mut self, frames: u64) -> Self {
        self.config.frame_limit = Some(frames);
        self
    }

    pub fn frame_rate_window(mut self, window: usize) -> Self {
        self.config.frame_rate_window = window;
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = Some(path.into());
        self
    }

    /// Run `view` once per frame and draw what it returns.
    ///
    /// Returns the surface holding the last frame. A frame whose drawing fails
    /// is logged and the loop moves on to the next one. A frame the host cannot
    /// schedule ends the run with [`CanvasError::FrameScheduling`].
    pub fn run<F>(self, mut view: F) -> Result<PixmapSurface>
    where
        F: FnMut(&FrameSample) -> Vec<Element>,
    {
        // The host process may already have installed a logger.
        let _ = env_logger::try_init();

        let config = self.config;
        let mut host = HeadlessHost::new(config.frame_interval)?;
        let mut canvas_config = CanvasConfig::new()
            .width(config.width)
            .height(config.height)
            .pixel_ratio(config.pixel_ratio);
        canvas_config.background_color = config.background_color.clone();

        let mut canvas = CanvasSurface::new(canvas_config);
        canvas.on_resize(|dims| log::info!("Canvas size: {}x{}", dims.width, dims.height));
        canvas.attach(PixmapSurface::new(0, 0)?, &mut host);

        let mut clock = FrameClock::new(config.frame_rate_window);
        clock.start(&mut host);

        let wait = config.frame_interval * 2;
        while config.frame_limit.map_or(true, |limit| clock.last().frame < limit) {
            if host.dispatch(Some(wait))?.is_empty() {
                if host.pending_frames() == 0 {
                    log::error!("No frame pending; stopping");
                    break;
                }
                continue;
            }
            let now = host.now();
            let Some(sample) = clock.on_frame(now, &mut host) else {
                break;
            };

            canvas.set_children(view(&sample));
            match canvas.commit() {
                Ok(CommitOutcome::Drawn(stats)) => {
                    log::trace!("Frame {}: {:?}", sample.frame, stats)
                }
                Ok(CommitOutcome::Deferred) => {}
                // Already logged by the canvas; the next frame starts clean.
                Err(_) => {}
            }
        }

        clock.stop(&mut host);
        let surface = canvas
            .detach(&mut host)
            .ok_or(CanvasError::EmptyBackingStore {
                width: 0,
                height: 0,
            })?;
        log::info!(
            "Stopped after {} frames ({}x{} backing)",
            clock.last().frame,
            surface.width(),
            surface.height()
        );

        if let Some(path) = &config.output {
            surface.save_png(path)?;
        }
        Ok(surface)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
