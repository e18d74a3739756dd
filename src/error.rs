use std::path::PathBuf;

use thiserror::Error;

/// A failure raised while drawing one frame.
///
/// Any error aborts the rest of the current traversal. The next commit starts
/// from a freshly sized backing store, so a failed frame never leaks into the
/// following one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error("renderer for {type_tag} failed: {reason}")]
    Renderer { type_tag: String, reason: String },
    #[error("drawing surface failed: {0}")]
    Surface(String),
}

impl DrawError {
    pub fn renderer(type_tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Renderer {
            type_tag: type_tag.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
    #[error("frame {id} could not be scheduled: {reason}")]
    FrameScheduling { id: u64, reason: String },
    #[error("backing store is empty ({width}x{height})")]
    EmptyBackingStore { width: u32, height: u32 },
    #[error("failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
