//! Pixel regression tests for the headless raster surface.
//!
//! Each [`Scene`] is drawn through a real `CanvasSurface`, written to
//! `output/`, and compared against `references/<scene>.png`. A missing
//! reference is an error; run with `UPDATE_REFERENCES=1` to re-record them.

mod capture;
mod compare;
pub mod scenes;

pub use capture::capture_scene;
pub use compare::{compare_images, write_diff_image, Comparison};
pub use scenes::Scene;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualTestError {
    #[error("failed to render scene: {0}")]
    Capture(String),
    #[error("failed to compare images: {0}")]
    Compare(String),
    #[error("reference image not found: {0}")]
    ReferenceNotFound(PathBuf),
    #[error(transparent)]
    Canvas(#[from] daub::CanvasError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, VisualTestError>;

pub struct VisualTestResult {
    pub passed: bool,
    /// SSIM score in `0.0..=1.0`.
    pub similarity: f64,
    pub captured_path: PathBuf,
    pub reference_path: PathBuf,
    /// Written only when the comparison fails.
    pub diff_path: Option<PathBuf>,
}

pub fn references_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("references")
}

pub fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output")
}

pub fn reference_path(scene: &str) -> PathBuf {
    references_dir().join(format!("{scene}.png"))
}

fn artifact_path(scene: &str, suffix: &str) -> PathBuf {
    output_dir().join(format!("{scene}_{suffix}.png"))
}

/// Render `scene` and compare it with its reference image.
pub fn run_visual_test(scene: &Scene, similarity_threshold: f64) -> Result<VisualTestResult> {
    let reference = reference_path(scene.name);
    if !reference.exists() {
        return Err(VisualTestError::ReferenceNotFound(reference));
    }

    std::fs::create_dir_all(output_dir())?;
    let captured = artifact_path(scene.name, "captured");
    capture_scene(scene, &captured)?;

    let comparison = compare_images(&reference, &captured)?;
    let passed = comparison.similarity >= similarity_threshold;
    let diff_path = if passed {
        None
    } else {
        let diff = artifact_path(scene.name, "diff");
        write_diff_image(&comparison, &diff)?;
        Some(diff)
    };

    Ok(VisualTestResult {
        passed,
        similarity: comparison.similarity,
        captured_path: captured,
        reference_path: reference,
        diff_path,
    })
}

/// Render `scene` straight into its reference slot.
pub fn update_reference(scene: &Scene) -> Result<PathBuf> {
    std::fs::create_dir_all(references_dir())?;
    let reference = reference_path(scene.name);
    capture_scene(scene, &reference)?;
    println!("Recorded reference: {}", reference.display());
    Ok(reference)
}

pub fn should_update_references() -> bool {
    std::env::var_os("UPDATE_REFERENCES").is_some()
}
