use std::path::Path;

use image::{Rgba, RgbaImage};
use image_compare::Algorithm;

use crate::{Result, VisualTestError};

/// Minimum per-channel difference that counts as a changed pixel.
const DIFF_TOLERANCE: u8 = 10;

/// Both images as loaded, plus their structural similarity.
pub struct Comparison {
    pub similarity: f64,
    reference: RgbaImage,
    captured: RgbaImage,
}

impl Comparison {
    /// Number of pixels differing by more than the tolerance.
    pub fn changed_pixels(&self) -> usize {
        self.reference
            .pixels()
            .zip(self.captured.pixels())
            .filter(|(a, b)| channel_delta(a, b) > DIFF_TOLERANCE)
            .count()
    }
}

pub fn compare_images(reference: &Path, captured: &Path) -> Result<Comparison> {
    let reference = image::open(reference)?.to_rgba8();
    let captured = image::open(captured)?.to_rgba8();

    if reference.dimensions() != captured.dimensions() {
        return Err(VisualTestError::Compare(format!(
            "size mismatch: reference {:?}, captured {:?}",
            reference.dimensions(),
            captured.dimensions()
        )));
    }

    // Scenes are opaque, so alpha adds nothing to the score.
    let flatten = |img: &RgbaImage| image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let similarity = image_compare::rgb_similarity_structure(
        &Algorithm::MSSIMSimple,
        &flatten(&reference),
        &flatten(&captured),
    )
    .map_err(|e| VisualTestError::Compare(e.to_string()))?
    .score;

    Ok(Comparison {
        similarity,
        reference,
        captured,
    })
}

/// Changed pixels in red on a dimmed copy of the capture.
pub fn write_diff_image(comparison: &Comparison, output: &Path) -> Result<()> {
    let (width, height) = comparison.captured.dimensions();
    let diff = RgbaImage::from_fn(width, height, |x, y| {
        let before = comparison.reference.get_pixel(x, y);
        let after = comparison.captured.get_pixel(x, y);
        match channel_delta(before, after) {
            d if d > DIFF_TOLERANCE => Rgba([55 + (d as u16 * 200 / 255) as u8, 0, 0, 255]),
            _ => Rgba([after[0] / 3, after[1] / 3, after[2] / 3, 255]),
        }
    });
    diff.save(output)?;
    Ok(())
}

fn channel_delta(a: &Rgba<u8>, b: &Rgba<u8>) -> u8 {
    (0..3).map(|i| a[i].abs_diff(b[i])).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_delta_ignores_alpha() {
        assert_eq!(channel_delta(&Rgba([10, 20, 30, 0]), &Rgba([15, 20, 10, 255])), 20);
    }
}
