use std::path::Path;

use daub::platform::{ResizeObserver, ResizeSignal};
use daub::surface::PixmapSurface;
use daub::surface_manager::{CanvasConfig, CanvasSurface, CommitOutcome};

use crate::scenes::Scene;
use crate::{Result, VisualTestError};

/// Scenes are rendered once and never resized.
struct FixedSize;

impl ResizeObserver for FixedSize {
    fn observe(&mut self, _signal: ResizeSignal) {}
    fn disconnect(&mut self) {}
}

/// Render one frame of a scene headlessly and write it as PNG.
pub fn capture_scene(scene: &Scene, output_path: &Path) -> Result<()> {
    let mut config = CanvasConfig::new()
        .width(scene.width)
        .height(scene.height)
        .pixel_ratio(scene.pixel_ratio);
    config.background_color = scene.background.map(str::to_string);

    let mut canvas = CanvasSurface::new(config);
    let mut observer = FixedSize;
    canvas.attach(
        PixmapSurface::new(0, 0).map_err(daub::CanvasError::from)?,
        &mut observer,
    );
    canvas.set_children((scene.build)());

    match canvas.commit().map_err(daub::CanvasError::from)? {
        CommitOutcome::Drawn(_) => {}
        CommitOutcome::Deferred => {
            return Err(VisualTestError::Capture(format!(
                "scene '{}' was not drawn",
                scene.name
            )))
        }
    }

    let surface = canvas
        .detach(&mut observer)
        .ok_or_else(|| VisualTestError::Capture(format!("scene '{}' lost its surface", scene.name)))?;
    surface.save_png(output_path)?;
    Ok(())
}
