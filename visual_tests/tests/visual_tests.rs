use visual_tests::{run_visual_test, scenes, should_update_references, update_reference};

/// Edges are pixel-aligned, so only rasteriser rounding may differ.
const THRESHOLD: f64 = 0.999;

macro_rules! visual_test {
    ($name:ident, $scene:expr) => {
        #[test]
        fn $name() {
            if should_update_references() {
                update_reference(&$scene).expect("failed to update reference");
                return;
            }

            let result = run_visual_test(&$scene, THRESHOLD).expect("visual test failed to run");

            assert!(
                result.passed,
                "visual regression in '{}': similarity {:.4}% (threshold {:.1}%)\n\
                 reference: {}\n\
                 captured:  {}\n\
                 diff:      {}",
                $scene.name,
                result.similarity * 100.0,
                THRESHOLD * 100.0,
                result.reference_path.display(),
                result.captured_path.display(),
                result
                    .diff_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "n/a".to_string())
            );
        }
    };
}

visual_test!(test_shapes, scenes::SHAPES);
visual_test!(test_transforms, scenes::TRANSFORMS);
visual_test!(test_repeat, scenes::REPEAT);
visual_test!(test_crosshair, scenes::CROSSHAIR);
visual_test!(test_demo_frame, scenes::DEMO_FRAME);
