//! Animated scene: a bobbing, rotating square with an FPS label.
//!
//! ```bash
//! cargo run --example demo_scene                      # run until interrupted
//! cargo run --example demo_scene -- out.png --at 1200 # render one frame at t=1200ms
//! ```

use std::path::PathBuf;

use clap::Parser;
use daub::prelude::*;
use daub::timing::FrameSample;

const WIDTH: f32 = 500.0;
const HEIGHT: f32 = WIDTH / 16.0 * 9.0;

fn scene(sample: &FrameSample, pixel_ratio: f32) -> Vec<Element> {
    let now = sample.now as f32;
    let pr = pixel_ratio;
    let wobble = (now * 0.005).sin();
    let zoom = 1.0 + (now * 0.0025).cos() * 0.2;

    vec![
        text(5.0 * pr, 5.0 * pr, "Delta: ")
            .append(sample.delta.round())
            .font_size(16.0 * pr)
            .fill("black")
            .into(),
        line(WIDTH * 0.5 * pr, 0.0, WIDTH * 0.5 * pr, HEIGHT * pr)
            .stroke_width(pr)
            .stroke("cyan")
            .into(),
        repeat(3, move |i| {
            let index = i.index as f32;
            rectangle(5.0 * pr, (25.0 + index * 20.0) * pr, 10.0 * pr, 10.0 * pr)
                .fill("black")
                .into()
        })
        .into(),
        translate(
            WIDTH * 0.5 * pr,
            HEIGHT * 0.5 * pr + wobble * HEIGHT * 0.25 * pr,
        )
        .child(
            rotate(degrees_to_radians(wobble * 45.0)).child(
                rectangle(-25.0 * pr, -25.0 * pr, 50.0 * pr, 50.0 * pr)
                    .fill("red")
                    .stroke_width(pr)
                    .stroke("black"),
            ),
        )
        .child(
            scale(zoom, zoom).child(
                text(0.0, 0.0, sample.frame_rate.round())
                    .append("fps")
                    .font_size(16.0 * pr)
                    .text_align("center")
                    .vertical_align("middle")
                    .fill("white"),
            ),
        )
        .into(),
    ]
}

/// Render the animated scene in a window-less loop, or a single frame to a PNG.
#[derive(Parser, Debug)]
#[command(name = "demo_scene")]
struct Args {
    /// Write one frame to this PNG file and exit.
    output: Option<PathBuf>,
    /// Freeze the clock at this time in milliseconds.
    #[arg(long)]
    at: Option<f64>,
}

fn main() -> daub::Result<()> {
    let args = Args::parse();

    let pixel_ratio = auto_pixel_ratio(1.0);
    let mut app = App::new()
        .width(WIDTH)
        .height(HEIGHT)
        .pixel_ratio(pixel_ratio)
        .frame_rate_window(100);
    if let Some(path) = args.output {
        app = app.output(path).frame_limit(1);
    }

    let fixed_time = args.at;
    app.run(move |sample| match fixed_time {
        Some(now) => scene(
            &FrameSample {
                now,
                delta: 16.0,
                frame_rate: 60.0,
                ..*sample
            },
            pixel_ratio,
        ),
        None => scene(sample, pixel_ratio),
    })?;
    Ok(())
}
