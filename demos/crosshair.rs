//! A crosshair marking the centre of the canvas, drawn at several zoom levels.
//!
//! ```bash
//! cargo run --example crosshair -- crosshair.png
//! ```

use std::path::PathBuf;

use clap::Parser;
use daub::prelude::*;

const SIZE: f32 = 120.0;

fn crosshair(zoom: f32) -> Element {
    scale(1.0 / zoom, 1.0 / zoom)
        .child(line(0.0, -10.0, 0.0, 10.0).stroke_width(1.0).stroke("cyan"))
        .child(line(-10.0, 0.0, 10.0, 0.0).stroke_width(1.0).stroke("cyan"))
        .into()
}

fn scene() -> Vec<Element> {
    vec![
        translate(SIZE * 0.5, SIZE * 0.5)
            .child(scale(3.0, 3.0).child(crosshair(3.0)))
            .into(),
        translate(SIZE * 0.25, SIZE * 0.25)
            .child(crosshair(0.5))
            .into(),
        rectangle(0.0, 0.0, SIZE, SIZE).stroke("black").into(),
    ]
}

/// Draw the crosshair scene, optionally saving one frame as a PNG.
#[derive(Parser, Debug)]
#[command(name = "crosshair")]
struct Args {
    /// Write one frame to this PNG file and exit.
    output: Option<PathBuf>,
}

fn main() -> daub::Result<()> {
    let args = Args::parse();

    let mut app = App::new()
        .width(SIZE)
        .height(SIZE)
        .background_color(Some("#202020".to_string()));
    if let Some(path) = args.output {
        app = app.output(path).frame_limit(1);
    }
    app.run(|_| scene())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_output_path() {
        let args = Args::try_parse_from(["crosshair", "crosshair.png"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("crosshair.png")));
        assert!(Args::try_parse_from(["crosshair"]).unwrap().output.is_none());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Args::try_parse_from(["crosshair", "--zoom", "2"]).is_err());
    }
}
