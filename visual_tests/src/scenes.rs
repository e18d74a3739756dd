//! Deterministic scenes rendered by the visual regression tests.
//!
//! Each scene is a fixed frame: nothing depends on wall-clock time. Edges sit
//! on whole device pixels and colours are opaque, so the expected images are
//! exact. Text is left out since glyph coverage depends on the installed fonts.

use std::f32::consts::FRAC_PI_2;

use daub::prelude::*;

/// One frame to render and compare against its reference image.
#[derive(Clone, Copy)]
pub struct Scene {
    pub name: &'static str,
    /// Logical size.
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub background: Option<&'static str>,
    pub build: fn() -> Vec<Element>,
}

pub const SHAPES: Scene = Scene {
    name: "shapes",
    width: 120.0,
    height: 80.0,
    pixel_ratio: 1.0,
    background: Some("white"),
    build: shapes,
};

pub const TRANSFORMS: Scene = Scene {
    name: "transforms",
    width: 80.0,
    height: 80.0,
    pixel_ratio: 2.0,
    background: Some("#f0f0f0"),
    build: transforms,
};

pub const REPEAT: Scene = Scene {
    name: "repeat",
    width: 100.0,
    height: 100.0,
    pixel_ratio: 1.0,
    background: Some("white"),
    build: repeated_grid,
};

pub const CROSSHAIR: Scene = Scene {
    name: "crosshair",
    width: 120.0,
    height: 120.0,
    pixel_ratio: 1.0,
    background: Some("#202020"),
    build: crosshair,
};

pub const DEMO_FRAME: Scene = Scene {
    name: "demo_frame",
    width: 480.0,
    height: 270.0,
    pixel_ratio: 1.0,
    background: Some("white"),
    build: demo_frame,
};

pub const ALL: [Scene; 5] = [SHAPES, TRANSFORMS, REPEAT, CROSSHAIR, DEMO_FRAME];

fn shapes() -> Vec<Element> {
    vec![
        rectangle(10.0, 10.0, 40.0, 30.0).fill("red").into(),
        rectangle(60.0, 10.0, 40.0, 30.0)
            .stroke("blue")
            .stroke_width(2.0)
            .into(),
        rectangle(10.0, 50.0, 40.0, 20.0)
            .fill("green")
            .stroke("black")
            .stroke_width(2.0)
            .into(),
        line(60.0, 60.0, 110.0, 60.0).stroke("#ff8800").stroke_width(2.0).into(),
        line(115.0, 45.0, 115.0, 75.0).stroke("navy").stroke_width(2.0).into(),
    ]
}

fn transforms() -> Vec<Element> {
    vec![
        translate(40.0, 40.0)
            .child(rotate(FRAC_PI_2).child(rectangle(-10.0, -10.0, 20.0, 20.0).fill("teal")))
            .child(
                scale(0.5, 0.5)
                    .restore(true)
                    .child(rectangle(-10.0, -10.0, 20.0, 20.0).fill("gold")),
            )
            .into(),
        // Not scoped: shifts the marker below.
        translate(10.0, 10.0)
            .preserve(false)
            .child(rectangle(0.0, 0.0, 10.0, 10.0).fill("black"))
            .into(),
        rectangle(10.0, 0.0, 10.0, 10.0).fill("crimson").into(),
        rectangle(50.0, 50.0, 10.0, 10.0).fill("navy").into(),
    ]
}

fn repeated_grid() -> Vec<Element> {
    vec![repeat(5, |row| {
        repeat(5, move |col| {
            let shade = if (row.index + col.index) % 2.0 == 0.0 {
                "black"
            } else {
                "silver"
            };
            rectangle(
                col.index as f32 * 20.0,
                row.index as f32 * 20.0,
                20.0,
                20.0,
            )
            .fill(shade)
            .into()
        })
        .into()
    })
    .into()]
}

/// Two crosshairs: one whose zoom is undone inside it, one drawn at double size.
fn crosshair() -> Vec<Element> {
    let mark = |zoom: f32| {
        scale(1.0 / zoom, 1.0 / zoom)
            .child(line(0.0, -10.0, 0.0, 10.0).stroke("cyan").stroke_width(2.0))
            .child(line(-10.0, 0.0, 10.0, 0.0).stroke("cyan").stroke_width(2.0))
    };
    vec![
        translate(60.0, 60.0)
            .child(scale(3.0, 3.0).child(mark(3.0)))
            .into(),
        translate(30.0, 30.0).child(mark(0.5)).into(),
    ]
}

/// The animated demo laid out at `t = 0` on a 16:9 canvas, without its labels.
fn demo_frame() -> Vec<Element> {
    let (width, height) = (480.0, 270.0);
    vec![
        line(width * 0.5, 0.0, width * 0.5, height)
            .stroke("cyan")
            .stroke_width(2.0)
            .into(),
        repeat(3, |i| {
            rectangle(5.0, 25.0 + i.index as f32 * 20.0, 10.0, 10.0)
                .fill("black")
                .into()
        })
        .into(),
        translate(width * 0.5, height * 0.5)
            .child(
                rotate(degrees_to_radians(0.0)).child(
                    rectangle(-25.0, -25.0, 50.0, 50.0)
                        .fill("red")
                        .stroke("black")
                        .stroke_width(2.0),
                ),
            )
            .into(),
    ]
}
