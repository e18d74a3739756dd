//! Built-in renderers for the `Canvas.*` element types.
//!
//! Every function here has the [`DrawFn`](crate::registry::DrawFn) signature
//! and reads nothing but the surface context and the node it is given.

pub mod line;
pub mod rectangle;
pub mod repeat;
pub mod text;
pub mod transform;

use crate::node::Props;

/// Stroke width when a shape has a stroke colour, or `None` when nothing
/// should be stroked. Widths default to 1; non-positive widths disable the
/// stroke.
pub(crate) fn stroke_width(props: &Props) -> Option<f32> {
    props.str("stroke")?;
    let width = props.number_or("strokeWidth", 1.0);
    (width > 0.0).then_some(width)
}
