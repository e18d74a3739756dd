use crate::error::DrawError;
use crate::node::ElementNode;
use crate::traversal::SurfaceContext;

/// Stroke the segment `startX, startY` to `endX, endY`. A line without a
/// stroke colour draws nothing.
pub fn draw(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
    let props = &node.props;
    let (Some(stroke), Some(line_width)) = (props.str("stroke"), super::stroke_width(props)) else {
        return Ok(());
    };

    let surface = ctx.surface();
    surface.set_stroke_style(stroke);
    surface.set_line_width(line_width);
    surface.stroke_line(
        props.coordinate("startX"),
        props.coordinate("startY"),
        props.coordinate("endX"),
        props.coordinate("endY"),
    );
    Ok(())
}
