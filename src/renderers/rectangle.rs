use crate::error::DrawError;
use crate::node::ElementNode;
use crate::traversal::SurfaceContext;

/// Fill and/or stroke `x, y, width, height`.
pub fn draw(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
    let props = &node.props;
    let x = props.coordinate("x");
    let y = props.coordinate("y");
    let width = props.coordinate("width");
    let height = props.coordinate("height");

    if let Some(fill) = props.str("fill") {
        ctx.surface().set_fill_style(fill);
        ctx.surface().fill_rect(x, y, width, height);
    }

    if let (Some(stroke), Some(line_width)) = (props.str("stroke"), super::stroke_width(props)) {
        ctx.surface().set_stroke_style(stroke);
        ctx.surface().set_line_width(line_width);
        ctx.surface().stroke_rect(x, y, width, height);
    }

    Ok(())
}
