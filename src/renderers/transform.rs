//! Translate, scale and rotate.
//!
//! A transform with at least one child and `preserve` not explicitly `false`
//! scopes itself: it saves before applying and restores after its children.
//! Otherwise the transform stays on the surface and affects later siblings.

use crate::error::DrawError;
use crate::node::ElementNode;
use crate::traversal::SurfaceContext;

fn scoped(node: &ElementNode) -> bool {
    node.has_children() && node.props.bool("preserve") != Some(false)
}

fn begin_scope(ctx: &mut SurfaceContext<'_>, node: &ElementNode) {
    if scoped(node) {
        ctx.surface().save();
    }
}

pub fn translate(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
    begin_scope(ctx, node);
    let x = node.props.number_or("x", 0.0);
    let y = node.props.number_or("y", 0.0);
    ctx.surface().translate(x, y);
    Ok(())
}

pub fn scale(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
    begin_scope(ctx, node);
    let x = node.props.number_or("x", 1.0);
    let y = node.props.number_or("y", 1.0);
    ctx.surface().scale(x, y);
    Ok(())
}

pub fn rotate(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
    begin_scope(ctx, node);
    let radians = node.props.number_or("radians", 0.0);
    ctx.surface().rotate(radians);
    Ok(())
}

/// Close the scope opened by [`translate`], [`scale`] or [`rotate`].
pub fn end_scope(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
    if scoped(node) {
        ctx.surface().restore();
    }
    Ok(())
}
