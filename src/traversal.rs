//! Draw Traversal Engine.
//!
//! One traversal walks a snapshot depth-first. For every element with a
//! registered renderer the order is fixed:
//!
//! 1. `save` when `props.restore` is truthy
//! 2. `draw_before_children`
//! 3. each child, in order, fully drawn before its next sibling
//! 4. `draw_after_children`
//! 5. `restore` matching step 1
//!
//! Text nodes are never dispatched; their parent's renderer reads them.
//! Elements whose type tag has no renderer are skipped together with their
//! whole subtree.
//!
//! The first error returned by a renderer aborts the rest of the frame. A
//! [`FrameScope`] around the traversal then unwinds any saves the aborted
//! frame left on the surface, so the next frame starts balanced.

use std::ops::{Deref, DerefMut};

use crate::error::DrawError;
use crate::node::Node;
use crate::registry::RendererRegistry;
use crate::surface::DrawingSurface;

/// Backing-store geometry for the frame being drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackingStore {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    pub pixel_ratio: f32,
}

impl BackingStore {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Size in logical pixels (device pixels divided by the pixel ratio).
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.width as f32 / self.pixel_ratio,
            self.height as f32 / self.pixel_ratio,
        )
    }
}

/// Counters collected over one traversal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Elements dispatched to a renderer.
    pub drawn: usize,
    /// Elements skipped for lack of a renderer (subtrees not counted).
    pub skipped: usize,
    /// Saves left open by an aborted frame and unwound afterwards.
    pub unwound: usize,
}

/// Everything a renderer can reach while drawing.
pub struct SurfaceContext<'a> {
    surface: &'a mut (dyn DrawingSurface + 'a),
    registry: &'a RendererRegistry,
    backing: BackingStore,
    stats: FrameStats,
}

impl<'a> SurfaceContext<'a> {
    pub fn new(
        surface: &'a mut (dyn DrawingSurface + 'a),
        registry: &'a RendererRegistry,
        backing: BackingStore,
    ) -> Self {
        Self {
            surface,
            registry,
            backing,
            stats: FrameStats::default(),
        }
    }

    /// The drawing context.
    pub fn surface(&mut self) -> &mut (dyn DrawingSurface + 'a) {
        &mut *self.surface
    }

    pub fn backing(&self) -> BackingStore {
        self.backing
    }

    pub fn registry(&self) -> &'a RendererRegistry {
        self.registry
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Draw one node and its subtree.
    ///
    /// The traversal calls this for every child; renderers may call it too, to
    /// draw nested content out of the usual order.
    pub fn draw_child(&mut self, node: &Node) -> Result<(), DrawError> {
        let Node::Element(element) = node else {
            return Ok(());
        };

        let Some(entry) = self.registry.lookup(&element.type_tag).copied() else {
            log::trace!("No renderer for {}, skipping subtree", element.type_tag);
            self.stats.skipped += 1;
            return Ok(());
        };
        log::trace!("Drawing {}", element.type_tag);

        let restore = element.props.is_truthy("restore");
        if restore {
            self.surface.save();
        }

        if let Some(before) = entry.draw_before_children {
            before(self, element)?;
        }
        for child in &element.children {
            self.draw_child(child)?;
        }
        if let Some(after) = entry.draw_after_children {
            after(self, element)?;
        }

        if restore {
            self.surface.restore();
        }
        self.stats.drawn += 1;
        Ok(())
    }
}

/// Restores the surface's save/restore stack to the depth it had when the
/// scope was opened. Runs on drop, so it also covers errors and panics raised
/// by renderers.
pub struct FrameScope<'s, 'a> {
    ctx: &'s mut SurfaceContext<'a>,
    base_depth: usize,
}

impl<'s, 'a> FrameScope<'s, 'a> {
    pub fn new(ctx: &'s mut SurfaceContext<'a>) -> Self {
        let base_depth = ctx.surface.state_depth();
        Self { ctx, base_depth }
    }

    /// Pop every state saved since the scope opened. Returns how many.
    pub fn unwind(&mut self) -> usize {
        let open = self.ctx.surface.state_depth().saturating_sub(self.base_depth);
        for _ in 0..open {
            self.ctx.surface.restore();
        }
        self.ctx.stats.unwound += open;
        open
    }
}

impl<'a> Deref for FrameScope<'_, 'a> {
    type Target = SurfaceContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for FrameScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for FrameScope<'_, '_> {
    fn drop(&mut self) {
        let unwound = self.unwind();
        if unwound > 0 {
            log::debug!("Unwound {} unbalanced save(s) after frame", unwound);
        }
    }
}

/// Draw a whole snapshot in document order.
pub fn traverse(
    snapshot: &[Node],
    surface: &mut dyn DrawingSurface,
    registry: &RendererRegistry,
    backing: BackingStore,
) -> Result<FrameStats, DrawError> {
    let mut ctx = SurfaceContext::new(surface, registry, backing);
    let result = {
        let mut scope = FrameScope::new(&mut ctx);
        snapshot.iter().try_for_each(|node| scope.draw_child(node))
    };
    result.map(|()| ctx.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ElementNode, Props};
    use crate::registry::RendererEntry;
    use crate::surface::{RecordingSurface, SurfaceCall};

    fn backing() -> BackingStore {
        BackingStore::new(100, 100, 1.0)
    }

    fn el(tag: &str, props: Props, children: Vec<Node>) -> Node {
        Node::Element(ElementNode::new(tag, props, children))
    }

    fn mark_before(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
        let id = node.props.number_or("id", 0.0);
        ctx.surface().fill_rect(id, 0.0, 0.0, 0.0);
        Ok(())
    }

    fn mark_after(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
        let id = node.props.number_or("id", 0.0);
        ctx.surface().stroke_rect(id, 0.0, 0.0, 0.0);
        Ok(())
    }

    fn fail(_: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
        Err(DrawError::renderer(&node.type_tag, "boom"))
    }

    fn marking_registry() -> RendererRegistry {
        let mut registry = RendererRegistry::new();
        registry.register("Mark", RendererEntry::pair(mark_before, mark_after));
        registry.register("Fail", RendererEntry::before(fail));
        registry
    }

    #[test]
    fn before_children_after_order() {
        let snapshot = vec![el(
            "Mark",
            Props::new().with("id", 1),
            vec![
                el("Mark", Props::new().with("id", 2), vec![]),
                el("Mark", Props::new().with("id", 3), vec![]),
            ],
        )];
        let mut surface = RecordingSurface::new(100, 100);
        let stats = traverse(&snapshot, &mut surface, &marking_registry(), backing()).unwrap();
        assert_eq!(stats.drawn, 3);

        let order: Vec<String> = surface
            .calls()
            .map(|c| match c {
                SurfaceCall::FillRect { x, .. } => format!("before{}", x),
                SurfaceCall::StrokeRect { x, .. } => format!("after{}", x),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(
            order,
            ["before1", "before2", "after2", "before3", "after3", "after1"]
        );
    }

    #[test]
    fn text_nodes_are_not_dispatched() {
        let snapshot = vec![Node::Text(crate::node::TextNode::Str("loose".into()))];
        let mut surface = RecordingSurface::new(10, 10);
        let stats = traverse(&snapshot, &mut surface, &marking_registry(), backing()).unwrap();
        assert_eq!(stats, FrameStats::default());
        assert_eq!(surface.calls().count(), 0);
    }

    #[test]
    fn unknown_subtree_is_skipped() {
        let snapshot = vec![el(
            "Unknown",
            Props::new(),
            vec![el("Mark", Props::new(), vec![])],
        )];
        let mut surface = RecordingSurface::new(10, 10);
        let stats = traverse(&snapshot, &mut surface, &marking_registry(), backing()).unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.drawn, 0);
        assert_eq!(surface.calls().count(), 0);
    }

    #[test]
    fn failure_aborts_and_unwinds() {
        let snapshot = vec![
            el(
                "Mark",
                Props::new().with("restore", true),
                vec![el("Fail", Props::new(), vec![])],
            ),
            el("Mark", Props::new().with("id", 9), vec![]),
        ];
        let mut surface = RecordingSurface::new(10, 10);
        let err = traverse(&snapshot, &mut surface, &marking_registry(), backing()).unwrap_err();
        assert_eq!(err, DrawError::renderer("Fail", "boom"));
        assert_eq!(surface.state_depth(), 0);
        // Nothing after the failing renderer was drawn.
        assert!(!surface
            .calls()
            .any(|c| matches!(c, SurfaceCall::FillRect { x, .. } if *x == 9.0)));
    }

    #[test]
    fn restore_wraps_any_tag() {
        let snapshot = vec![el("Mark", Props::new().with("restore", 1), vec![])];
        let mut surface = RecordingSurface::new(10, 10);
        traverse(&snapshot, &mut surface, &marking_registry(), backing()).unwrap();
        let calls: Vec<_> = surface.calls().cloned().collect();
        assert_eq!(calls.first(), Some(&SurfaceCall::Save));
        assert_eq!(calls.last(), Some(&SurfaceCall::Restore));
    }

    #[test]
    fn logical_size_divides_by_ratio() {
        assert_eq!(BackingStore::new(1000, 562, 2.0).logical_size(), (500.0, 281.0));
    }
}
