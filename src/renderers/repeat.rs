//! `Canvas.Repeat` draws nothing itself. Its generator has already been
//! expanded into children by the reconciler, and the traversal visits them
//! like any other children.

use crate::registry::RendererEntry;

pub fn entry() -> RendererEntry {
    RendererEntry::structural()
}
