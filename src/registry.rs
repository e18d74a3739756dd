//! Renderer Registry: type tag → draw callbacks.
//!
//! Each supported element type contributes one [`RendererEntry`] holding two
//! optional plain function pointers. Entries cannot capture state, so every
//! invocation is a pure function of the surface context and the node.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::DrawError;
use crate::node::ElementNode;
use crate::renderers;
use crate::traversal::SurfaceContext;

/// A draw callback. Receives the live surface context and the node being drawn
/// (its props and, for text, its text-node children).
pub type DrawFn = fn(&mut SurfaceContext<'_>, &ElementNode) -> Result<(), DrawError>;

/// The built-in element types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Rectangle,
    Line,
    Text,
    Translate,
    Scale,
    Rotate,
    Repeat,
}

impl ElementType {
    pub const ALL: [ElementType; 7] = [
        ElementType::Rectangle,
        ElementType::Line,
        ElementType::Text,
        ElementType::Translate,
        ElementType::Scale,
        ElementType::Rotate,
        ElementType::Repeat,
    ];

    /// The type tag carried by snapshot nodes of this type.
    pub const fn tag(self) -> &'static str {
        match self {
            ElementType::Rectangle => "Canvas.Rectangle",
            ElementType::Line => "Canvas.Line",
            ElementType::Text => "Canvas.Text",
            ElementType::Translate => "Canvas.Translate",
            ElementType::Scale => "Canvas.Scale",
            ElementType::Rotate => "Canvas.Rotate",
            ElementType::Repeat => "Canvas.Repeat",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Whether nodes of this type scope their own transform around their children.
    pub const fn is_transform(self) -> bool {
        matches!(
            self,
            ElementType::Translate | ElementType::Scale | ElementType::Rotate
        )
    }

    fn builtin_entry(self) -> RendererEntry {
        match self {
            ElementType::Rectangle => RendererEntry::before(renderers::rectangle::draw),
            ElementType::Line => RendererEntry::before(renderers::line::draw),
            ElementType::Text => RendererEntry::before(renderers::text::draw),
            ElementType::Translate => {
                RendererEntry::pair(renderers::transform::translate, renderers::transform::end_scope)
            }
            ElementType::Scale => {
                RendererEntry::pair(renderers::transform::scale, renderers::transform::end_scope)
            }
            ElementType::Rotate => {
                RendererEntry::pair(renderers::transform::rotate, renderers::transform::end_scope)
            }
            ElementType::Repeat => renderers::repeat::entry(),
        }
    }
}

/// The pair of callbacks registered for one type tag.
#[derive(Clone, Copy, Default)]
pub struct RendererEntry {
    pub draw_before_children: Option<DrawFn>,
    pub draw_after_children: Option<DrawFn>,
}

impl std::fmt::Debug for RendererEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererEntry")
            .field("draw_before_children", &self.draw_before_children.is_some())
            .field("draw_after_children", &self.draw_after_children.is_some())
            .finish()
    }
}

impl RendererEntry {
    pub const fn new(before: Option<DrawFn>, after: Option<DrawFn>) -> Self {
        Self {
            draw_before_children: before,
            draw_after_children: after,
        }
    }

    /// An entry that only draws before its children.
    pub const fn before(before: DrawFn) -> Self {
        Self::new(Some(before), None)
    }

    /// An entry drawing both before and after its children.
    pub const fn pair(before: DrawFn, after: DrawFn) -> Self {
        Self::new(Some(before), Some(after))
    }

    /// An entry that draws nothing; only its children are visited.
    pub const fn structural() -> Self {
        Self::new(None, None)
    }
}

/// Mapping from type tag to renderer entry.
#[derive(Clone, Debug, Default)]
pub struct RendererRegistry {
    entries: HashMap<String, RendererEntry>,
}

impl RendererRegistry {
    /// An empty registry. Every node is skipped until something is registered.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// A registry holding every built-in element type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in ElementType::ALL {
            registry.register(kind.tag(), kind.builtin_entry());
        }
        registry
    }

    /// The shared built-in registry.
    pub fn builtin() -> &'static RendererRegistry {
        static BUILTIN: LazyLock<RendererRegistry> =
            LazyLock::new(RendererRegistry::with_builtins);
        &BUILTIN
    }

    /// Register (or replace) the entry for a type tag.
    pub fn register(&mut self, type_tag: impl Into<String>, entry: RendererEntry) {
        let type_tag = type_tag.into();
        if self.entries.insert(type_tag.clone(), entry).is_some() {
            log::debug!("Replaced renderer for {}", type_tag);
        }
    }

    pub fn lookup(&self, type_tag: &str) -> Option<&RendererEntry> {
        self.entries.get(type_tag)
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.entries.contains_key(type_tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
