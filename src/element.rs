//! Declarative element API.
//!
//! Application code builds a tree of [`Element`]s each frame and hands it to a
//! [`CanvasSurface`](crate::surface_manager::CanvasSurface). Builders set props
//! under the same names the renderers read, so a tree built here and a tree
//! built by hand with [`Element::custom`] are indistinguishable once
//! reconciled.
//!
//! ```ignore
//! let scene = vec![
//!     rectangle(0.0, 0.0, 10.0, 10.0).fill("red").into(),
//!     translate(50.0, 50.0)
//!         .child(rotate(0.5).child(line(-5.0, 0.0, 5.0, 0.0).stroke("cyan")))
//!         .into(),
//!     repeat(3, |i| rectangle(5.0 + i.index as f32, 0.0, 1.0, 1.0).into()).into(),
//! ];
//! ```

use std::fmt;
use std::rc::Rc;

use crate::node::{PropValue, Props, TextNode};
use crate::registry::ElementType;

/// Arguments passed to a [`Repeat`] generator for each iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatIndex {
    pub index: f64,
    pub start: f64,
    pub step: f64,
    pub end: f64,
}

/// Generator producing the element for one repeat iteration.
pub type RepeatGenerator = Rc<dyn Fn(RepeatIndex) -> Element>;

/// A node of the declarative tree.
#[derive(Clone)]
pub enum Element {
    /// A typed element; the type tag selects its renderer.
    Host {
        type_tag: String,
        props: Props,
        children: Vec<Element>,
    },
    /// A text leaf.
    Text(TextNode),
    /// A repeated structure, expanded during reconciliation.
    Repeat(Repeat),
    /// Transparent grouping; children are spliced into the parent.
    Fragment(Vec<Element>),
}

impl Element {
    /// An element with an arbitrary type tag. Tags with no registered
    /// renderer are skipped at draw time.
    pub fn custom(type_tag: impl Into<String>) -> Self {
        Element::Host {
            type_tag: type_tag.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// Set a prop. Has no effect on text, repeat or fragment elements.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        if let Element::Host { props, .. } = &mut self {
            props.set(key, value);
        }
        self
    }

    /// Append a child. Text leaves cannot have children; the call is ignored.
    pub fn child(mut self, child: impl Into<Element>) -> Self {
        match &mut self {
            Element::Host { children, .. } | Element::Fragment(children) => {
                children.push(child.into())
            }
            Element::Repeat(_) | Element::Text(_) => {}
        }
        self
    }

    pub fn children<I, E>(self, children: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Element>,
    {
        children.into_iter().fold(self, |el, c| el.child(c))
    }

    /// Wrap the element's drawing in a save/restore pair.
    pub fn restore(self, restore: bool) -> Self {
        match self {
            Element::Repeat(repeat) => Element::Repeat(repeat.restore(restore)),
            other => other.prop("restore", restore),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Host {
                type_tag,
                props,
                children,
            } => f
                .debug_struct("Host")
                .field("type_tag", type_tag)
                .field("props", props)
                .field("children", children)
                .finish(),
            Element::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Element::Repeat(r) => fmt::Debug::fmt(r, f),
            Element::Fragment(c) => f.debug_tuple("Fragment").field(c).finish(),
        }
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Text(TextNode::Str(value.to_string()))
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Text(TextNode::Str(value))
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::Text(TextNode::Number(value))
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::Text(TextNode::Number(value as f64))
    }
}

impl From<Vec<Element>> for Element {
    fn from(value: Vec<Element>) -> Self {
        Element::Fragment(value)
    }
}

fn host(kind: ElementType) -> Element {
    Element::custom(kind.tag())
}

/// Group several elements without introducing a node of their own.
pub fn fragment<I, E>(children: I) -> Element
where
    I: IntoIterator<Item = E>,
    E: Into<Element>,
{
    Element::Fragment(Vec::new()).children(children)
}

// -----------------------------------------------------------------------------
// Shapes
// -----------------------------------------------------------------------------

/// Builder for a `Rectangle` element.
#[derive(Debug, Clone)]
pub struct Rectangle(Element);

/// A rectangle at `(x, y)` with the given size. Nothing is drawn until a fill
/// or stroke is set.
pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Rectangle {
    Rectangle(
        host(ElementType::Rectangle)
            .prop("x", x)
            .prop("y", y)
            .prop("width", width)
            .prop("height", height),
    )
}

impl Rectangle {
    pub fn fill(self, color: impl Into<String>) -> Self {
        Self(self.0.prop("fill", PropValue::Str(color.into())))
    }

    pub fn stroke(self, color: impl Into<String>) -> Self {
        Self(self.0.prop("stroke", PropValue::Str(color.into())))
    }

    pub fn stroke_width(self, width: f32) -> Self {
        Self(self.0.prop("strokeWidth", width))
    }

    pub fn restore(self, restore: bool) -> Self {
        Self(self.0.restore(restore))
    }
}

impl From<Rectangle> for Element {
    fn from(value: Rectangle) -> Self {
        value.0
    }
}

/// Builder for a `Line` element.
#[derive(Debug, Clone)]
pub struct Line(Element);

/// A line segment from `(start_x, start_y)` to `(end_x, end_y)`.
pub fn line(start_x: f32, start_y: f32, end_x: f32, end_y: f32) -> Line {
    Line(
        host(ElementType::Line)
            .prop("startX", start_x)
            .prop("startY", start_y)
            .prop("endX", end_x)
            .prop("endY", end_y),
    )
}

impl Line {
    pub fn stroke(self, color: impl Into<String>) -> Self {
        Self(self.0.prop("stroke", PropValue::Str(color.into())))
    }

    pub fn stroke_width(self, width: f32) -> Self {
        Self(self.0.prop("strokeWidth", width))
    }

    pub fn restore(self, restore: bool) -> Self {
        Self(self.0.restore(restore))
    }
}

impl From<Line> for Element {
    fn from(value: Line) -> Self {
        value.0
    }
}

/// Builder for a `Text` element.
#[derive(Debug, Clone)]
pub struct Text(Element);

/// Text drawn at `(x, y)`. `content` becomes the element's text child.
pub fn text(x: f32, y: f32, content: impl Into<Element>) -> Text {
    Text(
        host(ElementType::Text)
            .prop("x", x)
            .prop("y", y)
            .child(content),
    )
}

impl Text {
    pub fn font_family(self, family: impl Into<String>) -> Self {
        Self(self.0.prop("fontFamily", PropValue::Str(family.into())))
    }

    pub fn font_size(self, size: f32) -> Self {
        Self(self.0.prop("fontSize", size))
    }

    /// `normal`, `italic` or `oblique`.
    pub fn font_style(self, style: impl Into<String>) -> Self {
        Self(self.0.prop("fontStyle", PropValue::Str(style.into())))
    }

    /// `normal` or `small-caps`.
    pub fn font_variant(self, variant: impl Into<String>) -> Self {
        Self(self.0.prop("fontVariant", PropValue::Str(variant.into())))
    }

    /// A keyword (`normal`, `bold`, `bolder`, `lighter`) or a numeric weight.
    pub fn font_weight(self, weight: impl Into<PropValue>) -> Self {
        Self(self.0.prop("fontWeight", weight))
    }

    /// `start`, `end`, `left`, `right` or `center`.
    pub fn text_align(self, align: impl Into<String>) -> Self {
        Self(self.0.prop("textAlign", PropValue::Str(align.into())))
    }

    /// `top`, `hanging`, `middle`, `alphabetic`, `ideographic` or `bottom`.
    pub fn vertical_align(self, align: impl Into<String>) -> Self {
        Self(self.0.prop("verticalAlign", PropValue::Str(align.into())))
    }

    pub fn fill(self, color: impl Into<String>) -> Self {
        Self(self.0.prop("fill", PropValue::Str(color.into())))
    }

    pub fn stroke(self, color: impl Into<String>) -> Self {
        Self(self.0.prop("stroke", PropValue::Str(color.into())))
    }

    pub fn stroke_width(self, width: f32) -> Self {
        Self(self.0.prop("strokeWidth", width))
    }

    /// Append another text child; children are concatenated when drawn.
    pub fn append(self, content: impl Into<Element>) -> Self {
        Self(self.0.child(content))
    }

    pub fn restore(self, restore: bool) -> Self {
        Self(self.0.restore(restore))
    }
}

impl From<Text> for Element {
    fn from(value: Text) -> Self {
        value.0
    }
}

// -----------------------------------------------------------------------------
// Transforms
// -----------------------------------------------------------------------------

/// Builder shared by the transform elements.
#[derive(Debug, Clone)]
pub struct TransformElement(Element);

/// Offset all children by `(x, y)`.
pub fn translate(x: f32, y: f32) -> TransformElement {
    TransformElement(host(ElementType::Translate).prop("x", x).prop("y", y))
}

/// Scale all children by `(x, y)`.
pub fn scale(x: f32, y: f32) -> TransformElement {
    TransformElement(host(ElementType::Scale).prop("x", x).prop("y", y))
}

/// Rotate all children by `radians`.
pub fn rotate(radians: f32) -> TransformElement {
    TransformElement(host(ElementType::Rotate).prop("radians", radians))
}

impl TransformElement {
    /// With `preserve(false)` the transform is not scoped to the children and
    /// carries over into later siblings.
    pub fn preserve(self, preserve: bool) -> Self {
        Self(self.0.prop("preserve", preserve))
    }

    pub fn restore(self, restore: bool) -> Self {
        Self(self.0.restore(restore))
    }

    pub fn child(self, child: impl Into<Element>) -> Self {
        Self(self.0.child(child))
    }

    pub fn children<I, E>(self, children: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Element>,
    {
        Self(self.0.children(children))
    }
}

impl From<TransformElement> for Element {
    fn from(value: TransformElement) -> Self {
        value.0
    }
}

// -----------------------------------------------------------------------------
// Repeat
// -----------------------------------------------------------------------------

/// A structural element that expands a generator over `start..end` by `step`.
#[derive(Clone)]
pub struct Repeat {
    pub start: f64,
    pub step: f64,
    pub end: f64,
    pub restore: bool,
    pub generator: RepeatGenerator,
}

/// Repeat `generator` for `index = 0, 1, ..` while `index < end`.
pub fn repeat(end: impl Into<f64>, generator: impl Fn(RepeatIndex) -> Element + 'static) -> Repeat {
    Repeat {
        start: 0.0,
        step: 1.0,
        end: end.into(),
        restore: false,
        generator: Rc::new(generator),
    }
}

impl Repeat {
    pub fn start(mut self, start: impl Into<f64>) -> Self {
        self.start = start.into();
        self
    }

    pub fn step(mut self, step: impl Into<f64>) -> Self {
        self.step = step.into();
        self
    }

    pub fn restore(mut self, restore: bool) -> Self {
        self.restore = restore;
        self
    }

    /// Run the generator for every index in range.
    ///
    /// A step that is not a positive finite number would never reach `end`;
    /// such a repeat expands to nothing. A step too small to change the index
    /// at its magnitude stops the expansion after the last distinct index.
    pub fn expand(&self) -> Vec<Element> {
        if !(self.step.is_finite() && self.step > 0.0) {
            log::warn!(
                "Repeat with step {} never terminates; expanding to no children",
                self.step
            );
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut index = self.start;
        while index < self.end {
            out.push((self.generator)(RepeatIndex {
                index,
                start: self.start,
                step: self.step,
                end: self.end,
            }));
            let next = index + self.step;
            if next == index {
                log::warn!(
                    "Repeat step {} is lost at index {}; stopping after {} children",
                    self.step,
                    index,
                    out.len()
                );
                break;
            }
            index = next;
        }
        out
    }
}

impl fmt::Debug for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repeat")
            .field("start", &self.start)
            .field("step", &self.step)
            .field("end", &self.end)
            .field("restore", &self.restore)
            .finish_non_exhaustive()
    }
}

impl From<Repeat> for Element {
    fn from(value: Repeat) -> Self {
        Element::Repeat(value)
    }
}
