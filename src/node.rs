//! Node Model: the immutable per-commit snapshot the draw traversal walks.
//!
//! A snapshot is rebuilt from the declarative tree on every commit and dropped
//! once the next commit's traversal finishes. Nodes own nothing on the drawing
//! surface and carry no identity across commits.

use std::collections::HashMap;
use std::fmt;

/// A single prop value.
///
/// Values follow loose scripting-language semantics: any value can be tested
/// for truthiness, and numeric reads coerce where that is unambiguous.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl PropValue {
    /// `false`, `0`, `NaN`, `""` and `Null` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Null => false,
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropValue::Null)
    }
}

/// Unordered prop mapping of an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(HashMap<String, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Set a prop, replacing any previous value. `Null` values are stored so
    /// that "explicitly absent" and "never set" read the same way.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key).filter(|v| !matches!(v, PropValue::Null))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(PropValue::is_truthy)
    }

    /// Read a numeric prop. Non-numeric values read as absent.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropValue::as_number)
    }

    /// Read a numeric prop as `f32`, defaulting when absent.
    pub fn number_or(&self, key: &str, default: f32) -> f32 {
        self.number(key).map(|n| n as f32).unwrap_or(default)
    }

    /// Read a required coordinate. Missing or non-numeric values become NaN so
    /// the drawing surface can reject them the way it rejects any bad geometry.
    pub fn coordinate(&self, key: &str) -> f32 {
        self.number_or(key, f32::NAN)
    }

    /// Read a string prop. An empty string counts as absent.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(PropValue::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PropValue::as_bool)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A numeric or string leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum TextNode {
    Number(f64),
    Str(String),
}

impl fmt::Display for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextNode::Number(n) => f.write_str(&format_number(*n)),
            TextNode::Str(s) => f.write_str(s),
        }
    }
}

/// Format a number the way a script engine prints it in text.
///
/// Integral values carry no fraction, `-0` prints as `0`, infinities are
/// spelled out, and magnitudes of `1e21` and above or below `1e-6` switch to
/// exponent notation with an explicit sign (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }

    // `{:e}` already gives the shortest round-trip mantissa.
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp,
    }
}

/// A typed element of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub type_tag: String,
    pub props: Props,
    pub children: Vec<Node>,
}

impl ElementNode {
    pub fn new(type_tag: impl Into<String>, props: Props, children: Vec<Node>) -> Self {
        Self {
            type_tag: type_tag.into(),
            props,
            children,
        }
    }

    /// Concatenated text of the direct text-node children, if any.
    pub fn text_content(&self) -> Option<String> {
        let mut texts = self.children.iter().filter_map(Node::as_text).peekable();
        texts.peek()?;
        Some(texts.map(|t| t.to_string()).collect())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A snapshot node: either an element or a text leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
}

impl Node {
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }

    /// Count element nodes in this subtree (including self).
    pub fn element_count(&self) -> usize {
        match self {
            Node::Element(e) => 1 + e.children.iter().map(Node::element_count).sum::<usize>(),
            Node::Text(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_loose_semantics() {
        assert!(!PropValue::Null.is_truthy());
        assert!(!PropValue::Bool(false).is_truthy());
        assert!(!PropValue::Number(0.0).is_truthy());
        assert!(!PropValue::Number(f64::NAN).is_truthy());
        assert!(!PropValue::Str(String::new()).is_truthy());
        assert!(PropValue::Bool(true).is_truthy());
        assert!(PropValue::Number(-1.0).is_truthy());
        assert!(PropValue::Str("x".into()).is_truthy());
    }

    #[test]
    fn null_props_read_as_absent() {
        let props = Props::new().with("fill", None::<&str>).with("x", 3.0);
        assert!(!props.contains("fill"));
        assert_eq!(props.number("x"), Some(3.0));
        assert_eq!(props.str("x"), None);
    }

    #[test]
    fn missing_coordinate_is_nan() {
        let props = Props::new().with("x", "abc");
        assert!(props.coordinate("x").is_nan());
        assert!(props.coordinate("y").is_nan());
    }

    #[test]
    fn text_content_formats_numbers_without_fraction() {
        let node = ElementNode::new(
            "Canvas.Text",
            Props::new(),
            vec![
                Node::Text(TextNode::Number(60.0)),
                Node::Text(TextNode::Str("fps".into())),
            ],
        );
        assert_eq!(node.text_content().as_deref(), Some("60fps"));
    }

    #[test]
    fn numbers_format_like_script_text() {
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(TextNode::Number(-0.0).to_string(), "0");
    }

    #[test]
    fn text_content_absent_without_text_children() {
        let node = ElementNode::new("Canvas.Text", Props::new(), Vec::new());
        assert_eq!(node.text_content(), None);
    }
}
