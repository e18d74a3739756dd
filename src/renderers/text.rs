use crate::error::DrawError;
use crate::font::{FontSpec, FontStyle, FontVariant, FontWeight, TextAlign, TextBaseline};
use crate::node::{ElementNode, PropValue, Props};
use crate::traversal::SurfaceContext;

const DEFAULT_FAMILY: &str = "arial";
const DEFAULT_SIZE: f32 = 12.0;

/// Resolve the font props, applying the text defaults. Returns `None` when
/// any part is unrecognised; the surface then keeps its current font, just as
/// a canvas context ignores an invalid font string.
pub(crate) fn font_from_props(props: &Props) -> Option<FontSpec> {
    let style = match props.str("fontStyle") {
        Some(s) => FontStyle::parse(s)?,
        None => FontStyle::Normal,
    };
    let variant = match props.str("fontVariant") {
        Some(s) => FontVariant::parse(s)?,
        None => FontVariant::Normal,
    };
    let weight = match props.get("fontWeight") {
        None => FontWeight::NORMAL,
        Some(PropValue::Str(s)) => FontWeight::parse(s)?,
        Some(PropValue::Number(n)) if n.fract() == 0.0 && (1.0..=1000.0).contains(n) => {
            FontWeight::from_number(*n as u16)?
        }
        Some(_) => return None,
    };
    let size = props.number_or("fontSize", DEFAULT_SIZE);
    if !(size.is_finite() && size > 0.0) {
        return None;
    }

    Some(FontSpec {
        family: props.str("fontFamily").unwrap_or(DEFAULT_FAMILY).to_string(),
        size,
        style,
        variant,
        weight,
    })
}

/// Set baseline, alignment and font, then fill and/or stroke the text
/// children at `x, y`.
pub fn draw(ctx: &mut SurfaceContext<'_>, node: &ElementNode) -> Result<(), DrawError> {
    let props = &node.props;
    let surface = ctx.surface();

    match props.str("verticalAlign").map(TextBaseline::parse) {
        None => surface.set_text_baseline(TextBaseline::Top),
        Some(Some(baseline)) => surface.set_text_baseline(baseline),
        Some(None) => {}
    }
    match props.str("textAlign").map(TextAlign::parse) {
        None => surface.set_text_align(TextAlign::Left),
        Some(Some(align)) => surface.set_text_align(align),
        Some(None) => {}
    }
    match font_from_props(props) {
        Some(font) => surface.set_font(&font),
        None => log::trace!("Ignoring invalid font on {}", node.type_tag),
    }

    let Some(content) = node.text_content() else {
        return Ok(());
    };
    let x = props.coordinate("x");
    let y = props.coordinate("y");

    if let Some(fill) = props.str("fill") {
        surface.set_fill_style(fill);
        surface.fill_text(&content, x, y);
    }

    if let (Some(stroke), Some(line_width)) = (props.str("stroke"), super::stroke_width(props)) {
        surface.set_stroke_style(stroke);
        surface.set_line_width(line_width);
        surface.stroke_text(&content, x, y);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_props_absent() {
        let font = font_from_props(&Props::new()).unwrap();
        assert_eq!(font.to_css(), "normal normal normal 12px arial");
    }

    #[test]
    fn numeric_and_keyword_weights() {
        let bolder = font_from_props(&Props::new().with("fontWeight", "bolder")).unwrap();
        assert_eq!(bolder.weight, FontWeight::Bolder);
        assert_eq!(bolder.to_css(), "normal normal bolder 12px arial");
        let numeric = font_from_props(&Props::new().with("fontWeight", 300)).unwrap();
        assert_eq!(numeric.to_css(), "normal normal 300 12px arial");
    }

    #[test]
    fn invalid_font_parts_reject_the_font() {
        assert!(font_from_props(&Props::new().with("fontStyle", "slanted")).is_none());
        assert!(font_from_props(&Props::new().with("fontWeight", 1200)).is_none());
        assert!(font_from_props(&Props::new().with("fontSize", -3)).is_none());
    }
}
