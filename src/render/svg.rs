use std::fmt::Write;

use crate::error::ChartResult;
use crate::render::{Element, Renderer};

/// Serializes a scene into SVG markup.
#[must_use]
pub fn to_svg_string(root: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, root);
    out
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.tag());

    let classes: Vec<&str> = element.classes().collect();
    if !classes.is_empty() {
        write_attr(out, "class", &classes.join(" "));
    }
    for (name, value) in element.attrs() {
        write_attr(out, name, value);
    }

    let mut style = String::new();
    for (name, value) in element.styles() {
        let _ = write!(style, "{name}: {value}; ");
    }
    if !style.is_empty() {
        write_attr(out, "style", style.trim_end());
    }

    if element.children().is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in element.children() {
        write_element(out, child);
    }
    let _ = write!(out, "</{}>", element.tag());
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

/// Renderer that keeps the markup of the last scene it was given.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    markup: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    #[must_use]
    pub fn into_markup(self) -> String {
        self.markup
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &Element) -> ChartResult<()> {
        scene.validate()?;
        self.markup = to_svg_string(scene);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::to_svg_string;
    use crate::render::Element;

    #[test]
    fn writes_classes_attrs_and_styles() {
        let mut root = Element::new("g").with_classes("nv-group nv-series-0");
        root.set_attr("clip-path", "url(#clip)");
        root.set_style("stroke-opacity", "1");
        root.append(Element::new("path").with_attr("d", "M0,0L1,1"));

        assert_eq!(
            to_svg_string(&root),
            "<g class=\"nv-group nv-series-0\" clip-path=\"url(#clip)\" \
             style=\"stroke-opacity: 1;\"><path d=\"M0,0L1,1\"/></g>"
        );
    }

    #[test]
    fn escapes_attribute_values() {
        let element = Element::new("text").with_attr("title", "a<b & \"c\"");
        assert_eq!(
            to_svg_string(&element),
            "<text title=\"a&lt;b &amp; &quot;c&quot;\"/>"
        );
    }
}
