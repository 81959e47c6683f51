use std::fmt::{self, Write};
use std::path::Path;

use crate::{
    document::model::{DefNode, Document},
    foundation::error::{DollError, DollResult},
    geometry::element::GeometryElement,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

impl Document {
    /// Serialize to an SVG document string.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = write_document(&mut out, self, 0);
        out
    }

    /// Serialize and write to `path`, creating parent directories as needed.
    pub fn write_svg(&self, path: impl AsRef<Path>) -> DollResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DollError::Other(anyhow::anyhow!(
                    "create output dir '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        std::fs::write(path, self.to_svg()).map_err(|e| {
            DollError::Other(anyhow::anyhow!("write svg '{}': {e}", path.display()))
        })
    }
}

fn write_document(out: &mut String, doc: &Document, depth: usize) -> fmt::Result {
    indent(out, depth);
    out.push_str("<svg");
    if depth == 0 {
        attr(out, "xmlns", SVG_NS)?;
        attr(out, "xmlns:inkscape", INKSCAPE_NS)?;
    }
    attr(out, "id", &doc.id)?;
    attr(out, "width", &doc.width.to_string())?;
    attr(out, "height", &doc.height.to_string())?;
    attr(out, "viewBox", &doc.viewbox.to_string())?;
    out.push_str(">\n");

    if !doc.defs.is_empty() {
        indent(out, depth + 1);
        out.push_str("<defs");
        attr(out, "id", &doc.defs_id())?;
        out.push_str(">\n");
        for node in &doc.defs {
            write_def(out, node, depth + 2)?;
        }
        indent(out, depth + 1);
        out.push_str("</defs>\n");
    }
    for layer in &doc.layers {
        write_element(out, layer, depth + 1)?;
    }
    indent(out, depth);
    out.push_str("</svg>\n");
    Ok(())
}

fn write_element(out: &mut String, elem: &GeometryElement, depth: usize) -> fmt::Result {
    match elem {
        GeometryElement::Path(p) => {
            indent(out, depth);
            out.push_str("<path");
            attr(out, "id", &p.id)?;
            attr(out, "d", &p.path.to_svg())?;
            if let Some(style) = &p.style {
                attr(out, "style", &style.to_string())?;
            }
            out.push_str("/>\n");
        }
        GeometryElement::Group(g) => {
            indent(out, depth);
            out.push_str("<g");
            attr(out, "id", &g.id)?;
            for (k, v) in &g.attributes {
                attr(out, k, v)?;
            }
            if let Some(style) = &g.style {
                attr(out, "style", &style.to_string())?;
            }
            if g.children.is_empty() {
                out.push_str("/>\n");
                return Ok(());
            }
            out.push_str(">\n");
            for child in &g.children {
                write_element(out, child, depth + 1)?;
            }
            indent(out, depth);
            out.push_str("</g>\n");
        }
        GeometryElement::Document(d) => write_document(out, d, depth)?,
    }
    Ok(())
}

fn write_def(out: &mut String, node: &DefNode, depth: usize) -> fmt::Result {
    indent(out, depth);
    write!(out, "<{}", node.tag)?;
    for (k, v) in &node.attributes {
        attr(out, k, v)?;
    }
    match (&node.text, node.children.is_empty()) {
        (None, true) => out.push_str("/>\n"),
        (text, _) => {
            out.push('>');
            if let Some(text) = text {
                out.push_str(&escape_xml(text));
            }
            if !node.children.is_empty() {
                out.push('\n');
                for child in &node.children {
                    write_def(out, child, depth + 1)?;
                }
                indent(out, depth);
            }
            writeln!(out, "</{}>", node.tag)?;
        }
    }
    Ok(())
}

fn attr(out: &mut String, name: &str, value: &str) -> fmt::Result {
    write!(out, " {name}=\"{}\"", escape_xml(value))
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/document/svg.rs"]
mod tests;
