//! Shape collection: the ordered set of committed shapes and its snapshots.
//!
//! Insertion order is z-order. The last shape is drawn on top and is the
//! first one hit-testing considers. Snapshots come in two formats, both
//! tagged with [`SNAPSHOT_VERSION`]:
//!
//! - JSON: `{"version": 1, "shapes": [ ...serde form of Shape... ]}`
//! - XML: `<shapes version="1"><shape id=".." kind=".." .../></shapes>`

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::SNAPSHOT_VERSION;
use crate::error::CanvasError;
use crate::geometry::Point;
use crate::shape::{LineSlope, Shape, ShapeId, ShapeKind, ShapeStyle};

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    shapes: &'a [Shape],
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    shapes: Vec<Shape>,
}

/// Ordered store of shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeCollection {
    shapes: Vec<Shape>,
}

impl ShapeCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Append a shape on top. No dedup, no validation.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == *id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == *id)
    }

    /// Remove a shape by id, returning it if it was present.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id == *id)?;
        Some(self.shapes.remove(index))
    }

    /// The topmost shape whose body contains `p`.
    #[must_use]
    pub fn topmost_at(&self, p: Point) -> Option<&Shape> {
        self.shapes.iter().rev().find(|s| s.contains(p))
    }

    /// Shapes bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    // --- JSON ---

    /// Serialize every shape as a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Err` if serialization fails.
    pub fn to_json(&self) -> Result<String, CanvasError> {
        let snapshot = SnapshotRef { version: SNAPSHOT_VERSION, shapes: &self.shapes };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Load a JSON snapshot. Loaded shapes are normalized.
    ///
    /// # Errors
    ///
    /// Returns `Err` on malformed JSON, an unknown kind, or a version other
    /// than [`SNAPSHOT_VERSION`].
    pub fn from_json(text: &str) -> Result<Self, CanvasError> {
        let snapshot: Snapshot = serde_json::from_str(text)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CanvasError::UnsupportedVersion(snapshot.version));
        }
        let mut shapes = snapshot.shapes;
        for shape in &mut shapes {
            shape.normalize();
        }
        tracing::debug!(count = shapes.len(), "loaded json snapshot");
        Ok(Self { shapes })
    }

    // --- XML ---

    /// Serialize every shape as an XML snapshot.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = format!("<shapes version=\"{SNAPSHOT_VERSION}\">\n");
        for shape in &self.shapes {
            out.push_str(&shape_to_xml(shape));
            out.push('\n');
        }
        out.push_str("</shapes>\n");
        out
    }

    /// Load an XML snapshot. Loaded shapes are normalized.
    ///
    /// # Errors
    ///
    /// Returns `Err` on malformed XML, unexpected elements, missing or
    /// non-numeric attributes, unknown kinds, or an unsupported version.
    pub fn from_xml(text: &str) -> Result<Self, CanvasError> {
        let doc = roxmltree::Document::parse(text)?;
        let root = doc.root_element();
        if root.tag_name().name() != "shapes" {
            return Err(CanvasError::UnexpectedElement(root.tag_name().name().to_owned()));
        }
        let version_text = required(root, "version")?;
        let version: u32 = version_text
            .parse()
            .map_err(|_| CanvasError::InvalidNumber { attribute: "version", value: version_text.to_owned() })?;
        if version != SNAPSHOT_VERSION {
            return Err(CanvasError::UnsupportedVersion(version));
        }

        let mut shapes = Vec::new();
        for node in root.children().filter(roxmltree::Node::is_element) {
            if node.tag_name().name() != "shape" {
                return Err(CanvasError::UnexpectedElement(node.tag_name().name().to_owned()));
            }
            let mut shape = shape_from_xml(node)?;
            shape.normalize();
            shapes.push(shape);
        }
        tracing::debug!(count = shapes.len(), "loaded xml snapshot");
        Ok(Self { shapes })
    }
}

fn shape_to_xml(shape: &Shape) -> String {
    let mut out = format!(
        "  <shape id=\"{}\" kind=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rotation=\"{}\" fill=\"{}\" stroke=\"{}\" line-width=\"{}\"",
        shape.id,
        shape.kind.as_str(),
        shape.x,
        shape.y,
        shape.width,
        shape.height,
        shape.rotation,
        escape_xml(&shape.style.fill),
        escape_xml(&shape.style.stroke),
        shape.style.line_width,
    );
    if !shape.slope.is_descending() {
        out.push_str(&format!(" slope=\"{}\"", shape.slope.as_str()));
    }
    out.push_str("/>");
    out
}

fn shape_from_xml(node: roxmltree::Node<'_, '_>) -> Result<Shape, CanvasError> {
    let id_text = required(node, "id")?;
    let id = Uuid::parse_str(id_text).map_err(|_| CanvasError::InvalidId(id_text.to_owned()))?;
    let kind_text = required(node, "kind")?;
    let kind = ShapeKind::parse(kind_text).ok_or_else(|| CanvasError::UnknownKind(kind_text.to_owned()))?;
    let slope = match node.attribute("slope") {
        Some(text) => LineSlope::parse(text).ok_or_else(|| CanvasError::UnknownSlope(text.to_owned()))?,
        None => LineSlope::Descending,
    };

    let defaults = ShapeStyle::default();
    let style = ShapeStyle {
        fill: node.attribute("fill").map_or(defaults.fill, str::to_owned),
        stroke: node.attribute("stroke").map_or(defaults.stroke, str::to_owned),
        line_width: match node.attribute("line-width") {
            Some(text) => parse_number("line-width", text)?,
            None => defaults.line_width,
        },
    };

    Ok(Shape {
        id,
        kind,
        x: number(node, "x")?,
        y: number(node, "y")?,
        width: number(node, "width")?,
        height: number(node, "height")?,
        rotation: number(node, "rotation")?,
        slope,
        style,
    })
}

fn required<'a>(node: roxmltree::Node<'a, '_>, attribute: &'static str) -> Result<&'a str, CanvasError> {
    node.attribute(attribute)
        .ok_or(CanvasError::MissingAttribute(attribute))
}

fn number(node: roxmltree::Node<'_, '_>, attribute: &'static str) -> Result<f64, CanvasError> {
    parse_number(attribute, required(node, attribute)?)
}

fn parse_number(attribute: &'static str, text: &str) -> Result<f64, CanvasError> {
    text.trim()
        .parse()
        .map_err(|_| CanvasError::InvalidNumber { attribute, value: text.to_owned() })
}

/// Escape the five XML special characters for use in attribute values.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
