//! Render Surfaces
//!
//! A surface is a small owned SVG element tree. The reports view creates one
//! per chart id; the renderer clears and draws into it, and the tree is
//! serialized to SVG text for presentation.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

/// Logical canvas width of every chart surface
pub const CANVAS_WIDTH: f64 = 500.0;
/// Logical canvas height of every chart surface
pub const CANVAS_HEIGHT: f64 = 300.0;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// A node in the SVG tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An SVG element with ordered attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attr(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric attribute value
    pub fn num_attr(&self, key: &str) -> Option<f64> {
        self.get_attr(key).and_then(|v| v.parse().ok())
    }

    /// Builder-style child append
    pub fn child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Builder-style text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Concatenated direct text content
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// True if the `class` attribute lists `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|part| part == class))
            .unwrap_or(false)
    }

    /// Depth-first walk over this element and its descendants
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        visit(self);
        for node in &self.children {
            if let Node::Element(el) = node {
                el.walk(visit);
            }
        }
    }

    fn write_svg(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.name);
        for (k, v) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Element(el) => el.write_svg(out),
                Node::Text(t) => out.push_str(&escape(t)),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// A drawable region keyed by chart id
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSurface {
    id: String,
    width: f64,
    height: f64,
    attrs: Vec<(String, String)>,
    content: Vec<Element>,
    draw_count: u64,
}

impl RenderSurface {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            attrs: Vec::new(),
            content: Vec::new(),
            draw_count: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// How many times a chart has been drawn into this surface
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Remove all drawn content and root attributes, restoring the canvas size
    pub fn clear(&mut self) {
        self.content.clear();
        self.attrs.clear();
        self.width = CANVAS_WIDTH;
        self.height = CANVAS_HEIGHT;
    }

    /// Clear and start a new drawing pass
    pub fn begin_draw(&mut self) {
        self.clear();
        self.draw_count += 1;
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Set an attribute on the root `<svg>` element
    pub fn set_attr(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn append(&mut self, element: Element) {
        self.content.push(element);
    }

    /// Top-level drawn elements
    pub fn content(&self) -> &[Element] {
        &self.content
    }

    /// All drawn elements carrying `class`
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.find(|el| el.has_class(class))
    }

    /// All drawn elements with tag `name`
    pub fn find_by_name(&self, name: &str) -> Vec<&Element> {
        self.find(|el| el.name() == name)
    }

    fn find(&self, pred: impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        for el in &self.content {
            el.walk(&mut |e| {
                if pred(e) {
                    found.push(e);
                }
            });
        }
        found
    }

    /// Serialize as a standalone `<svg>` document fragment
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(4096);
        let _ = write!(
            out,
            "<svg xmlns=\"{}\" data-chart-id=\"{}\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\"",
            SVG_NS,
            escape(&self.id),
            num(self.width),
            num(self.height),
            num(self.width),
            num(self.height)
        );
        for (k, v) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        out.push('>');
        for el in &self.content {
            el.write_svg(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}

/// Surfaces owned by a view, keyed by chart id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceRegistry {
    surfaces: BTreeMap<String, RenderSurface>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the surface for `id`, creating it if absent
    pub fn ensure(&mut self, id: &str) -> &mut RenderSurface {
        self.surfaces
            .entry(id.to_string())
            .or_insert_with(|| RenderSurface::new(id))
    }

    pub fn get(&self, id: &str) -> Option<&RenderSurface> {
        self.surfaces.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut RenderSurface> {
        self.surfaces.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }

    /// Drop surfaces whose id is not in `ids`
    pub fn retain_ids(&mut self, ids: &HashSet<&str>) {
        self.surfaces.retain(|id, _| ids.contains(id.as_str()));
    }

    pub fn remove_all(&mut self) {
        self.surfaces.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderSurface> {
        self.surfaces.values()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Format a coordinate compactly: at most three decimals, no trailing zeros
pub fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{:.3}", rounded);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Escape text for use in XML/HTML text and double-quoted attributes
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
