//! In-memory DOM used as the render target for every chart.
//!
//! A [`Container`] stands in for the caller-owned page node a chart draws
//! into. It holds:
//!
//! - an ordered list of child [`Element`]s (the SVG plus tooltip/legend siblings)
//! - a simulated bounding box (`getBoundingClientRect` equivalent)
//! - pointer listeners attached by the renderer
//!
//! Everything serializes to deterministic markup, which is what the HTML
//! export writes and what the tests compare.

use std::fmt::{self, Write as _};
use std::rc::Rc;

use crate::render::motion::Animation;
use crate::render::svg::Frame;

/// Values that can be written into an attribute or style property.
pub trait AttrValue {
    fn to_attr(&self) -> String;
}

impl AttrValue for &str {
    fn to_attr(&self) -> String {
        (*self).to_string()
    }
}

impl AttrValue for String {
    fn to_attr(&self) -> String {
        self.clone()
    }
}

impl AttrValue for &String {
    fn to_attr(&self) -> String {
        (*self).clone()
    }
}

impl AttrValue for f64 {
    fn to_attr(&self) -> String {
        fmt_num(*self)
    }
}

impl AttrValue for i32 {
    fn to_attr(&self) -> String {
        self.to_string()
    }
}

impl AttrValue for u32 {
    fn to_attr(&self) -> String {
        self.to_string()
    }
}

impl AttrValue for usize {
    fn to_attr(&self) -> String {
        self.to_string()
    }
}

/// Format a coordinate for markup: at most two decimals, no trailing zeros.
///
/// Non-finite values collapse to `0` so a bad number can never leak `NaN`
/// into an attribute.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Empty,
    Text(String),
    Html(String),
}

/// One node of the chart tree (SVG or HTML).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
    content: Content,
    children: Vec<Element>,
    animations: Vec<Animation>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            style: Vec::new(),
            content: Content::Empty,
            children: Vec::new(),
            animations: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Builder form of [`Element::set_attr`].
    pub fn attr(mut self, name: &str, value: impl AttrValue) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: impl AttrValue) {
        let value = value.to_attr();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Shorthand for `data-*` attributes.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.get_attr(&format!("data-{key}"))
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// Builder form of [`Element::set_style`].
    pub fn style(mut self, prop: &str, value: impl AttrValue) -> Self {
        self.set_style(prop, value);
        self
    }

    pub fn set_style(&mut self, prop: &str, value: impl AttrValue) {
        let value = value.to_attr();
        match self.style.iter_mut().find(|(k, _)| k == prop) {
            Some(slot) => slot.1 = value,
            None => self.style.push((prop.to_string(), value)),
        }
    }

    pub fn get_style(&self, prop: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == prop)
            .map(|(_, v)| v.as_str())
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = Content::Text(text.into());
    }

    /// Replace the content with pre-escaped HTML.
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.content = Content::Html(html.into());
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            Content::Text(t) | Content::Html(t) => Some(t),
            Content::Empty => None,
        }
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn push_animation(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn visit(&self, f: &mut dyn FnMut(&Element)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    pub fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (k, v) in &self.attrs {
            let _ = write!(out, " {k}=\"{}\"", escape_attr(v));
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self.style.iter().map(|(k, v)| format!("{k}:{v}")).collect();
            let _ = write!(out, " style=\"{}\"", escape_attr(&style.join(";")));
        }
        out.push('>');
        match &self.content {
            Content::Empty => {}
            Content::Text(t) => out.push_str(&escape_text(t)),
            Content::Html(h) => out.push_str(h),
        }
        for child in &self.children {
            child.write_markup(out);
        }
        for animation in &self.animations {
            animation.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }
}

fn find_mut<'a>(el: &'a mut Element, pred: &dyn Fn(&Element) -> bool) -> Option<&'a mut Element> {
    if pred(el) {
        return Some(el);
    }
    for child in el.children.iter_mut() {
        if let Some(found) = find_mut(child, pred) {
            return Some(found);
        }
    }
    None
}

/// Simulated client bounding box of a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Leave,
}

/// A pointer event in client (page) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn moved(client_x: f64, client_y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            client_x,
            client_y,
        }
    }

    pub fn left() -> Self {
        Self {
            kind: PointerKind::Leave,
            client_x: 0.0,
            client_y: 0.0,
        }
    }
}

/// The mutable part of a container that listeners operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct Dom {
    bounds: Rect,
    children: Vec<Element>,
}

impl Dom {
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Apply `f` to every element (at any depth) carrying `class`.
    pub fn for_each_with_class(&mut self, class: &str, mut f: impl FnMut(&mut Element)) {
        for child in &mut self.children {
            child.visit_mut(&mut |el: &mut Element| {
                if el.has_class(class) {
                    f(el);
                }
            });
        }
    }

    pub fn first_with_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        let pred = |el: &Element| el.has_class(class);
        for child in self.children.iter_mut() {
            if let Some(found) = find_mut(child, &pred) {
                return Some(found);
            }
        }
        None
    }

    /// All elements carrying `class`, in document order.
    pub fn find_all(&self, class: &str) -> Vec<&Element> {
        fn collect<'a>(el: &'a Element, class: &str, out: &mut Vec<&'a Element>) {
            if el.has_class(class) {
                out.push(el);
            }
            for child in &el.children {
                collect(child, class, out);
            }
        }
        let mut out = Vec::new();
        for child in &self.children {
            collect(child, class, &mut out);
        }
        out
    }

    /// Map a client-space pointer position into the plot group of `frame`.
    pub fn plot_point(&self, event: &PointerEvent, frame: &Frame) -> (f64, f64) {
        frame.to_plot(self.bounds, event.client_x, event.client_y)
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_markup(&mut out);
        }
        out
    }
}

/// Listener callback; receives the event and the container's tree.
pub type PointerHandler = Rc<dyn Fn(&PointerEvent, &mut Dom)>;

struct Listener {
    kind: PointerKind,
    handler: PointerHandler,
}

/// A caller-owned render target.
pub struct Container {
    dom: Dom,
    listeners: Vec<Listener>,
}

impl Container {
    pub fn new(bounds: Rect) -> Self {
        Self {
            dom: Dom {
                bounds,
                children: Vec::new(),
            },
            listeners: Vec::new(),
        }
    }

    /// Container placed at the page origin with the given CSS width and height.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(Rect::new(0.0, 0.0, width, height))
    }

    pub fn bounds(&self) -> Rect {
        self.dom.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.dom.bounds = bounds;
    }

    /// Drop all children and listeners.
    pub fn clear(&mut self) {
        self.dom.children.clear();
        self.listeners.clear();
    }

    pub fn append(&mut self, el: Element) {
        self.dom.children.push(el);
    }

    pub fn on(&mut self, kind: PointerKind, handler: impl Fn(&PointerEvent, &mut Dom) + 'static) {
        self.listeners.push(Listener {
            kind,
            handler: Rc::new(handler),
        });
    }

    pub fn dispatch(&mut self, event: &PointerEvent) {
        let handlers: Vec<PointerHandler> = self
            .listeners
            .iter()
            .filter(|l| l.kind == event.kind)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        for handler in handlers {
            handler(event, &mut self.dom);
        }
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) {
        self.dispatch(&PointerEvent::moved(client_x, client_y));
    }

    pub fn pointer_leave(&mut self) {
        self.dispatch(&PointerEvent::left());
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn children(&self) -> &[Element] {
        &self.dom.children
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of elements (at any depth) with the given tag.
    pub fn count_tag(&self, tag: &str) -> usize {
        let mut n = 0;
        for child in &self.dom.children {
            child.visit(&mut |el: &Element| {
                if el.tag() == tag {
                    n += 1;
                }
            });
        }
        n
    }

    pub fn to_markup(&self) -> String {
        self.dom.to_markup()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bounds", &self.dom.bounds)
            .field("children", &self.dom.children.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
