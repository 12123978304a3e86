//! Floating tooltip shared by every chart.
//!
//! The tooltip is a single `div.chart-tooltip` sibling of the SVG, positioned
//! in container-relative pixels. [`Tooltip`] itself is just a handle: the
//! element lives in the container tree and listeners reach it through the
//! [`Dom`] they are handed.

use std::fmt::Write as _;

use crate::render::dom::{Container, Dom, Element, PointerEvent, Rect, escape_text, fmt_num};
use crate::render::theme::{ColorTheme, LABEL_SIZE};

pub const TOOLTIP_CLASS: &str = "chart-tooltip";

/// Cursor offset, right of and above the pointer.
pub const OFFSET_X: f64 = 14.0;
pub const OFFSET_Y: f64 = -12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Follow the cursor, may overflow the container.
    Free,
    /// Keep the whole tooltip inside the container bounds.
    Clamped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
    pub color: Option<String>,
}

impl TooltipRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: None,
        }
    }

    pub fn colored(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipContent {
    pub title: String,
    pub rows: Vec<TooltipRow>,
}

impl TooltipContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, row: TooltipRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "<div class=\"tt-title\">{}</div>", escape_text(&self.title));
        for row in &self.rows {
            out.push_str("<div class=\"tt-row\">");
            if let Some(color) = &row.color {
                let _ = write!(
                    out,
                    "<span class=\"tt-swatch\" style=\"background:{}\"></span>",
                    escape_text(color)
                );
            }
            let _ = write!(
                out,
                "<span class=\"tt-label\">{}</span><span class=\"tt-value\">{}</span></div>",
                escape_text(&row.label),
                escape_text(&row.value)
            );
        }
        out
    }

    /// Rough rendered size, used for edge clamping.
    pub fn estimated_size(&self) -> (f64, f64) {
        let char_w = LABEL_SIZE * 0.6;
        let widest = self
            .rows
            .iter()
            .map(|r| r.label.chars().count() + r.value.chars().count() + 3)
            .chain(std::iter::once(self.title.chars().count()))
            .max()
            .unwrap_or(0);
        let width = widest as f64 * char_w + 20.0;
        let height = 16.0 + (self.rows.len() as f64 + 1.0) * (LABEL_SIZE + 6.0);
        (width, height)
    }
}

/// Container-relative `(left, top)` for a tooltip of `size` at the cursor.
pub fn position(placement: Placement, bounds: Rect, client: (f64, f64), size: (f64, f64)) -> (f64, f64) {
    let x = client.0 - bounds.x;
    let y = client.1 - bounds.y;
    let mut left = x + OFFSET_X;
    let mut top = y + OFFSET_Y;
    if placement == Placement::Clamped {
        let (w, h) = size;
        if left + w > bounds.width {
            left = x - OFFSET_X - w;
        }
        left = left.min(bounds.width - w).max(0.0);
        top = top.min(bounds.height - h).max(0.0);
    }
    (left, top)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tooltip {
    placement: Placement,
}

impl Tooltip {
    /// Append the (hidden) tooltip element to `container`.
    pub fn create(container: &mut Container, theme: &ColorTheme, placement: Placement) -> Self {
        container.append(
            Element::new("div")
                .class(TOOLTIP_CLASS)
                .attr("role", "tooltip")
                .style("position", "absolute")
                .style("pointer-events", "none")
                .style("opacity", 0.0)
                .style("left", "0px")
                .style("top", "0px")
                .style("background", theme.surface.as_str())
                .style("color", theme.text.as_str())
                .style("border", format!("1px solid {}", theme.border))
                .style("font-family", theme.font_family.as_str())
                .style("font-size", format!("{}px", fmt_num(LABEL_SIZE))),
        );
        Self { placement }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn show(&self, dom: &mut Dom, content: &TooltipContent) {
        let (w, h) = content.estimated_size();
        if let Some(el) = dom.first_with_class_mut(TOOLTIP_CLASS) {
            el.set_html(content.to_html());
            el.set_attr("data-w", w);
            el.set_attr("data-h", h);
            el.set_style("opacity", 1.0);
        }
    }

    pub fn move_to(&self, dom: &mut Dom, event: &PointerEvent) {
        let bounds = dom.bounds();
        let placement = self.placement;
        if let Some(el) = dom.first_with_class_mut(TOOLTIP_CLASS) {
            let size = (
                el.data("w").and_then(|v| v.parse().ok()).unwrap_or(0.0),
                el.data("h").and_then(|v| v.parse().ok()).unwrap_or(0.0),
            );
            let (left, top) = position(placement, bounds, (event.client_x, event.client_y), size);
            el.set_style("left", format!("{}px", fmt_num(left)));
            el.set_style("top", format!("{}px", fmt_num(top)));
        }
    }

    pub fn hide(&self, dom: &mut Dom) {
        if let Some(el) = dom.first_with_class_mut(TOOLTIP_CLASS) {
            el.set_style("opacity", 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_placement_offsets_from_cursor_without_clamping() {
        let bounds = Rect::new(10.0, 20.0, 300.0, 200.0);
        assert_eq!(
            position(Placement::Free, bounds, (305.0, 25.0), (120.0, 60.0)),
            (309.0, -7.0)
        );
    }

    #[test]
    fn clamped_placement_flips_and_stays_inside() {
        let bounds = Rect::new(10.0, 20.0, 300.0, 200.0);
        let (left, top) = position(Placement::Clamped, bounds, (305.0, 25.0), (120.0, 60.0));
        // x = 295 in container space; flipped to the left of the cursor.
        assert_eq!(left, 295.0 - 14.0 - 120.0);
        assert_eq!(top, 0.0);

        let (_, top) = position(Placement::Clamped, bounds, (100.0, 215.0), (120.0, 60.0));
        assert_eq!(top, 140.0);
    }

    #[test]
    fn show_move_hide_cycle() {
        let mut c = Container::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        let tip = Tooltip::create(&mut c, &ColorTheme::light(), Placement::Free);
        let content = TooltipContent::new("91 wins").row(TooltipRow::new("NYY", "412 (4.1%)"));
        tip.show(c.dom_mut(), &content);
        tip.move_to(c.dom_mut(), &PointerEvent::moved(50.0, 60.0));

        let el = c.dom().find_all(TOOLTIP_CLASS)[0];
        assert_eq!(el.get_style("opacity"), Some("1"));
        assert_eq!(el.get_style("left"), Some("64px"));
        assert_eq!(el.get_style("top"), Some("48px"));
        assert!(el.text_content().unwrap_or_default().contains("412 (4.1%)"));

        tip.hide(c.dom_mut());
        assert_eq!(c.dom().find_all(TOOLTIP_CLASS)[0].get_style("opacity"), Some("0"));
    }
}
