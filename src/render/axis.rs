//! Axis and gridline groups.

use crate::render::dom::Element;
use crate::render::theme::{ColorTheme, LABEL_SIZE, TICK_SIZE};

/// One tick: plot-space position along the axis and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

impl Tick {
    pub fn new(position: f64, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
        }
    }
}

const TICK_LEN: f64 = 5.0;

/// Horizontal axis drawn at `y`, spanning `0..width`.
pub fn axis_bottom(ticks: &[Tick], y: f64, width: f64, theme: &ColorTheme) -> Element {
    let mut g = Element::new("g")
        .class("axis axis-x")
        .attr("transform", format!("translate(0,{})", crate::render::dom::fmt_num(y)));
    g.push(
        Element::new("line")
            .class("domain")
            .attr("x1", 0.0)
            .attr("x2", width)
            .attr("stroke", theme.border.as_str()),
    );
    for tick in ticks {
        g.push(
            Element::new("g")
                .class("tick")
                .child(
                    Element::new("line")
                        .attr("x1", tick.position)
                        .attr("x2", tick.position)
                        .attr("y2", TICK_LEN)
                        .attr("stroke", theme.border.as_str()),
                )
                .child(
                    Element::new("text")
                        .attr("x", tick.position)
                        .attr("y", TICK_LEN + TICK_SIZE + 2.0)
                        .attr("text-anchor", "middle")
                        .attr("fill", theme.text_muted.as_str())
                        .attr("font-size", TICK_SIZE)
                        .text(tick.label.clone()),
                ),
        );
    }
    g
}

/// Vertical axis along `x = 0`, spanning `0..height`.
pub fn axis_left(ticks: &[Tick], height: f64, theme: &ColorTheme) -> Element {
    let mut g = Element::new("g").class("axis axis-y");
    g.push(
        Element::new("line")
            .class("domain")
            .attr("y1", 0.0)
            .attr("y2", height)
            .attr("stroke", theme.border.as_str()),
    );
    for tick in ticks {
        g.push(
            Element::new("g")
                .class("tick")
                .child(
                    Element::new("line")
                        .attr("x1", -TICK_LEN)
                        .attr("y1", tick.position)
                        .attr("y2", tick.position)
                        .attr("stroke", theme.border.as_str()),
                )
                .child(
                    Element::new("text")
                        .attr("x", -TICK_LEN - 3.0)
                        .attr("y", tick.position)
                        .attr("dy", "0.32em")
                        .attr("text-anchor", "end")
                        .attr("fill", theme.text_muted.as_str())
                        .attr("font-size", TICK_SIZE)
                        .text(tick.label.clone()),
                ),
        );
    }
    g
}

/// Horizontal gridlines behind the data.
pub fn grid_horizontal(positions: &[f64], width: f64, theme: &ColorTheme) -> Element {
    let mut g = Element::new("g").class("grid");
    for &y in positions {
        g.push(
            Element::new("line")
                .attr("x1", 0.0)
                .attr("x2", width)
                .attr("y1", y)
                .attr("y2", y)
                .attr("stroke", theme.grid.as_str()),
        );
    }
    g
}

/// Rotated y-axis title, centered on the plot height.
pub fn axis_label_left(text: &str, height: f64, offset: f64, theme: &ColorTheme) -> Element {
    Element::new("text")
        .class("axis-label")
        .attr("transform", "rotate(-90)")
        .attr("x", -height / 2.0)
        .attr("y", -offset)
        .attr("text-anchor", "middle")
        .attr("fill", theme.text_muted.as_str())
        .attr("font-size", LABEL_SIZE)
        .text(text)
}

/// Centered title above the plot group.
pub fn chart_title(text: &str, width: f64, y: f64, theme: &ColorTheme) -> Element {
    Element::new("text")
        .class("chart-title")
        .attr("x", width / 2.0)
        .attr("y", y)
        .attr("text-anchor", "middle")
        .attr("fill", theme.text.as_str())
        .attr("font-size", crate::render::theme::TITLE_SIZE)
        .attr("font-weight", 600u32)
        .text(text)
}
