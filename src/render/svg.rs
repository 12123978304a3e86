//! Responsive SVG factory.
//!
//! Charts are laid out against a fixed intrinsic view box and then scaled by
//! CSS to the container width (`width: 100%`, `height: auto`). Only the inner
//! plotting dimensions returned here are meaningful for scale construction;
//! the on-screen pixel size depends on the container.

use crate::render::dom::{Container, Element, Rect};
use crate::render::theme::{ColorTheme, LABEL_SIZE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// View box plus margin; maps pointer positions into plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub view_width: f64,
    pub view_height: f64,
    pub margin: Margin,
}

impl Frame {
    /// Client coordinates -> coordinates inside the margin-translated plot group.
    ///
    /// The SVG is rendered at the container's width, so one CSS pixel spans
    /// `view_width / bounds.width` view-box units on both axes.
    pub fn to_plot(&self, bounds: Rect, client_x: f64, client_y: f64) -> (f64, f64) {
        let scale = if bounds.width > 0.0 {
            self.view_width / bounds.width
        } else {
            1.0
        };
        (
            (client_x - bounds.x) * scale - self.margin.left,
            (client_y - bounds.y) * scale - self.margin.top,
        )
    }

    /// Inverse of [`Frame::to_plot`].
    pub fn to_client(&self, bounds: Rect, plot_x: f64, plot_y: f64) -> (f64, f64) {
        let scale = if self.view_width > 0.0 {
            bounds.width / self.view_width
        } else {
            1.0
        };
        (
            bounds.x + (plot_x + self.margin.left) * scale,
            bounds.y + (plot_y + self.margin.top) * scale,
        )
    }
}

/// An unmounted SVG root with its inner plot group.
#[derive(Debug, Clone)]
pub struct ResponsiveSvg {
    root: Element,
    /// Group translated by the margin; draw here.
    pub plot: Element,
    pub inner_width: f64,
    pub inner_height: f64,
    frame: Frame,
}

impl ResponsiveSvg {
    pub fn new(width: f64, height: f64, margin: Margin, theme: &ColorTheme) -> Self {
        let root = Element::new("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr("viewBox", format!("0 0 {} {}", fmt(width), fmt(height)))
            .attr("width", "100%")
            .attr("role", "img")
            .style("height", "auto")
            .style("display", "block")
            .style("font-family", theme.font_family.as_str())
            .style("font-size", format!("{}px", fmt(LABEL_SIZE)));
        let plot = Element::new("g")
            .class("plot")
            .attr("transform", format!("translate({},{})", fmt(margin.left), fmt(margin.top)));
        Self {
            root,
            plot,
            inner_width: width - margin.left - margin.right,
            inner_height: height - margin.top - margin.bottom,
            frame: Frame {
                view_width: width,
                view_height: height,
                margin,
            },
        }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Accessible name for the chart.
    pub fn set_label(&mut self, label: &str) {
        self.root.set_attr("aria-label", label);
    }

    /// Insert the SVG into the container.
    pub fn mount(self, container: &mut Container) {
        let mut root = self.root;
        root.push(self.plot);
        container.append(root);
    }
}

fn fmt(v: f64) -> String {
    crate::render::dom::fmt_num(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_dimensions_subtract_margins() {
        let svg = ResponsiveSvg::new(720.0, 400.0, Margin::new(40.0, 20.0, 30.0, 50.0), &ColorTheme::light());
        assert_eq!(svg.inner_width, 650.0);
        assert_eq!(svg.inner_height, 330.0);
    }

    #[test]
    fn mount_produces_view_box_and_translated_group() {
        let svg = ResponsiveSvg::new(720.0, 400.0, Margin::new(40.0, 20.0, 30.0, 50.0), &ColorTheme::light());
        let mut c = Container::sized(360.0, 200.0);
        svg.mount(&mut c);
        let markup = c.to_markup();
        assert!(markup.contains("viewBox=\"0 0 720 400\""));
        assert!(markup.contains("width=\"100%\""));
        assert!(markup.contains("transform=\"translate(50,40)\""));
    }

    #[test]
    fn pointer_mapping_accounts_for_css_scaling() {
        let frame = Frame {
            view_width: 720.0,
            view_height: 400.0,
            margin: Margin::new(40.0, 20.0, 30.0, 50.0),
        };
        // Container rendered at half the intrinsic width, offset on the page.
        let bounds = Rect::new(100.0, 20.0, 360.0, 200.0);
        let (x, y) = frame.to_plot(bounds, 100.0 + 50.0, 20.0 + 40.0);
        assert_eq!((x, y), (50.0, 40.0));

        let (cx, cy) = frame.to_client(bounds, 50.0, 40.0);
        assert_eq!((cx, cy), (150.0, 60.0));
    }
}
