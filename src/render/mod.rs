//! Shared rendering toolkit used by every chart.
//!
//! - `dom`: in-memory container/element tree and pointer dispatch
//! - `svg`: responsive SVG root with margins
//! - `scale`, `shape`, `axis`: geometry
//! - `tooltip`, `legend`: HTML overlays
//! - `theme`, `motion`: tokens, render context, reduced-motion gating

pub mod axis;
pub mod dom;
pub mod legend;
pub mod motion;
pub mod scale;
pub mod shape;
pub mod svg;
pub mod theme;
pub mod tooltip;

use crate::render::dom::{Container, Element};
use crate::render::theme::{ColorTheme, LABEL_SIZE};

pub const EMPTY_CLASS: &str = "chart-empty";

/// Replace the container contents with a single placeholder paragraph.
pub fn render_empty_state(container: &mut Container, message: &str, theme: &ColorTheme) {
    container.clear();
    container.append(
        Element::new("p")
            .class(EMPTY_CLASS)
            .style("color", theme.text_muted.as_str())
            .style("font-family", theme.font_family.as_str())
            .style("font-size", format!("{}px", dom::fmt_num(LABEL_SIZE)))
            .style("text-align", "center")
            .text(message),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_replaces_contents() {
        let mut c = Container::sized(300.0, 200.0);
        c.append(Element::new("svg"));
        render_empty_state(&mut c, "No data available", &ColorTheme::light());
        assert_eq!(c.children().len(), 1);
        assert_eq!(c.count_tag("svg"), 0);
        assert_eq!(c.children()[0].text_content(), Some("No data available"));
    }
}
