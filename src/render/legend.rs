//! HTML legend row with per-series value slots, synchronized with hover.

use crate::render::dom::{Container, Dom, Element, fmt_num};
use crate::render::theme::{ColorTheme, LABEL_SIZE};

pub const LEGEND_CLASS: &str = "chart-legend";
const VALUE_CLASS: &str = "legend-value";

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub key: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Legend;

impl Legend {
    pub fn create(container: &mut Container, entries: &[LegendEntry], theme: &ColorTheme) -> Self {
        let mut root = Element::new("div")
            .class(LEGEND_CLASS)
            .style("display", "flex")
            .style("flex-wrap", "wrap")
            .style("gap", "12px")
            .style("color", theme.text.as_str())
            .style("font-family", theme.font_family.as_str())
            .style("font-size", format!("{}px", fmt_num(LABEL_SIZE)));
        for entry in entries {
            root.push(
                Element::new("span")
                    .class("legend-item")
                    .attr("data-key", entry.key.as_str())
                    .child(
                        Element::new("span")
                            .class("legend-swatch")
                            .style("display", "inline-block")
                            .style("width", "10px")
                            .style("height", "10px")
                            .style("background", entry.color.as_str()),
                    )
                    .child(Element::new("span").class("legend-label").text(entry.label.clone()))
                    .child(
                        Element::new("span")
                            .class(VALUE_CLASS)
                            .attr("data-key", entry.key.as_str())
                            .style("color", theme.text_muted.as_str()),
                    ),
            );
        }
        container.append(root);
        Legend
    }

    /// Update value slots; keys missing from `values` are blanked.
    pub fn set_values(&self, dom: &mut Dom, values: &[(String, String)]) {
        dom.for_each_with_class(VALUE_CLASS, |el| {
            let text = el
                .data("key")
                .and_then(|key| values.iter().find(|(k, _)| k == key))
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            el.set_text(text);
        });
    }

    pub fn clear_values(&self, dom: &mut Dom) {
        self.set_values(dom, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_follow_keys() {
        let mut c = Container::sized(400.0, 300.0);
        let entries = vec![
            LegendEntry {
                key: "NYY".into(),
                label: "Yankees".into(),
                color: "#003087".into(),
            },
            LegendEntry {
                key: "BOS".into(),
                label: "Red Sox".into(),
                color: "#bd3039".into(),
            },
        ];
        let legend = Legend::create(&mut c, &entries, &ColorTheme::light());
        legend.set_values(c.dom_mut(), &[("BOS".to_string(), "1532".to_string())]);

        let slots = c.dom().find_all(VALUE_CLASS);
        assert_eq!(slots[0].text_content(), Some(""));
        assert_eq!(slots[1].text_content(), Some("1532"));

        legend.clear_values(c.dom_mut());
        assert_eq!(c.dom().find_all(VALUE_CLASS)[1].text_content(), Some(""));
    }
}
