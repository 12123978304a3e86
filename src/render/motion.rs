//! Transitions, gated on the viewer's reduced-motion preference.
//!
//! Every animated attribute in every chart goes through [`transition`] (or
//! [`draw_in`]), so the reduced-motion check lives in exactly one place. When
//! motion is reduced the element gets its final value and no animation at all.
//!
//! Animations serialize as SMIL `<animate>` children with `fill="freeze"`,
//! so an exported chart plays them without any script.

use std::fmt::Write as _;

use crate::render::dom::{AttrValue, Element, escape_text, fmt_num};
use crate::render::theme::RenderContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    CubicOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }

    /// Bezier control points approximating the easing for SMIL `keySplines`.
    fn key_splines(self) -> Option<&'static str> {
        match self {
            Ease::Linear => None,
            Ease::CubicOut => Some("0.215 0.61 0.355 1"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub ease: Ease,
}

impl Timing {
    pub const fn new(duration_ms: u32, ease: Ease) -> Self {
        Self {
            duration_ms,
            delay_ms: 0,
            ease,
        }
    }

    pub const fn delayed(self, delay_ms: u32) -> Self {
        Self { delay_ms, ..self }
    }

    pub const fn end_ms(self) -> u32 {
        self.delay_ms + self.duration_ms
    }
}

/// Line draw-in.
pub const DRAW_IN: Timing = Timing::new(1200, Ease::CubicOut);
/// Bars growing from the baseline.
pub const GROW: Timing = Timing::new(600, Ease::CubicOut);
/// Labels, dots, and other late arrivals.
pub const FADE_IN: Timing = Timing::new(400, Ease::CubicOut);

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub attr: String,
    pub from: String,
    pub to: String,
    pub timing: Timing,
}

impl Animation {
    pub(crate) fn write_markup(&self, out: &mut String) {
        let _ = write!(
            out,
            "<animate attributeName=\"{}\" from=\"{}\" to=\"{}\" dur=\"{}ms\" begin=\"{}ms\" fill=\"freeze\"",
            escape_text(&self.attr),
            escape_text(&self.from),
            escape_text(&self.to),
            self.timing.duration_ms,
            self.timing.delay_ms,
        );
        if let Some(splines) = self.timing.ease.key_splines() {
            let _ = write!(out, " calcMode=\"spline\" keyTimes=\"0;1\" keySplines=\"{splines}\"");
        }
        out.push_str("></animate>");
    }
}

/// Animate `attr` from `from` to `to`, or jump straight to `to` under reduced motion.
pub fn transition(
    el: &mut Element,
    ctx: &RenderContext,
    attr: &str,
    from: impl AttrValue,
    to: impl AttrValue,
    timing: Timing,
) {
    let to = to.to_attr();
    if ctx.reduced_motion || timing.duration_ms == 0 {
        el.set_attr(attr, to);
        return;
    }
    let from = from.to_attr();
    el.set_attr(attr, from.clone());
    el.push_animation(Animation {
        attr: attr.to_string(),
        from,
        to,
        timing,
    });
}

/// Stroke-dash draw-in for a path of the given length.
///
/// Under reduced motion the path is left fully drawn (no dash attributes).
pub fn draw_in(el: &mut Element, ctx: &RenderContext, length: f64, timing: Timing) {
    if ctx.reduced_motion || !(length.is_finite() && length > 0.0) {
        return;
    }
    let len = fmt_num(length);
    el.set_attr("stroke-dasharray", format!("{len} {len}"));
    transition(el, ctx, "stroke-dashoffset", length, 0.0, timing);
}

/// The value an attribute settles at once all animations complete.
pub fn settled_attr(el: &Element, attr: &str) -> Option<String> {
    el.animations()
        .iter()
        .rev()
        .find(|a| a.attr == attr)
        .map(|a| a.to.clone())
        .or_else(|| el.get_attr(attr).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::theme::{ColorTheme, RenderContext};

    fn ctx(reduced: bool) -> RenderContext {
        RenderContext::new(ColorTheme::light(), reduced)
    }

    #[test]
    fn reduced_motion_sets_final_value_without_animation() {
        let mut el = Element::new("text");
        transition(&mut el, &ctx(true), "opacity", 0.0, 1.0, FADE_IN);
        assert_eq!(el.get_attr("opacity"), Some("1"));
        assert!(el.animations().is_empty());
    }

    #[test]
    fn animated_transition_starts_at_from_and_settles_at_to() {
        let mut el = Element::new("text");
        transition(&mut el, &ctx(false), "opacity", 0.0, 1.0, FADE_IN.delayed(1200));
        assert_eq!(el.get_attr("opacity"), Some("0"));
        assert_eq!(settled_attr(&el, "opacity").as_deref(), Some("1"));
        assert!(el.to_markup().contains("begin=\"1200ms\""));
    }

    #[test]
    fn draw_in_skipped_under_reduced_motion() {
        let mut el = Element::new("path");
        draw_in(&mut el, &ctx(true), 250.0, DRAW_IN);
        assert_eq!(el.get_attr("stroke-dasharray"), None);

        let mut el = Element::new("path");
        draw_in(&mut el, &ctx(false), 250.0, DRAW_IN);
        assert_eq!(el.get_attr("stroke-dasharray"), Some("250 250"));
        assert_eq!(el.get_attr("stroke-dashoffset"), Some("250"));
    }

    #[test]
    fn cubic_out_is_front_loaded() {
        assert!(Ease::CubicOut.apply(0.5) > 0.8);
        assert_eq!(Ease::CubicOut.apply(1.0), 1.0);
    }
}
