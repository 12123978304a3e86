//! Curve mode: three or more teams as overlaid smoothed areas.

use std::rc::Rc;

use crate::charts::{HOVER_RULE_CLASS, hover_overlay, hover_rule};
use crate::math::DiscretizedWinDistribution;
use crate::render::axis::{Tick, axis_bottom};
use crate::render::dom::{Container, Dom, Element, PointerEvent, PointerKind};
use crate::render::motion::{DRAW_IN, FADE_IN, draw_in, transition};
use crate::render::scale::LinearScale;
use crate::render::shape::{leader_curve, monotone_area, monotone_x};
use crate::render::svg::Frame;
use crate::render::theme::{ColorTheme, RenderContext};
use crate::render::tooltip::{Placement, Tooltip};

use super::labels::{LabelBox, Side, estimate_label_size, label_slot, place_label};
use super::{
    TeamSeries, WinDistConfig, callout_label, combined_domain, footnote, frequency_axis, frequency_grid,
    frequency_scale, frequency_tooltip, hover_teams, new_svg, win_ticks,
};

const AREA_OPACITY: f64 = 0.15;
const LINE_OPACITY: f64 = 0.8;
const DIMMED_LINE_OPACITY: f64 = 0.25;
const LINE_CLASS: &str = "dist-line";
const DOT_CLASS: &str = "hover-dot";

pub(super) fn render(
    container: &mut Container,
    teams: &[TeamSeries],
    config: &WinDistConfig,
    theme: &ColorTheme,
    ctx: &RenderContext,
) {
    let mut svg = new_svg(config, theme);
    let (w, h) = (svg.inner_width, svg.inner_height);
    let (lo, hi) = combined_domain(teams);
    let x = LinearScale::new((lo as f64, hi as f64), (0.0, w));
    let y = frequency_scale(teams, h);

    frequency_grid(&mut svg, &y, theme);

    // Ascending mean wins; labels are laid out in this order.
    let mut ranked: Vec<&TeamSeries> = teams.iter().collect();
    ranked.sort_by(|a, b| a.dist.mean.total_cmp(&b.dist.mean));

    let mut areas = Element::new("g").class("dist-areas");
    let mut lines = Element::new("g").class("dist-lines");
    let mut markers = Element::new("g").class("estimate-lines");
    for team in &ranked {
        let points: Vec<(f64, f64)> = team
            .dist
            .bins
            .iter()
            .map(|b| (x.scale(b.wins as f64), y.scale(b.frequency as f64)))
            .collect();

        areas.push(
            Element::new("path")
                .class("dist-area")
                .attr("data-team", team.code.as_str())
                .attr("d", monotone_area(&points, h).to_svg())
                .attr("fill", team.color.as_str())
                .attr("fill-opacity", AREA_OPACITY)
                .attr("stroke", "none"),
        );

        let outline = monotone_x(&points);
        let mut line = Element::new("path")
            .class(LINE_CLASS)
            .attr("data-team", team.code.as_str())
            .attr("d", outline.to_svg())
            .attr("fill", "none")
            .attr("stroke", team.color.as_str())
            .attr("stroke-width", 2.0)
            .attr("stroke-opacity", LINE_OPACITY);
        draw_in(&mut line, ctx, outline.length(), DRAW_IN);
        lines.push(line);

        if let Some(bin) = team.dist.bin(team.estimate) {
            let ex = x.scale(team.estimate as f64);
            markers.push(
                Element::new("line")
                    .class("estimate-line")
                    .attr("data-team", team.code.as_str())
                    .attr("x1", ex)
                    .attr("x2", ex)
                    .attr("y1", h)
                    .attr("y2", y.scale(bin.frequency as f64))
                    .attr("stroke", team.color.as_str())
                    .attr("stroke-dasharray", "4 3"),
            );
        }
    }
    svg.plot.push(areas);
    svg.plot.push(lines);
    svg.plot.push(markers);

    let mut placed: Vec<LabelBox> = Vec::new();
    let mut labels = Element::new("g").class("dist-labels");
    for (rank, team) in ranked.iter().enumerate() {
        let Some(bin) = team.dist.bin(team.estimate) else {
            continue;
        };
        let anchor = (x.scale(team.estimate as f64), y.scale(bin.frequency as f64));
        let text = format!("{} {}", team.code, callout_label(team.estimate, team.previous));
        let (bw, bh) = estimate_label_size(&text);
        let slot = label_slot(rank);
        let bx = match slot.side {
            Side::Left => anchor.0 - slot.offset - bw,
            Side::Right => anchor.0 + slot.offset,
        };
        let candidate = LabelBox::new(
            bx.clamp(0.0, (w - bw).max(0.0)),
            anchor.1 - 24.0 - slot.tier as f64 * bh,
            bw,
            bh,
        );
        let label = place_label(candidate, &placed);
        placed.push(label);

        let attach_x = match slot.side {
            Side::Left => label.x + label.width,
            Side::Right => label.x,
        };
        let mut group = Element::new("g")
            .class("dist-label")
            .attr("data-team", team.code.as_str())
            .child(
                Element::new("path")
                    .class("leader")
                    .attr("d", leader_curve((attach_x, label.y + label.height / 2.0), anchor).to_svg())
                    .attr("fill", "none")
                    .attr("stroke", team.color.as_str())
                    .attr("stroke-opacity", 0.6),
            )
            .child(
                Element::new("text")
                    .attr("x", label.x + 2.0)
                    .attr("y", label.y + label.height - 4.0)
                    .attr("fill", team.color.as_str())
                    .attr("font-weight", 600u32)
                    .text(text),
            );
        transition(&mut group, ctx, "opacity", 0.0, 1.0, FADE_IN.delayed(DRAW_IN.end_ms()));
        labels.push(group);
    }
    svg.plot.push(labels);

    let ticks: Vec<Tick> = win_ticks(lo, hi)
        .into_iter()
        .map(|wins| Tick::new(x.scale(wins as f64), wins.to_string()))
        .collect();
    svg.plot.push(axis_bottom(&ticks, h, w, theme));
    frequency_axis(&mut svg, &y, theme);
    footnote(&mut svg, config, theme);

    svg.plot.push(hover_rule(h, theme.text_muted.as_str()));
    let mut dots = Element::new("g").class("hover-dots");
    for team in &ranked {
        dots.push(
            Element::new("circle")
                .class(DOT_CLASS)
                .attr("data-team", team.code.as_str())
                .attr("r", 4.0)
                .attr("fill", team.color.as_str())
                .attr("stroke", theme.background.as_str())
                .attr("opacity", 0.0),
        );
    }
    svg.plot.push(dots);
    svg.plot.push(hover_overlay(w, h));

    let frame = svg.frame();
    svg.mount(container);
    let tooltip = Tooltip::create(container, theme, Placement::Clamped);

    let hover = Rc::new(CurveHover {
        x,
        y,
        range: (lo, hi),
        frame,
        tooltip,
        teams: hover_teams(teams),
    });
    let on_move = Rc::clone(&hover);
    container.on(PointerKind::Move, move |event, dom| on_move.pointer_move(event, dom));
    container.on(PointerKind::Leave, move |_, dom| hover.pointer_leave(dom));
}

struct CurveHover {
    x: LinearScale,
    y: LinearScale,
    range: (i32, i32),
    frame: Frame,
    tooltip: Tooltip,
    teams: Vec<(String, String, DiscretizedWinDistribution)>,
}

impl CurveHover {
    fn pointer_move(&self, event: &PointerEvent, dom: &mut Dom) {
        let (px, _) = dom.plot_point(event, &self.frame);
        let raw = self.x.invert(px).round();
        if !raw.is_finite() {
            return;
        }
        let wins = (raw as i32).clamp(self.range.0, self.range.1);
        let rx = self.x.scale(wins as f64);

        dom.for_each_with_class(HOVER_RULE_CLASS, |el| {
            el.set_attr("x1", rx);
            el.set_attr("x2", rx);
            el.set_attr("opacity", 1.0);
        });
        let frequency = |team: Option<&str>| {
            let team = team?;
            self.teams
                .iter()
                .find(|(code, _, _)| code == team)
                .and_then(|(_, _, dist)| dist.frequency_at(wins))
                .filter(|f| *f > 0)
        };
        dom.for_each_with_class(DOT_CLASS, |el| match frequency(el.data("team")) {
            Some(f) => {
                let cy = self.y.scale(f as f64);
                el.set_attr("cx", rx);
                el.set_attr("cy", cy);
                el.set_attr("opacity", 1.0);
            }
            None => el.set_attr("opacity", 0.0),
        });
        dom.for_each_with_class(LINE_CLASS, |el| {
            let opacity = if frequency(el.data("team")).is_some() {
                LINE_OPACITY
            } else {
                DIMMED_LINE_OPACITY
            };
            el.set_attr("stroke-opacity", opacity);
        });

        self.tooltip.show(dom, &frequency_tooltip(wins, &self.teams, true));
        self.tooltip.move_to(dom, event);
    }

    fn pointer_leave(&self, dom: &mut Dom) {
        dom.for_each_with_class(HOVER_RULE_CLASS, |el| el.set_attr("opacity", 0.0));
        dom.for_each_with_class(DOT_CLASS, |el| el.set_attr("opacity", 0.0));
        dom.for_each_with_class(LINE_CLASS, |el| el.set_attr("stroke-opacity", LINE_OPACITY));
        self.tooltip.hide(dom);
    }
}
