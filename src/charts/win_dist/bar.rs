//! Bar mode: one or two teams.

use std::rc::Rc;

use crate::charts::hover_overlay;
use crate::math::{CONFIDENCE_LEVEL, DiscretizedWinDistribution};
use crate::render::axis::{Tick, axis_bottom};
use crate::render::dom::{Container, Dom, Element, PointerEvent, PointerKind};
use crate::render::motion::{FADE_IN, GROW, transition};
use crate::render::scale::BandScale;
use crate::render::svg::Frame;
use crate::render::theme::{ColorTheme, RenderContext, TICK_SIZE};
use crate::render::tooltip::{Placement, Tooltip};

use super::{
    TeamSeries, WinDistConfig, callout_label, combined_domain, footnote, frequency_axis, frequency_grid,
    frequency_scale, frequency_tooltip, hover_teams, new_svg, win_ticks,
};

const ESTIMATE_OPACITY: f64 = 0.95;
const BAR_OPACITY: f64 = 0.55;
const DIMMED_OPACITY: f64 = 0.25;
const BAR_CLASS: &str = "bar";

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

    let padding = if teams.len() == 1 { 0.2 } else { 0.1 };
    let x = BandScale::new((lo..=hi).collect::<Vec<i32>>(), (0.0, w)).padding(padding);
    let inner = BandScale::new((0..teams.len()).collect::<Vec<usize>>(), (0.0, x.bandwidth())).padding_inner(0.05);
    let y = frequency_scale(teams, h);

    frequency_grid(&mut svg, &y, theme);

    // Fractional win value -> x, aligned with band centers.
    let win_x = |wins: f64| x.center_at(0) + (wins - lo as f64) * x.step();

    let mut bands = Element::new("g").class("ci-bands");
    for (t, team) in teams.iter().enumerate() {
        let (a, b) = CONFIDENCE_LEVEL.interval(team.dist.mean, team.dist.std_dev);
        let x0 = win_x(a).clamp(0.0, w);
        let x1 = win_x(b).clamp(0.0, w);
        bands.push(
            Element::new("rect")
                .class("ci-band")
                .attr("data-team", team.code.as_str())
                .attr("x", x0)
                .attr("y", 0.0)
                .attr("width", x1 - x0)
                .attr("height", h)
                .attr("fill", team.color.as_str())
                .attr("fill-opacity", 0.08),
        );
        bands.push(
            Element::new("text")
                .class("ci-label")
                .attr("x", (x0 + x1) / 2.0)
                .attr("y", 12.0 + t as f64 * (TICK_SIZE + 3.0))
                .attr("text-anchor", "middle")
                .attr("fill", team.color.as_str())
                .attr("font-size", TICK_SIZE)
                .text(format!(
                    "{} CI {}–{}",
                    CONFIDENCE_LEVEL.label(),
                    a.round() as i64,
                    b.round() as i64
                )),
        );
    }
    svg.plot.push(bands);

    let mut bars = Element::new("g").class("bars");
    for (t, team) in teams.iter().enumerate() {
        for bin in &team.dist.bins {
            let idx = (bin.wins - lo) as usize;
            let top = y.scale(bin.frequency as f64);
            let is_estimate = bin.wins == team.estimate;
            let opacity = if is_estimate { ESTIMATE_OPACITY } else { BAR_OPACITY };
            let mut rect = Element::new("rect")
                .class(if is_estimate { "bar bar-estimate" } else { BAR_CLASS })
                .attr("data-team", team.code.as_str())
                .attr("data-wins", bin.wins)
                .attr("data-base-opacity", opacity)
                .attr("x", x.position_at(idx) + inner.position_at(t))
                .attr("width", inner.bandwidth())
                .attr("fill", team.color.as_str())
                .attr("opacity", opacity);
            transition(&mut rect, ctx, "y", h, top, GROW);
            transition(&mut rect, ctx, "height", 0.0, h - top, GROW);
            bars.push(rect);
        }
    }
    svg.plot.push(bars);

    for (t, team) in teams.iter().enumerate() {
        let Some(bin) = team.dist.bin(team.estimate) else {
            continue;
        };
        let cx = x.position_at((team.estimate - lo) as usize) + inner.center_at(t);
        let top = y.scale(bin.frequency as f64);
        let label_y = (top - 24.0 - t as f64 * 18.0).max(TICK_SIZE);
        let text = if teams.len() > 1 {
            format!("{} {}", team.code, callout_label(team.estimate, team.previous))
        } else {
            callout_label(team.estimate, team.previous)
        };
        let mut callout = Element::new("g")
            .class("callout")
            .attr("data-team", team.code.as_str())
            .child(
                Element::new("line")
                    .class("leader")
                    .attr("x1", cx)
                    .attr("x2", cx)
                    .attr("y1", top - 2.0)
                    .attr("y2", label_y + 4.0)
                    .attr("stroke", theme.text_muted.as_str()),
            )
            .child(
                Element::new("text")
                    .attr("x", cx)
                    .attr("y", label_y)
                    .attr("text-anchor", "middle")
                    .attr("fill", team.color.as_str())
                    .attr("font-weight", 600u32)
                    .text(text),
            );
        transition(&mut callout, ctx, "opacity", 0.0, 1.0, FADE_IN.delayed(GROW.end_ms()));
        svg.plot.push(callout);
    }

    let ticks: Vec<Tick> = win_ticks(lo, hi)
        .into_iter()
        .map(|wins| Tick::new(x.center_at((wins - lo) as usize), wins.to_string()))
        .collect();
    svg.plot.push(axis_bottom(&ticks, h, w, theme));
    frequency_axis(&mut svg, &y, theme);
    footnote(&mut svg, config, theme);
    svg.plot.push(hover_overlay(w, h));

    let frame = svg.frame();
    svg.mount(container);
    let tooltip = Tooltip::create(container, theme, Placement::Free);

    let hover = Rc::new(BarHover {
        x,
        frame,
        tooltip,
        teams: hover_teams(teams),
    });
    let on_move = Rc::clone(&hover);
    container.on(PointerKind::Move, move |event, dom| on_move.pointer_move(event, dom));
    container.on(PointerKind::Leave, move |_, dom| hover.pointer_leave(dom));
}

struct BarHover {
    x: BandScale<i32>,
    frame: Frame,
    tooltip: Tooltip,
    teams: Vec<(String, String, DiscretizedWinDistribution)>,
}

impl BarHover {
    fn pointer_move(&self, event: &PointerEvent, dom: &mut Dom) {
        let (px, _) = dom.plot_point(event, &self.frame);
        let Some(idx) = self.x.nearest_index(px) else {
            return;
        };
        let wins = self.x.domain()[idx];
        let key = wins.to_string();
        dom.for_each_with_class(BAR_CLASS, |el| {
            let opacity = if el.data("wins") == Some(key.as_str()) { 1.0 } else { DIMMED_OPACITY };
            el.set_attr("opacity", opacity);
        });
        self.tooltip.show(dom, &frequency_tooltip(wins, &self.teams, false));
        self.tooltip.move_to(dom, event);
    }

    fn pointer_leave(&self, dom: &mut Dom) {
        dom.for_each_with_class(BAR_CLASS, |el| {
            if let Some(base) = el.data("base-opacity").map(str::to_string) {
                el.set_attr("opacity", base);
            }
        });
        self.tooltip.hide(dom);
    }
}
