//! Shared multi-series line chart over calendar dates.
//!
//! The ELO trend and playoff-race charts are thin configurations of
//! [`render_time_series`]. Hover snaps to real data points: the hovered date
//! is the data date nearest the cursor, and each series shows its own point
//! nearest the cursor. A series with a single point is drawn as a dot.

use std::rc::Rc;

use chrono::NaiveDate;
use tracing::debug;

use crate::charts::{HOVER_RULE_CLASS, VIEW_WIDTH, hover_overlay, hover_rule};
use crate::math::nearest_index;
use crate::render::axis::{Tick, axis_bottom, axis_label_left, axis_left, chart_title, grid_horizontal};
use crate::render::dom::{Container, Dom, Element, PointerEvent, PointerKind};
use crate::render::legend::{Legend, LegendEntry};
use crate::render::motion::{DRAW_IN, FADE_IN, draw_in, transition};
use crate::render::render_empty_state;
use crate::render::scale::{LinearScale, TimeScale, day_number};
use crate::render::shape::linear;
use crate::render::svg::{Frame, Margin, ResponsiveSvg};
use crate::render::theme::{ColorTheme, RenderContext, TICK_SIZE};
use crate::render::tooltip::{Placement, Tooltip, TooltipContent, TooltipRow};

const DOT_CLASS: &str = "hover-dot";

/// One line: a team's dated values.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub key: String,
    pub label: String,
    pub color: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// A dashed horizontal marker such as the league-average ELO.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: &'static str,
}

#[derive(Debug, Clone)]
pub struct TimeSeriesSpec {
    pub title: Option<String>,
    pub aria_label: String,
    pub y_label: String,
    /// Fixed y-domain; otherwise the data extent, padded.
    pub y_domain: Option<(f64, f64)>,
    pub y_padding: f64,
    pub reference: Option<ReferenceLine>,
    pub format_value: fn(f64) -> String,
    pub empty_message: &'static str,
}

pub fn render_time_series(
    container: &mut Container,
    series: Vec<Series>,
    spec: &TimeSeriesSpec,
    theme: &ColorTheme,
    ctx: &RenderContext,
) {
    container.clear();

    let series: Vec<Series> = series
        .into_iter()
        .map(|mut s| {
            s.points.retain(|(_, v)| v.is_finite());
            s.points.sort_by_key(|(d, _)| *d);
            s
        })
        .filter(|s| !s.points.is_empty())
        .collect();
    if series.is_empty() {
        debug!("time series: nothing to plot");
        render_empty_state(container, spec.empty_message, theme);
        return;
    }

    let top = if spec.title.is_some() { 44.0 } else { 20.0 };
    let mut svg = ResponsiveSvg::new(VIEW_WIDTH, 380.0, Margin::new(top, 24.0, 36.0, 60.0), theme);
    svg.set_label(&spec.aria_label);
    let (w, h) = (svg.inner_width, svg.inner_height);

    let (start, end) = date_extent(&series);
    let x = TimeScale::new((start, end), (0.0, w));
    let y = LinearScale::new(spec.y_domain.unwrap_or_else(|| value_extent(&series, spec)), (h, 0.0));
    let y = if spec.y_domain.is_some() { y } else { y.nice(5) };

    if let Some(title) = &spec.title {
        svg.plot.push(chart_title(title, w, -top / 2.0, theme));
    }
    let y_ticks = y.ticks(5);
    let grid: Vec<f64> = y_ticks.iter().map(|v| y.scale(*v)).collect();
    svg.plot.push(grid_horizontal(&grid, w, theme));

    if let Some(reference) = spec.reference {
        let ry = y.scale(reference.value);
        svg.plot.push(
            Element::new("g")
                .class("reference")
                .child(
                    Element::new("line")
                        .class("reference-line")
                        .attr("x1", 0.0)
                        .attr("x2", w)
                        .attr("y1", ry)
                        .attr("y2", ry)
                        .attr("stroke", theme.text_muted.as_str())
                        .attr("stroke-dasharray", "6 4"),
                )
                .child(
                    Element::new("text")
                        .attr("x", w - 4.0)
                        .attr("y", ry - 4.0)
                        .attr("text-anchor", "end")
                        .attr("fill", theme.text_muted.as_str())
                        .attr("font-size", TICK_SIZE)
                        .text(reference.label),
                ),
        );
    }

    let mut lines = Element::new("g").class("series");
    for s in &series {
        let points: Vec<(f64, f64)> = s.points.iter().map(|(d, v)| (x.scale(*d), y.scale(*v))).collect();
        if let &[(px, py)] = points.as_slice() {
            let mut dot = Element::new("circle")
                .class("series-dot")
                .attr("data-key", s.key.as_str())
                .attr("cx", px)
                .attr("cy", py)
                .attr("r", 4.0)
                .attr("fill", s.color.as_str());
            transition(&mut dot, ctx, "opacity", 0.0, 1.0, FADE_IN);
            lines.push(dot);
        } else {
            let path = linear(&points);
            let mut line = Element::new("path")
                .class("series-line")
                .attr("data-key", s.key.as_str())
                .attr("d", path.to_svg())
                .attr("fill", "none")
                .attr("stroke", s.color.as_str())
                .attr("stroke-width", 2.0)
                .attr("stroke-linejoin", "round");
            draw_in(&mut line, ctx, path.length(), DRAW_IN);
            lines.push(line);
        }
    }
    svg.plot.push(lines);

    let fmt = x.tick_format();
    let x_ticks: Vec<Tick> = x
        .ticks(8)
        .into_iter()
        .map(|d| Tick::new(x.scale(d), d.format(fmt).to_string()))
        .collect();
    svg.plot.push(axis_bottom(&x_ticks, h, w, theme));
    let y_tick_marks: Vec<Tick> = y_ticks
        .iter()
        .map(|v| Tick::new(y.scale(*v), (spec.format_value)(*v)))
        .collect();
    svg.plot.push(axis_left(&y_tick_marks, h, theme));
    svg.plot.push(axis_label_left(&spec.y_label, h, 46.0, theme));

    svg.plot.push(hover_rule(h, theme.text_muted.as_str()));
    let mut dots = Element::new("g").class("hover-dots");
    for s in &series {
        dots.push(
            Element::new("circle")
                .class(DOT_CLASS)
                .attr("data-key", s.key.as_str())
                .attr("r", 4.0)
                .attr("fill", s.color.as_str())
                .attr("stroke", theme.background.as_str())
                .attr("opacity", 0.0),
        );
    }
    svg.plot.push(dots);
    svg.plot.push(hover_overlay(w, h));

    let frame = svg.frame();
    svg.mount(container);

    let entries: Vec<LegendEntry> = series
        .iter()
        .map(|s| LegendEntry {
            key: s.key.clone(),
            label: s.label.clone(),
            color: s.color.clone(),
        })
        .collect();
    let legend = Legend::create(container, &entries, theme);
    let tooltip = Tooltip::create(container, theme, Placement::Free);

    let hover = Rc::new(SeriesHover {
        x,
        y,
        frame,
        tooltip,
        legend,
        format_value: spec.format_value,
        series,
    });
    let on_move = Rc::clone(&hover);
    container.on(PointerKind::Move, move |event, dom| on_move.pointer_move(event, dom));
    container.on(PointerKind::Leave, move |_, dom| hover.pointer_leave(dom));
}

fn date_extent(series: &[Series]) -> (NaiveDate, NaiveDate) {
    let dates = series.iter().flat_map(|s| s.points.iter().map(|(d, _)| *d));
    let start = dates.clone().min().unwrap_or_default();
    let end = dates.max().unwrap_or_default();
    if start == end {
        (
            start.pred_opt().unwrap_or(start),
            end.succ_opt().unwrap_or(end),
        )
    } else {
        (start, end)
    }
}

fn value_extent(series: &[Series], spec: &TimeSeriesSpec) -> (f64, f64) {
    let values = series.iter().flat_map(|s| s.points.iter().map(|(_, v)| *v));
    let mut lo = values.clone().fold(f64::INFINITY, f64::min);
    let mut hi = values.fold(f64::NEG_INFINITY, f64::max);
    if let Some(reference) = spec.reference {
        lo = lo.min(reference.value);
        hi = hi.max(reference.value);
    }
    (lo - spec.y_padding, hi + spec.y_padding)
}

/// The data date closest to `target` (a fractional day number) across all series.
///
/// Each series proposes its nearest point; the closest proposal wins, and on a
/// tie the later date wins.
pub fn hovered_date(series: &[Series], target: f64) -> Option<NaiveDate> {
    series
        .iter()
        .filter_map(|s| {
            let i = nearest_index(&s.points, target, |(d, _)| day_number(*d))?;
            Some(s.points[i].0)
        })
        .min_by(|a, b| {
            let da = (day_number(*a) - target).abs();
            let db = (day_number(*b) - target).abs();
            da.total_cmp(&db).then(b.cmp(a))
        })
}

/// Each series' point nearest `target` (a fractional day number).
pub fn values_at(series: &[Series], target: f64) -> Vec<Option<(NaiveDate, f64)>> {
    series
        .iter()
        .map(|s| nearest_index(&s.points, target, |(d, _)| day_number(*d)).map(|i| s.points[i]))
        .collect()
}

struct SeriesHover {
    x: TimeScale,
    y: LinearScale,
    frame: Frame,
    tooltip: Tooltip,
    legend: Legend,
    format_value: fn(f64) -> String,
    series: Vec<Series>,
}

impl SeriesHover {
    fn pointer_move(&self, event: &PointerEvent, dom: &mut Dom) {
        let (px, _) = dom.plot_point(event, &self.frame);
        let target = self.x.invert(px);
        let Some(date) = hovered_date(&self.series, target) else {
            return;
        };
        let rx = self.x.scale(date);
        dom.for_each_with_class(HOVER_RULE_CLASS, |el| {
            el.set_attr("x1", rx);
            el.set_attr("x2", rx);
            el.set_attr("opacity", 1.0);
        });

        let values = values_at(&self.series, target);
        let mut content = TooltipContent::new(date.format("%b %-d, %Y").to_string());
        let mut legend_values = Vec::new();
        for (s, value) in self.series.iter().zip(&values) {
            if let Some((_, v)) = value {
                let text = (self.format_value)(*v);
                content.rows.push(TooltipRow::new(s.label.clone(), text.clone()).colored(&s.color));
                legend_values.push((s.key.clone(), text));
            }
        }
        dom.for_each_with_class(DOT_CLASS, |el| {
            let hit = el
                .data("key")
                .and_then(|key| self.series.iter().position(|s| s.key == key))
                .and_then(|i| values[i]);
            match hit {
                Some((d, v)) => {
                    el.set_attr("cx", self.x.scale(d));
                    el.set_attr("cy", self.y.scale(v));
                    el.set_attr("opacity", 1.0);
                }
                None => el.set_attr("opacity", 0.0),
            }
        });

        self.legend.set_values(dom, &legend_values);
        self.tooltip.show(dom, &content);
        self.tooltip.move_to(dom, event);
    }

    fn pointer_leave(&self, dom: &mut Dom) {
        dom.for_each_with_class(HOVER_RULE_CLASS, |el| el.set_attr("opacity", 0.0));
        dom.for_each_with_class(DOT_CLASS, |el| el.set_attr("opacity", 0.0));
        self.legend.clear_values(dom);
        self.tooltip.hide(dom);
    }
}
