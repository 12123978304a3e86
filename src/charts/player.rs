//! Player stat lines across seasons.
//!
//! Each selected metric gets its own y-scale (the metrics share no unit), so
//! the chart compares shapes rather than magnitudes. Seasons sit on a point
//! scale and hover snaps to the nearest one.

use std::rc::Rc;

use tracing::debug;

use crate::charts::metrics::{MetricKey, MetricSpec};
use crate::charts::win_dist::labels::{LabelBox, estimate_label_size, place_label};
use crate::charts::{HOVER_RULE_CLASS, VIEW_WIDTH, hover_overlay, hover_rule};
use crate::domain::PlayerSeasonStats;
use crate::render::axis::{Tick, axis_bottom, axis_left, chart_title, grid_horizontal};
use crate::render::dom::{Container, Dom, Element, PointerEvent, PointerKind};
use crate::render::legend::{Legend, LegendEntry};
use crate::render::motion::{DRAW_IN, FADE_IN, draw_in, transition};
use crate::render::render_empty_state;
use crate::render::scale::{BandScale, LinearScale};
use crate::render::shape::linear;
use crate::render::svg::{Frame, Margin, ResponsiveSvg};
use crate::render::theme::{ColorTheme, LABEL_SIZE, RenderContext};
use crate::render::tooltip::{Placement, Tooltip, TooltipContent, TooltipRow};

pub const EMPTY_MESSAGE: &str = "No stats available for the selected metrics.";
const MISSING: &str = "—";
const DOT_CLASS: &str = "hover-dot";
/// Share of the value range added above and below each metric's line.
const DOMAIN_PADDING: f64 = 0.15;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerChartConfig {
    pub metrics: Vec<MetricKey>,
    pub title: Option<String>,
    /// Shown in the tooltip heading.
    pub player: Option<String>,
    pub theme: Option<ColorTheme>,
}

struct MetricLine {
    spec: &'static MetricSpec,
    /// `(season index, display value)`, ascending.
    points: Vec<(usize, f64)>,
    y: LinearScale,
}

impl MetricLine {
    fn value_at(&self, index: usize) -> Option<f64> {
        self.points.iter().find(|(i, _)| *i == index).map(|(_, v)| *v)
    }
}

/// Padded y-domain for one metric's display values.
pub fn metric_domain(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * DOMAIN_PADDING } else { 1.0 };
    (lo - pad, hi + pad)
}

/// Distinct seasons, ascending.
fn seasons(stats: &[PlayerSeasonStats]) -> Vec<i32> {
    let mut out: Vec<i32> = stats.iter().map(|s| s.season).collect();
    out.sort_unstable();
    out.dedup();
    out
}

pub fn render_player_stats(
    container: &mut Container,
    stats: &[PlayerSeasonStats],
    config: &PlayerChartConfig,
    ctx: &RenderContext,
) {
    container.clear();
    let theme = ctx.resolve_theme(config.theme.as_ref()).clone();

    let seasons = seasons(stats);
    let mut metrics: Vec<MetricLine> = Vec::new();
    for key in &config.metrics {
        if metrics.iter().any(|m| m.spec.key == *key) {
            continue;
        }
        let spec = key.spec();
        // First row of a season that carries the metric wins (split seasons list the total first).
        let points: Vec<(usize, f64)> = seasons
            .iter()
            .enumerate()
            .filter_map(|(i, season)| {
                let raw = stats
                    .iter()
                    .filter(|s| s.season == *season)
                    .find_map(|s| key.value(s))?;
                Some((i, spec.display_value(raw)))
            })
            .collect();
        if points.is_empty() {
            debug!(metric = spec.short, "player chart: metric has no values");
            continue;
        }
        let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
        metrics.push(MetricLine {
            spec,
            points,
            y: LinearScale::new(metric_domain(&values), (0.0, 0.0)),
        });
    }
    if metrics.is_empty() {
        render_empty_state(container, EMPTY_MESSAGE, &theme);
        return;
    }

    let top = if config.title.is_some() { 44.0 } else { 20.0 };
    let single = metrics.len() == 1;
    let left = if single { 56.0 } else { 24.0 };
    let mut svg = ResponsiveSvg::new(VIEW_WIDTH, 360.0, Margin::new(top, 96.0, 36.0, left), &theme);
    let label = match &config.player {
        Some(name) => format!("{name} season stats"),
        None => "Season stats".to_string(),
    };
    svg.set_label(&label);
    let (w, h) = (svg.inner_width, svg.inner_height);
    for m in &mut metrics {
        m.y = LinearScale::new(m.y.domain(), (h, 0.0));
    }
    let x = BandScale::point(seasons.clone(), (0.0, w), 0.5);

    if let Some(title) = &config.title {
        svg.plot.push(chart_title(title, w, -top / 2.0, &theme));
    }
    if single {
        let m = &metrics[0];
        let ticks = m.y.ticks(5);
        let grid: Vec<f64> = ticks.iter().map(|v| m.y.scale(*v)).collect();
        svg.plot.push(grid_horizontal(&grid, w, &theme));
        let marks: Vec<Tick> = ticks.iter().map(|v| Tick::new(m.y.scale(*v), (m.spec.format)(*v))).collect();
        svg.plot.push(axis_left(&marks, h, &theme));
    }

    let mut lines = Element::new("g").class("metric-lines");
    let mut placed: Vec<LabelBox> = Vec::new();
    let mut end_labels = Element::new("g").class("end-labels");
    for m in &metrics {
        let key = m.spec.short;
        let points: Vec<(f64, f64)> = m.points.iter().map(|(i, v)| (x.center_at(*i), m.y.scale(*v))).collect();
        if points.len() > 1 {
            let path = linear(&points);
            let mut line = Element::new("path")
                .class("metric-line")
                .attr("data-key", key)
                .attr("d", path.to_svg())
                .attr("fill", "none")
                .attr("stroke", m.spec.color)
                .attr("stroke-width", 2.0)
                .attr("stroke-linejoin", "round");
            draw_in(&mut line, ctx, path.length(), DRAW_IN);
            lines.push(line);
        }
        for (px, py) in &points {
            let mut dot = Element::new("circle")
                .class("metric-dot")
                .attr("data-key", key)
                .attr("cx", *px)
                .attr("cy", *py)
                .attr("r", 3.0)
                .attr("fill", m.spec.color);
            transition(&mut dot, ctx, "opacity", 0.0, 1.0, FADE_IN);
            lines.push(dot);
        }

        let (Some(&(lx, ly)), Some(&(_, last))) = (points.last(), m.points.last()) else {
            continue;
        };
        let text = format!("{} {}", m.spec.short, (m.spec.format)(last));
        let (bw, bh) = estimate_label_size(&text);
        let slot = place_label(LabelBox::new(lx + 8.0, ly - bh / 2.0, bw, bh), &placed);
        placed.push(slot);
        let mut end_label = Element::new("text")
            .class("end-label")
            .attr("data-key", key)
            .attr("x", slot.x)
            .attr("y", slot.y + bh / 2.0)
            .attr("dominant-baseline", "middle")
            .attr("fill", m.spec.color)
            .attr("font-size", LABEL_SIZE)
            .attr("font-weight", 600u32)
            .text(text);
        transition(&mut end_label, ctx, "opacity", 0.0, 1.0, FADE_IN.delayed(DRAW_IN.end_ms() + 100));
        end_labels.push(end_label);
    }
    svg.plot.push(lines);
    svg.plot.push(end_labels);

    let season_ticks: Vec<Tick> = seasons
        .iter()
        .enumerate()
        .map(|(i, s)| Tick::new(x.center_at(i), s.to_string()))
        .collect();
    svg.plot.push(axis_bottom(&season_ticks, h, w, &theme));

    svg.plot.push(hover_rule(h, theme.text_muted.as_str()));
    let mut dots = Element::new("g").class("hover-dots");
    for m in &metrics {
        dots.push(
            Element::new("circle")
                .class(DOT_CLASS)
                .attr("data-key", m.spec.short)
                .attr("r", 4.5)
                .attr("fill", m.spec.color)
                .attr("stroke", theme.background.as_str())
                .attr("opacity", 0.0),
        );
    }
    svg.plot.push(dots);
    svg.plot.push(hover_overlay(w, h));

    let frame = svg.frame();
    svg.mount(container);

    let entries: Vec<LegendEntry> = metrics
        .iter()
        .map(|m| LegendEntry {
            key: m.spec.short.to_string(),
            label: m.spec.label.to_string(),
            color: m.spec.color.to_string(),
        })
        .collect();
    let legend = Legend::create(container, &entries, &theme);
    let tooltip = Tooltip::create(container, &theme, Placement::Clamped);

    let hover = Rc::new(PlayerHover {
        x,
        frame,
        tooltip,
        legend,
        player: config.player.clone(),
        metrics,
    });
    let on_move = Rc::clone(&hover);
    container.on(PointerKind::Move, move |event, dom| on_move.pointer_move(event, dom));
    container.on(PointerKind::Leave, move |_, dom| hover.pointer_leave(dom));
}

struct PlayerHover {
    x: BandScale<i32>,
    frame: Frame,
    tooltip: Tooltip,
    legend: Legend,
    player: Option<String>,
    metrics: Vec<MetricLine>,
}

impl PlayerHover {
    fn pointer_move(&self, event: &PointerEvent, dom: &mut Dom) {
        let (px, _) = dom.plot_point(event, &self.frame);
        let Some(index) = self.x.nearest_index(px) else {
            return;
        };
        let Some(season) = self.x.domain().get(index).copied() else {
            return;
        };
        let rx = self.x.center_at(index);
        dom.for_each_with_class(HOVER_RULE_CLASS, |el| {
            el.set_attr("x1", rx);
            el.set_attr("x2", rx);
            el.set_attr("opacity", 1.0);
        });

        let title = match &self.player {
            Some(name) => format!("{name} · {season}"),
            None => season.to_string(),
        };
        let mut content = TooltipContent::new(title);
        let mut legend_values = Vec::new();
        for m in &self.metrics {
            let text = match m.value_at(index) {
                Some(v) => (m.spec.format)(v),
                None => MISSING.to_string(),
            };
            content.rows.push(TooltipRow::new(m.spec.short, text.clone()).colored(m.spec.color));
            legend_values.push((m.spec.short.to_string(), text));
        }
        dom.for_each_with_class(DOT_CLASS, |el| {
            let hit = el
                .data("key")
                .and_then(|key| self.metrics.iter().find(|m| m.spec.short == key))
                .and_then(|m| Some(m.y.scale(m.value_at(index)?)));
            match hit {
                Some(cy) => {
                    el.set_attr("cx", rx);
                    el.set_attr("cy", cy);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::dom::Rect;
    use crate::render::motion::settled_attr;
    use crate::render::theme::ThemeMode;
    use crate::render::tooltip::TOOLTIP_CLASS;

    fn row(season: i32, hr: Option<f64>, avg: Option<f64>) -> PlayerSeasonStats {
        PlayerSeasonStats {
            season,
            home_runs: hr,
            avg,
            ..PlayerSeasonStats::default()
        }
    }

    fn stats() -> Vec<PlayerSeasonStats> {
        vec![
            row(2025, Some(31.0), Some(0.281)),
            row(2023, Some(22.0), Some(0.262)),
            row(2024, None, Some(0.275)),
        ]
    }

    fn config(metrics: &[MetricKey]) -> PlayerChartConfig {
        PlayerChartConfig {
            metrics: metrics.to_vec(),
            player: Some("J. Doe".to_string()),
            ..PlayerChartConfig::default()
        }
    }

    #[test]
    fn domain_pads_range_or_one_unit() {
        let (lo, hi) = metric_domain(&[10.0, 20.0]);
        assert!((lo - 8.5).abs() < 1e-9 && (hi - 21.5).abs() < 1e-9);
        assert_eq!(metric_domain(&[5.0, 5.0]), (4.0, 6.0));
    }

    #[test]
    fn lines_and_end_labels_per_metric() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, false);
        let mut c = Container::sized(720.0, 360.0);
        render_player_stats(&mut c, &stats(), &config(&[MetricKey::HomeRuns, MetricKey::Avg]), &ctx);

        assert_eq!(c.dom().find_all("metric-line").len(), 2);
        assert_eq!(c.dom().find_all("metric-dot").len(), 5);
        let labels = c.dom().find_all("end-label");
        let texts: Vec<&str> = labels.iter().filter_map(|l| l.text_content()).collect();
        assert_eq!(texts, vec!["HR 31", "AVG .281"]);
        assert_eq!(labels[0].get_attr("opacity"), Some("0"));
        assert_eq!(settled_attr(labels[0], "opacity").as_deref(), Some("1"));
        assert!(labels[0].to_markup().contains("begin=\"1300ms\""));
    }

    #[test]
    fn hover_snaps_to_season_and_marks_missing_values() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, true);
        let mut c = Container::new(Rect::new(0.0, 0.0, 720.0, 360.0));
        render_player_stats(&mut c, &stats(), &config(&[MetricKey::HomeRuns, MetricKey::Avg]), &ctx);

        // Plot spans 24..624; three seasons centered at 100, 300, 500.
        c.pointer_move(24.0 + 330.0, 120.0);
        let tip = c.dom().find_all(TOOLTIP_CLASS)[0].text_content().unwrap_or_default().to_string();
        assert!(tip.contains("J. Doe · 2024"));
        assert!(tip.contains(MISSING));
        assert!(tip.contains(".275"));

        let values: Vec<Option<&str>> = c.dom().find_all("legend-value").iter().map(|v| v.text_content()).collect();
        assert_eq!(values, vec![Some(MISSING), Some(".275")]);

        c.pointer_leave();
        assert_eq!(c.dom().find_all(TOOLTIP_CLASS)[0].get_style("opacity"), Some("0"));
    }

    #[test]
    fn single_metric_gets_a_value_axis() {
        let ctx = RenderContext::for_mode(ThemeMode::Dark, true);
        let mut c = Container::sized(720.0, 360.0);
        render_player_stats(&mut c, &stats(), &config(&[MetricKey::HomeRuns]), &ctx);
        assert!(c.to_markup().contains("axis-y"));
        assert!(!c.to_markup().contains("<animate"));
    }

    #[test]
    fn reduced_motion_renders_final_state() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, true);
        let mut c = Container::sized(720.0, 360.0);
        render_player_stats(&mut c, &stats(), &config(&[MetricKey::HomeRuns, MetricKey::Avg]), &ctx);
        assert!(!c.to_markup().contains("<animate"));
        for line in c.dom().find_all("metric-line") {
            assert!(line.get_attr("stroke-dasharray").is_none());
        }
        for label in c.dom().find_all("end-label") {
            assert_eq!(label.get_attr("opacity"), Some("1"));
        }
    }

    #[test]
    fn rendering_twice_replaces_the_chart() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, false);
        let mut c = Container::sized(720.0, 360.0);
        let cfg = config(&[MetricKey::HomeRuns, MetricKey::Avg]);
        render_player_stats(&mut c, &stats(), &cfg, &ctx);
        let first = c.to_markup();
        render_player_stats(&mut c, &stats(), &cfg, &ctx);
        assert_eq!(c.to_markup(), first);
        assert_eq!(c.count_tag("svg"), 1);
    }

    #[test]
    fn no_plottable_metric_is_empty_state() {
        let ctx = RenderContext::for_mode(ThemeMode::Light, true);
        let mut c = Container::sized(720.0, 360.0);
        render_player_stats(&mut c, &stats(), &config(&[MetricKey::Era]), &ctx);
        assert_eq!(c.count_tag("svg"), 0);
        assert_eq!(c.count_tag("p"), 1);

        render_player_stats(&mut c, &[], &config(&[MetricKey::HomeRuns]), &ctx);
        assert_eq!(c.count_tag("p"), 1);
    }
}
