//! Scales: linear, band/point, and calendar time.
//!
//! These follow the usual d3 conventions (band step/padding arithmetic,
//! 1-2-5 tick steps) so layouts match what the site's readers are used to.

use chrono::{Datelike, NaiveDate};

/// Continuous linear mapping `domain -> range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn scale(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Round tick values covering the domain (roughly `count` of them).
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        if lo == hi || count == 0 {
            return vec![lo];
        }
        let step = tick_step(lo, hi, count);
        let start = (lo / step).ceil() as i64;
        let stop = (hi / step).floor() as i64;
        (start..=stop).map(|i| clean(i as f64 * step)).collect()
    }

    /// Extend the domain outward to round tick boundaries.
    pub fn nice(self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        let (lo, hi) = ordered(self.domain);
        if lo == hi || count == 0 {
            return self;
        }
        let step = tick_step(lo, hi, count);
        let lo = (lo / step).floor() * step;
        let hi = (hi / step).ceil() * step;
        let domain = if d0 <= d1 { (lo, hi) } else { (hi, lo) };
        Self { domain, ..self }
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count.max(1) as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

fn clean(v: f64) -> f64 {
    (v * 1e9).round() / 1e9
}

/// Equal-width slots for a discrete domain (d3 `scaleBand` semantics).
///
/// With `padding_inner = 1` this degenerates into a point scale (zero-width
/// bands); see [`BandScale::point`].
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<T> {
    domain: Vec<T>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl<T: PartialEq> BandScale<T> {
    pub fn new(domain: Vec<T>, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Categorical positions with `padding` steps of space at either end.
    pub fn point(domain: Vec<T>, range: (f64, f64), padding: f64) -> Self {
        Self::new(domain, range).padding_inner(1.0).padding_outer(padding)
    }

    pub fn padding(self, padding: f64) -> Self {
        self.padding_inner(padding).padding_outer(padding)
    }

    pub fn padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self
    }

    pub fn padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self
    }

    pub fn domain(&self) -> &[T] {
        &self.domain
    }

    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let width = self.range.1 - self.range.0;
        width / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    fn start(&self) -> f64 {
        let n = self.domain.len() as f64;
        let width = self.range.1 - self.range.0;
        self.range.0 + (width - self.step() * (n - self.padding_inner)) * 0.5
    }

    /// Left edge of the band at `index`.
    pub fn position_at(&self, index: usize) -> f64 {
        self.start() + self.step() * index as f64
    }

    pub fn position(&self, value: &T) -> Option<f64> {
        self.domain
            .iter()
            .position(|v| v == value)
            .map(|i| self.position_at(i))
    }

    /// Center of the band at `index`.
    pub fn center_at(&self, index: usize) -> f64 {
        self.position_at(index) + self.bandwidth() / 2.0
    }

    /// Index of the band whose center is closest to `px`.
    pub fn nearest_index(&self, px: f64) -> Option<usize> {
        if self.domain.is_empty() {
            return None;
        }
        let step = self.step();
        if step <= 0.0 {
            return Some(0);
        }
        let raw = ((px - self.center_at(0)) / step).round();
        let max = (self.domain.len() - 1) as f64;
        Some(raw.clamp(0.0, max) as usize)
    }
}

/// Day number used as the continuous coordinate of a date.
pub fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Nearest calendar date for a (possibly fractional) day number.
pub fn date_from_day_number(days: f64) -> NaiveDate {
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32).unwrap_or_default()
}

/// Linear scale over calendar dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
    start: NaiveDate,
    end: NaiveDate,
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        Self {
            linear: LinearScale::new((day_number(domain.0), day_number(domain.1)), range),
            start: domain.0,
            end: domain.1,
        }
    }

    pub fn scale(&self, date: NaiveDate) -> f64 {
        self.linear.scale(day_number(date))
    }

    /// Pixel -> fractional day number.
    pub fn invert(&self, px: f64) -> f64 {
        self.linear.invert(px)
    }

    /// Tick dates: weekly for short spans, month starts otherwise.
    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let count = count.max(1);
        let span = (self.end - self.start).num_days();
        if span <= 0 {
            return vec![self.start];
        }
        let candidates: Vec<NaiveDate> = if span <= 45 {
            (0..=span)
                .step_by(7)
                .filter_map(|d| self.start.checked_add_signed(chrono::Duration::days(d)))
                .collect()
        } else {
            month_starts(self.start, self.end)
        };
        let stride = candidates.len().div_ceil(count).max(1);
        candidates.into_iter().step_by(stride).collect()
    }

    /// Tick label format matching [`TimeScale::ticks`].
    pub fn tick_format(&self) -> &'static str {
        if (self.end - self.start).num_days() <= 45 {
            "%b %-d"
        } else {
            "%b"
        }
    }
}

fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());
    if start.day() != 1 {
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    while let Some(d) = NaiveDate::from_ymd_opt(year, month, 1) {
        if d > end {
            break;
        }
        out.push(d);
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale_and_invert() {
        let s = LinearScale::new((0.0, 100.0), (300.0, 0.0));
        assert_eq!(s.scale(25.0), 225.0);
        assert_eq!(s.invert(225.0), 25.0);
    }

    #[test]
    fn ticks_use_round_steps() {
        let s = LinearScale::new((0.0, 1234.0), (0.0, 1.0));
        assert_eq!(s.ticks(5), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0]);
    }

    #[test]
    fn nice_extends_domain() {
        let s = LinearScale::new((0.0, 731.0), (300.0, 0.0)).nice(5);
        assert_eq!(s.domain(), (0.0, 800.0));
    }

    #[test]
    fn band_scale_layout() {
        let s = BandScale::new(vec![1, 2, 3, 4], (0.0, 100.0));
        assert_eq!(s.step(), 25.0);
        assert_eq!(s.bandwidth(), 25.0);
        assert_eq!(s.position(&3), Some(50.0));

        let padded = BandScale::new(vec![1, 2, 3, 4], (0.0, 100.0)).padding(0.2);
        // step = 100 / (4 - 0.2 + 0.4)
        assert!((padded.step() - 100.0 / 4.2).abs() < 1e-9);
        assert!((padded.bandwidth() - padded.step() * 0.8).abs() < 1e-9);
        assert_eq!(padded.nearest_index(-50.0), Some(0));
        assert_eq!(padded.nearest_index(500.0), Some(3));
    }

    #[test]
    fn point_scale_single_value_is_centered() {
        let s = BandScale::point(vec![2024], (0.0, 200.0), 0.5);
        assert_eq!(s.bandwidth(), 0.0);
        assert_eq!(s.center_at(0), 100.0);
        assert_eq!(s.nearest_index(10.0), Some(0));
    }

    #[test]
    fn point_scale_snaps_to_nearest() {
        let s = BandScale::point(vec![2021, 2022, 2023], (0.0, 200.0), 0.0);
        assert_eq!(s.center_at(1), 100.0);
        assert_eq!(s.nearest_index(49.0), Some(0));
        assert_eq!(s.nearest_index(51.0), Some(1));
    }

    #[test]
    fn time_scale_round_trips_days() {
        let a = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 4, 11).unwrap();
        let s = TimeScale::new((a, b), (0.0, 100.0));
        assert_eq!(s.scale(NaiveDate::from_ymd_opt(2026, 4, 6).unwrap()), 50.0);
        assert_eq!(date_from_day_number(s.invert(50.0)), NaiveDate::from_ymd_opt(2026, 4, 6).unwrap());
    }

    #[test]
    fn season_ticks_are_month_starts() {
        let a = NaiveDate::from_ymd_opt(2026, 3, 26).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 9, 28).unwrap();
        let s = TimeScale::new((a, b), (0.0, 600.0));
        let ticks = s.ticks(10);
        assert_eq!(ticks.first(), NaiveDate::from_ymd_opt(2026, 4, 1).as_ref());
        assert_eq!(ticks.len(), 6);
    }
}
