use chrono::{Datelike, Months, NaiveDate};

use crate::palette;

pub const DEFAULT_WIDTH: f64 = 500.0;
pub const DEFAULT_HEIGHT: f64 = 300.0;
pub const DEFAULT_FLOOR: f64 = -100_000.0;

// ---------------------------------------------------------------------------
// Month arithmetic
// ---------------------------------------------------------------------------

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}

/// Fractional calendar months from `start` to `end`.
///
/// Whole months are stepped forward from `start` (clamping the day to the end
/// of shorter months); the remaining days count as a fraction of the month
/// that follows the last whole step.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> f64 {
    if end < start {
        return -months_between(end, start);
    }
    let guess = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let mut whole = guess.max(0) as u32;
    let mut cursor = add_months(start, whole);
    while cursor > end && whole > 0 {
        whole -= 1;
        cursor = add_months(start, whole);
    }
    let next = add_months(cursor, 1);
    let month_days = (next - cursor).num_days();
    let rest_days = (end - cursor).num_days();
    whole as f64 + rest_days as f64 / month_days as f64
}

// ---------------------------------------------------------------------------
// Monthly aggregation
// ---------------------------------------------------------------------------

/// A named chart input. Points must be non-empty and sorted by date.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Per-series monthly net sums over a shared date span.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBuckets {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub names: Vec<String>,
    /// One row per series, each `num_months()` long.
    pub values: Vec<Vec<f64>>,
}

impl MonthlyBuckets {
    pub fn num_months(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// First day of each bucket's month, for axis labels.
    pub fn month_starts(&self) -> Vec<NaiveDate> {
        (0..self.num_months() as u32)
            .map(|i| add_months(self.start, i))
            .collect()
    }

    fn value_range(&self) -> (f64, f64) {
        self.values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Bucket every series into calendar months counted from the earliest date.
///
/// Returns `None` when there is nothing to chart. Empty series must be
/// filtered out by the caller.
pub fn monthly_buckets(series: &[Series]) -> Option<MonthlyBuckets> {
    let start = series.iter().filter_map(|s| s.points.first()).map(|p| p.0).min()?;
    let end = series.iter().filter_map(|s| s.points.last()).map(|p| p.0).max()?;
    let num_months = months_between(start, end).floor() as usize + 1;

    let values = series
        .iter()
        .map(|s| {
            let mut sums = vec![0.0; num_months];
            for (date, amount) in &s.points {
                let idx = months_between(start, *date).floor() as usize;
                if let Some(slot) = sums.get_mut(idx) {
                    *slot += amount;
                }
            }
            sums
        })
        .collect();

    Some(MonthlyBuckets {
        start,
        end,
        names: series.iter().map(|s| s.name.clone()).collect(),
        values,
    })
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Canvas {
    fn x(&self, bucket: usize, num_months: usize) -> f64 {
        bucket as f64 / num_months as f64 * self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// One min/max across every series.
    Joint,
    /// Each series scaled to its own min/max.
    Independent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span == 0.0 {
        0.0
    } else {
        (value - lo) / span
    }
}

/// One polyline per series; y grows downward from the top-left origin.
pub fn overlaid_lines(
    buckets: &MonthlyBuckets,
    canvas: Canvas,
    normalization: Normalization,
) -> Vec<Polyline> {
    let n = buckets.num_months();
    let joint = buckets.value_range();
    buckets
        .names
        .iter()
        .zip(&buckets.values)
        .map(|(name, values)| {
            let (lo, hi) = match normalization {
                Normalization::Joint => joint,
                Normalization::Independent => values
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                        (lo.min(v), hi.max(v))
                    }),
            };
            let points = values
                .iter()
                .enumerate()
                .map(|(x, &v)| {
                    (
                        canvas.x(x, n),
                        canvas.height - normalize(v, lo, hi) * canvas.height,
                    )
                })
                .collect();
            Polyline {
                name: name.clone(),
                points,
            }
        })
        .collect()
}

/// One layer of a stacked-area chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub name: String,
    /// Cumulative sum of all earlier series, per bucket.
    pub bottom: Vec<f64>,
    /// `bottom` plus this series, per bucket.
    pub top: Vec<f64>,
    /// Closed outline: bottom edge right-to-left, then top edge left-to-right.
    pub polygon: Vec<(f64, f64)>,
}

/// Stack the series in order on a shared running total.
///
/// Values map to `y = height - (v - floor) / (max - floor) * height`, where
/// `max` is the highest cumulative value reached (never below zero).
pub fn stacked_bands(buckets: &MonthlyBuckets, canvas: Canvas, floor: f64) -> Vec<Band> {
    let n = buckets.num_months();
    let mut running = vec![0.0; n];
    let mut edges = Vec::with_capacity(buckets.values.len());
    for values in &buckets.values {
        let bottom = running.clone();
        for (sum, v) in running.iter_mut().zip(values) {
            *sum += v;
        }
        edges.push((bottom, running.clone()));
    }

    let max = edges
        .iter()
        .flat_map(|(_, top)| top.iter().copied())
        .fold(0.0_f64, f64::max);
    let scale = if max - floor > 0.0 { max - floor } else { 1.0 };
    let y = |v: f64| canvas.height - (v - floor) / scale * canvas.height;

    buckets
        .names
        .iter()
        .zip(edges)
        .map(|(name, (bottom, top))| {
            let lower = bottom
                .iter()
                .enumerate()
                .rev()
                .map(|(x, &v)| (canvas.x(x, n), y(v)));
            let upper = top.iter().enumerate().map(|(x, &v)| (canvas.x(x, n), y(v)));
            Band {
                name: name.clone(),
                polygon: lower.chain(upper).collect(),
                bottom,
                top,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// SVG output
// ---------------------------------------------------------------------------

/// `M x,y L x,y ...` path data.
pub fn path_data(points: &[(f64, f64)]) -> String {
    let coords: Vec<String> = points.iter().map(|(x, y)| format!("{x},{y}")).collect();
    format!("M {}", coords.join(" L "))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn svg_document(canvas: Canvas, paths: Vec<String>) -> String {
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">\n",
        canvas.width, canvas.height
    );
    for p in paths {
        out.push_str("  ");
        out.push_str(&p);
        out.push('\n');
    }
    out.push_str("</svg>\n");
    out
}

pub fn lines_svg(lines: &[Polyline], canvas: Canvas) -> String {
    let paths = lines
        .iter()
        .map(|l| {
            format!(
                "<path data-name=\"{}\" d=\"{}\" stroke=\"{}\" fill=\"transparent\"/>",
                escape_xml(&l.name),
                path_data(&l.points),
                palette::name_color(&l.name).css()
            )
        })
        .collect();
    svg_document(canvas, paths)
}

pub fn stacked_svg(bands: &[Band], canvas: Canvas) -> String {
    let paths = bands
        .iter()
        .map(|b| {
            format!(
                "<path data-name=\"{}\" d=\"{}\" fill=\"{}\" stroke=\"transparent\"/>",
                escape_xml(&b.name),
                path_data(&b.polygon),
                palette::name_color(&b.name).css()
            )
        })
        .collect();
    svg_document(canvas, paths)
}
