//! Turning an aggregated table into drawable series.

use crate::error::ChartError;
use crate::processing::AggregatedTable;
use crate::types::Value;

use super::schema::ChartDefinition;
use super::style::{ErrorBarPolicy, Marker};

/// One plotted point: mean with an optional symmetric error bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub mean: f64,
    /// Half-length of the error bar (one standard deviation); `None` draws no bar.
    pub err: Option<f64>,
}

/// A line with markers and error bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// Index of the value column; selects the palette color.
    pub color_index: usize,
    pub marker: Marker,
    pub points: Vec<SeriesPoint>,
}

/// A fully resolved chart, independent of any drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Chart {
    /// `(min, max)` over all x values, or `None` for a chart without points.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.points().map(|p| (p.x, p.x)))
    }

    /// `(min, max)` over all means widened by their error bars.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.points().map(|p| {
            let e = p.err.unwrap_or(0.0);
            (p.mean - e, p.mean + e)
        }))
    }

    fn points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

fn bounds(it: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    it.fold(None, |acc, (lo, hi)| match acc {
        None => Some((lo, hi)),
        Some((a, b)) => Some((a.min(lo), b.max(hi))),
    })
}

/// Build the series of `def` from `table`.
///
/// One series per (value column × facet value); a chart without a facet gets one series per
/// value column. Groups whose mean is undefined are left out. Undefined standard deviations are
/// handled according to `policy`.
pub fn build_chart(
    def: &ChartDefinition,
    table: &AggregatedTable,
    policy: ErrorBarPolicy,
) -> Result<Chart, ChartError> {
    let columns = def.resolve_columns(table);
    if columns.is_empty() {
        return Err(ChartError::NoSeries {
            chart: def.name.clone(),
        });
    }

    // (facet suffix, table restricted to that facet value)
    let facets: Vec<(Option<String>, AggregatedTable)> = match &def.facet {
        None => vec![(None, table.clone())],
        Some(facet) => table
            .distinct(&facet.column)?
            .into_iter()
            .map(|v| -> Result<_, ChartError> {
                let sub = table.filter_eq(&facet.column, &v)?;
                Ok((Some(format!("{}={}", facet.label, display_key(&v))), sub))
            })
            .collect::<Result<_, ChartError>>()?,
    };

    let mut series = Vec::with_capacity(columns.len() * facets.len());
    for (color_index, col) in columns.iter().enumerate() {
        for (facet_index, (suffix, sub)) in facets.iter().enumerate() {
            let xs = sub.key_values(&def.x_column)?;
            let means = sub.mean(&col.column)?;
            let stds = sub.std(&col.column)?;

            let points: Vec<SeriesPoint> = xs
                .iter()
                .zip(means.iter().zip(&stds))
                .filter_map(|(x, (&mean, &std))| {
                    let x = x.as_f64()?;
                    if mean.is_nan() {
                        return None;
                    }
                    let err = match (std.is_nan(), policy) {
                        (false, _) => Some(std),
                        (true, ErrorBarPolicy::ZeroLength) => Some(0.0),
                        (true, ErrorBarPolicy::Suppress) => None,
                    };
                    Some(SeriesPoint { x, mean, err })
                })
                .collect();
            if points.is_empty() {
                continue;
            }

            let label = match suffix {
                Some(s) => format!("{} ({s})", col.label),
                None => col.label.clone(),
            };
            series.push(Series {
                label,
                color_index,
                marker: Marker::nth(facet_index),
                points,
            });
        }
    }

    if series.is_empty() {
        return Err(ChartError::NoSeries {
            chart: def.name.clone(),
        });
    }

    Ok(Chart {
        name: def.name.clone(),
        title: def.title.clone(),
        x_label: def.x_label.clone(),
        y_label: def.y_label.clone(),
        series,
    })
}

fn display_key(v: &Value) -> String {
    match v {
        // 64.0 -> "64"
        Value::Float64(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
