//! Drawing a [`Chart`] with plotters.

use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::ChartError;

use super::series::Chart;
use super::style::{ChartStyle, ImageFormat, Marker, Rgb};

/// Render `chart` to `output` using `style`.
///
/// The image format comes from [`ChartStyle::format`], and `output` must carry the matching
/// extension (the bitmap encoder is picked from it); otherwise [`ChartError::FormatMismatch`] is
/// returned before anything is written. The parent directory must exist.
pub fn render_chart(chart: &Chart, style: &ChartStyle, output: &Path) -> Result<(), ChartError> {
    let ext = output.extension().and_then(|e| e.to_str());
    if ext.and_then(ImageFormat::from_extension) != Some(style.format) {
        return Err(ChartError::FormatMismatch {
            path: output.to_path_buf(),
            expected: style.format.extension(),
        });
    }
    let (Some(x_bounds), Some(y_bounds)) = (chart.x_bounds(), chart.y_bounds()) else {
        return Err(ChartError::NoSeries {
            chart: chart.name.clone(),
        });
    };
    let bounds = (padded(x_bounds), padded(y_bounds));

    match style.format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(output, (style.width, style.height)).into_drawing_area();
            draw(&root, chart, style, bounds)
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(output, (style.width, style.height)).into_drawing_area();
            draw(&root, chart, style, bounds)
        }
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    style: &ChartStyle,
    (x_range, y_range): (Range<f64>, Range<f64>),
) -> Result<(), ChartError> {
    root.fill(&WHITE).map_err(render_err)?;

    let mut builder = ChartBuilder::on(root);
    builder.margin(20);
    if style.show_text {
        builder
            .caption(
                &chart.title,
                (style.font_family.as_str(), f64::from(style.caption_font_size)).into_font(),
            )
            .x_label_area_size(60)
            .y_label_area_size(70);
    }
    let mut ctx = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;

    if style.show_text {
        let label_font = (style.font_family.as_str(), f64::from(style.label_font_size)).into_font();
        let mut mesh = ctx.configure_mesh();
        mesh.x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .label_style(label_font.clone())
            .axis_desc_style(label_font);
        if !style.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(render_err)?;
    }

    for series in &chart.series {
        let color = to_plotters(style.color(series.color_index));
        let points: Vec<(f64, f64)> = series.points.iter().map(|p| (p.x, p.mean)).collect();

        let anno = ctx
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(style.line_width),
            ))
            .map_err(render_err)?;
        if style.show_text {
            anno.label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        ctx.draw_series(series.points.iter().filter_map(|p| {
            p.err.map(|e| {
                ErrorBar::new_vertical(
                    p.x,
                    p.mean - e,
                    p.mean,
                    p.mean + e,
                    color.stroke_width(1),
                    style.error_bar_cap,
                )
            })
        }))
        .map_err(render_err)?;

        let size = style.marker_size as i32;
        let drawn = match series.marker {
            Marker::Circle => ctx
                .draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, size, color.filled())),
                )
                .map(|_| ()),
            Marker::Square => ctx
                .draw_series(points.iter().map(|&p| {
                    EmptyElement::at(p)
                        + Rectangle::new([(-size, -size), (size, size)], color.filled())
                }))
                .map(|_| ()),
            Marker::Triangle => ctx
                .draw_series(
                    points
                        .iter()
                        .map(|&p| TriangleMarker::new(p, size, color.filled())),
                )
                .map(|_| ()),
            Marker::Cross => ctx
                .draw_series(
                    points
                        .iter()
                        .map(|&p| Cross::new(p, size, color.stroke_width(2))),
                )
                .map(|_| ()),
        };
        drawn.map_err(render_err)?;
    }

    if style.show_text {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((style.font_family.as_str(), f64::from(style.label_font_size)).into_font())
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

/// Widen `(lo, hi)` by 5% on each side; a degenerate range becomes `lo - 1 .. hi + 1`.
fn padded((lo, hi): (f64, f64)) -> Range<f64> {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        return (lo - 1.0)..(hi + 1.0);
    }
    (lo - span * 0.05)..(hi + span * 0.05)
}

fn to_plotters(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn render_err(e: impl Display) -> ChartError {
    ChartError::Render(e.to_string())
}
