//! Static Chart Renderer
//! Exports charts to PNG with plotters and page data to JSON.

use super::palette::{self, Rgb};
use super::{BarChart, Chart, ChoroplethChart, LineChart};
use crate::views::PageView;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Nothing to draw for '{0}'")]
    Empty(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(e.to_string())
    }
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn rgb([r, g, b]: Rgb) -> RGBColor {
    RGBColor(r, g, b)
}

/// Padded axis bounds; a flat range is widened so plotters has something to span.
fn padded((lo, hi): (f64, f64), fraction: f64) -> (f64, f64) {
    if hi > lo {
        let pad = (hi - lo) * fraction;
        (lo - pad, hi + pad)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn bounds<'p>(points: impl Iterator<Item = &'p (f64, f64)>) -> Option<((f64, f64), (f64, f64))> {
    points.fold(None, |acc, &(x, y)| match acc {
        None => Some(((x, x), (y, y))),
        Some(((x0, x1), (y0, y1))) => Some(((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))),
    })
}

/// Renders charts into PNG files.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Write one chart as a PNG. `frame` selects the choropleth year.
    pub fn render_png(
        chart: &Chart,
        frame: usize,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        match chart {
            Chart::Line(line) => Self::draw_line(&root, line)?,
            Chart::Bar(bar) => Self::draw_bar(&root, bar)?,
            Chart::Choropleth(map) => Self::draw_ranked_frame(&root, map, frame)?,
        }

        root.present()?;
        info!(path = %path.display(), "chart exported");
        Ok(())
    }

    /// Write every chart of a page next to `base`, suffixing an index when the
    /// page has more than one chart. Returns the written paths.
    pub fn render_page(
        view: &PageView,
        frame: usize,
        base: &Path,
        size: (u32, u32),
    ) -> Result<Vec<PathBuf>, RenderError> {
        let mut written = Vec::with_capacity(view.charts.len());
        for (i, chart) in view.charts.iter().enumerate() {
            let path = if view.charts.len() == 1 {
                base.with_extension("png")
            } else {
                let stem = base
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "chart".to_string());
                base.with_file_name(format!("{}_{}.png", stem, i + 1))
            };
            Self::render_png(chart, frame, &path, size)?;
            written.push(path);
        }
        Ok(written)
    }

    /// Write the chart-ready page data as pretty JSON.
    pub fn export_json(view: &PageView, path: &Path) -> Result<(), RenderError> {
        let json = serde_json::to_string_pretty(view)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "page data exported");
        Ok(())
    }

    fn draw_line(root: &Area<'_>, chart: &LineChart) -> Result<(), RenderError> {
        let ((x0, x1), (y0, y1)) = bounds(chart.series.iter().flat_map(|s| s.points.iter()))
            .ok_or_else(|| RenderError::Empty(chart.title.clone()))?;
        let (y0, y1) = padded((y0, y1), 0.1);
        let (x0, x1) = padded((x0, x1), 0.02);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&|x| format!("{:.0}", x))
            .light_line_style(BLACK.mix(0.1))
            .draw()?;

        for (i, series) in chart.series.iter().enumerate() {
            let color = rgb(palette::series_rgb(i));
            ctx.draw_series(LineSeries::new(
                series.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        let marker = rgb(palette::MARKER);
        for m in chart.markers.iter().filter(|m| (x0..=x1).contains(&m.x)) {
            ctx.draw_series(LineSeries::new(
                vec![(m.x, y0), (m.x, y1)],
                marker.stroke_width(1),
            ))?
            .label(m.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x + 10, y - 6), (x + 10, y + 6)], marker));
        }

        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_bar(root: &Area<'_>, chart: &BarChart) -> Result<(), RenderError> {
        let ((x0, x1), (y0, y1)) =
            bounds(chart.bars.iter()).ok_or_else(|| RenderError::Empty(chart.title.clone()))?;
        let half = chart.bar_width / 2.0;
        let base = y0.min(0.0);
        let (_, top) = padded((base, y1), 0.1);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d((x0 - chart.bar_width)..(x1 + chart.bar_width), base..top)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&|x| format!("{:.0}", x))
            .disable_x_mesh()
            .draw()?;

        let range = (y0, y1);
        ctx.draw_series(chart.bars.iter().map(|&(x, y)| {
            Rectangle::new(
                [(x - half, base), (x + half, y)],
                rgb(palette::scale_rgb(y, range)).filled(),
            )
        }))?;
        Ok(())
    }

    /// A map frame without geometry: locations ranked by value, colored on the
    /// chart's fixed scale.
    fn draw_ranked_frame(
        root: &Area<'_>,
        chart: &ChoroplethChart,
        frame: usize,
    ) -> Result<(), RenderError> {
        let (Some(range), Some(current)) = (chart.color_range, chart.frames.get(frame)) else {
            return Err(RenderError::Empty(chart.title.clone()));
        };

        let mut ranked = current.values.clone();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (lo, hi) = padded(range, 0.05);

        let mut ctx = ChartBuilder::on(root)
            .caption(
                format!("{} ({})", chart.title, current.year),
                ("sans-serif", 28),
            )
            .margin(15)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..ranked.len() as f64, lo..hi)?;

        ctx.configure_mesh()
            .x_desc("Countries, ranked")
            .y_desc(chart.value_label.as_str())
            .disable_x_mesh()
            .x_labels(0)
            .draw()?;

        ctx.draw_series(ranked.iter().enumerate().map(|(i, (_, value))| {
            Rectangle::new(
                [(i as f64 + 0.1, lo), (i as f64 + 0.9, *value)],
                rgb(palette::scale_rgb(*value, range)).filled(),
            )
        }))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{MapFrame, Series};
    use crate::config::ViewConfig;
    use crate::data::{fixtures, ClimateData};
    use crate::views::{Page, ViewParams, ViewRenderer};

    fn page() -> PageView {
        PageView {
            page: Page::CityCompare,
            title: "Cities".to_string(),
            text: vec!["note".to_string()],
            charts: vec![Chart::Line(LineChart {
                title: "Oslo vs Paris".to_string(),
                x_label: "Year".to_string(),
                y_label: "Temperature".to_string(),
                series: vec![
                    Series::new("Oslo", vec![(1850.0, 2.0), (1851.0, 2.5)]),
                    Series::new("Paris", Vec::new()),
                ],
                markers: Vec::new(),
            })],
        }
    }

    #[test]
    fn test_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        StaticChartRenderer::export_json(&page(), &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["title"], "Cities");
        assert_eq!(parsed["charts"][0]["series"][0]["points"][1][0], 1851.0);
        assert!(parsed["charts"][0]["series"][1]["points"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_render_page_numbers_multiple_charts() {
        let (_data_dir, sources) = fixtures::write_sources();
        let data = ClimateData::load(&sources).unwrap();
        let config = ViewConfig::default();
        let view = ViewRenderer::new(&data, &config)
            .render(Page::DecadalAndSeasonal, &ViewParams::default())
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let written =
            StaticChartRenderer::render_page(&view, 0, &dir.path().join("trends.png"), (640, 480))
                .unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("trends_1.png"), dir.path().join("trends_2.png")]
        );
        for path in &written {
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_render_page_single_chart_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        let written =
            StaticChartRenderer::render_page(&page(), 0, &dir.path().join("cities"), (640, 480))
                .unwrap();
        assert_eq!(written, vec![dir.path().join("cities.png")]);
        assert!(written[0].is_file());
    }

    #[test]
    fn test_empty_charts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let empty = Chart::Choropleth(ChoroplethChart {
            title: "Map".to_string(),
            value_label: "Temperature".to_string(),
            color_range: None,
            frames: Vec::<MapFrame>::new(),
        });
        let err = StaticChartRenderer::render_png(&empty, 0, &dir.path().join("map.png"), (400, 300))
            .unwrap_err();
        assert!(matches!(err, RenderError::Empty(title) if title == "Map"));
    }

    #[test]
    fn test_padded_widens_flat_ranges() {
        assert_eq!(padded((2.0, 2.0), 0.1), (1.0, 3.0));
        assert_eq!(padded((0.0, 10.0), 0.1), (-1.0, 11.0));
    }

    #[test]
    fn test_bounds() {
        let points = [(1.0, 5.0), (3.0, -1.0), (2.0, 4.0)];
        assert_eq!(bounds(points.iter()), Some(((1.0, 3.0), (-1.0, 5.0))));
        assert_eq!(bounds([].iter()), None);
    }
}
