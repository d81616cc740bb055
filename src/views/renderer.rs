//! Page Renderer Module
//! Turns the shared data context plus a page selection into chart-ready output.

use super::{Page, ViewParams, YearRange};
use crate::charts::{BarChart, Chart, ChoroplethChart, LineChart, MapFrame, Series, VerticalMarker};
use crate::config::ViewConfig;
use crate::data::{
    ClimateData, CountryNormalizer, DataProcessor, AVG_TEMP_COL, CITY_COL, COUNTRY_COL, DECADE_COL, LAND_AVG_COL,
    MONTH_COL, YEAR_COL,
};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Unknown page: {0}")]
    InvalidPage(String),
    #[error("Invalid {parameter}: {value}")]
    InvalidSelection {
        parameter: &'static str,
        value: String,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Everything a page shows: a title, some text and zero or more charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: Page,
    pub title: String,
    pub text: Vec<String>,
    pub charts: Vec<Chart>,
}

impl PageView {
    fn new(page: Page, title: &str) -> Self {
        Self {
            page,
            title: title.to_string(),
            text: Vec::new(),
            charts: Vec::new(),
        }
    }
}

/// Renders pages from a borrowed, read-only data context.
pub struct ViewRenderer<'a> {
    data: &'a ClimateData,
    config: &'a ViewConfig,
}

impl<'a> ViewRenderer<'a> {
    pub fn new(data: &'a ClimateData, config: &'a ViewConfig) -> Self {
        Self { data, config }
    }

    pub fn render(&self, page: Page, params: &ViewParams) -> Result<PageView, ViewError> {
        debug!(%page, ?params, "render page");
        match page {
            Page::Home => Ok(Self::home()),
            Page::GlobalTrend => self.global_trend(params),
            Page::DecadalAndSeasonal => self.decadal_and_seasonal(),
            Page::WarmingStart => self.warming_start(params),
            Page::GlobalMap => self.global_map(params),
            Page::CityCompare => self.city_compare(params),
            Page::Credits => Ok(Self::credits()),
        }
    }

    pub fn render_or_home(&self, page: Page, params: &ViewParams) -> PageView {
        self.render(page, params).unwrap_or_else(|e| {
            warn!(%page, "render failed, showing Home: {}", e);
            Self::home()
        })
    }

    fn home() -> PageView {
        let mut view = PageView::new(Page::Home, "Climate Data Analysis Application");
        view.text = vec![
            "This application provides an in-depth analysis of global temperature trends."
                .to_string(),
            "Explore various aspects of global climate change over time.".to_string(),
        ];
        view
    }

    fn credits() -> PageView {
        let mut view = PageView::new(Page::Credits, "Thanks and Credits");
        view.text = vec![
            "Thank you for exploring the Climate Data Analysis Application.".to_string(),
            "Data Source: Berkeley Earth surface temperature records, as published on Kaggle \
             (Global Land and Ocean-and-Land Temperatures)."
                .to_string(),
            "Special thanks to all contributors and data scientists working towards \
             understanding climate change."
                .to_string(),
        ];
        view
    }

    fn global_trend(&self, params: &ViewParams) -> Result<PageView, ViewError> {
        let window = params.window(None);
        let points = self.yearly_points(&self.data.global_yearly, LAND_AVG_COL, window)?;

        let mut view = PageView::new(Page::GlobalTrend, "Global Land Average Temperature Analysis");
        view.text.extend(span_summary(&points));
        view.charts.push(Chart::Line(LineChart {
            title: "Global Land Average Temperature Over Time".to_string(),
            x_label: "Year".to_string(),
            y_label: "Land Average Temperature (°C)".to_string(),
            series: vec![Series::new("Land Average", points)],
            markers: Vec::new(),
        }));
        Ok(view)
    }

    fn decadal_and_seasonal(&self) -> Result<PageView, ViewError> {
        let decades = DataProcessor::points(&self.data.global_decadal, DECADE_COL, LAND_AVG_COL)?;
        let months = DataProcessor::points(&self.data.global_monthly, MONTH_COL, LAND_AVG_COL)?;

        let mut view = PageView::new(
            Page::DecadalAndSeasonal,
            "Decadal and Seasonal Temperature Trends",
        );
        view.charts.push(Chart::Bar(BarChart {
            title: "Average Land Temperature by Decade".to_string(),
            x_label: "Decade".to_string(),
            y_label: "Land Average Temperature (°C)".to_string(),
            bars: decades,
            bar_width: 8.0,
        }));
        view.charts.push(Chart::Line(LineChart {
            title: "Average Land Temperature by Month".to_string(),
            x_label: "Month".to_string(),
            y_label: "Land Average Temperature (°C)".to_string(),
            series: vec![Series::new("Seasonal cycle", months)],
            markers: Vec::new(),
        }));
        Ok(view)
    }

    fn warming_start(&self, params: &ViewParams) -> Result<PageView, ViewError> {
        let measurement = params.measurement;
        let reference = self.config.warming_reference_year;
        let window = params.window(Some(self.config.min_year));
        let points = self.yearly_points(&self.data.global_yearly, measurement.column(), window)?;

        let mut view = PageView::new(Page::WarmingStart, "When Did Warming Start?");
        let before = mean_y(points.iter().filter(|(x, _)| *x < reference as f64));
        let after = mean_y(points.iter().filter(|(x, _)| *x >= reference as f64));
        if let (Some(before), Some(after)) = (before, after) {
            view.text.push(format!(
                "Mean {} before {}: {:.2} °C, from {} on: {:.2} °C ({:+.2} °C)",
                measurement.label(),
                reference,
                before,
                reference,
                after,
                after - before
            ));
        }
        view.charts.push(Chart::Line(LineChart {
            title: format!("{} per Year since {}", measurement.label(), window.start),
            x_label: "Year".to_string(),
            y_label: format!("{} (°C)", measurement.label()),
            series: vec![Series::new(measurement.label(), points)],
            markers: vec![VerticalMarker {
                x: reference as f64,
                label: reference.to_string(),
            }],
        }));
        Ok(view)
    }

    fn global_map(&self, params: &ViewParams) -> Result<PageView, ViewError> {
        let window = params.window(Some(self.config.min_year));
        let filtered =
            DataProcessor::filter_years(&self.data.country_yearly, YEAR_COL, window.start, window.end)?;

        // One range for the whole animation, not per frame.
        let color_range = DataProcessor::value_range(&filtered, AVG_TEMP_COL)?;
        let frames = Self::map_frames(&filtered)?;

        let mut view = PageView::new(Page::GlobalMap, "Interactive Global Temperature Map");
        if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
            view.text.push(format!(
                "{} yearly frames from {} to {}",
                frames.len(),
                first.year,
                last.year
            ));
        }
        view.charts.push(Chart::Choropleth(ChoroplethChart {
            title: "Average Temperature by Country".to_string(),
            value_label: "Average Temperature (°C)".to_string(),
            color_range,
            frames,
        }));

        if let Some(selected) = &params.country {
            // Raw names like "France (Europe)" select the merged country.
            let canonical = CountryNormalizer::canonical_name(selected);
            let points = match canonical {
                Some(country) => self.keyed_points(
                    &self.data.country_yearly,
                    COUNTRY_COL,
                    country,
                    AVG_TEMP_COL,
                    window,
                )?,
                None => Vec::new(),
            };
            let country = canonical.unwrap_or(selected.as_str());
            view.charts.push(Chart::Line(LineChart {
                title: format!("{} Average Temperature per Year", country),
                x_label: "Year".to_string(),
                y_label: "Average Temperature (°C)".to_string(),
                series: vec![Series::new(country, points)],
                markers: Vec::new(),
            }));
        }
        Ok(view)
    }

    fn city_compare(&self, params: &ViewParams) -> Result<PageView, ViewError> {
        let window = params.window(Some(self.config.min_year));
        let mut view = PageView::new(Page::CityCompare, "Major City Temperature Comparison");

        let (first, second) = match &params.cities {
            Some(pair) => pair.clone(),
            None => {
                let cities = self.data.cities();
                let first = cities.first().cloned().unwrap_or_default();
                let second = cities.get(1).cloned().unwrap_or_else(|| first.clone());
                (first, second)
            }
        };

        let mut series = Vec::with_capacity(2);
        for city in [&first, &second] {
            let points = match &self.data.city_yearly {
                Some(df) => self.keyed_points(df, CITY_COL, city, AVG_TEMP_COL, window)?,
                None => Vec::new(),
            };
            if let Some(mean) = mean_y(points.iter()) {
                view.text.push(format!("{}: mean {:.2} °C over {} years", city, mean, points.len()));
            }
            series.push(Series::new(city.clone(), points));
        }
        if self.data.city_yearly.is_none() {
            view.text.push("No major-city dataset is loaded.".to_string());
        }

        view.charts.push(Chart::Line(LineChart {
            title: format!("{} vs {}", first, second),
            x_label: "Year".to_string(),
            y_label: "Average Temperature (°C)".to_string(),
            series,
            markers: Vec::new(),
        }));
        Ok(view)
    }

    /// (year, value) points of `column` within `window`.
    fn yearly_points(
        &self,
        df: &DataFrame,
        column: &str,
        window: YearRange,
    ) -> PolarsResult<Vec<(f64, f64)>> {
        let filtered = DataProcessor::filter_years(df, YEAR_COL, window.start, window.end)?;
        DataProcessor::points(&filtered, YEAR_COL, column)
    }

    /// Yearly points for one key; an unknown key yields no points.
    fn keyed_points(
        &self,
        df: &DataFrame,
        key_col: &str,
        key: &str,
        column: &str,
        window: YearRange,
    ) -> PolarsResult<Vec<(f64, f64)>> {
        let rows = df
            .clone()
            .lazy()
            .filter(col(key_col).eq(lit(key)))
            .collect()?;
        self.yearly_points(&rows, column, window)
    }

    fn map_frames(df: &DataFrame) -> PolarsResult<Vec<MapFrame>> {
        let sorted = df.sort([YEAR_COL, COUNTRY_COL], SortMultipleOptions::default())?;
        let years = sorted.column(YEAR_COL)?.i32()?;
        let names = sorted.column(COUNTRY_COL)?.str()?;
        let values = sorted.column(AVG_TEMP_COL)?.f64()?;

        let mut frames: Vec<MapFrame> = Vec::new();
        for ((year, name), value) in years.into_iter().zip(names).zip(values) {
            let (Some(year), Some(name), Some(value)) = (year, name, value) else {
                continue;
            };
            match frames.last_mut() {
                Some(frame) if frame.year == year => frame.values.push((name.to_string(), value)),
                _ => frames.push(MapFrame {
                    year,
                    values: vec![(name.to_string(), value)],
                }),
            }
        }
        Ok(frames)
    }
}

fn mean_y<'p>(points: impl Iterator<Item = &'p (f64, f64)>) -> Option<f64> {
    let (sum, n) = points.fold((0.0, 0usize), |(sum, n), (_, y)| (sum + y, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn span_summary(points: &[(f64, f64)]) -> Option<String> {
    let (first, last) = (points.first()?, points.last()?);
    Some(format!(
        "{} years from {} to {}: {:.2} °C to {:.2} °C",
        points.len(),
        first.0,
        last.0,
        first.1,
        last.1
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::views::Measurement;

    fn load() -> (tempfile::TempDir, ClimateData) {
        let (dir, sources) = fixtures::write_sources();
        let data = ClimateData::load(&sources).unwrap();
        (dir, data)
    }

    fn line(chart: &Chart) -> &LineChart {
        match chart {
            Chart::Line(line) => line,
            other => panic!("expected a line chart, got {}", other.title()),
        }
    }

    #[test]
    fn test_global_trend_uses_all_years() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let view = ViewRenderer::new(&data, &config)
            .render(Page::GlobalTrend, &ViewParams::default())
            .unwrap();

        let chart = line(&view.charts[0]);
        let xs: Vec<f64> = chart.series[0].xs().collect();
        assert_eq!(xs, vec![1849.0, 1850.0, 1851.0, 1852.0, 1975.0]);
        assert_eq!(view.text.len(), 1);
    }

    #[test]
    fn test_decadal_and_seasonal() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let view = ViewRenderer::new(&data, &config)
            .render(Page::DecadalAndSeasonal, &ViewParams::default())
            .unwrap();

        assert_eq!(view.charts.len(), 2);
        let Chart::Bar(bars) = &view.charts[0] else {
            panic!("expected a bar chart first");
        };
        assert_eq!(bars.bars, vec![(1840.0, 2.0), (1850.0, 3.0), (1970.0, 8.0)]);

        let months: Vec<f64> = line(&view.charts[1]).series[0].xs().collect();
        assert!(months.iter().all(|m| (1.0..=12.0).contains(m)));
    }

    #[test]
    fn test_warming_start_land_min() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let params = ViewParams {
            measurement: "Land Min Temperature".parse::<Measurement>().unwrap(),
            ..Default::default()
        };
        let view = ViewRenderer::new(&data, &config)
            .render(Page::WarmingStart, &params)
            .unwrap();

        let chart = line(&view.charts[0]);
        let xs: Vec<f64> = chart.series[0].xs().collect();
        assert_eq!(xs[..3], [1850.0, 1851.0, 1852.0]);
        assert!(xs.iter().all(|&x| x >= 1850.0));
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(chart.markers[0].x, 1975.0);
        assert_eq!(view.text.len(), 1);
    }

    #[test]
    fn test_warming_start_marker_is_configurable() {
        let (_dir, data) = load();
        let config = ViewConfig {
            warming_reference_year: 1900,
            ..Default::default()
        };
        let view = ViewRenderer::new(&data, &config)
            .render(Page::WarmingStart, &ViewParams::default())
            .unwrap();
        assert_eq!(line(&view.charts[0]).markers[0].x, 1900.0);
    }

    #[test]
    fn test_global_map_fixed_color_range() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let view = ViewRenderer::new(&data, &config)
            .render(Page::GlobalMap, &ViewParams::default())
            .unwrap();

        let Chart::Choropleth(map) = &view.charts[0] else {
            panic!("expected a choropleth");
        };
        // Norway 1849 is filtered out; range covers every remaining frame.
        assert_eq!(map.frames.first().map(|f| f.year), Some(1850));
        assert_eq!(map.color_range, Some((3.0, 24.0)));

        let all: Vec<f64> = map
            .frames
            .iter()
            .flat_map(|f| f.values.iter().map(|(_, v)| *v))
            .collect();
        let min = all.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = all.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(map.color_range, Some((min, max)));

        let frame_1900 = map.frames.iter().find(|f| f.year == 1900).unwrap();
        assert_eq!(frame_1900.values, vec![("France".to_string(), 6.0)]);
    }

    #[test]
    fn test_global_map_selected_country() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let renderer = ViewRenderer::new(&data, &config);

        let params = ViewParams {
            country: Some("Norway".to_string()),
            ..Default::default()
        };
        let view = renderer.render(Page::GlobalMap, &params).unwrap();
        assert_eq!(
            line(&view.charts[1]).series[0].points,
            vec![(1850.0, 3.0), (1851.0, 3.0)]
        );

        let params = ViewParams {
            country: Some("Atlantis".to_string()),
            ..Default::default()
        };
        let view = renderer.render(Page::GlobalMap, &params).unwrap();
        assert!(line(&view.charts[1]).series[0].is_empty());

        let params = ViewParams {
            country: Some("France (Europe)".to_string()),
            ..Default::default()
        };
        let view = renderer.render(Page::GlobalMap, &params).unwrap();
        let chart = line(&view.charts[1]);
        assert_eq!(chart.series[0].name, "France");
        assert_eq!(chart.series[0].points, vec![(1900.0, 6.0)]);

        let params = ViewParams {
            country: Some("Europe".to_string()),
            ..Default::default()
        };
        let view = renderer.render(Page::GlobalMap, &params).unwrap();
        assert!(line(&view.charts[1]).series[0].is_empty());
    }

    #[test]
    fn test_city_compare() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let params = ViewParams {
            cities: Some(("Oslo".to_string(), "Paris".to_string())),
            ..Default::default()
        };
        let view = ViewRenderer::new(&data, &config)
            .render(Page::CityCompare, &params)
            .unwrap();

        let chart = line(&view.charts[0]);
        assert_eq!(chart.series[0].points, vec![(1850.0, 2.0), (1851.0, 2.0)]);
        assert_eq!(chart.series[1].points, vec![(1850.0, 5.0)]);
    }

    #[test]
    fn test_city_compare_identical_and_unknown() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let renderer = ViewRenderer::new(&data, &config);

        let same = ViewParams {
            cities: Some(("Oslo".to_string(), "Oslo".to_string())),
            ..Default::default()
        };
        let view = renderer.render(Page::CityCompare, &same).unwrap();
        let chart = line(&view.charts[0]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].points, chart.series[1].points);
        assert!(!chart.series[0].is_empty());

        let unknown = ViewParams {
            cities: Some(("Oslo".to_string(), "Gotham".to_string())),
            ..Default::default()
        };
        let view = renderer.render(Page::CityCompare, &unknown).unwrap();
        assert!(line(&view.charts[0]).series[1].is_empty());
    }

    #[test]
    fn test_city_compare_without_city_data() {
        let (_dir, sources) = fixtures::write_custom(fixtures::COUNTRY_CSV, fixtures::GLOBAL_CSV, None);
        let data = ClimateData::load(&sources).unwrap();
        let config = ViewConfig::default();
        let view = ViewRenderer::new(&data, &config)
            .render(Page::CityCompare, &ViewParams::default())
            .unwrap();

        let chart = line(&view.charts[0]);
        assert!(chart.series.iter().all(Series::is_empty));
        assert!(view.text.iter().any(|t| t.contains("No major-city dataset")));
    }

    #[test]
    fn test_year_range_clamps_silently() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let renderer = ViewRenderer::new(&data, &config);

        let params = ViewParams {
            years: Some(YearRange::new(3000, 1000)),
            ..Default::default()
        };
        let view = renderer.render(Page::GlobalTrend, &params).unwrap();
        assert_eq!(line(&view.charts[0]).series[0].points.len(), 5);

        let params = ViewParams {
            years: Some(YearRange::new(2500, 3000)),
            ..Default::default()
        };
        let view = renderer.render(Page::WarmingStart, &params).unwrap();
        assert!(line(&view.charts[0]).series[0].is_empty());
    }

    #[test]
    fn test_page_view_serializes() {
        let (_dir, data) = load();
        let config = ViewConfig::default();
        let view = ViewRenderer::new(&data, &config)
            .render(Page::WarmingStart, &ViewParams::default())
            .unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["page"], "WarmingStart");
        assert_eq!(json["charts"][0]["kind"], "line");
        assert_eq!(json["charts"][0]["markers"][0]["x"], 1975.0);
    }
}
