//! Chart-ready data produced by the views.
//!
//! Plain values only; drawing is left to the interactive plotter and the static
//! renderer.

use serde::Serialize;

/// A named run of (x, y) points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(x, _)| x)
    }
}

/// Fixed vertical reference line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerticalMarker {
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub markers: Vec<VerticalMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(f64, f64)>,
    pub bar_width: f64,
}

/// One animation frame: the value of every location in a single year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    pub year: i32,
    pub values: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethChart {
    pub title: String,
    pub value_label: String,
    /// Min and max over all frames, shared so colors compare across years.
    pub color_range: Option<(f64, f64)>,
    pub frames: Vec<MapFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
    Choropleth(ChoroplethChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Line(chart) => &chart.title,
            Chart::Bar(chart) => &chart.title,
            Chart::Choropleth(chart) => &chart.title,
        }
    }
}
