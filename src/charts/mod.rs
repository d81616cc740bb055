//! Charts module - chart model, interactive plotting and static export

mod model;
pub mod palette;
mod plotter;
mod renderer;

pub use model::{BarChart, Chart, ChoroplethChart, LineChart, MapFrame, Series, VerticalMarker};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
