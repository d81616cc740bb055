//! Views module - page selection, user parameters and page rendering

mod page;
mod params;
mod renderer;

pub use page::Page;
pub use params::{Measurement, ViewParams, YearRange};
pub use renderer::{PageView, ViewError, ViewRenderer};
