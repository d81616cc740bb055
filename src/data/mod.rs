//! Data module - CSV loading, cleaning and aggregation

mod cache;
mod context;
mod loader;
mod normalize;
mod processor;

pub use cache::LoadCache;
pub use context::ClimateData;
pub use loader::{DataLoader, LoaderError};
pub use normalize::CountryNormalizer;
pub use processor::DataProcessor;

// Source column names
pub const DATE_COL: &str = "dt";
pub const COUNTRY_COL: &str = "Country";
pub const CITY_COL: &str = "City";
pub const AVG_TEMP_COL: &str = "AverageTemperature";
pub const LAND_AVG_COL: &str = "LandAverageTemperature";
pub const LAND_MIN_COL: &str = "LandMinTemperature";
pub const LAND_MAX_COL: &str = "LandMaxTemperature";
pub const LAND_OCEAN_AVG_COL: &str = "LandAndOceanAverageTemperature";

// Derived calendar columns
pub const YEAR_COL: &str = "year";
pub const MONTH_COL: &str = "month";
pub const DECADE_COL: &str = "decade";

/// Measurement columns of the global file, in selector order.
pub const GLOBAL_MEASUREMENT_COLS: [&str; 4] = [
    LAND_AVG_COL,
    LAND_MIN_COL,
    LAND_MAX_COL,
    LAND_OCEAN_AVG_COL,
];
