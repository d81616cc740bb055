//! The immutable data context shared by every page.

use super::{
    DataLoader, DataProcessor, LoaderError, AVG_TEMP_COL, CITY_COL, COUNTRY_COL, DECADE_COL,
    GLOBAL_MEASUREMENT_COLS, LAND_AVG_COL, MONTH_COL, YEAR_COL,
};
use crate::config::DataSources;
use polars::prelude::*;
use tracing::{info, warn};

/// Cleaned and aggregated tables, built once per load and never mutated.
#[derive(Debug, Clone)]
pub struct ClimateData {
    /// Country, year, AverageTemperature
    pub country_yearly: DataFrame,
    /// year + the four global measurement means
    pub global_yearly: DataFrame,
    /// decade, LandAverageTemperature
    pub global_decadal: DataFrame,
    /// month, LandAverageTemperature
    pub global_monthly: DataFrame,
    /// City, year, AverageTemperature; absent when no city file is configured
    pub city_yearly: Option<DataFrame>,
}

impl ClimateData {
    /// Load every configured source and aggregate it.
    pub fn load(sources: &DataSources) -> Result<Self, LoaderError> {
        let (country, global) = rayon::join(
            || DataLoader::load_country(&sources.country_csv),
            || DataLoader::load_global(&sources.global_csv),
        );
        let (country, global) = (country?, global?);

        let city = match &sources.city_csv {
            Some(path) if path.is_file() => Some(DataLoader::load_city(path)?),
            Some(path) => {
                warn!(path = %path.display(), "city file not found, city comparison disabled");
                None
            }
            None => None,
        };

        Self::from_records(country, global, city)
    }

    /// Aggregate already-cleaned record frames.
    pub fn from_records(
        country: DataFrame,
        global: DataFrame,
        city: Option<DataFrame>,
    ) -> Result<Self, LoaderError> {
        let country_yearly =
            DataProcessor::mean_by(country.lazy(), &[COUNTRY_COL, YEAR_COL], &[AVG_TEMP_COL])
                .collect()?;

        let global = global.lazy();
        let global_yearly =
            DataProcessor::mean_by(global.clone(), &[YEAR_COL], &GLOBAL_MEASUREMENT_COLS)
                .collect()?;
        let global_decadal =
            DataProcessor::mean_by(global.clone(), &[DECADE_COL], &[LAND_AVG_COL]).collect()?;
        let global_monthly =
            DataProcessor::mean_by(global, &[MONTH_COL], &[LAND_AVG_COL]).collect()?;

        let city_yearly = city
            .map(|df| {
                DataProcessor::mean_by(df.lazy(), &[CITY_COL, YEAR_COL], &[AVG_TEMP_COL])
                    .collect()
            })
            .transpose()?;

        info!(
            country_years = country_yearly.height(),
            global_years = global_yearly.height(),
            city_years = city_yearly.as_ref().map_or(0, |df| df.height()),
            "aggregated climate tables"
        );

        Ok(Self {
            country_yearly,
            global_yearly,
            global_decadal,
            global_monthly,
            city_yearly,
        })
    }

    /// Countries available for selection, sorted.
    pub fn countries(&self) -> Vec<String> {
        DataProcessor::unique_strings(&self.country_yearly, COUNTRY_COL)
    }

    /// Major cities available for comparison, sorted. Empty without a city file.
    pub fn cities(&self) -> Vec<String> {
        self.city_yearly
            .as_ref()
            .map(|df| DataProcessor::unique_strings(df, CITY_COL))
            .unwrap_or_default()
    }

    /// First and last year of the global table.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let years = self.global_yearly.column(YEAR_COL).ok()?.i32().ok()?;
        years.min().zip(years.max())
    }
}
