//! CSV Data Loader Module
//! Reads the temperature files with Polars, parses dates and measurements, and
//! derives the calendar columns every view groups by.

use super::{
    CountryNormalizer, AVG_TEMP_COL, CITY_COL, COUNTRY_COL, DATE_COL, DECADE_COL,
    GLOBAL_MEASUREMENT_COLS, MONTH_COL, YEAR_COL,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Date format used by every source file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
    #[error("{path}: cannot parse column '{column}': {reason}")]
    Parse {
        path: PathBuf,
        column: String,
        reason: String,
    },
    #[error("Failed to load CSV {path}: {source}")]
    Csv { path: PathBuf, source: PolarsError },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Handles CSV file loading and record-level cleaning.
pub struct DataLoader;

impl DataLoader {
    /// Read a CSV file and keep only the required columns.
    pub fn read_csv(path: &Path, required: &[&str]) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        // Full-file schema inference so a stray text cell surfaces as a parse error
        // instead of a silent null.
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| LoaderError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        let names = df.get_column_names();
        if let Some(missing) = required
            .iter()
            .find(|column| !names.iter().any(|name| name.as_str() == **column))
        {
            return Err(LoaderError::MissingColumn {
                path: path.to_path_buf(),
                column: missing.to_string(),
            });
        }

        debug!(path = %path.display(), rows = df.height(), "read csv");
        Ok(df.select(required.iter().copied())?)
    }

    /// Parse the date column and cast the measurement columns to `f64`.
    ///
    /// Any unparseable or missing date fails the whole file, as does a
    /// measurement cell that is present but not numeric.
    pub fn parse_records(
        df: DataFrame,
        path: &Path,
        measurements: &[&str],
    ) -> Result<DataFrame, LoaderError> {
        let options = StrptimeOptions {
            format: Some(DATE_FORMAT.into()),
            strict: true,
            exact: true,
            ..Default::default()
        };

        let mut parsed = df
            .lazy()
            .with_column(
                col(DATE_COL)
                    .cast(DataType::String)
                    .str()
                    .to_date(options)
                    .alias(DATE_COL),
            )
            .collect()
            .map_err(|e| LoaderError::Parse {
                path: path.to_path_buf(),
                column: DATE_COL.to_string(),
                reason: e.to_string(),
            })?;

        let missing_dates = parsed.column(DATE_COL)?.null_count();
        if missing_dates > 0 {
            return Err(LoaderError::Parse {
                path: path.to_path_buf(),
                column: DATE_COL.to_string(),
                reason: format!("{} rows have no date", missing_dates),
            });
        }

        for &measurement in measurements {
            let values = parsed
                .column(measurement)?
                .as_materialized_series()
                .strict_cast(&DataType::Float64)
                .map_err(|e| LoaderError::Parse {
                    path: path.to_path_buf(),
                    column: measurement.to_string(),
                    reason: e.to_string(),
                })?;
            parsed.with_column(values)?;
        }

        Ok(parsed)
    }

    /// Derive `year`, `month` (1-12) and `decade` from the parsed date.
    pub fn with_calendar_fields(lf: LazyFrame) -> LazyFrame {
        lf.with_columns([
            col(DATE_COL).dt().year().cast(DataType::Int32).alias(YEAR_COL),
            col(DATE_COL).dt().month().cast(DataType::Int32).alias(MONTH_COL),
        ])
        .with_column(
            (col(YEAR_COL).floor_div(lit(10)) * lit(10))
                .cast(DataType::Int32)
                .alias(DECADE_COL),
        )
    }

    fn load_records(
        path: &Path,
        required: &[&str],
        measurements: &[&str],
    ) -> Result<LazyFrame, LoaderError> {
        let raw = Self::read_csv(path, required)?;
        let parsed = Self::parse_records(raw, path, measurements)?;
        Ok(Self::with_calendar_fields(parsed.lazy()))
    }

    /// Per-country records: dt, AverageTemperature, Country + calendar fields,
    /// with country names normalized.
    pub fn load_country(path: &Path) -> Result<DataFrame, LoaderError> {
        let records = Self::load_records(
            path,
            &[DATE_COL, AVG_TEMP_COL, COUNTRY_COL],
            &[AVG_TEMP_COL],
        )?;
        let df = CountryNormalizer::apply(records, COUNTRY_COL).collect()?;
        info!(path = %path.display(), rows = df.height(), "loaded country records");
        Ok(df)
    }

    /// Global records: dt + the four land/ocean measurements + calendar fields.
    pub fn load_global(path: &Path) -> Result<DataFrame, LoaderError> {
        let mut required = vec![DATE_COL];
        required.extend(GLOBAL_MEASUREMENT_COLS);
        let df = Self::load_records(path, &required, &GLOBAL_MEASUREMENT_COLS)?.collect()?;
        info!(path = %path.display(), rows = df.height(), "loaded global records");
        Ok(df)
    }

    /// Major-city records: dt, AverageTemperature, City, Country + calendar fields.
    pub fn load_city(path: &Path) -> Result<DataFrame, LoaderError> {
        let records = Self::load_records(
            path,
            &[DATE_COL, AVG_TEMP_COL, CITY_COL, COUNTRY_COL],
            &[AVG_TEMP_COL],
        )?;
        let df = CountryNormalizer::apply(records, COUNTRY_COL)
            .filter(col(CITY_COL).is_not_null())
            .collect()?;
        info!(path = %path.display(), rows = df.height(), "loaded city records");
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use std::fs;

    fn i32_values(df: &DataFrame, name: &str) -> Vec<i32> {
        df.column(name)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_calendar_fields() {
        let (_dir, sources) = fixtures::write_sources();
        let df = DataLoader::load_global(&sources.global_csv).unwrap();

        let years = i32_values(&df, YEAR_COL);
        let months = i32_values(&df, MONTH_COL);
        let decades = i32_values(&df, DECADE_COL);
        assert_eq!(years.len(), df.height());

        for ((year, month), decade) in years.iter().zip(&months).zip(&decades) {
            assert_eq!(*decade, (year / 10) * 10);
            assert!((1..=12).contains(month));
        }
        assert_eq!(years[0], 1849);
        assert_eq!(months[1], 7);
        assert_eq!(decades[0], 1840);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load_country(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("country.csv");
        fs::write(&path, "dt,AverageTemperature\n1900-01-01,1.0\n").unwrap();

        match DataLoader::load_country(&path).unwrap_err() {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, COUNTRY_COL),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_date_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("country.csv");
        fs::write(
            &path,
            "dt,AverageTemperature,Country\n1900-01-01,1.0,Chad\n1900-13-45,2.0,Chad\n",
        )
        .unwrap();

        match DataLoader::load_country(&path).unwrap_err() {
            LoaderError::Parse { column, .. } => assert_eq!(column, DATE_COL),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_date_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("country.csv");
        fs::write(
            &path,
            "dt,AverageTemperature,Country\n1900-01-01,1.0,Chad\n,2.0,Chad\n",
        )
        .unwrap();

        assert!(matches!(
            DataLoader::load_country(&path),
            Err(LoaderError::Parse { .. })
        ));
    }

    #[test]
    fn test_non_numeric_measurement_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("country.csv");
        fs::write(
            &path,
            "dt,AverageTemperature,Country\n1900-01-01,1.0,Chad\n1900-02-01,warm,Chad\n",
        )
        .unwrap();

        match DataLoader::load_country(&path).unwrap_err() {
            LoaderError::Parse { column, .. } => assert_eq!(column, AVG_TEMP_COL),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_measurements_are_kept_as_records() {
        let (_dir, sources) = fixtures::write_sources();
        let df = DataLoader::load_country(&sources.country_csv).unwrap();

        // Chad has two empty cells; they stay as nulls for the aggregation step.
        let chad = df
            .clone()
            .lazy()
            .filter(col(COUNTRY_COL).eq(lit("Chad")))
            .collect()
            .unwrap();
        assert_eq!(chad.height(), 3);
        assert_eq!(chad.column(AVG_TEMP_COL).unwrap().null_count(), 2);
    }
}
