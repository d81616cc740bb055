//! User-chosen parameters for the interactive pages.

use super::ViewError;
use crate::data::{LAND_AVG_COL, LAND_MAX_COL, LAND_MIN_COL, LAND_OCEAN_AVG_COL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Global measurement selectable on the warming page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Measurement {
    #[default]
    LandAverage,
    LandMin,
    LandMax,
    LandAndOceanAverage,
}

impl Measurement {
    pub const ALL: [Measurement; 4] = [
        Measurement::LandAverage,
        Measurement::LandMin,
        Measurement::LandMax,
        Measurement::LandAndOceanAverage,
    ];

    /// Column of the global table holding this measurement.
    pub fn column(self) -> &'static str {
        match self {
            Measurement::LandAverage => LAND_AVG_COL,
            Measurement::LandMin => LAND_MIN_COL,
            Measurement::LandMax => LAND_MAX_COL,
            Measurement::LandAndOceanAverage => LAND_OCEAN_AVG_COL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measurement::LandAverage => "Land Average Temperature",
            Measurement::LandMin => "Land Min Temperature",
            Measurement::LandMax => "Land Max Temperature",
            Measurement::LandAndOceanAverage => "Land And Ocean Average Temperature",
        }
    }
}

impl Measurement {
    /// Measurement for a configured name. Unknown names fall back to the land average.
    pub fn from_name_or_default(name: &str) -> Measurement {
        name.parse().unwrap_or_else(|e| {
            warn!("{}, using {}", e, Measurement::default());
            Measurement::default()
        })
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Measurement {
    type Err = ViewError;

    /// Accepts the display label or the column name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Measurement::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(wanted) || m.column() == wanted)
            .ok_or_else(|| ViewError::InvalidSelection {
                parameter: "measurement",
                value: s.to_string(),
            })
    }
}

/// Inclusive year window. Bounds beyond the data simply select nothing extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Reversed bounds are swapped.
    pub fn new(start: i32, end: i32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Everything.
    pub fn unbounded() -> Self {
        Self::new(i32::MIN, i32::MAX)
    }

    /// Raise the lower bound to `floor` if it is below it.
    pub fn with_floor(self, floor: i32) -> Self {
        Self {
            start: self.start.max(floor),
            end: self.end,
        }
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Optional selections for the current page. Unset fields fall back to the
/// page's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewParams {
    pub country: Option<String>,
    pub cities: Option<(String, String)>,
    pub measurement: Measurement,
    pub years: Option<YearRange>,
}

impl ViewParams {
    /// Window for a page, optionally floored at the page's minimum year.
    pub fn window(&self, floor: Option<i32>) -> YearRange {
        let range = self.years.unwrap_or_default();
        match floor {
            Some(floor) => range.with_floor(floor),
            None => range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_parse() {
        assert_eq!(
            "Land Min Temperature".parse::<Measurement>().unwrap(),
            Measurement::LandMin
        );
        assert_eq!(
            "LandAndOceanAverageTemperature".parse::<Measurement>().unwrap(),
            Measurement::LandAndOceanAverage
        );
        assert!(matches!(
            "Sea Surface".parse::<Measurement>(),
            Err(ViewError::InvalidSelection { parameter: "measurement", .. })
        ));
    }

    #[test]
    fn test_configured_measurement_fallback() {
        assert_eq!(
            Measurement::from_name_or_default("LandMaxTemperature"),
            Measurement::LandMax
        );
        assert_eq!(
            Measurement::from_name_or_default("Sea Surface"),
            Measurement::LandAverage
        );
    }

    #[test]
    fn test_year_range_swaps_and_floors() {
        let range = YearRange::new(2000, 1800);
        assert_eq!(range, YearRange { start: 1800, end: 2000 });
        assert_eq!(range.with_floor(1850).start, 1850);
        assert_eq!(range.with_floor(1700).start, 1800);
    }

    #[test]
    fn test_window_defaults() {
        let params = ViewParams::default();
        assert_eq!(params.window(None), YearRange::unbounded());
        assert_eq!(params.window(Some(1850)).start, 1850);

        let params = ViewParams {
            years: Some(YearRange::new(1900, 1950)),
            ..Default::default()
        };
        assert_eq!(params.window(Some(1850)), YearRange::new(1900, 1950));
    }
}
