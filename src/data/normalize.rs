//! Country name normalization.
//!
//! Territory-qualified names are rewritten to their parent name first, then the
//! continent and aggregate pseudo-countries are dropped. Both steps are plain
//! column expressions so they run inside the lazy load pipeline.

use polars::prelude::*;

/// Territory-qualified name -> canonical name.
pub const COUNTRY_SUBSTITUTIONS: [(&str, &str); 4] = [
    ("Denmark (Europe)", "Denmark"),
    ("France (Europe)", "France"),
    ("Netherlands (Europe)", "Netherlands"),
    ("United Kingdom (Europe)", "United Kingdom"),
];

/// Aggregates that would double-count if treated as countries.
///
/// Bare "Denmark", "France", "Netherlands" and "United Kingdom" rows are kept and
/// averaged with their "(Europe)" rows, so those series include overseas
/// territories (Greenland in Denmark, for one). They differ from a mainland-only
/// series built by dropping the bare names.
pub const EXCLUDED_COUNTRIES: [&str; 4] = ["Antarctica", "Europe", "Africa", "South America"];

pub struct CountryNormalizer;

impl CountryNormalizer {
    /// Canonical name for a single value, `None` when the name is excluded.
    pub fn canonical_name(name: &str) -> Option<&str> {
        let name = COUNTRY_SUBSTITUTIONS
            .iter()
            .find(|(from, _)| *from == name)
            .map_or(name, |(_, to)| *to);
        (!EXCLUDED_COUNTRIES.iter().any(|excluded| *excluded == name)).then_some(name)
    }

    /// Expression rewriting `column` through the substitution table.
    pub fn substitute(column: &str) -> Expr {
        COUNTRY_SUBSTITUTIONS
            .iter()
            .fold(col(column), |otherwise, (from, to)| {
                when(col(column).eq(lit(*from)))
                    .then(lit(*to))
                    .otherwise(otherwise)
            })
    }

    /// Predicate keeping rows whose `column` is present and not excluded.
    pub fn keep(column: &str) -> Expr {
        EXCLUDED_COUNTRIES
            .iter()
            .fold(col(column).is_not_null(), |acc, name| {
                acc.and(col(column).neq(lit(*name)))
            })
    }

    /// Substitute, then exclude. The order matters: a renamed entry must be
    /// judged by its canonical name.
    pub fn apply(lf: LazyFrame, column: &str) -> LazyFrame {
        lf.with_column(Self::substitute(column).alias(column))
            .filter(Self::keep(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries(df: &DataFrame) -> Vec<String> {
        df.column("Country")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(String::from)
            .collect()
    }

    fn frame(names: &[&str]) -> DataFrame {
        let values: Vec<f64> = (0..names.len()).map(|i| i as f64).collect();
        DataFrame::new(vec![
            Column::new("Country".into(), names.to_vec()),
            Column::new("AverageTemperature".into(), values),
        ])
        .unwrap()
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(CountryNormalizer::canonical_name("France (Europe)"), Some("France"));
        assert_eq!(CountryNormalizer::canonical_name("France"), Some("France"));
        assert_eq!(CountryNormalizer::canonical_name("Chad"), Some("Chad"));
        assert_eq!(CountryNormalizer::canonical_name("Europe"), None);
        assert_eq!(CountryNormalizer::canonical_name("South America"), None);
    }

    #[test]
    fn test_substitute_then_exclude() {
        let df = frame(&[
            "France (Europe)",
            "Europe",
            "Chad",
            "United Kingdom (Europe)",
            "Antarctica",
        ]);
        let out = CountryNormalizer::apply(df.lazy(), "Country")
            .collect()
            .unwrap();

        assert_eq!(countries(&out), vec!["France", "Chad", "United Kingdom"]);
        // Values travel with their rows.
        let values: Vec<f64> = out
            .column("AverageTemperature")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(values, vec![0.0, 2.0, 3.0]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let df = frame(&["Denmark (Europe)", "Denmark", "Africa", "Netherlands (Europe)"]);
        let once = CountryNormalizer::apply(df.lazy(), "Country")
            .collect()
            .unwrap();
        let twice = CountryNormalizer::apply(once.clone().lazy(), "Country")
            .collect()
            .unwrap();

        assert!(once.equals(&twice));
        assert_eq!(countries(&once), vec!["Denmark", "Denmark", "Netherlands"]);
    }

    #[test]
    fn test_expression_matches_scalar_helper() {
        let names = [
            "France (Europe)",
            "Europe",
            "Chad",
            "Denmark (Europe)",
            "Africa",
            "Brazil",
        ];
        let out = CountryNormalizer::apply(frame(&names).lazy(), "Country")
            .collect()
            .unwrap();
        let expected: Vec<String> = names
            .iter()
            .filter_map(|n| CountryNormalizer::canonical_name(n))
            .map(String::from)
            .collect();
        assert_eq!(countries(&out), expected);
    }
}
