//! Data Processor Module
//! Group-by aggregation and the small extraction helpers the views use.

use polars::prelude::*;
use std::collections::BTreeSet;

/// Handles aggregation and column extraction.
pub struct DataProcessor;

impl DataProcessor {
    /// Mean of each value column per key tuple.
    ///
    /// Nulls are excluded from both numerator and denominator. A group is kept
    /// only when at least one value column has a contributing value; a value
    /// column with none in that group stays null. Output is sorted by the keys.
    pub fn mean_by(lf: LazyFrame, keys: &[&str], values: &[&str]) -> LazyFrame {
        let key_exprs: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
        let aggs: Vec<Expr> = values.iter().map(|v| col(*v).mean().alias(*v)).collect();
        let any_present = values
            .iter()
            .fold(lit(false), |acc, v| acc.or(col(*v).is_not_null()));

        lf.group_by(key_exprs.clone())
            .agg(aggs)
            .filter(any_present)
            .sort_by_exprs(key_exprs, SortMultipleOptions::default())
    }

    /// (x, y) pairs from two numeric columns, skipping rows where either is null.
    pub fn points(df: &DataFrame, x: &str, y: &str) -> PolarsResult<Vec<(f64, f64)>> {
        let xs = df.column(x)?.cast(&DataType::Float64)?;
        let ys = df.column(y)?.cast(&DataType::Float64)?;
        Ok(xs
            .f64()?
            .into_iter()
            .zip(ys.f64()?.into_iter())
            .filter_map(|(x, y)| Some((x?, y?)))
            .collect())
    }

    /// Sorted distinct non-null values of a string column.
    pub fn unique_strings(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .ok()
            .and_then(|col| col.str().ok())
            .map(|ca| {
                ca.into_iter()
                    .flatten()
                    .map(String::from)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rows of `df` whose integer column `year` lies in `[start, end]`.
    pub fn filter_years(
        df: &DataFrame,
        year_col: &str,
        start: i32,
        end: i32,
    ) -> PolarsResult<DataFrame> {
        df.clone()
            .lazy()
            .filter(
                col(year_col)
                    .gt_eq(lit(start))
                    .and(col(year_col).lt_eq(lit(end))),
            )
            .collect()
    }

    /// Min and max of a numeric column, `None` when it has no values.
    pub fn value_range(df: &DataFrame, column: &str) -> PolarsResult<Option<(f64, f64)>> {
        let values = df.column(column)?.cast(&DataType::Float64)?;
        let ca = values.f64()?;
        Ok(ca.min().zip(ca.max()))
    }
}
