use polars::prelude::*;

use crate::dataset::{f64_values, numeric_column_names};
use crate::error::Result;
use crate::stats::{mean, quantile, std_dev};

pub const HEAD_ROWS: usize = 5;

const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

pub fn head(df: &DataFrame) -> DataFrame {
    df.head(Some(HEAD_ROWS))
}

/// One row per statistic, one column per numeric dataset column. Nulls are
/// excluded from every statistic.
pub fn summary_statistics(df: &DataFrame) -> Result<DataFrame> {
    let mut columns = vec![Series::new("statistic", &STATISTICS)];
    for name in numeric_column_names(df) {
        let mut values: Vec<f64> = f64_values(df, &name)?
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let described: Vec<Option<f64>> = vec![
            Some(values.len() as f64),
            mean(&values),
            std_dev(&values),
            values.first().copied(),
            quantile(&values, 0.25),
            quantile(&values, 0.5),
            quantile(&values, 0.75),
            values.last().copied(),
        ];
        columns.push(Series::new(&name, described));
    }
    Ok(DataFrame::new(columns)?)
}
