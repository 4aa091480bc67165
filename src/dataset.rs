use std::fs::File;
use std::path::Path;

use log::debug;
use polars::prelude::*;

use crate::error::{DashboardError, Result};
use crate::records::CityDayRecord;

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DashboardError::io(path, e))?;

    let mut df = CsvReader::new(file)
        .has_header(true)
        .infer_schema(Some(1000))
        .finish()?;
    cast_known_columns(&mut df)?;
    debug!("dataset {:?}: {} rows x {} columns", path, df.height(), df.width());
    Ok(df)
}

/// Casts the columns the charts rely on to their expected types, leaving
/// absent columns absent.
pub fn cast_known_columns(df: &mut DataFrame) -> Result<()> {
    for field in CityDayRecord::raw_schema().iter_fields() {
        let casted = match df.column(field.name()) {
            Ok(series) if series.dtype() != field.data_type() => series.cast(field.data_type())?,
            _ => continue,
        };
        df.with_column(casted)?;
    }
    Ok(())
}

pub fn has_columns(df: &DataFrame, names: &[&str]) -> bool {
    names.iter().all(|name| df.column(name).is_ok())
}

/// Numeric view of a column, nulls kept.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}

/// Text view of a column, nulls kept.
pub fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::Utf8)?;
    let values = series
        .utf8()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|s| s.dtype().is_numeric())
        .map(|s| s.name().to_string())
        .collect()
}
