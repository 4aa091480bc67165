use polars::prelude::{DataType, Field, Schema};

pub const PM25: &str = "PM2.5";
pub const PM10: &str = "PM10";
pub const AQI: &str = "AQI";
pub const AQI_BUCKET: &str = "AQI_Bucket";
pub const DATE: &str = "Date";
pub const CITY: &str = "City";
pub const MONTH: &str = "Month";
pub const WIND_SPEED: &str = "Wind Speed (km/h)";

/// Columns of the city-day dataset the charts read. Any other column is
/// kept with its inferred type.
pub struct CityDayRecord {}

impl CityDayRecord {
    pub fn raw_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new(PM25, DataType::Float64),
            Field::new(PM10, DataType::Float64),
            Field::new(AQI, DataType::Float64),
            Field::new(AQI_BUCKET, DataType::Utf8),
            Field::new(DATE, DataType::Utf8),
            Field::new(CITY, DataType::Utf8),
            Field::new(MONTH, DataType::Float64),
            Field::new(WIND_SPEED, DataType::Float64),
        ])
    }
}
