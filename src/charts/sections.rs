use std::collections::{BTreeMap, HashMap};

use polars::export::chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use super::{Figure, FigureKind, PointGroup, Section};
use crate::category::AqiCategory;
use crate::dataset::{f64_values, has_columns, numeric_column_names, str_values};
use crate::error::{DashboardError, Result};
use crate::records::{AQI, AQI_BUCKET, CITY, DATE, MONTH, PM10, PM25, WIND_SPEED};
use crate::stats::{pearson, BoxStats};

const TOP_CITIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    CorrelationHeatmap,
    Pm25VsAqi,
    BucketDistribution,
    Pm25Trend,
    CityComparison,
    AqiVsWindSpeed,
    Pm10VsAqi,
    AqiByMonth,
}

impl ChartKind {
    /// Shown right after the dataset overview.
    pub const LEADING: [ChartKind; 2] = [ChartKind::CorrelationHeatmap, ChartKind::Pm25VsAqi];

    /// Shown under "More Visualizations".
    pub const MORE: [ChartKind; 6] = [
        ChartKind::BucketDistribution,
        ChartKind::Pm25Trend,
        ChartKind::CityComparison,
        ChartKind::AqiVsWindSpeed,
        ChartKind::Pm10VsAqi,
        ChartKind::AqiByMonth,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::CorrelationHeatmap => "Correlation Heatmap",
            ChartKind::Pm25VsAqi => "PM2.5 vs AQI",
            ChartKind::BucketDistribution => "AQI Bucket Distribution",
            ChartKind::Pm25Trend => "PM2.5 Trend Over Time",
            ChartKind::CityComparison => "City-Wise AQI Comparison",
            ChartKind::AqiVsWindSpeed => "AQI vs Wind Speed",
            ChartKind::Pm10VsAqi => "PM10 vs AQI",
            ChartKind::AqiByMonth => "AQI by Month",
        }
    }

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            ChartKind::CorrelationHeatmap => &[],
            ChartKind::Pm25VsAqi => &[PM25, AQI, AQI_BUCKET],
            ChartKind::BucketDistribution => &[AQI_BUCKET],
            ChartKind::Pm25Trend => &[DATE, PM25],
            ChartKind::CityComparison => &[CITY, AQI],
            ChartKind::AqiVsWindSpeed => &[AQI, WIND_SPEED],
            ChartKind::Pm10VsAqi => &[PM10, AQI, AQI_BUCKET],
            ChartKind::AqiByMonth => &[MONTH, AQI],
        }
    }

    fn missing_columns_warning(self) -> String {
        let what = match self {
            ChartKind::CorrelationHeatmap => "heatmap",
            ChartKind::Pm25VsAqi | ChartKind::Pm10VsAqi => "scatter plot",
            ChartKind::BucketDistribution => "pie chart",
            ChartKind::Pm25Trend => "trend chart",
            ChartKind::CityComparison => "city comparison",
            ChartKind::AqiVsWindSpeed => "wind speed plot",
            ChartKind::AqiByMonth => "monthly box plot",
        };
        let columns = self.required_columns();
        let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
        let noun = if columns.len() == 1 { "column" } else { "columns" };
        format!(
            "Required {} for {} ({}) not found in dataset.",
            noun,
            what,
            quoted.join(", ")
        )
    }
}

pub fn build_section(kind: ChartKind, df: &DataFrame) -> Section {
    if !has_columns(df, kind.required_columns()) {
        return Section::warning(kind.title(), kind.missing_columns_warning());
    }
    let figure = match kind {
        ChartKind::CorrelationHeatmap => {
            return Section::from_result(kind.title(), correlation_heatmap(df), |e| {
                format!("Error generating heatmap: {}", e)
            });
        }
        ChartKind::Pm25VsAqi => hued_scatter(df, PM25, AQI, Some(AQI_BUCKET), None),
        ChartKind::BucketDistribution => bucket_distribution(df),
        ChartKind::Pm25Trend => daily_trend(df),
        ChartKind::CityComparison => city_comparison(df),
        ChartKind::AqiVsWindSpeed => {
            let hue = has_columns(df, &[AQI_BUCKET]).then_some(AQI_BUCKET);
            hued_scatter(df, WIND_SPEED, AQI, hue, Some("Effect of Wind Speed on AQI"))
        }
        ChartKind::Pm10VsAqi => hued_scatter(df, PM10, AQI, Some(AQI_BUCKET), None),
        ChartKind::AqiByMonth => monthly_boxes(df),
    };
    Section::from_result(kind.title(), figure, |e| {
        format!("Error generating {}: {}", kind.title(), e)
    })
}

fn correlation_heatmap(df: &DataFrame) -> Result<Figure> {
    let labels = numeric_column_names(df);
    if labels.is_empty() {
        return Err(DashboardError::Chart(
            "dataset has no numeric columns to correlate".to_string(),
        ));
    }
    let columns = labels
        .iter()
        .map(|name| f64_values(df, name))
        .collect::<Result<Vec<_>>>()?;
    let matrix = columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect();
    Ok(Figure::new(FigureKind::Heatmap { labels, matrix }))
}

/// Known buckets in severity order, anything else after them by name.
fn bucket_rank(name: &str) -> (usize, String) {
    let rank = AqiCategory::ALL
        .iter()
        .position(|c| c.label() == name)
        .unwrap_or(AqiCategory::ALL.len());
    (rank, name.to_string())
}

fn hued_scatter(
    df: &DataFrame,
    x: &str,
    y: &str,
    hue: Option<&str>,
    caption: Option<&str>,
) -> Result<Figure> {
    let xs = f64_values(df, x)?;
    let ys = f64_values(df, y)?;
    let hues = match hue {
        Some(name) => str_values(df, name)?,
        None => vec![Some(y.to_string()); df.height()],
    };

    let mut groups: HashMap<String, Vec<(f64, f64)>> = HashMap::new();
    for ((x, y), h) in xs.into_iter().zip(ys).zip(hues) {
        if let (Some(x), Some(y), Some(h)) = (x, y, h) {
            groups.entry(h).or_default().push((x, y));
        }
    }
    let mut groups: Vec<PointGroup> = groups
        .into_iter()
        .map(|(name, points)| PointGroup { name, points })
        .collect();
    groups.sort_by_key(|g| bucket_rank(&g.name));

    let figure = Figure::new(FigureKind::Scatter {
        x_label: x.to_string(),
        y_label: y.to_string(),
        groups,
    });
    Ok(match caption {
        Some(caption) => figure.with_caption(caption),
        None => figure,
    })
}

fn bucket_distribution(df: &DataFrame) -> Result<Figure> {
    let counts = df
        .clone()
        .lazy()
        .filter(col(AQI_BUCKET).is_not_null())
        .groupby([col(AQI_BUCKET)])
        .agg([count().alias("count")])
        .collect()?;
    let names = str_values(&counts, AQI_BUCKET)?;
    let sizes = f64_values(&counts, "count")?;

    let mut slices: Vec<(String, usize)> = names
        .into_iter()
        .zip(sizes)
        .filter_map(|(name, size)| Some((name?, size? as usize)))
        .collect();
    slices.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if slices.is_empty() {
        return Err(DashboardError::Chart("no AQI bucket values".to_string()));
    }
    Ok(Figure::new(FigureKind::Pie { slices }).with_caption("Distribution of AQI Buckets"))
}

/// Parses the date formats found in city-day exports. Anything else is
/// treated as missing.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

fn daily_trend(df: &DataFrame) -> Result<Figure> {
    let days: Vec<Option<String>> = str_values(df, DATE)?
        .into_iter()
        .map(|raw| {
            raw.and_then(|r| parse_date(&r))
                .map(|d| d.format("%Y-%m-%d").to_string())
        })
        .collect();
    let frame = DataFrame::new(vec![
        Series::new("day", days),
        Series::new(PM25, f64_values(df, PM25)?),
    ])?;

    let daily = frame
        .lazy()
        .filter(col("day").is_not_null())
        .groupby([col("day")])
        .agg([col(PM25).mean()])
        .sort("day", SortOptions::default())
        .collect()?;

    let points = str_values(&daily, "day")?
        .into_iter()
        .zip(f64_values(&daily, PM25)?)
        .filter_map(|(day, mean)| Some((parse_date(&day?)?, mean?)))
        .collect();
    Ok(Figure::new(FigureKind::Line {
        x_label: DATE.to_string(),
        y_label: PM25.to_string(),
        points,
    })
    .with_caption("Daily Average PM2.5 Levels"))
}

fn city_comparison(df: &DataFrame) -> Result<Figure> {
    let means = df
        .clone()
        .lazy()
        .filter(col(CITY).is_not_null().and(col(AQI).is_not_null()))
        .groupby([col(CITY)])
        .agg([col(AQI).mean()])
        .collect()?;

    let mut bars: Vec<(String, f64)> = str_values(&means, CITY)?
        .into_iter()
        .zip(f64_values(&means, AQI)?)
        .filter_map(|(city, mean)| Some((city?, mean?)))
        .collect();
    bars.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    bars.truncate(TOP_CITIES);
    Ok(Figure::new(FigureKind::HorizontalBar {
        value_label: AQI.to_string(),
        bars,
    })
    .with_caption("Top 10 Cities by Average AQI"))
}

fn monthly_boxes(df: &DataFrame) -> Result<Figure> {
    let mut by_month: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for (month, aqi) in f64_values(df, MONTH)?.into_iter().zip(f64_values(df, AQI)?) {
        if let (Some(month), Some(aqi)) = (month, aqi) {
            by_month.entry(month.round() as i64).or_default().push(aqi);
        }
    }
    let groups = by_month
        .into_iter()
        .filter_map(|(month, values)| Some((month.to_string(), BoxStats::from_values(&values)?)))
        .collect();
    Ok(Figure::new(FigureKind::Box {
        x_label: MONTH.to_string(),
        y_label: AQI.to_string(),
        groups,
    })
    .with_caption("AQI Distribution Across Months"))
}
