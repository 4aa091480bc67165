//! Ordered model input schema.
//!
//! The position of every feature is part of the contract with the trained
//! model, so the schema is a named value checked against the model at load
//! time instead of a bare list of floats.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpec {
    pub name: String,
    pub default: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    features: Vec<FeatureSpec>,
}

static AQI_FEATURES: [(&str, f64); 42] = [
    ("PM2.5", 80.0),
    ("PM10", 120.0),
    ("NO", 20.0),
    ("NO2", 30.0),
    ("NOx", 40.0),
    ("NH3", 15.0),
    ("CO", 0.7),
    ("SO2", 10.0),
    ("O3", 25.0),
    ("Benzene", 1.2),
    ("Toluene", 2.5),
    ("Xylene", 0.9),
    ("AQI", 150.0),
    ("Year", 2024.0),
    ("Month", 6.0),
    ("Day", 21.0),
    ("Hour", 12.0),
    ("Location Encoded", 2.0),
    ("Season Encoded", 1.0),
    ("Temperature (°C)", 32.0),
    ("Humidity (%)", 60.0),
    ("Wind Speed (km/h)", 10.0),
    ("Wind Direction (°)", 180.0),
    ("Dew Point (°C)", 24.0),
    ("Pressure (hPa)", 1010.0),
    ("Rainfall (mm)", 2.0),
    ("Solar Radiation", 400.0),
    ("Cloud Cover (%)", 30.0),
    ("Visibility (km)", 5.0),
    ("PM1", 60.0),
    ("CO2", 400.0),
    ("CH4", 1.8),
    ("Lead", 0.05),
    ("Arsenic", 0.02),
    ("Nickel", 0.01),
    ("Ammonia", 5.0),
    ("Methane", 1.5),
    ("Ethylene", 0.3),
    ("Propylene", 0.4),
    ("Butadiene", 0.2),
    ("Formaldehyde", 0.05),
    ("Acetaldehyde", 0.07),
];

lazy_static! {
    static ref AQI_SCHEMA: FeatureSchema = FeatureSchema::new(
        AQI_FEATURES
            .iter()
            .map(|(name, default)| FeatureSpec {
                name: name.to_string(),
                default: *default,
            })
            .collect()
    );
}

impl FeatureSchema {
    pub fn new(features: Vec<FeatureSpec>) -> Self {
        FeatureSchema { features }
    }

    /// The 42 inputs of the city-day AQI bucket classifier.
    pub fn aqi() -> &'static FeatureSchema {
        &AQI_SCHEMA
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == name)
    }

    pub fn defaults(&self) -> FeatureVector {
        FeatureVector {
            values: self.features.iter().map(|f| f.default).collect(),
        }
    }

    /// Fails unless `model_names` lists exactly this schema's features in
    /// the same order.
    pub fn validate(&self, model_names: &[String]) -> Result<()> {
        if model_names.len() != self.len() {
            return Err(DashboardError::SchemaMismatch {
                reason: format!(
                    "model expects {} features, schema declares {}",
                    model_names.len(),
                    self.len()
                ),
            });
        }
        for (i, (expected, found)) in self.names().zip(model_names).enumerate() {
            if expected != found.as_str() {
                return Err(DashboardError::SchemaMismatch {
                    reason: format!(
                        "position {}: model expects {:?}, schema declares {:?}",
                        i, found, expected
                    ),
                });
            }
        }
        Ok(())
    }

    /// Defaults with the named overrides applied. Values are parsed as f64.
    pub fn vector_from_pairs<'a, I>(&self, pairs: I) -> Result<FeatureVector>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut vector = self.defaults();
        for (name, raw) in pairs {
            let index = self
                .position(name)
                .ok_or_else(|| DashboardError::UnknownFeature {
                    name: name.to_string(),
                })?;
            let value = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| DashboardError::InvalidFeatureValue {
                    name: name.to_string(),
                    value: raw.to_string(),
                })?;
            vector.values[index] = value;
        }
        Ok(vector)
    }

    /// Like [`FeatureSchema::vector_from_pairs`] but ignores keys that are
    /// not features, which is what a submitted form carries alongside them.
    pub fn vector_from_form(&self, form: &HashMap<String, String>) -> Result<FeatureVector> {
        self.vector_from_pairs(
            form.iter()
                .filter(|(k, _)| self.position(k).is_some())
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }
}

/// Values in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn from_values(values: Vec<f64>) -> Self {
        FeatureVector { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Splits a `NAME=VALUE` command line override. Names keep their spaces,
/// e.g. `Wind Speed (km/h)=4`.
pub fn parse_override(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
    if name.trim().is_empty() {
        return Err(format!("missing feature name in {:?}", s));
    }
    Ok((name.trim().to_string(), value.trim().to_string()))
}
