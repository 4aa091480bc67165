use std::path::PathBuf;

use log::info;
use polars::prelude::DataFrame;

use crate::dataset::read_csv;
use crate::error::Result;
use crate::model::{load_model, Classifier};
use crate::schema::FeatureSchema;

pub const DEFAULT_MODEL_PATH: &str = "aqi_model.json.gz";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
}

pub type SharedClassifier = Box<dyn Classifier + Send + Sync>;

/// Everything one page composition reads. Immutable once loaded.
pub struct AppContext {
    pub model: SharedClassifier,
    pub dataset: DataFrame,
    pub schema: FeatureSchema,
}

impl AppContext {
    /// Loads the model and dataset. A model trained on a different feature
    /// order than the schema is rejected here.
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let model = load_model(&config.model_path)?;
        let dataset = read_csv(&config.dataset_path)?;
        let context = AppContext::new(Box::new(model), dataset, FeatureSchema::aqi().clone())?;
        info!(
            "loaded model {:?} ({} features) and dataset {:?} ({} rows x {} columns)",
            config.model_path,
            context.schema.len(),
            config.dataset_path,
            context.dataset.height(),
            context.dataset.width()
        );
        Ok(context)
    }

    pub fn new(model: SharedClassifier, dataset: DataFrame, schema: FeatureSchema) -> Result<Self> {
        schema.validate(model.feature_names())?;
        Ok(AppContext {
            model,
            dataset,
            schema,
        })
    }
}
