//! Trained AQI bucket classifier and its on-disk artifact.
//!
//! An artifact is a gzip stream holding one JSON document: the feature
//! names the estimator was trained on, the smartcore estimator itself and
//! optional per-feature importance scores.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::DecisionTreeClassifier;

use crate::error::{DashboardError, Result};

pub const MODEL_FORMAT_VERSION: u32 = 1;

pub type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;
pub type Tree = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// What the dashboard needs from a classifier.
pub trait Classifier {
    /// Input names in the order the model was trained with.
    fn feature_names(&self) -> &[String];

    fn feature_importances(&self) -> Option<&[f64]>;

    /// Category code for a single sample.
    fn predict_code(&self, features: &[f64]) -> Result<i32>;
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    RandomForest(Forest),
    DecisionTree(Tree),
}

impl Estimator {
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<i32>> {
        let predicted = match self {
            Estimator::RandomForest(forest) => forest.predict(x),
            Estimator::DecisionTree(tree) => tree.predict(x),
        };
        predicted.map_err(|e| DashboardError::Inference(e.to_string()))
    }
}

#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

impl ModelArtifact {
    pub fn new(feature_names: Vec<String>, estimator: Estimator) -> Self {
        ModelArtifact {
            format_version: MODEL_FORMAT_VERSION,
            feature_names,
            estimator,
            feature_importances: None,
        }
    }

    pub fn with_importances(mut self, importances: Vec<f64>) -> Self {
        self.feature_importances = Some(importances);
        self
    }
}

impl Classifier for ModelArtifact {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    fn predict_code(&self, features: &[f64]) -> Result<i32> {
        if features.len() != self.feature_names.len() {
            return Err(DashboardError::Inference(format!(
                "expected {} values, got {}",
                self.feature_names.len(),
                features.len()
            )));
        }
        let x = DenseMatrix::new(1, features.len(), features.to_vec(), false);
        let predicted = self.estimator.predict(&x)?;
        predicted
            .first()
            .copied()
            .ok_or_else(|| DashboardError::Inference("estimator returned no prediction".to_string()))
    }
}

pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelArtifact> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DashboardError::io(path, e))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let artifact: ModelArtifact =
        serde_json::from_reader(decoder).map_err(|source| DashboardError::ModelDecode {
            path: path.to_path_buf(),
            source,
        })?;
    if artifact.format_version != MODEL_FORMAT_VERSION {
        return Err(DashboardError::UnsupportedModelVersion {
            found: artifact.format_version,
            expected: MODEL_FORMAT_VERSION,
        });
    }
    debug!(
        "model {:?}: {} features, importances: {}",
        path,
        artifact.feature_names.len(),
        artifact.feature_importances.is_some()
    );
    Ok(artifact)
}

pub fn write_model<P: AsRef<Path>>(path: P, artifact: &ModelArtifact) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DashboardError::io(path, e))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, artifact)?;
    encoder.finish().map_err(|e| DashboardError::io(path, e))?;
    Ok(())
}
