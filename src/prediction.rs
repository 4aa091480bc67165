use std::fmt;

use log::info;
use serde::Serialize;

use crate::category::label_for_code;
use crate::error::Result;
use crate::model::Classifier;
use crate::schema::FeatureVector;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub code: i32,
    pub label: &'static str,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicted AQI Bucket: {} - {}", self.code, self.label)
    }
}

pub fn predict(model: &dyn Classifier, input: &FeatureVector) -> Result<Prediction> {
    let code = model.predict_code(input.values())?;
    let prediction = Prediction {
        code,
        label: label_for_code(code),
    };
    info!("{}", prediction);
    Ok(prediction)
}
