use super::{Figure, FigureKind, Section};
use crate::error::{DashboardError, Result};
use crate::model::Classifier;
use crate::schema::FeatureSchema;

pub const TITLE: &str = "Feature Importance";
pub const UNSUPPORTED: &str =
    "⚠️ Model does not support feature importances or feature count mismatch.";

pub fn importance_section(model: &dyn Classifier, schema: &FeatureSchema) -> Section {
    match model.feature_importances() {
        Some(scores) if scores.len() == schema.len() => {
            Section::from_result(TITLE, ranked_importances(schema, scores), |e| {
                format!("❌ Error computing feature importances: {}", e)
            })
        }
        _ => Section::warning(TITLE, UNSUPPORTED),
    }
}

/// Pairs every feature with its score, highest first. Equal scores keep
/// schema order.
fn ranked_importances(schema: &FeatureSchema, scores: &[f64]) -> Result<Figure> {
    let mut bars = Vec::with_capacity(scores.len());
    for (name, score) in schema.names().zip(scores) {
        if !score.is_finite() {
            return Err(DashboardError::Chart(format!(
                "importance of {:?} is not a finite number",
                name
            )));
        }
        bars.push((name.to_string(), *score));
    }
    bars.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(Figure::new(FigureKind::HorizontalBar {
        value_label: "Importance".to_string(),
        bars,
    }))
}
