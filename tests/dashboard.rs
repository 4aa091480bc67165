mod common;

use std::collections::HashMap;

use aqi_dashboard::charts::importance::UNSUPPORTED;
use aqi_dashboard::charts::{FigureKind, SectionOutcome};
use aqi_dashboard::model::Classifier;
use aqi_dashboard::page::{compose_page, render_html, PageRequest, PredictionOutcome, TITLE};
use aqi_dashboard::prediction::predict;
use aqi_dashboard::schema::{FeatureSchema, FeatureVector};
use aqi_dashboard::{AppContext, DashboardConfig, DashboardError};

use common::*;

const SCATTER_WARNING: &str =
    "Required columns for scatter plot ('PM2.5', 'AQI', 'AQI_Bucket') not found in dataset.";

#[test]
fn complete_dataset_renders_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = fixture_context(dir.path(), true);
    let page = compose_page(&ctx, &PageRequest::default());

    assert_eq!(page.sections().count(), 9);
    for section in page.sections() {
        assert_eq!(section.warning_message(), None, "{}", section.title);
    }
    assert!(page.prediction.is_none());
    assert!(page.statistics.is_none());
}

/// Text layout needs a system font; without one every figure degrades to a
/// warning, which is covered separately.
fn fonts_available() -> bool {
    use plotters::style::IntoFont;
    ("sans-serif", 12).into_font().box_size("AQI").is_ok()
}

#[test]
fn complete_dataset_draws_every_figure() {
    if !fonts_available() {
        eprintln!("no sans-serif font installed, skipping figure drawing");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let ctx = fixture_context(dir.path(), true);
    let request = PageRequest {
        show_stats: true,
        submit: true,
        values: HashMap::new(),
    };
    let html = render_html(&compose_page(&ctx, &request));

    assert!(!html.contains("drawing failed"));
    assert!(!html.contains("class=\"warning\""));
    assert_eq!(html.matches("<svg").count(), 9);
}

#[test]
fn scatter_without_bucket_column_warns_and_page_continues() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = fixture_context(dir.path(), false);
    let request = PageRequest {
        submit: true,
        ..PageRequest::default()
    };
    let page = compose_page(&ctx, &request);

    let scatter = page.section("PM2.5 vs AQI").unwrap();
    assert_eq!(scatter.warning_message(), Some(SCATTER_WARNING));
    assert!(matches!(
        page.section("Correlation Heatmap").unwrap().outcome,
        SectionOutcome::Figure(_)
    ));
    assert!(page.section("AQI by Month").unwrap().as_figure().is_some());
    assert!(matches!(page.prediction, Some(PredictionOutcome::Predicted(_))));

    let html = render_html(&page);
    assert!(html.contains(
        "Required columns for scatter plot (&#39;PM2.5&#39;, &#39;AQI&#39;, &#39;AQI_Bucket&#39;) not found in dataset."
    ));
}

#[test]
fn default_vector_prediction_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = fixture_context(dir.path(), true);
    let defaults = ctx.schema.defaults();

    let first = predict(&*ctx.model, &defaults).unwrap();
    let second = predict(&*ctx.model, &defaults).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.code, 2);
    assert_eq!(first.label, "Moderate");
}

#[test]
fn labelled_sample_predicts_ground_truth_only_in_schema_order() {
    let artifact = trained_artifact();
    let schema = FeatureSchema::aqi();
    let sample = schema.vector_from_pairs(vec![("AQI", "350")]).unwrap();
    assert_eq!(artifact.predict_code(sample.values()).unwrap(), 4);

    for (row, code) in labelled_rows() {
        assert_eq!(artifact.predict_code(&row).unwrap(), code);
    }

    let mut reversed = sample.values().to_vec();
    reversed.reverse();
    let reversed = FeatureVector::from_values(reversed);
    assert_ne!(artifact.predict_code(reversed.values()).unwrap(), 4);
}

#[test]
fn model_trained_on_other_feature_order_is_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut artifact = trained_artifact();
    artifact.feature_names.swap(0, AQI_POSITION);
    let config = fixture_config(dir.path(), &artifact, true);

    let err = AppContext::load(&config).err().unwrap();
    assert!(matches!(err, DashboardError::SchemaMismatch { .. }));
    assert!(err.to_string().contains("position 0"));
}

#[test]
fn importance_chart_is_ranked_and_skipped_on_length_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = fixture_context(dir.path(), true);
    let page = compose_page(&ctx, &PageRequest::default());
    match &page.importance.as_figure().unwrap().kind {
        FigureKind::HorizontalBar { bars, .. } => {
            assert_eq!(bars.len(), 42);
            assert_eq!(bars[0], ("AQI".to_string(), 0.8));
            assert_eq!(bars[1], ("PM2.5".to_string(), 0.2));
        }
        other => panic!("unexpected figure {:?}", other),
    }

    let other_dir = tempfile::tempdir().unwrap();
    let artifact = trained_artifact().with_importances(importances(41));
    let ctx = AppContext::load(&fixture_config(other_dir.path(), &artifact, true)).unwrap();
    let page = compose_page(&ctx, &PageRequest::default());
    assert_eq!(page.importance.warning_message(), Some(UNSUPPORTED));
    assert!(page.section("City-Wise AQI Comparison").unwrap().as_figure().is_some());
}

#[test]
fn submitted_values_drive_prediction_and_stay_in_form() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = fixture_context(dir.path(), true);
    let mut values = HashMap::new();
    values.insert("AQI".to_string(), "455".to_string());
    let request = PageRequest {
        show_stats: true,
        submit: true,
        values,
    };
    let page = compose_page(&ctx, &request);

    match &page.prediction {
        Some(PredictionOutcome::Predicted(p)) => assert_eq!((p.code, p.label), (5, "Severe")),
        other => panic!("unexpected prediction {:?}", other),
    }
    let aqi_field = page.form.iter().find(|f| f.name == "AQI").unwrap();
    assert_eq!(aqi_field.value, "455");
    let pm_field = page.form.iter().find(|f| f.name == "PM2.5").unwrap();
    assert_eq!(pm_field.value, "80");
    assert!(matches!(page.statistics, Some(Ok(_))));

    let html = render_html(&page);
    assert!(html.contains(TITLE.replace('&', "&amp;").as_str()));
    assert!(html.contains("✅ Predicted AQI Bucket: <strong>5 - Severe</strong>"));
    assert!(html.contains("name=\"Wind Speed (km/h)\" value=\"10\""));
}

#[test]
fn invalid_form_value_is_reported_instead_of_predicted() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = fixture_context(dir.path(), true);
    let mut values = HashMap::new();
    values.insert("PM10".to_string(), "lots".to_string());
    let page = compose_page(
        &ctx,
        &PageRequest {
            show_stats: false,
            submit: true,
            values,
        },
    );
    match &page.prediction {
        Some(PredictionOutcome::Rejected(reason)) => {
            assert_eq!(reason, "invalid value \"lots\" for feature \"PM10\"")
        }
        other => panic!("unexpected prediction {:?}", other),
    }
}

#[test]
fn unreadable_dataset_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig {
        model_path: write_fixture_model(dir.path(), &trained_artifact()),
        dataset_path: dir.path().join("missing.csv"),
    };
    assert!(matches!(
        AppContext::load(&config).err().unwrap(),
        DashboardError::Io { .. }
    ));
}
