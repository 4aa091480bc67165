#![allow(dead_code)]

use std::path::{Path, PathBuf};

use aqi_dashboard::model::{write_model, Estimator, ModelArtifact, Tree};
use aqi_dashboard::schema::FeatureSchema;
use aqi_dashboard::{AppContext, DashboardConfig};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::DecisionTreeClassifierParameters;

pub const AQI_POSITION: usize = 12;

/// AQI values per bucket code. Every other feature stays at its default, so
/// the tree can only learn from the AQI position.
const AQI_BY_CODE: [[f64; 3]; 6] = [
    [20.0, 30.0, 40.0],
    [70.0, 80.0, 90.0],
    [140.0, 150.0, 160.0],
    [240.0, 250.0, 260.0],
    [340.0, 350.0, 360.0],
    [440.0, 450.0, 460.0],
];

pub fn labelled_rows() -> Vec<(Vec<f64>, i32)> {
    let defaults = FeatureSchema::aqi().defaults();
    let mut rows = Vec::new();
    for (code, values) in AQI_BY_CODE.iter().enumerate() {
        for aqi in values {
            let mut row = defaults.values().to_vec();
            row[AQI_POSITION] = *aqi;
            rows.push((row, code as i32));
        }
    }
    rows
}

pub fn trained_artifact() -> ModelArtifact {
    let rows = labelled_rows();
    let features: Vec<Vec<f64>> = rows.iter().map(|r| r.0.clone()).collect();
    let x = DenseMatrix::from_2d_vec(&features);
    let y: Vec<i32> = rows.iter().map(|r| r.1).collect();
    let tree = Tree::fit(&x, &y, DecisionTreeClassifierParameters::default()).unwrap();
    let names = FeatureSchema::aqi().names().map(String::from).collect();
    ModelArtifact::new(names, Estimator::DecisionTree(tree))
}

pub fn importances(len: usize) -> Vec<f64> {
    let mut scores = vec![0.0; len];
    if len > AQI_POSITION {
        scores[AQI_POSITION] = 0.8;
        scores[0] = 0.2;
    }
    scores
}

pub fn write_fixture_model(dir: &Path, artifact: &ModelArtifact) -> PathBuf {
    let path = dir.join("aqi_model.json.gz");
    write_model(&path, artifact).unwrap();
    path
}

pub fn write_city_day_csv(dir: &Path, with_bucket: bool) -> PathBuf {
    let path = dir.join("city_day.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    let mut header = vec!["City", "Date", "PM2.5", "PM10", "AQI", "Month", "Wind Speed (km/h)"];
    if with_bucket {
        header.push("AQI_Bucket");
    }
    writer.write_record(&header).unwrap();

    let rows = [
        ("Delhi", "2020-01-01", "180.5", "260", "380", "1", "2.1", "Very Poor"),
        ("Delhi", "2020-01-02", "150.0", "230", "330", "1", "3.4", "Very Poor"),
        ("Delhi", "2020-02-01", "95.2", "170", "210", "2", "5.0", "Poor"),
        ("Chennai", "2020-01-01", "35.0", "70", "85", "1", "12.0", "Satisfactory"),
        ("Chennai", "2020-01-02", "", "60", "70", "1", "14.5", "Satisfactory"),
        ("Chennai", "2020-02-01", "20.0", "45", "45", "2", "16.0", "Good"),
        ("Mumbai", "2020-01-01", "60.0", "110", "140", "1", "9.0", "Moderate"),
        ("Mumbai", "2020-01-02", "70.0", "120", "160", "1", "8.2", "Moderate"),
        ("Mumbai", "not a date", "55.0", "100", "120", "2", "10.1", "Moderate"),
        ("Lucknow", "2020-01-03", "250.0", "320", "460", "1", "1.5", "Severe"),
    ];
    for row in rows.iter() {
        let mut record = vec![row.0, row.1, row.2, row.3, row.4, row.5, row.6];
        if with_bucket {
            record.push(row.7);
        }
        writer.write_record(&record).unwrap();
    }
    writer.flush().unwrap();
    path
}

pub fn fixture_config(dir: &Path, artifact: &ModelArtifact, with_bucket: bool) -> DashboardConfig {
    DashboardConfig {
        model_path: write_fixture_model(dir, artifact),
        dataset_path: write_city_day_csv(dir, with_bucket),
    }
}

pub fn fixture_context(dir: &Path, with_bucket: bool) -> AppContext {
    let artifact = trained_artifact().with_importances(importances(FeatureSchema::aqi().len()));
    AppContext::load(&fixture_config(dir, &artifact, with_bucket)).unwrap()
}
