use std::fmt;

use serde::Serialize;

/// AQI bucket as encoded by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AqiCategory {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    VeryPoor,
    Severe,
}

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Satisfactory,
        AqiCategory::Moderate,
        AqiCategory::Poor,
        AqiCategory::VeryPoor,
        AqiCategory::Severe,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(AqiCategory::Good),
            1 => Some(AqiCategory::Satisfactory),
            2 => Some(AqiCategory::Moderate),
            3 => Some(AqiCategory::Poor),
            4 => Some(AqiCategory::VeryPoor),
            5 => Some(AqiCategory::Severe),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Satisfactory => "Satisfactory",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::Poor => "Poor",
            AqiCategory::VeryPoor => "Very Poor",
            AqiCategory::Severe => "Severe",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn label_for_code(code: i32) -> &'static str {
    AqiCategory::from_code(code)
        .map(AqiCategory::label)
        .unwrap_or("Unknown")
}
