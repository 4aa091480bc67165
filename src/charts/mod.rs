//! Chart sections of the dashboard.
//!
//! Every section is computed independently from the dataset (or the model)
//! and ends up either as a [`Figure`] ready to be drawn or as a warning
//! shown in its place. Nothing computed here touches a drawing backend.

use log::warn;
use polars::export::chrono::NaiveDate;

use crate::error::Result;
use crate::stats::BoxStats;

pub mod importance;
pub mod sections;

pub use importance::importance_section;
pub use sections::{build_section, ChartKind};

#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FigureKind {
    Heatmap {
        labels: Vec<String>,
        matrix: Vec<Vec<Option<f64>>>,
    },
    Scatter {
        x_label: String,
        y_label: String,
        groups: Vec<PointGroup>,
    },
    Pie {
        slices: Vec<(String, usize)>,
    },
    Line {
        x_label: String,
        y_label: String,
        points: Vec<(NaiveDate, f64)>,
    },
    /// Bars listed top to bottom.
    HorizontalBar {
        value_label: String,
        bars: Vec<(String, f64)>,
    },
    Box {
        x_label: String,
        y_label: String,
        groups: Vec<(String, BoxStats)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub caption: Option<String>,
    pub kind: FigureKind,
}

impl Figure {
    pub fn new(kind: FigureKind) -> Self {
        Figure {
            caption: None,
            kind,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionOutcome {
    Figure(Figure),
    Warning(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub outcome: SectionOutcome,
}

impl Section {
    pub fn figure(title: impl Into<String>, figure: Figure) -> Self {
        Section {
            title: title.into(),
            outcome: SectionOutcome::Figure(figure),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        let title = title.into();
        let message = message.into();
        warn!("{}: {}", title, message);
        Section {
            title,
            outcome: SectionOutcome::Warning(message),
        }
    }

    /// A failed computation becomes a warning built by `describe`.
    pub fn from_result<F>(title: impl Into<String>, result: Result<Figure>, describe: F) -> Self
    where
        F: FnOnce(String) -> String,
    {
        match result {
            Ok(figure) => Section::figure(title, figure),
            Err(e) => Section::warning(title, describe(e.to_string())),
        }
    }

    pub fn warning_message(&self) -> Option<&str> {
        match &self.outcome {
            SectionOutcome::Warning(message) => Some(message),
            SectionOutcome::Figure(_) => None,
        }
    }

    pub fn as_figure(&self) -> Option<&Figure> {
        match &self.outcome {
            SectionOutcome::Figure(figure) => Some(figure),
            SectionOutcome::Warning(_) => None,
        }
    }
}
