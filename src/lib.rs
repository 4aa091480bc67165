//! City-day air quality dashboard: dataset overview, descriptive charts and
//! AQI bucket prediction from a pre-trained smartcore classifier.

extern crate serde;

pub mod category;
pub mod charts;
pub mod cli;
pub mod context;
pub mod dataset;
pub mod error;
pub mod model;
pub mod overview;
pub mod page;
pub mod prediction;
pub mod records;
pub mod render;
pub mod schema;
pub mod server;
pub mod stats;

pub use context::{AppContext, DashboardConfig};
pub use error::{DashboardError, Result};
