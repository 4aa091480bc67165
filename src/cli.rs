use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use crate::context::{AppContext, DashboardConfig, DEFAULT_MODEL_PATH};
use crate::error::{DashboardError, Result};
use crate::model::{load_model, Classifier};
use crate::page::{compose_page, render_html, PageRequest};
use crate::prediction::predict;
use crate::schema::{parse_override, FeatureSchema};
use crate::server::{serve, AppState};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct DashboardArgs {
    #[clap(short, long, parse(from_occurrences), global = true, help = "Verbose level")]
    pub verbose: usize,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ModelArgs {
    #[clap(long, env = "AQI_MODEL", parse(from_os_str), default_value = DEFAULT_MODEL_PATH,
    help = "Gzip-compressed model artifact")]
    pub model: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    #[clap(flatten)]
    pub model: ModelArgs,
    #[clap(long, env = "AQI_DATASET", parse(from_os_str), help = "City-day CSV dataset")]
    pub dataset: PathBuf,
}

impl SourceArgs {
    pub fn config(&self) -> DashboardConfig {
        DashboardConfig {
            model_path: self.model.model.clone(),
            dataset_path: self.dataset.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the dashboard page to an HTML file
    Report {
        #[clap(flatten)]
        sources: SourceArgs,
        #[clap(short, long, parse(from_os_str), default_value = "dashboard.html",
        help = "Output path")]
        out: PathBuf,
        #[clap(long, help = "Include summary statistics")]
        stats: bool,
        #[clap(long, help = "Run a prediction with the form values")]
        predict: bool,
        #[clap(long = "set", value_name = "NAME=VALUE", parse(try_from_str = parse_override),
        help = "Override a feature default")]
        overrides: Vec<(String, String)>,
    },
    /// Predict the AQI bucket for the default feature values
    Predict {
        #[clap(flatten)]
        model: ModelArgs,
        #[clap(long = "set", value_name = "NAME=VALUE", parse(try_from_str = parse_override),
        help = "Override a feature default")]
        overrides: Vec<(String, String)>,
    },
    /// List model features and their defaults
    Features,
    /// Serve the dashboard over HTTP
    Serve {
        #[clap(flatten)]
        sources: SourceArgs,
        #[clap(long, default_value = "127.0.0.1:8501")]
        addr: SocketAddr,
        #[clap(long, help = "Reload model and dataset on every request")]
        reload: bool,
    },
}

fn override_pairs(overrides: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> {
    overrides.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

pub async fn run(args: DashboardArgs) -> Result<()> {
    match args.command {
        Command::Report {
            sources,
            out,
            stats,
            predict,
            overrides,
        } => {
            let ctx = AppContext::load(&sources.config())?;
            // reject unknown names before they are silently ignored by the form
            ctx.schema.vector_from_pairs(override_pairs(&overrides))?;
            let request = PageRequest {
                show_stats: stats,
                submit: predict,
                values: overrides.into_iter().collect::<HashMap<_, _>>(),
            };
            let page = compose_page(&ctx, &request);
            fs::write(&out, render_html(&page)).map_err(|e| DashboardError::io(&out, e))?;
            info!("dashboard written to {:?}", out);
        }
        Command::Predict { model, overrides } => {
            let model = load_model(&model.model)?;
            let schema = FeatureSchema::aqi();
            schema.validate(model.feature_names())?;
            let input = schema.vector_from_pairs(override_pairs(&overrides))?;
            println!("{}", predict(&model, &input)?);
        }
        Command::Features => {
            for (i, feature) in FeatureSchema::aqi().features().iter().enumerate() {
                println!("{:>2}  {:<22} {}", i, feature.name, feature.default);
            }
        }
        Command::Serve {
            sources,
            addr,
            reload,
        } => {
            let config = sources.config();
            let ctx = AppContext::load(&config)?;
            let state = if reload {
                AppState::reloading(ctx, config)
            } else {
                AppState::new(ctx)
            };
            serve(addr, state).await?;
        }
    }
    Ok(())
}
