//! HTTP surface for the dashboard.
//!
//! Every `GET /` composes a new page from the query string, so a checkbox
//! toggle or a prediction submission simply re-runs the whole page.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};
use serde::Serialize;

use crate::context::{AppContext, DashboardConfig};
use crate::error::{DashboardError, Result};
use crate::page::{compose_page, render_html, PageRequest};

#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
    /// Reload model and dataset from disk for every request.
    reload: Option<DashboardConfig>,
}

impl AppState {
    pub fn new(context: AppContext) -> Self {
        AppState {
            context: Arc::new(context),
            reload: None,
        }
    }

    pub fn reloading(context: AppContext, config: DashboardConfig) -> Self {
        AppState {
            context: Arc::new(context),
            reload: Some(config),
        }
    }

    async fn context(&self) -> Result<Arc<AppContext>> {
        match &self.reload {
            None => Ok(self.context.clone()),
            Some(config) => {
                let config = config.clone();
                let context = tokio::task::spawn_blocking(move || AppContext::load(&config))
                    .await
                    .map_err(|e| DashboardError::Task(e.to_string()))??;
                Ok(Arc::new(context))
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub features: usize,
    pub rows: usize,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

fn internal_error(e: DashboardError) -> Response {
    error!("request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    match render_page(&state, query).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Composes and draws the page on the blocking pool.
async fn render_page(state: &AppState, query: HashMap<String, String>) -> Result<String> {
    let context = state.context().await?;
    let request = PageRequest::from_query(query);
    tokio::task::spawn_blocking(move || render_html(&compose_page(&context, &request)))
        .await
        .map_err(|e| DashboardError::Task(e.to_string()))
}

/// Reads the same context as `GET /`, reloaded per request when reloading.
async fn health_handler(State(state): State<AppState>) -> Response {
    match state.context().await {
        Ok(context) => Json(HealthResponse {
            status: "healthy".to_string(),
            features: context.schema.len(),
            rows: context.dataset.height(),
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| DashboardError::Bind { addr, source })?;
    info!("dashboard listening on http://{}", addr);
    axum::serve(listener, app)
        .await
        .map_err(|source| DashboardError::Bind { addr, source })?;
    Ok(())
}
