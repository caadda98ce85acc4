//! Web surface: sidebar form, dashboard page, health check

use crate::error::{DashboardError, Result};
use crate::market::DateRange;
use crate::pipeline::{Dashboard, DashboardRequest};
use crate::presentation::{DashboardView, FormDefaults, HtmlRenderer};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub renderer: Arc<HtmlRenderer>,
}

impl AppState {
    pub fn new(dashboard: Dashboard, renderer: HtmlRenderer) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            renderer: Arc::new(renderer),
        }
    }
}

/// Query string of `/analyze`; missing fields fall back to the form defaults
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    pub symbol: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl AnalyzeQuery {
    fn into_request(self) -> DashboardRequest {
        let defaults = FormDefaults::for_today();
        DashboardRequest::new(
            self.symbol.unwrap_or(defaults.symbol),
            DateRange::new(
                self.start.unwrap_or(defaults.start),
                self.end.unwrap_or(defaults.end),
            ),
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", get(analyze))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn index(State(state): State<AppState>) -> Response {
    let form = FormDefaults::for_today();
    match state.renderer.render_index(&form) {
        Ok(page) => Html(page).into_response(),
        Err(e) => error_page(&state, &e, &form),
    }
}

async fn analyze(State(state): State<AppState>, Query(query): Query<AnalyzeQuery>) -> Response {
    let request = query.into_request();
    let form = FormDefaults::from_request(&request);

    let page = match state.dashboard.run(&request).await {
        Ok(report) => state
            .renderer
            .render_dashboard(&DashboardView::from_report(&report), &form),
        Err(e) => Err(e),
    };

    match page {
        Ok(page) => Html(page).into_response(),
        Err(e) => error_page(&state, &e, &form),
    }
}

fn status_for(err: &DashboardError) -> StatusCode {
    if matches!(err, DashboardError::InvalidRequest(_)) {
        StatusCode::BAD_REQUEST
    } else if err.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_page(state: &AppState, err: &DashboardError, form: &FormDefaults) -> Response {
    error!("Dashboard request failed: {}", err);
    let status = status_for(err);
    let heading = status
        .canonical_reason()
        .unwrap_or("Error")
        .to_string();

    match state.renderer.render_error(&heading, &err.to_string(), form) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(render_err) => {
            error!("Error page failed to render: {}", render_err);
            (status, err.to_string()).into_response()
        }
    }
}
