//! REST API handlers for the shipment delay dashboard
//!
//! These handlers use the shared DashboardService.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::service::DashboardService;
use crate::pipeline::DashboardView;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct DateRangeResponse {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub record_count: usize,
}

#[derive(Serialize)]
pub struct InvalidateResponse {
    pub invalidated: bool,
    pub source: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Date-picker values, `YYYY-MM-DD`
#[derive(Deserialize, Default)]
pub struct WindowQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d").map(Some).map_err(|_| {
            error(
                StatusCode::BAD_REQUEST,
                format!("Invalid {} date '{}', expected YYYY-MM-DD", name, v),
            )
        }),
    }
}

impl WindowQuery {
    fn bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
        Ok((
            parse_date("start", self.start.as_deref())?,
            parse_date("end", self.end.as_deref())?,
        ))
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<DashboardService>;

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/v1/date-range
pub async fn get_date_range(
    State(service): State<AppState>,
) -> Result<Json<DateRangeResponse>, ApiError> {
    match service.date_range().await {
        Ok(range) => Ok(Json(DateRangeResponse {
            start: range.start,
            end: range.end,
            record_count: range.record_count,
        })),
        Err(e) => Err(error(StatusCode::SERVICE_UNAVAILABLE, e.to_string())),
    }
}

/// GET /api/v1/dashboard?start=&end=
pub async fn get_dashboard(
    State(service): State<AppState>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let (start, end) = params.bounds()?;
    match service.dashboard(start, end).await {
        DashboardView::Unavailable { message } => Err(error(StatusCode::SERVICE_UNAVAILABLE, message)),
        view => Ok(Json(view)),
    }
}

/// GET /api/v1/summary?start=&end=
pub async fn get_summary(
    State(service): State<AppState>,
    Query(params): Query<WindowQuery>,
) -> Result<Response, ApiError> {
    let (start, end) = params.bounds()?;
    let body = match service.dashboard(start, end).await {
        DashboardView::Unavailable { message } => {
            return Err(error(StatusCode::SERVICE_UNAVAILABLE, message))
        }
        DashboardView::NoData { warning, .. } => format!("> **Warning:** {}\n", warning),
        DashboardView::Ready(report) => {
            let mut body = format!("# {}\n\n### {}\n\n", report.title, report.header);
            for notice in &report.notices {
                body.push_str(&format!("> {}\n\n", notice));
            }
            body.push_str(&report.markdown);
            body
        }
    };
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        body,
    )
        .into_response())
}

/// POST /api/v1/cache/invalidate
pub async fn invalidate_cache(State(service): State<AppState>) -> Json<InvalidateResponse> {
    let invalidated = service.invalidate().await;
    Json(InvalidateResponse {
        invalidated,
        source: service.source().to_string(),
    })
}
