use super::AppState;
use crate::domain::jobs::{CreateJobRequest, QualityModel, WorkerSnapshot};
use crate::domain::report::{format_report, ReportFormat};
use crate::error::{AutoabrError, AutoabrResult};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

#[derive(Serialize)]
pub struct ClearedResponse {
    pub status: &'static str,
}

/// Body is parsed leniently so that a missing `job` maps to our own 400.
pub async fn create_job(
    State(state): State<AppState>,
    body: Option<Json<CreateJobRequest>>,
) -> AutoabrResult<Json<WorkerSnapshot>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let snapshot = state.service.create_job(request).await?;
    Ok(Json(snapshot))
}

pub async fn list_workers(State(state): State<AppState>) -> Json<BTreeMap<usize, WorkerSnapshot>> {
    Json(state.service.workers())
}

pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AutoabrResult<Json<WorkerSnapshot>> {
    Ok(Json(state.service.worker(&id)?))
}

pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearedResponse> {
    state.service.clear_cache();
    Json(ClearedResponse { status: "cleared" })
}

#[derive(Debug, Default, Deserialize)]
pub struct ResultQuery {
    pub format: Option<String>,
    pub worker: Option<String>,
}

pub async fn job_result(
    State(state): State<AppState>,
    Path(output): Path<String>,
    Query(query): Query<ResultQuery>,
) -> AutoabrResult<Response> {
    respond_with_result(&state, &output, None, query).await
}

pub async fn job_result_for_model(
    State(state): State<AppState>,
    Path((output, model)): Path<(String, String)>,
    Query(query): Query<ResultQuery>,
) -> AutoabrResult<Response> {
    respond_with_result(&state, &output, Some(&model), query).await
}

async fn respond_with_result(
    state: &AppState,
    output: &str,
    model: Option<&str>,
    query: ResultQuery,
) -> AutoabrResult<Response> {
    let quality_model = model
        .map(str::parse::<QualityModel>)
        .transpose()
        .map_err(AutoabrError::Validation)?;
    let format = query
        .format
        .as_deref()
        .map(str::parse::<ReportFormat>)
        .transpose()
        .map_err(AutoabrError::Validation)?;

    let result = state
        .service
        .job_result(output, quality_model, query.worker.as_deref())
        .await?;

    match format {
        Some(format) => {
            let text = format_report(&result, output, model, format.delimiter())?;
            Ok(([(header::CONTENT_TYPE, format.content_type())], text).into_response())
        }
        None => Ok(Json(result).into_response()),
    }
}
