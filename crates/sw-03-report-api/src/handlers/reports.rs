//! Report lifecycle handlers.

use crate::domain::error::{ApiError, ApiResult};
use crate::domain::types::{
    CreateReportRequest, Envelope, ListQuery, Pagination, ReportList, ReportStats, ReportSummary,
    UpdateReportRequest, VoteDirection, VoteRequest,
};
use crate::ports::outbound::StoreError;
use crate::router::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use shared_types::{authorship_message, report_content_hash, Report, ReportId};
use tracing::{error, info, warn};

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::payload_too_large())
        }
        Err(rejection) => Err(ApiError::bad_request(format!(
            "Invalid JSON body: {}",
            rejection.body_text()
        ))),
    }
}

fn parse_id(raw: &str) -> ApiResult<ReportId> {
    raw.trim().parse().map_err(|_| ApiError::invalid_id())
}

fn store_failure(err: StoreError) -> ApiError {
    error!(error = %err, "report store failure");
    err.into()
}

/// `GET /api/reports`
pub async fn list_reports(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Envelope<ReportList>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let filter = query.filter()?;
    let page = query.page_request(&state.config.limits);

    let result = state
        .store
        .list(&filter, page)
        .await
        .map_err(store_failure)?;

    Ok(Json(Envelope::ok(ReportList {
        reports: result.reports.into_iter().map(ReportSummary::from).collect(),
        pagination: Pagination::new(page, result.total),
    })))
}

/// `POST /api/reports`
///
/// Verifies the optional authorship signature before storing.
pub async fn create_report(
    State(state): State<AppState>,
    body: Result<Json<CreateReportRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let (mut new_report, signature) = json_body(body)?.validate()?;

    let message = authorship_message(
        new_report.report_type,
        &new_report.target_value,
        &new_report.description,
        &new_report.reporter_address,
    );
    let reporter = new_report.reporter_address;

    let signed = match signature {
        Some(signature) => {
            if !state
                .verifier
                .verify_signature(&message, &signature, &reporter.to_string())
            {
                state.metrics.record_signature_rejection();
                warn!(%reporter, "report signature does not match reporter");
                return Err(ApiError::unauthorized(
                    "Signature does not match reporterAddress",
                ));
            }
            true
        }
        None if state.config.security.require_signed_reports => {
            state.metrics.record_signature_rejection();
            warn!(%reporter, "unsigned report refused");
            return Err(ApiError::unauthorized(
                "A wallet signature is required to submit reports",
            ));
        }
        None => {
            warn!(%reporter, "accepting unsigned report");
            false
        }
    };

    if new_report.report_hash.is_none() {
        let hash = report_content_hash(
            new_report.report_type,
            &new_report.target_value,
            &new_report.description,
            &reporter,
        );
        new_report.report_hash = Some(format!("0x{}", hex::encode(hash)));
    }

    let report = state
        .store
        .insert(new_report)
        .await
        .map_err(store_failure)?;

    state.metrics.record_report_created(signed);
    info!(id = report.id, report_type = %report.report_type, signed, "report created");

    Ok((StatusCode::CREATED, Json(Envelope::ok(report))))
}

/// `GET /api/reports/:id`
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Report>> {
    let id = parse_id(&id)?;
    state
        .store
        .get(id)
        .await
        .map_err(store_failure)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Report"))
}

/// `PATCH /api/reports/:id`
pub async fn update_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateReportRequest>, JsonRejection>,
) -> ApiResult<Json<Report>> {
    let id = parse_id(&id)?;
    let patch = json_body(body)?.into_patch()?;

    let report = state
        .store
        .update(id, patch)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiError::not_found("Report"))?;

    info!(id, status = %report.status, "report updated");
    Ok(Json(report))
}

/// `DELETE /api/reports/:id`
pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    if !state.store.delete(id).await.map_err(store_failure)? {
        return Err(ApiError::not_found("Report"));
    }

    info!(id, "report deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Report deleted successfully",
    })))
}

/// `POST /api/reports/:id/vote`
pub async fn vote_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<Report>>> {
    let id = parse_id(&id)?;
    let (voter, direction) = json_body(body)?.validate()?;

    let report = state
        .store
        .vote(id, direction == VoteDirection::Up)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiError::not_found("Report"))?;

    state.metrics.record_vote();
    info!(id, %voter, ?direction, score = report.vote_score, "vote recorded");
    Ok(Json(Envelope::ok(report)))
}

/// `GET /api/reports/stats`
pub async fn report_stats(State(state): State<AppState>) -> ApiResult<Json<Envelope<ReportStats>>> {
    let reports = state.store.all().await.map_err(|e| {
        error!(error = %e, "stats query failed");
        ApiError::internal("Failed to fetch statistics")
    })?;
    Ok(Json(Envelope::ok(ReportStats::from_reports(&reports))))
}
