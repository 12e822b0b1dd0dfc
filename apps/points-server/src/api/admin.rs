//! Admin endpoints: JSON point assignment and CSV exports.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ServerError, ServerResult};
use crate::services::admin::{self, AssignOutcome};
use crate::state::AppState;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const USERS_DISPOSITION: &str = "attachment; filename=\"users.csv\"";
const REGISTRATIONS_DISPOSITION: &str = "attachment; filename=\"registrations.csv\"";

#[derive(Debug, Deserialize)]
pub struct AssignPointsRequest {
    #[serde(default)]
    pub admin_email: String,
    pub email: String,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct AssignPointsResponse {
    pub email: String,
    pub amount: u64,
    pub points: u64,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub admin_email: String,
}

fn require_admin(config: &Config, email: &str) -> ServerResult<()> {
    if config.is_admin(email) {
        Ok(())
    } else {
        tracing::warn!("Admin request denied");
        Err(ServerError::PermissionDenied(
            "This panel is private".to_string(),
        ))
    }
}

fn csv_download(disposition: &'static str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// Adds points to a member.
pub async fn assign_points<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<AssignPointsRequest>,
) -> ServerResult<Json<AssignPointsResponse>> {
    require_admin(&state.config, &request.admin_email)?;

    let amount = u64::try_from(request.amount)
        .ok()
        .filter(|amount| *amount >= 1)
        .ok_or_else(|| ServerError::InvalidRequest("amount must be at least 1".to_string()))?;

    match admin::assign_points(&state, &request.email, amount).await? {
        AssignOutcome::Assigned {
            email,
            amount,
            balance,
        } => Ok(Json(AssignPointsResponse {
            email,
            amount,
            points: balance,
        })),
        AssignOutcome::NotFound => Err(ServerError::NotFound("Email not found".to_string())),
        AssignOutcome::InvalidAmount => Err(ServerError::InvalidRequest(
            "amount must be at least 1".to_string(),
        )),
    }
}

/// Downloads the ledger as CSV.
pub async fn export_users<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ExportQuery>,
) -> ServerResult<Response> {
    require_admin(&state.config, &query.admin_email)?;

    let body = state.store.export_users().await?;
    tracing::info!(bytes = body.len(), "Ledger exported");

    Ok(csv_download(USERS_DISPOSITION, body))
}

/// Downloads the registration log as CSV.
pub async fn export_registrations<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ExportQuery>,
) -> ServerResult<Response> {
    require_admin(&state.config, &query.admin_email)?;

    let body = state.store.export_registrations().await?;
    tracing::info!(bytes = body.len(), "Registration log exported");

    Ok(csv_download(REGISTRATIONS_DISPOSITION, body))
}
