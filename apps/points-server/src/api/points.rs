//! Member-facing JSON endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use base64::{Engine, engine::general_purpose::STANDARD};
use entities::UserRecord;
use record_store::RecordStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ServerError, ServerResult};
use crate::services::{
    lookup::{self, IdLookup},
    registration::{self, RegistrationInput, RegistrationOutcome},
};
use crate::state::AppState;

/// Request body for `/api/points/get`. `id` takes precedence over `email`.
#[derive(Debug, Deserialize)]
pub struct GetPointsRequest {
    /// Identifier, as a number or a numeric string.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GetPointsResponse {
    pub user: UserRecord,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub program: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserRecord,
    pub lookup_url: String,
    /// PNG bytes of the QR code, base64 encoded.
    pub qr_png_base64: String,
}

fn raw_id(id: &Value) -> ServerResult<String> {
    match id {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        _ => Err(ServerError::InvalidRequest("Invalid id".to_string())),
    }
}

/// Gets a member's point balance by id or email.
pub async fn get_points<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<GetPointsRequest>,
) -> ServerResult<Json<GetPointsResponse>> {
    let users = state.store.list_users().await?;

    let user = match (&request.id, request.email.as_deref()) {
        (Some(id), _) => match lookup::lookup_by_id(&users, &raw_id(id)?) {
            IdLookup::Found(user) => Some(user),
            IdLookup::NotFound => None,
            IdLookup::Invalid => {
                return Err(ServerError::InvalidRequest("Invalid id".to_string()));
            }
        },
        (None, Some(email)) => lookup::lookup_by_email(&users, email).cloned(),
        (None, None) => {
            return Err(ServerError::InvalidRequest(
                "Either id or email is required".to_string(),
            ));
        }
    };

    let user = user.ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(GetPointsResponse { user }))
}

/// Registers a new member.
pub async fn register<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<RegisterRequest>,
) -> ServerResult<Json<RegisterResponse>> {
    let input = RegistrationInput {
        name: request.name,
        email: request.email,
        program: request.program,
    };
    let now = chrono::Local::now().naive_local();

    match registration::register(&state, input, now).await? {
        RegistrationOutcome::Registered {
            user,
            lookup_url,
            qr_png,
        } => Ok(Json(RegisterResponse {
            user,
            lookup_url,
            qr_png_base64: STANDARD.encode(qr_png),
        })),
        RegistrationOutcome::MissingFields => Err(ServerError::InvalidRequest(
            "Name and email are required".to_string(),
        )),
        RegistrationOutcome::UnknownProgram(program) => Err(ServerError::InvalidRequest(
            format!("Unknown program: {program}"),
        )),
        RegistrationOutcome::DuplicateEmail => Err(ServerError::Conflict(
            "Email already registered".to_string(),
        )),
    }
}
