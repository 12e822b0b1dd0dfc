//! HTTP endpoints.

pub mod admin;
pub mod page;
pub mod points;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use record_store::RecordStore;

use crate::state::AppState;

/// Creates the router with all endpoints.
pub fn create_router<S: RecordStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Page and its forms
        .route("/", get(page::home))
        .route("/register", post(page::register))
        .route("/lookup", post(page::lookup))
        .route("/admin", post(page::admin_login))
        .route("/admin/assign", post(page::assign_points))
        // Downloads
        .route("/admin/export/users.csv", get(admin::export_users))
        .route("/admin/export/registrations.csv", get(admin::export_registrations))
        // JSON API
        .route("/api/points/get", post(points::get_points))
        .route("/api/register", post(points::register))
        .route("/api/admin/assign-points", post(admin::assign_points))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
