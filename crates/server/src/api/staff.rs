//! Staff portal handlers: browse, export and attachment download.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use supportdesk_core::query::{
    attachment_names, category_options, compute_date_bounds, export_csv, filter_records,
    priority_options, DateBounds, FilterCriteria, EXPORT_FILE_NAME,
};
use supportdesk_core::{AttachmentError, Identity, TicketRecord};
use tracing::{error, info};

use super::handlers::error_response;
use super::middleware::StaffIdentity;
use crate::state::AppState;

const FILE_NOT_FOUND: &str = "File not found on server.";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the ticket table and its export
#[derive(Debug, Default, Deserialize)]
pub struct StaffQueryParams {
    /// First date to include, `YYYY-MM-DD`
    pub from: Option<String>,
    /// Last date to include, `YYYY-MM-DD`
    pub to: Option<String>,
    /// Category or `All`
    pub category: Option<String>,
    /// Priority or `All`
    pub priority: Option<String>,
    /// Free-text search term
    pub search: Option<String>,
}

impl StaffQueryParams {
    fn criteria(&self) -> Result<FilterCriteria, String> {
        let mut criteria = FilterCriteria::new()
            .with_category(self.category.as_deref().unwrap_or_default())
            .with_priority(self.priority.as_deref().unwrap_or_default())
            .with_search(self.search.clone().unwrap_or_default());

        if let Some(from) = parse_date("from", self.from.as_deref())? {
            criteria = criteria.with_from(from);
        }
        if let Some(to) = parse_date("to", self.to.as_deref())? {
            criteria = criteria.with_to(to);
        }
        Ok(criteria)
    }
}

fn parse_date(param: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid '{}' date: {} (expected YYYY-MM-DD)", param, value)),
    }
}

/// Response for the ticket table
#[derive(Debug, Serialize)]
pub struct StaffTicketsResponse {
    /// Filtered view, newest first
    pub tickets: Vec<TicketRecord>,
    /// Number of records in the view
    pub total: usize,
    /// Number of records in the store
    pub stored: usize,
    /// Date range of the whole store, for seeding the date pickers
    pub date_bounds: DateBounds,
    pub categories: Vec<String>,
    pub priorities: Vec<String>,
    /// Attachments referenced by the view
    pub attachments: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Return the identity the request was authenticated as
pub async fn session(StaffIdentity(identity): StaffIdentity) -> Json<Identity> {
    Json(identity)
}

/// List tickets matching the query
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StaffQueryParams>,
) -> Response {
    let criteria = match params.criteria() {
        Ok(criteria) => criteria,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    let snapshot = match read_snapshot(&state) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let view = filter_records(&snapshot, &criteria);
    let response = StaffTicketsResponse {
        total: view.len(),
        stored: snapshot.len(),
        date_bounds: compute_date_bounds(&snapshot, Local::now().date_naive()),
        categories: category_options(&snapshot),
        priorities: priority_options(&snapshot),
        attachments: attachment_names(&view),
        tickets: view,
    };

    Json(response).into_response()
}

/// Download the filtered view as CSV
pub async fn export_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StaffQueryParams>,
) -> Response {
    let criteria = match params.criteria() {
        Ok(criteria) => criteria,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    let snapshot = match read_snapshot(&state) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let view = filter_records(&snapshot, &criteria);
    match export_csv(&view) {
        Ok(bytes) => {
            info!(rows = view.len(), "Exported ticket view");
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to export tickets: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export tickets")
        }
    }
}

/// Download an attachment referenced by a stored ticket
pub async fn download_attachment(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let snapshot = match read_snapshot(&state) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    if !snapshot.iter().any(|record| record.attachment_file == name) {
        return error_response(StatusCode::NOT_FOUND, FILE_NOT_FOUND);
    }

    match state.attachments().open(&name).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(AttachmentError::NotFound(_)) | Err(AttachmentError::InvalidName(_)) => {
            error_response(StatusCode::NOT_FOUND, FILE_NOT_FOUND)
        }
        Err(e) => {
            error!("Failed to read attachment {}: {}", name, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read attachment",
            )
        }
    }
}

fn read_snapshot(state: &AppState) -> Result<Vec<TicketRecord>, Response> {
    state.ticket_store().read_all().map_err(|e| {
        error!("Failed to read ticket store: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read ticket store",
        )
    })
}
