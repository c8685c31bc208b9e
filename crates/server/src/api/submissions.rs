//! Public ticket submission endpoint.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use supportdesk_core::{AttachmentError, IntakeError, TicketSubmission, UploadedFile};
use tracing::{error, warn};

use super::handlers::{error_response, ErrorResponse};
use super::middleware::RequestClient;
use crate::state::AppState;

/// Multipart field carrying the optional file.
pub const ATTACHMENT_FIELD: &str = "attachment";

/// Submit a support ticket (`multipart/form-data`)
pub async fn submit_ticket(
    State(state): State<Arc<AppState>>,
    RequestClient(client): RequestClient,
    multipart: Multipart,
) -> Response {
    let (submission, attachment) = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!("Rejected malformed submission: {}", e);
            return error_response(e.status(), e.body_text());
        }
    };

    match state
        .intake()
        .submit(&submission, attachment.as_ref(), &client)
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(IntakeError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Please correct the highlighted fields.".to_string(),
                details: errors.0,
            }),
        )
            .into_response(),
        Err(IntakeError::Attachment(e)) => attachment_error(e),
        Err(IntakeError::Store(e)) => {
            error!("Failed to store ticket: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save your request. Please try again.",
            )
        }
    }
}

fn attachment_error(e: AttachmentError) -> Response {
    match e {
        AttachmentError::TooLarge { .. } => {
            error_response(StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
        }
        AttachmentError::Empty | AttachmentError::UnsupportedType { .. } => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        other => {
            error!("Failed to save attachment: {}", other);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save the attachment. Please try again.",
            )
        }
    }
}

/// Collect the form fields. Unknown fields are ignored; a file part with no
/// name and no content counts as no attachment.
async fn read_form(
    mut multipart: Multipart,
) -> Result<(TicketSubmission, Option<UploadedFile>), MultipartError> {
    let mut submission = TicketSubmission::default();
    let mut attachment = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == ATTACHMENT_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            if !(file_name.is_empty() && bytes.is_empty()) {
                attachment = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "full_name" => submission.full_name = value,
            "email" => submission.email = value,
            "category" => submission.category = value,
            "priority" => submission.priority = value,
            "order_ref" => submission.order_ref = value,
            "subject" => submission.subject = value,
            "message" => submission.message = value,
            "consent" => submission.consent = is_checked(&value),
            _ => {}
        }
    }

    Ok((submission, attachment))
}

/// Checkbox semantics: browsers send `on`, API clients tend to send `true`.
fn is_checked(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}
