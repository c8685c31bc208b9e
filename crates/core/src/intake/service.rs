//! The submit flow: validate, store the attachment, append the record.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use thiserror::Error;
use tracing::{info, warn};

use super::{ClientInfo, TicketSubmission, ValidationErrors};
use crate::attachment::{AttachmentError, AttachmentStore, UploadedFile};
use crate::metrics::SUBMISSIONS_REJECTED;
use crate::ticket::{TicketError, TicketRecord, TicketStore};

/// Why a submission did not produce a record.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("attachment rejected: {0}")]
    Attachment(#[from] AttachmentError),

    #[error("failed to store ticket: {0}")]
    Store(#[from] TicketError),
}

impl IntakeError {
    /// Label used for the rejection metric.
    pub fn reason(&self) -> &'static str {
        match self {
            IntakeError::Validation(_) => "validation",
            IntakeError::Attachment(_) => "attachment",
            IntakeError::Store(_) => "store",
        }
    }
}

/// Accepts submissions into the ticket store.
pub struct TicketIntake {
    store: Arc<dyn TicketStore>,
    attachments: Arc<AttachmentStore>,
}

impl TicketIntake {
    pub fn new(store: Arc<dyn TicketStore>, attachments: Arc<AttachmentStore>) -> Self {
        Self { store, attachments }
    }

    /// Validate and persist one submission.
    ///
    /// Nothing is written when validation or the attachment checks fail. If
    /// the append fails after the attachment was saved, the attachment is
    /// removed again.
    pub async fn submit(
        &self,
        submission: &TicketSubmission,
        attachment: Option<&UploadedFile>,
        client: &ClientInfo,
    ) -> Result<TicketRecord, IntakeError> {
        let result = self.try_submit(submission, attachment, client).await;
        if let Err(e) = &result {
            SUBMISSIONS_REJECTED.with_label_values(&[e.reason()]).inc();
        }
        result
    }

    async fn try_submit(
        &self,
        submission: &TicketSubmission,
        attachment: Option<&UploadedFile>,
        client: &ClientInfo,
    ) -> Result<TicketRecord, IntakeError> {
        let form = submission.validate()?;

        // Checked up front so a bad file never leaves a record behind.
        if let Some(upload) = attachment {
            self.attachments.check(upload)?;
        }

        let received_at = Utc::now();
        let attachment_file = match attachment {
            Some(upload) => self.attachments.save(upload, received_at).await?,
            None => String::new(),
        };

        let record = TicketRecord {
            timestamp: Some(received_at.trunc_subsecs(0)),
            full_name: form.full_name,
            email: form.email,
            category: form.category,
            priority: form.priority,
            order_ref: form.order_ref,
            subject: form.subject,
            message: form.message,
            attachment_file,
            client_ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        };

        if let Err(e) = self.store.append(&record) {
            if record.has_attachment() {
                if let Err(cleanup) = self.attachments.remove(&record.attachment_file).await {
                    warn!(
                        name = %record.attachment_file,
                        error = %cleanup,
                        "Failed to remove attachment of unstored ticket"
                    );
                }
            }
            return Err(e.into());
        }

        info!(
            category = %record.category,
            priority = %record.priority,
            attachment = record.has_attachment(),
            "Ticket submitted"
        );
        Ok(record)
    }
}
