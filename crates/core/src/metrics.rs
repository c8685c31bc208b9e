//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ticket store (appends, skipped rows)
//! - Intake (accepted and rejected submissions)
//! - Attachments (count and size)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Ticket Store Metrics
// =============================================================================

/// Rows appended to the ticket store.
pub static TICKETS_APPENDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "supportdesk_tickets_appended_total",
        "Total ticket rows appended to the store",
    )
    .unwrap()
});

/// Rows skipped while reading the store because they could not be decoded.
pub static MALFORMED_ROWS_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "supportdesk_malformed_rows_skipped_total",
        "Ticket store rows skipped during reads",
    )
    .unwrap()
});

// =============================================================================
// Intake Metrics
// =============================================================================

/// Submissions rejected by reason.
pub static SUBMISSIONS_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "supportdesk_submissions_rejected_total",
            "Ticket submissions that did not produce a record",
        ),
        &["reason"], // "validation", "attachment", "store"
    )
    .unwrap()
});

// =============================================================================
// Attachment Metrics
// =============================================================================

/// Attachments written to the upload directory.
pub static ATTACHMENTS_SAVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "supportdesk_attachments_saved_total",
        "Total attachments saved",
    )
    .unwrap()
});

/// Size of saved attachments in bytes.
pub static ATTACHMENT_SIZE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "supportdesk_attachment_size_bytes",
            "Size of saved attachments",
        )
        .buckets(vec![
            1024.0,
            16_384.0,
            131_072.0,
            1_048_576.0,
            5_242_880.0,
            26_214_400.0,
        ]),
        &[],
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Store
        Box::new(TICKETS_APPENDED.clone()),
        Box::new(MALFORMED_ROWS_SKIPPED.clone()),
        // Intake
        Box::new(SUBMISSIONS_REJECTED.clone()),
        // Attachments
        Box::new(ATTACHMENTS_SAVED.clone()),
        Box::new(ATTACHMENT_SIZE.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_registers_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        SUBMISSIONS_REJECTED.with_label_values(&["validation"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "supportdesk_submissions_rejected_total"));
    }
}
