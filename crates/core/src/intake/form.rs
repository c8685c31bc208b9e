//! Submission form values and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_FULL_NAME_CHARS: usize = 120;
pub const MAX_EMAIL_CHARS: usize = 200;
pub const MAX_SUBJECT_CHARS: usize = 200;

const DEFAULT_CATEGORY: &str = "Question";
const DEFAULT_PRIORITY: &str = "Normal";

/// Raw form values as received from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketSubmission {
    pub full_name: String,
    pub email: String,
    pub category: String,
    pub priority: String,
    pub order_ref: String,
    pub subject: String,
    pub message: String,
    pub consent: bool,
}

/// Where a submission came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: String,
    pub user_agent: String,
}

/// Every problem found in a submission, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join(" "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// A submission whose fields are trimmed, defaulted and checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub full_name: String,
    pub email: String,
    pub category: String,
    pub priority: String,
    pub order_ref: String,
    pub subject: String,
    pub message: String,
}

impl TicketSubmission {
    /// Check the form, collecting all problems rather than stopping at the
    /// first one.
    pub fn validate(&self) -> Result<ValidatedSubmission, ValidationErrors> {
        let full_name = self.full_name.trim();
        let email = self.email.trim();
        let subject = self.subject.trim();
        let message = self.message.trim();

        let mut errors = Vec::new();

        if full_name.is_empty() {
            errors.push("Full name is required.".to_string());
        } else if full_name.chars().count() > MAX_FULL_NAME_CHARS {
            errors.push("Full name is too long.".to_string());
        }

        if email.is_empty() || !email.contains('@') {
            errors.push("Valid email is required.".to_string());
        } else if email.chars().count() > MAX_EMAIL_CHARS {
            errors.push("Email is too long.".to_string());
        }

        if subject.is_empty() {
            errors.push("Subject is required.".to_string());
        } else if subject.chars().count() > MAX_SUBJECT_CHARS {
            errors.push("Subject is too long.".to_string());
        }

        if message.is_empty() {
            errors.push("Message is required.".to_string());
        }

        if !self.consent {
            errors.push("Consent is required.".to_string());
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(ValidatedSubmission {
            full_name: full_name.to_string(),
            email: email.to_string(),
            category: or_default(&self.category, DEFAULT_CATEGORY),
            priority: or_default(&self.priority, DEFAULT_PRIORITY),
            order_ref: self.order_ref.trim().to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }
}

fn or_default(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> TicketSubmission {
        TicketSubmission {
            full_name: "  Jane Doe ".to_string(),
            email: "jane@example.com".to_string(),
            category: "Bug report".to_string(),
            priority: "High".to_string(),
            order_ref: " ORD-42 ".to_string(),
            subject: "Checkout fails".to_string(),
            message: "Card declined at the last step.".to_string(),
            consent: true,
        }
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let validated = valid_submission().validate().unwrap();

        assert_eq!(validated.full_name, "Jane Doe");
        assert_eq!(validated.order_ref, "ORD-42");
        assert_eq!(validated.category, "Bug report");
        assert_eq!(validated.priority, "High");
    }

    #[test]
    fn test_empty_submission_collects_every_message() {
        let errors = TicketSubmission::default().validate().unwrap_err();

        assert_eq!(
            errors.messages(),
            [
                "Full name is required.",
                "Valid email is required.",
                "Subject is required.",
                "Message is required.",
                "Consent is required.",
            ]
        );
    }

    #[test]
    fn test_email_without_at_sign_is_rejected() {
        let submission = TicketSubmission {
            email: "jane.example.com".to_string(),
            ..valid_submission()
        };

        let errors = submission.validate().unwrap_err();

        assert_eq!(errors.messages(), ["Valid email is required."]);
    }

    #[test]
    fn test_whitespace_only_fields_are_missing() {
        let submission = TicketSubmission {
            subject: "   ".to_string(),
            message: "\n\t".to_string(),
            ..valid_submission()
        };

        let errors = submission.validate().unwrap_err();

        assert_eq!(
            errors.messages(),
            ["Subject is required.", "Message is required."]
        );
    }

    #[test]
    fn test_length_caps() {
        let submission = TicketSubmission {
            full_name: "x".repeat(MAX_FULL_NAME_CHARS + 1),
            email: format!("{}@example.com", "a".repeat(MAX_EMAIL_CHARS)),
            subject: "s".repeat(MAX_SUBJECT_CHARS + 1),
            ..valid_submission()
        };

        let errors = submission.validate().unwrap_err();

        assert_eq!(
            errors.messages(),
            [
                "Full name is too long.",
                "Email is too long.",
                "Subject is too long.",
            ]
        );
    }

    #[test]
    fn test_length_caps_count_characters() {
        let submission = TicketSubmission {
            full_name: "é".repeat(MAX_FULL_NAME_CHARS),
            ..valid_submission()
        };

        assert!(submission.validate().is_ok());
    }

    #[test]
    fn test_category_and_priority_defaults() {
        let submission = TicketSubmission {
            category: " ".to_string(),
            priority: String::new(),
            ..valid_submission()
        };

        let validated = submission.validate().unwrap();

        assert_eq!(validated.category, "Question");
        assert_eq!(validated.priority, "Normal");
    }

    #[test]
    fn test_unlisted_category_is_accepted() {
        let submission = TicketSubmission {
            category: "Billing".to_string(),
            ..valid_submission()
        };

        assert_eq!(submission.validate().unwrap().category, "Billing");
    }

    #[test]
    fn test_error_display_joins_messages() {
        let errors = ValidationErrors(vec![
            "Subject is required.".to_string(),
            "Consent is required.".to_string(),
        ]);

        assert_eq!(
            errors.to_string(),
            "Subject is required. Consent is required."
        );
    }
}
