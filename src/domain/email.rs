//! Email variant records and view-mode-aware editing.

use serde::{Deserialize, Serialize};

use super::{ApprovalStatus, ViewMode};
use crate::error::ReviewError;

/// One side of an A/B-tested email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// The primary subject/body.
    A,
    /// The A/B alternate subject/body.
    B,
}

/// A single email in a campaign, with an optional A/B alternate.
///
/// `ab_subject`, `ab_body` and `ab_approval_status` are only meaningful
/// while `ab_test` is on; turning it off leaves them in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVariant {
    /// Position-derived identifier (`email-0`, `email-1`, ...).
    pub id: String,
    /// Subject line A.
    pub subject: String,
    /// Body A.
    pub body: String,
    /// Whether an alternate B version is being tested.
    pub ab_test: bool,
    /// Subject line B.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ab_subject: Option<String>,
    /// Body B.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ab_body: Option<String>,
    /// Client decision on version A.
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    /// Client decision on version B. Absent reads as pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ab_approval_status: Option<ApprovalStatus>,
}

impl EmailVariant {
    /// Creates an empty, pending email with id `email-{index}`.
    #[must_use]
    pub fn blank(index: usize) -> Self {
        Self {
            id: format!("email-{index}"),
            subject: String::new(),
            body: String::new(),
            ab_test: false,
            ab_subject: None,
            ab_body: None,
            approval_status: ApprovalStatus::Pending,
            ab_approval_status: None,
        }
    }

    /// Returns the approval status of one side.
    #[must_use]
    pub fn status(&self, variant: Variant) -> ApprovalStatus {
        match variant {
            Variant::A => self.approval_status,
            Variant::B => self.ab_approval_status.unwrap_or_default(),
        }
    }

    /// Sets the approval status of one side, leaving the other untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] when reviewing side B of an
    /// email that is not A/B tested.
    pub fn set_status(&mut self, variant: Variant, status: ApprovalStatus) -> Result<(), ReviewError> {
        match variant {
            Variant::A => self.approval_status = status,
            Variant::B => {
                if !self.ab_test {
                    return Err(ReviewError::Validation(format!(
                        "{} has no B version to review",
                        self.id
                    )));
                }
                self.ab_approval_status = Some(status);
            }
        }
        Ok(())
    }

    /// Returns an edited copy of this email, checking the edit against
    /// the view mode.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::ReadOnly`] if the field is not editable in
    /// `mode`, or [`ReviewError::Validation`] for a B review on an email
    /// without an A/B test.
    pub fn apply(&self, edit: EmailEdit, mode: ViewMode) -> Result<Self, ReviewError> {
        let allowed = match edit {
            EmailEdit::Review { .. } => mode.can_review(),
            _ => mode.can_edit_content(),
        };
        if !allowed {
            return Err(ReviewError::ReadOnly {
                field: edit.field(),
                mode,
            });
        }

        let mut next = self.clone();
        match edit {
            EmailEdit::Subject(subject) => next.subject = subject,
            EmailEdit::Body(body) => next.body = body,
            EmailEdit::AbTest(enabled) => {
                next.ab_test = enabled;
                if enabled && next.ab_approval_status.is_none() {
                    next.ab_approval_status = Some(ApprovalStatus::Pending);
                }
            }
            EmailEdit::AbSubject(subject) => next.ab_subject = Some(subject),
            EmailEdit::AbBody(body) => next.ab_body = Some(body),
            EmailEdit::Review { variant, status } => next.set_status(variant, status)?,
        }
        Ok(next)
    }
}

/// A single field change coming from an email editor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailEdit {
    /// Replace subject line A.
    Subject(String),
    /// Replace body A.
    Body(String),
    /// Toggle the A/B test.
    AbTest(bool),
    /// Replace subject line B.
    AbSubject(String),
    /// Replace body B.
    AbBody(String),
    /// Approve or deny one side.
    Review {
        /// Side being reviewed.
        variant: Variant,
        /// New decision.
        status: ApprovalStatus,
    },
}

impl EmailEdit {
    /// Returns the persisted field name this edit targets.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Subject(_) => "subject",
            Self::Body(_) => "body",
            Self::AbTest(_) => "abTest",
            Self::AbSubject(_) => "abSubject",
            Self::AbBody(_) => "abBody",
            Self::Review {
                variant: Variant::A,
                ..
            } => "approvalStatus",
            Self::Review {
                variant: Variant::B,
                ..
            } => "abApprovalStatus",
        }
    }
}
