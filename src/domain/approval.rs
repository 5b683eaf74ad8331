//! Approval state machine.
//!
//! Each side of an email carries its own [`ApprovalStatus`]. The combined
//! status of an A/B-tested email is only decisive when both sides agree;
//! any disagreement, including one approved and one denied, reads as
//! pending. Transitions are open: a client may change a decision in any
//! direction at any time.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Campaign, EmailVariant, Variant};

/// Client decision on one side of an email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Not yet reviewed.
    #[default]
    Pending,
    /// Accepted by the client.
    Approved,
    /// Rejected by the client.
    Denied,
}

impl ApprovalStatus {
    /// Returns whether moving from `self` to `next` is permitted.
    ///
    /// Every transition is permitted, including re-approving a denied
    /// email. There are no terminal states.
    #[must_use]
    pub const fn can_transition_to(self, _next: Self) -> bool {
        true
    }

    /// Human-readable label shown next to an email.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending Review",
            Self::Approved => "Approved",
            Self::Denied => "Denied",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        })
    }
}

/// Computes the overall status of an email across both A/B sides.
#[must_use]
pub fn combined_status(email: &EmailVariant) -> ApprovalStatus {
    if !email.ab_test {
        return email.approval_status;
    }
    match (email.status(Variant::A), email.status(Variant::B)) {
        (ApprovalStatus::Approved, ApprovalStatus::Approved) => ApprovalStatus::Approved,
        (ApprovalStatus::Denied, ApprovalStatus::Denied) => ApprovalStatus::Denied,
        _ => ApprovalStatus::Pending,
    }
}

/// Tally of combined statuses across a campaign's emails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CampaignProgress {
    /// Emails whose combined status is approved.
    pub approved: usize,
    /// Emails whose combined status is denied.
    pub denied: usize,
    /// Emails whose combined status is pending.
    pub pending: usize,
}

impl CampaignProgress {
    /// Tallies the combined status of every email in `campaign`.
    #[must_use]
    pub fn of(campaign: &Campaign) -> Self {
        campaign
            .emails
            .iter()
            .fold(Self::default(), |mut acc, email| {
                match combined_status(email) {
                    ApprovalStatus::Approved => acc.approved += 1,
                    ApprovalStatus::Denied => acc.denied += 1,
                    ApprovalStatus::Pending => acc.pending += 1,
                }
                acc
            })
    }

    /// Total number of emails tallied.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.approved + self.denied + self.pending
    }

    /// Returns `true` if there is at least one email and all are approved.
    #[must_use]
    pub const fn is_fully_approved(&self) -> bool {
        self.approved > 0 && self.denied == 0 && self.pending == 0
    }

    /// Adds another tally into this one.
    pub fn merge(&mut self, other: Self) {
        self.approved += other.approved;
        self.denied += other.denied;
        self.pending += other.pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApprovalStatus::{Approved, Denied, Pending};

    fn ab_email(a: ApprovalStatus, b: Option<ApprovalStatus>) -> EmailVariant {
        EmailVariant {
            ab_test: true,
            approval_status: a,
            ab_approval_status: b,
            ..EmailVariant::blank(0)
        }
    }

    #[test]
    fn without_ab_test_combined_is_version_a() {
        for status in [Pending, Approved, Denied] {
            let email = EmailVariant {
                approval_status: status,
                ab_approval_status: Some(Denied),
                ..EmailVariant::blank(0)
            };
            assert_eq!(combined_status(&email), status);
        }
    }

    #[test]
    fn ab_truth_table() {
        let cases = [
            (Approved, Approved, Approved),
            (Denied, Denied, Denied),
            (Approved, Pending, Pending),
            (Pending, Approved, Pending),
            (Pending, Pending, Pending),
            (Denied, Pending, Pending),
        ];
        for (a, b, expected) in cases {
            assert_eq!(combined_status(&ab_email(a, Some(b))), expected, "{a}/{b}");
        }
    }

    // One side approved and the other denied collapses to pending.
    #[test]
    fn split_decision_reads_pending() {
        assert_eq!(combined_status(&ab_email(Approved, Some(Denied))), Pending);
        assert_eq!(combined_status(&ab_email(Denied, Some(Approved))), Pending);
    }

    #[test]
    fn missing_b_status_never_approves() {
        assert_eq!(combined_status(&ab_email(Approved, None)), Pending);
    }

    #[test]
    fn transitions_are_open() {
        let all = [Pending, Approved, Denied];
        for from in all {
            for to in all {
                assert!(from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn progress_tallies_combined_statuses() {
        let mut campaign = Campaign::sample();
        campaign.emails = vec![
            ab_email(Approved, Some(Approved)),
            ab_email(Approved, Some(Denied)),
            EmailVariant {
                approval_status: Denied,
                ..EmailVariant::blank(2)
            },
        ];
        let progress = CampaignProgress::of(&campaign);
        assert_eq!(
            progress,
            CampaignProgress {
                approved: 1,
                denied: 1,
                pending: 1
            }
        );
        assert_eq!(progress.total(), 3);
        assert!(!progress.is_fully_approved());
    }

    #[test]
    fn empty_campaign_is_not_fully_approved() {
        let mut campaign = Campaign::sample();
        campaign.emails.clear();
        assert!(!CampaignProgress::of(&campaign).is_fully_approved());
    }
}
