//! End-to-end flow: the agency drafts a campaign, the client reviews it,
//! and the agency sees the decisions.

#![allow(clippy::panic)]

use std::sync::Arc;

use campaign_review::app_state::AppState;
use campaign_review::config::ReviewConfig;
use campaign_review::controller::{CampaignEditor, CampaignReviewer, SettingsForm};
use campaign_review::domain::{
    ApprovalStatus, CampaignProgress, ClientId, Credentials, EmailEdit, EmailType, IntentLevel,
    Variant,
};
use campaign_review::storage::MemoryStore;
use tokio_test::{assert_err, assert_ok};

const KAI: &str = "kai@habitualherbs.com";

fn make_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()), &ReviewConfig::default())
}

#[test]
fn agency_drafts_client_reviews() {
    let state = make_state();

    // Agency drafts a two-email campaign for Habitual Herbs.
    assert_ok!(state.sessions.login(&Credentials::new("bizypro", "BizyPro1$!")));
    let mut editor = assert_ok!(CampaignEditor::open(&state));
    editor.new_campaign();
    assert_ok!(editor.submit_settings(&SettingsForm {
        client_id: Some(ClientId::from("herbs")),
        email_type: EmailType::B2B,
        intent_level: IntentLevel::High,
        number_of_emails: "2".to_string(),
    }));
    assert_ok!(editor.edit_email(0, EmailEdit::Subject("Welcome".to_string())));
    assert_ok!(editor.edit_email(1, EmailEdit::Subject("Follow up".to_string())));
    let draft = assert_ok!(editor.save(Some("Spring Launch")));

    let stored = state.campaigns.list();
    assert_eq!(stored.len(), 1);
    let Some(first) = stored.first() else {
        panic!("campaign should be stored");
    };
    assert_eq!(first.settings.client_id, KAI);
    assert_eq!(first.settings.client_name, "Habitual Herbs");
    assert_eq!(first.emails.len(), 2);
    assert!(
        first
            .emails
            .iter()
            .all(|e| e.approval_status == ApprovalStatus::Pending)
    );

    // Client logs in and sees exactly that campaign.
    assert_ok!(state.sessions.logout());
    assert_ok!(state.sessions.login(&Credentials::new("KAI@HabitualHerbs.com", "Herbs1$!")));
    let mut reviewer = assert_ok!(CampaignReviewer::open(&state.sessions, &state.campaigns));
    assert_eq!(reviewer.campaigns().len(), 1);
    assert_ok!(reviewer.select(&draft.id));

    // Content is read-only for the client.
    let Some(selected) = reviewer.selected() else {
        panic!("campaign should be selected");
    };
    assert_err!(
        selected
            .emails
            .first()
            .map(|e| e.apply(EmailEdit::Subject("x".to_string()), reviewer.user().role.into()))
            .transpose()
    );

    assert_ok!(reviewer.set_approval(0, Variant::A, ApprovalStatus::Approved));
    let reviewed = assert_ok!(reviewer.set_approval(1, Variant::A, ApprovalStatus::Denied));
    assert!(reviewed.updated_at > draft.updated_at);
    assert_eq!(reviewed.created_at, draft.created_at);

    // Agency view picks up the decisions.
    let mut agency = CampaignEditor::new(state.campaigns.clone(), state.credentials.clone());
    assert_ok!(agency.select(&draft.id));
    let statuses: Vec<_> = agency.emails().iter().map(|e| e.approval_status).collect();
    assert_eq!(statuses, vec![ApprovalStatus::Approved, ApprovalStatus::Denied]);

    let Some(saved) = state.campaigns.get(&draft.id) else {
        panic!("campaign should remain stored");
    };
    assert_eq!(
        CampaignProgress::of(&saved),
        CampaignProgress {
            approved: 1,
            denied: 1,
            pending: 0,
        }
    );
    assert!(!CampaignProgress::of(&saved).is_fully_approved());
}

#[test]
fn other_client_sees_nothing() {
    let state = make_state();
    assert_ok!(state.sessions.login(&Credentials::new("BizyPro", "BizyPro1$!")));
    let mut editor = assert_ok!(CampaignEditor::open(&state));
    assert_ok!(editor.submit_settings(&SettingsForm {
        client_id: Some(ClientId::from("herbs")),
        email_type: EmailType::B2C,
        intent_level: IntentLevel::Low,
        number_of_emails: "3".to_string(),
    }));
    assert_ok!(editor.save(None));

    assert_ok!(state.sessions.login(&Credentials::new(
        "billing@bayshoreplumbers.com",
        "Bayshore1$!"
    )));
    let reviewer = assert_ok!(CampaignReviewer::open(&state.sessions, &state.campaigns));
    assert!(reviewer.campaigns().is_empty());
    assert_err!(CampaignEditor::open(&state));
}
