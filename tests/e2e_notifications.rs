//! E2E tests for the notification log and toast

mod common;

use std::time::Duration;

use common::TestSession;
use neighborwatch::data::{
    IncidentKind, NewPost, NewShift, NotificationSeverity, PostCategory, ReportDraft, UserRole,
};

/// Assert exactly one new success notification mirrored by the toast
fn expect_one_more(session: &TestSession, len: &mut usize) {
    let log = session.state.notifications();
    assert_eq!(log.len(), *len + 1);
    assert_eq!(log[0].severity, NotificationSeverity::Success);
    assert_eq!(
        session.state.pending_toast().unwrap().message,
        log[0].message
    );
    *len = log.len();
}

#[tokio::test(start_paused = true)]
async fn test_each_creating_operation_emits_once() {
    let mut session = TestSession::builder()
        .logged_in_as(UserRole::Admin)
        .build();

    let mut len = session.state.notifications().len();

    session
        .state
        .submit_report(ReportDraft::new(
            IncidentKind::Theft,
            "Gas cylinder taken from kitchen",
            "Jl. Merpati",
        ))
        .await
        .unwrap();
    expect_one_more(&session, &mut len);

    let post = session
        .state
        .add_forum_post(NewPost {
            title: "Lost cat".to_string(),
            content: "Orange tabby near the mosque.".to_string(),
            category: PostCategory::General,
        })
        .unwrap();
    expect_one_more(&session, &mut len);

    session.state.add_comment(&post.id, "Seen it by the gate.").unwrap();
    expect_one_more(&session, &mut len);

    let shift = NewShift::parse("Pak Dedi", "2025-10-08", "22:00", "02:00").unwrap();
    session.state.add_shift(shift).unwrap();
    expect_one_more(&session, &mut len);
}

#[tokio::test(start_paused = true)]
async fn test_toast_expires_and_next_one_replaces_it() {
    let mut session = TestSession::builder()
        .logged_in_as(UserRole::Resident)
        .build();
    assert!(session.state.pending_toast().is_some());

    tokio::time::advance(Duration::from_millis(3000)).await;
    assert!(session.state.pending_toast().is_none());

    session.state.add_comment("p1", "First").unwrap();
    tokio::time::advance(Duration::from_millis(2000)).await;
    session.state.toggle_like_post("p1").unwrap();
    assert!(session.state.pending_toast().is_some());

    session.state.dismiss_toast();
    assert!(session.state.pending_toast().is_none());
}

#[test]
fn test_mark_read_changes_neither_log_length_nor_toast() {
    let mut session = TestSession::builder()
        .logged_in_as(UserRole::Resident)
        .build();
    let len = session.state.notifications().len();
    let toast = session.state.pending_toast().cloned();
    let first_id = session.state.notifications()[0].id.clone();

    session.state.mark_read(&first_id).unwrap();
    assert_eq!(session.state.unread_count(), len - 1);

    session.state.mark_all_read();
    assert_eq!(session.state.unread_count(), 0);
    assert_eq!(session.state.notifications().len(), len);
    assert_eq!(session.state.pending_toast().cloned(), toast);
}

#[test]
fn test_unread_count_matches_log() {
    let mut session = TestSession::builder()
        .logged_in_as(UserRole::Admin)
        .build();
    session.state.toggle_like_post("p1").unwrap();
    session.state.delete_forum_post("p2").unwrap();

    let unread = session
        .state
        .notifications()
        .iter()
        .filter(|n| !n.is_read)
        .count();
    assert_eq!(session.state.unread_count(), unread);
}

#[test]
fn test_mark_unknown_notification_is_not_found() {
    let mut session = TestSession::new();
    assert!(session.state.mark_read("missing").is_err());
    assert_eq!(session.state.unread_count(), 2);
}
