//! Integration tests for the session controller

mod common;

use std::sync::Arc;

use common::{MockReportGenerator, high_risk_report, ms};
use mobsafe_core::config::{RemediationConfig, ScanConfig};
use mobsafe_core::domain::UserRole;
use mobsafe_orchestrator::{ScanEvent, SessionController, SessionError, Verdict};
use tokio_util::sync::CancellationToken;

fn session(generator: MockReportGenerator) -> (SessionController, Arc<MockReportGenerator>) {
    let generator = Arc::new(generator);
    let controller = SessionController::new(
        generator.clone(),
        ScanConfig::default(),
        RemediationConfig::default(),
        CancellationToken::new(),
    );
    (controller, generator)
}

#[tokio::test]
async fn test_sign_in_uses_demo_identity() {
    let (mut session, _) = session(MockReportGenerator::succeeding(high_risk_report()));

    let user = session.sign_in(UserRole::User).unwrap();
    assert_eq!(user.name, "Jane Doe");
    assert!(session.snapshot().is_signed_in());

    let admin = session.sign_in(UserRole::Admin).unwrap();
    assert_eq!(admin.email, "admin@mobsafe.com");
    assert_eq!(session.current_user().unwrap().role, UserRole::Admin);
}

#[tokio::test]
async fn test_guest_cannot_sign_in() {
    let (mut session, _) = session(MockReportGenerator::succeeding(high_risk_report()));

    assert!(matches!(
        session.sign_in(UserRole::Guest),
        Err(SessionError::GuestNotAllowed)
    ));
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn test_scan_requires_signed_in_user() {
    let (mut session, generator) = session(MockReportGenerator::succeeding(high_risk_report()));

    assert!(matches!(
        session.start_scan(None),
        Err(SessionError::NotSignedIn)
    ));
    assert!(matches!(
        session.record_report(Arc::new(high_risk_report())),
        Err(SessionError::NotSignedIn)
    ));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_scan_to_report_flow() {
    let (mut session, generator) = session(MockReportGenerator::succeeding(high_risk_report()));
    session.sign_in(UserRole::User).unwrap();

    assert_eq!(session.report_view().verdict(), Verdict::NoReport);

    let mut handle = session.start_scan(Some("iPhone 15 Pro")).unwrap();
    let Some(ScanEvent::Completed(report)) = handle.next_event().await else {
        panic!("expected completion");
    };
    session.record_report(report.clone()).unwrap();
    assert_eq!(generator.calls(), 1);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.last_report, Some(report));

    let view = session.report_view();
    assert_eq!(view.verdict(), Verdict::AtRisk);
    assert_eq!(view.request_fix_all(), Ok(2));
    view.confirm_fix_all().unwrap();
    assert!(view.wait_until_fixed().await);

    // a fresh view starts from the stored report, not the fixed flag
    assert_eq!(session.report_view().verdict(), Verdict::AtRisk);
}

#[tokio::test(start_paused = true)]
async fn test_sign_out_clears_session_and_cancels_scan() {
    let (mut session, generator) = session(MockReportGenerator::succeeding(high_risk_report()));
    session.sign_in(UserRole::User).unwrap();
    session.record_report(Arc::new(high_risk_report())).unwrap();

    let mut handle = session.start_scan(None).unwrap();
    tokio::time::sleep(ms(2000)).await;
    session.sign_out();

    assert!(handle.is_cancelled());
    assert!(handle.next_event().await.is_none());
    assert_eq!(generator.calls(), 0);

    let snapshot = session.snapshot();
    assert!(snapshot.current_user.is_none());
    assert!(snapshot.last_report.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_sign_out_tears_down_report_view() {
    let (mut session, _) = session(MockReportGenerator::succeeding(high_risk_report()));
    session.sign_in(UserRole::Admin).unwrap();
    session.record_report(Arc::new(high_risk_report())).unwrap();

    let view = session.report_view();
    view.request_fix_all().unwrap();
    view.confirm_fix_all().unwrap();
    session.sign_out();

    tokio::time::sleep(ms(5000)).await;
    assert!(!view.all_fixed());
    assert!(view.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_session_usable_after_sign_out() {
    let (mut session, generator) = session(MockReportGenerator::succeeding(high_risk_report()));
    session.sign_in(UserRole::User).unwrap();
    session.sign_out();
    session.sign_in(UserRole::User).unwrap();

    let mut handle = session.start_scan(None).unwrap();
    assert!(matches!(
        handle.next_event().await,
        Some(ScanEvent::Completed(_))
    ));
    assert_eq!(generator.calls(), 1);
}
