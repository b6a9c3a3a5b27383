use super::*;
use std::time::Duration;

use pull2sheet_config::ExtractionConfig;
use pull2sheet_protocols::{ModelError, Prompt};

use crate::testing::{context, Creation, MockModel, Reply};

fn manager(model: MockModel) -> (SessionManager, Arc<crate::testing::Stats>) {
    let stats = model.stats.clone();
    (SessionManager::new(Some(Arc::new(model))), stats)
}

#[tokio::test]
async fn test_no_capability_is_unsupported() {
    let (ctx, panel) = context(ExtractionConfig::default());
    let manager = SessionManager::new(None);

    let err = manager.check_availability(&ctx).await.unwrap_err();
    assert!(matches!(err, ExtractionError::Unsupported));
    let toasts = panel.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].1, ToastSeverity::Error);
}

#[tokio::test]
async fn test_unavailable_status_is_rejected() {
    let (ctx, panel) = context(ExtractionConfig::default());
    let (manager, _) =
        manager(MockModel::answering(&[]).with_availability(Availability::Unavailable));

    let err = manager.check_availability(&ctx).await.unwrap_err();
    assert!(matches!(err, ExtractionError::Unavailable(ref s) if s == "unavailable"));
    assert!(panel.toasts()[0].0.contains("Status: unavailable"));
}

#[tokio::test]
async fn test_downloadable_passes_check() {
    let (ctx, panel) = context(ExtractionConfig::default());
    let (manager, _) =
        manager(MockModel::answering(&[]).with_availability(Availability::Downloadable));

    let availability = manager.check_availability(&ctx).await.unwrap();
    assert_eq!(availability, Availability::Downloadable);
    assert!(panel.toasts().is_empty());
}

#[tokio::test]
async fn test_create_and_dispose_once() {
    let (ctx, panel) = context(ExtractionConfig::default());
    let (manager, stats) = manager(MockModel::new(|_| Reply::text("ok")));

    let guard = manager
        .create_session(&ctx, SessionOptions::text())
        .await
        .unwrap();
    let answer = guard.session().prompt(Prompt::text("hi")).await.unwrap();
    assert_eq!(answer, "ok");
    guard.dispose(&ctx).await;

    assert_eq!(stats.created(), 1);
    assert_eq!(stats.destroyed(), 1);
    let logs = panel.logs();
    assert!(logs.contains(&"AI session created successfully.".to_string()));
    assert!(logs.contains(&"AI session destroyed.".to_string()));
}

#[tokio::test]
async fn test_modality_rejection_propagates() {
    let (ctx, panel) = context(ExtractionConfig::default());
    let (manager, stats) =
        manager(MockModel::answering(&[]).with_creation(Creation::RejectModality));

    let err = match manager
        .create_session(&ctx, SessionOptions::multimodal())
        .await
    {
        Err(e) => e,
        Ok(_) => panic!("multimodal session should be rejected"),
    };
    assert!(matches!(
        err,
        ExtractionError::Model(ModelError::UnsupportedModality(_))
    ));
    assert!(!ctx.is_cancelled());
    assert_eq!(stats.created(), 0);
    // Only the initialization-timeout case toasts here.
    assert!(panel.toasts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_creation_timeout() {
    let (ctx, panel) = context(ExtractionConfig::default());
    let (manager, _) = manager(MockModel::answering(&[]).with_creation(Creation::Hang));

    let err = match manager.create_session(&ctx, SessionOptions::text()).await {
        Err(e) => e,
        Ok(_) => panic!("creation should time out"),
    };
    assert_eq!(err.to_string(), "AI session creation timed out after 30 seconds.");
    assert!(ctx.is_cancelled());
    assert!(panel.toasts()[0].0.starts_with("AI initialization timed out."));
}

#[tokio::test(start_paused = true)]
async fn test_late_session_is_destroyed() {
    let (ctx, _panel) = context(ExtractionConfig::default());
    let (manager, stats) = manager(
        MockModel::answering(&[]).with_creation(Creation::Late(Duration::from_secs(45))),
    );

    assert!(manager
        .create_session(&ctx, SessionOptions::text())
        .await
        .is_err());
    assert_eq!(stats.created(), 0);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(stats.created(), 1);
    assert_eq!(stats.destroyed(), 1);
}

#[tokio::test]
async fn test_dropped_guard_still_destroys() {
    let (ctx, _panel) = context(ExtractionConfig::default());
    let (manager, stats) = manager(MockModel::answering(&[]));

    let guard = manager
        .create_session(&ctx, SessionOptions::text())
        .await
        .unwrap();
    drop(guard);
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    assert_eq!(stats.destroyed(), 1);
}
