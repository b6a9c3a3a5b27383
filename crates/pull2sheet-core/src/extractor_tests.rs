use super::*;
use std::time::Duration;

use pull2sheet_config::ExtractionConfig;
use pull2sheet_protocols::SessionOptions;

use crate::testing::{context, fields, MockModel, Reply};
use pull2sheet_protocols::LanguageModel;

async fn open(model: &MockModel) -> Box<dyn ModelSession> {
    model.create(SessionOptions::text()).await.unwrap()
}

fn text(input: &str) -> InputPayload {
    InputPayload::Text(input.to_string())
}

#[tokio::test]
async fn test_all_fields_present_without_failures() {
    let (ctx, _panel) = context(ExtractionConfig::default());
    let model = MockModel::answering(&[("Name", "Jane Doe"), ("Email", "jane@example.com")]);
    let session = open(&model).await;

    let names = ["Name", "Email", "Phone"];
    let result = extract_fields(&ctx, session.as_ref(), &text("Jane"), &fields(&names)).await;

    assert_eq!(result.len(), 3);
    assert_eq!(result.names().collect::<Vec<_>>(), names);
    assert!(!result.has_failure());
    assert_eq!(result.wire_value("Name"), Some("Jane Doe"));
    assert_eq!(result.get("Phone"), Some(&FieldValue::NotFound));
    assert_eq!(result.wire_value("Phone"), Some(""));
    assert!(!ctx.is_cancelled());
}

#[tokio::test]
async fn test_prompts_are_issued_in_field_order() {
    let (ctx, _panel) = context(ExtractionConfig::default());
    let model = MockModel::answering(&[]);
    let session = open(&model).await;

    extract_fields(&ctx, session.as_ref(), &text("x"), &fields(&["A", "B", "C"])).await;

    let prompts = model.stats.prompt_texts();
    assert_eq!(prompts.len(), 3);
    for (prompt, name) in prompts.iter().zip(["A", "B", "C"]) {
        assert!(prompt.starts_with(&format!("Extract the value for \"{}\".", name)));
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_halts_remaining_fields() {
    let (ctx, panel) = context(ExtractionConfig::default());
    let model = MockModel::new(|prompt| {
        if prompt.text_content().contains("\"B\"") {
            Reply::Hang
        } else {
            Reply::text("value")
        }
    });
    let session = open(&model).await;

    let result = extract_fields(&ctx, session.as_ref(), &text("x"), &fields(&["A", "B", "C"])).await;

    assert!(ctx.is_cancelled());
    assert_eq!(result.get("A"), Some(&FieldValue::Found("value".into())));
    assert_eq!(result.get("B"), Some(&FieldValue::Failed(FailureKind::Timeout)));
    assert!(!result.contains("C"));
    assert!(panel
        .logs()
        .contains(&"[TIMEOUT] AI timed out while extracting field: \"B\".".to_string()));
}

#[tokio::test]
async fn test_error_cancels_and_stops() {
    let (ctx, _panel) = context(ExtractionConfig::default());
    let model = MockModel::new(|prompt| {
        if prompt.text_content().contains("\"A\"") {
            Reply::Fail
        } else {
            Reply::text("value")
        }
    });
    let session = open(&model).await;

    let result = extract_fields(&ctx, session.as_ref(), &text("x"), &fields(&["A", "B"])).await;

    assert!(ctx.is_cancelled());
    assert_eq!(result.get("A"), Some(&FieldValue::Failed(FailureKind::Error)));
    assert_eq!(result.wire_value("A"), Some("AI_ERROR"));
    assert!(!result.contains("B"));
    assert_eq!(model.stats.prompt_count(), 1);
}

#[tokio::test]
async fn test_cancelled_before_start_yields_empty_result() {
    let (ctx, _panel) = context(ExtractionConfig::default());
    let model = MockModel::answering(&[]);
    let session = open(&model).await;
    ctx.cancel();

    let result = extract_fields(&ctx, session.as_ref(), &text("x"), &fields(&["A"])).await;

    assert!(result.is_empty());
    assert_eq!(model.stats.prompt_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_lets_in_flight_prompt_finish() {
    let (ctx, _panel) = context(ExtractionConfig::default());
    let model = MockModel::new(|_| Reply::After(Duration::from_secs(5), "done".into()));
    let session = open(&model).await;

    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let result = extract_fields(&ctx, session.as_ref(), &text("x"), &fields(&["A", "B"])).await;

    assert_eq!(result.get("A"), Some(&FieldValue::Found("done".into())));
    assert!(!result.contains("B"));
    assert_eq!(model.stats.prompt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_abort_in_flight_drops_prompt() {
    let config = ExtractionConfig {
        abort_in_flight: true,
        ..Default::default()
    };
    let (ctx, _panel) = context(config);
    let model = MockModel::new(|_| Reply::After(Duration::from_secs(5), "done".into()));
    let session = open(&model).await;

    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let result = extract_fields(&ctx, session.as_ref(), &text("x"), &fields(&["A", "B"])).await;

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_retry_recovers_failed_prompt() {
    let config = ExtractionConfig {
        retry_count: 1,
        ..Default::default()
    };
    let (ctx, _panel) = context(config);
    let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = calls.clone();
    let model = MockModel::new(move |_| {
        if counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
            Reply::Fail
        } else {
            Reply::text("second try")
        }
    });
    let session = open(&model).await;

    let result = extract_fields(&ctx, session.as_ref(), &text("x"), &fields(&["A"])).await;

    assert_eq!(result.get("A"), Some(&FieldValue::Found("second try".into())));
    assert!(!ctx.is_cancelled());
    assert_eq!(model.stats.prompt_count(), 2);
}

#[tokio::test]
async fn test_failure_budget_allows_continuing() {
    let config = ExtractionConfig {
        max_consecutive_failures: 2,
        ..Default::default()
    };
    let (ctx, _panel) = context(config);
    let model = MockModel::new(|prompt| {
        let text = prompt.text_content();
        if text.contains("\"A\"") || text.contains("\"C\"") || text.contains("\"D\"") {
            Reply::Fail
        } else {
            Reply::text("ok")
        }
    });
    let session = open(&model).await;

    let names = ["A", "B", "C", "D", "E"];
    let result = extract_fields(&ctx, session.as_ref(), &text("x"), &fields(&names)).await;

    assert_eq!(result.get("A"), Some(&FieldValue::Failed(FailureKind::Error)));
    assert_eq!(result.get("B"), Some(&FieldValue::Found("ok".into())));
    assert_eq!(result.get("D"), Some(&FieldValue::Failed(FailureKind::Error)));
    assert!(!result.contains("E"));
    assert!(ctx.is_cancelled());
}

#[tokio::test]
async fn test_image_input_uses_multimodal_prompt() {
    let (ctx, _panel) = context(ExtractionConfig::default());
    let model = MockModel::answering(&[("Total", "\"$12.00\"")]);
    let session = model.create(SessionOptions::multimodal()).await.unwrap();
    let image = pull2sheet_protocols::ImageData::new("image/png", vec![0u8; 4]);

    let result = extract_fields(
        &ctx,
        session.as_ref(),
        &InputPayload::Image(image),
        &fields(&["Total"]),
    )
    .await;

    assert_eq!(result.wire_value("Total"), Some("$12.00"));
    let prompts = model.stats.prompts.lock();
    assert_eq!(prompts[0].images().len(), 1);
}
