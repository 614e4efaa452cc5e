//! End-to-end pipeline tests against a mocked precision provider

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

use common::{btc_long_signal, btc_precision, build_pipeline, risk_only, RecordingNotifier};
use signal_bridge::common::types::{InstrumentPrecision, RawSignal};
use signal_bridge::config::types::SizingPolicy;
use signal_bridge::{
    ClientError, Direction, DryRunSubmitter, PipelineError, PrecisionProvider, PrecisionSource,
    SignalError, SubmissionOutcome, ValidationError,
};

mock! {
    pub Provider {}

    #[async_trait]
    impl PrecisionProvider for Provider {
        async fn fetch_precision(&self, symbol: &str) -> signal_bridge::Result<InstrumentPrecision>;
        fn venue_name(&self) -> &'static str;
    }
}

fn provider_returning(precision: InstrumentPrecision) -> MockProvider {
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_precision()
        .withf(|symbol| symbol == "BTCUSDT")
        .times(1)
        .returning(move |_| Ok(precision.clone()));
    provider.expect_venue_name().return_const("mock");
    provider
}

#[test_log::test(tokio::test)]
async fn test_risk_sized_long_is_quantized_to_lot() {
    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = build_pipeline(
        Arc::new(provider_returning(btc_precision())),
        risk_only(dec!(100)),
        notifier.clone(),
    );

    let outcome = pipeline.process(&btc_long_signal()).await.unwrap();

    assert_eq!(outcome.raw_quantity, dec!(0.2));
    assert_eq!(outcome.intent.symbol, "BTCUSDT");
    assert_eq!(outcome.intent.direction, Direction::Long);
    assert_eq!(outcome.intent.quantity.to_string(), "0.200");
    assert_eq!(outcome.precision_source, PrecisionSource::Venue);
    assert_eq!(
        notifier.messages(),
        vec![
            "Signal received: LONG BTCUSDT".to_string(),
            "✅ ORDER: LONG | Symbol: BTCUSDT | Entry: 50000.0 | SL: 49500.0 | TP: 51000.0 | Qty: 0.200"
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn test_degenerate_risk_rejected_before_precision_lookup() {
    let mut provider = MockProvider::new();
    provider.expect_fetch_precision().never();
    provider.expect_venue_name().return_const("mock");

    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = build_pipeline(Arc::new(provider), risk_only(dec!(100)), notifier.clone());

    let raw = RawSignal::new(json!({
        "symbol": "BYBIT:BTCUSDT.P",
        "direction": "long",
        "entry": "50000",
        "stop": "50000",
        "target": "51000"
    }));
    let err = pipeline.process(&raw).await.unwrap_err();

    assert_eq!(err, PipelineError::Signal(SignalError::DegenerateRisk));
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn test_quantity_rounds_half_up_at_lot_precision() {
    let mut precision = btc_precision();
    precision.lot_size = dec!(0.0001);
    precision.min_qty = dec!(0.0001);

    let pipeline = build_pipeline(
        Arc::new(provider_returning(precision)),
        risk_only(dec!(123.456)),
        Arc::new(RecordingNotifier::default()),
    );
    let raw = RawSignal::new(json!({
        "symbol": "BTCUSDT",
        "direction": "short",
        "entry": 50000,
        "stop": 51000,
        "target": 48000
    }));

    let outcome = pipeline.process(&raw).await.unwrap();

    assert_eq!(outcome.raw_quantity, dec!(0.123456));
    assert_eq!(outcome.intent.quantity.to_string(), "0.1235");
    assert_eq!(outcome.intent.direction, Direction::Short);
}

#[tokio::test]
async fn test_notional_below_venue_minimum_is_rejected() {
    let precision = InstrumentPrecision {
        symbol: "BTCUSDT".to_string(),
        tick_size: dec!(0.1),
        lot_size: dec!(0.0001),
        min_qty: dec!(0.0001),
        max_qty: None,
        min_notional: dec!(10),
    };
    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = build_pipeline(
        Arc::new(provider_returning(precision)),
        risk_only(dec!(0.05)),
        notifier.clone(),
    );

    let err = pipeline.process(&btc_long_signal()).await.unwrap_err();

    match err {
        PipelineError::Validation(ValidationError::BelowMinNotional {
            notional,
            min_notional,
            ..
        }) => {
            assert_eq!(notional, dec!(5));
            assert_eq!(min_notional, dec!(10));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(notifier
        .messages()
        .last()
        .unwrap()
        .contains("below_min_notional"));
}

#[tokio::test]
async fn test_venue_error_falls_back_to_conservative_precision() {
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_precision()
        .times(1)
        .returning(|symbol| Err(ClientError::InstrumentNotFound(symbol.to_string())));
    provider.expect_venue_name().return_const("mock");

    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = build_pipeline(Arc::new(provider), risk_only(dec!(100)), notifier.clone());

    let outcome = pipeline.process(&btc_long_signal()).await.unwrap();

    assert_eq!(outcome.precision_source, PrecisionSource::ConservativeDefaults);
    assert_eq!(outcome.intent.quantity.to_string(), "0.200");
    assert_eq!(outcome.intent.stop.to_string(), "49500.00");
    assert!(notifier.messages()[1].starts_with("⚠️ mock precision unavailable"));
}

#[tokio::test]
async fn test_smallest_budget_wins() {
    let policy = SizingPolicy {
        risk_budget_usd: Some(dec!(100)),
        max_notional_usd: Some(dec!(5000)),
        reward_budget_usd: None,
    };
    let pipeline = build_pipeline(
        Arc::new(provider_returning(btc_precision())),
        policy,
        Arc::new(RecordingNotifier::default()),
    );

    let outcome = pipeline.process(&btc_long_signal()).await.unwrap();

    // 5000 / 50000 = 0.1 beats the 0.2 risk candidate
    assert_eq!(outcome.intent.quantity.to_string(), "0.100");
}

#[tokio::test]
async fn test_dry_run_submission_is_reported() {
    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = build_pipeline(
        Arc::new(provider_returning(btc_precision())),
        risk_only(dec!(100)),
        notifier.clone(),
    )
    .with_submitter(Arc::new(DryRunSubmitter::new()));

    let outcome = pipeline.process(&btc_long_signal()).await.unwrap();

    match outcome.submission {
        Some(SubmissionOutcome::Acknowledged(ack)) => assert_eq!(ack.order_id, "dry-run-1"),
        other => panic!("unexpected submission: {:?}", other),
    }
    assert!(notifier.messages().last().unwrap().starts_with("📨 BTCUSDT"));
}

#[tokio::test]
async fn test_signal_embedded_in_text_field() {
    let pipeline = build_pipeline(
        Arc::new(provider_returning(btc_precision())),
        risk_only(dec!(100)),
        Arc::new(RecordingNotifier::default()),
    );
    let raw = RawSignal::new(json!({
        "text": "🚀 alert {\"symbol\":\"BTCUSDT\",\"side\":\"buy\",\"entry\":50000,\"sl\":49500,\"tp\":51000}"
    }));

    let outcome = pipeline.process(&raw).await.unwrap();

    assert_eq!(outcome.intent.quantity.to_string(), "0.200");
}
