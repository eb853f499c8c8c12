//! Integration tests for the configuration endpoints

mod support;

use std::sync::Arc;
use std::time::Duration;

use caledit_core::ConfigProvider;
use serde_json::{json, Value};
use support::{context, get, post_json, send, StubCalendars};

#[tokio::test]
async fn get_configuration_renders_largest_exact_units() {
    let ctx = context(Arc::new(StubCalendars::default()), &[]);

    let (status, body) = send(&ctx, get("/configuration")).await;

    assert_eq!(status, 200);
    let config: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(config["updatePeriodValue"], 72);
    assert_eq!(config["updatePeriodUnit"], "HOURS");
    assert_eq!(config["queryPeriodValue"], 1);
    assert_eq!(config["queryPeriodUnit"], "MINUTES");
    assert_eq!(config["replacementText"], "Spots:");
}

#[tokio::test]
async fn post_configuration_replaces_rule_and_periods() {
    let ctx = context(Arc::new(StubCalendars::default()), &[]);

    let (status, body) = send(
        &ctx,
        post_json(
            "/configuration",
            &json!({
                "originalText": "Class size is ",
                "replacementText": "Spots: ",
                "updatePeriodValue": 2,
                "updatePeriodUnit": "HOURS",
                "queryPeriodValue": 90,
                "queryPeriodUnit": "SECONDS"
            }),
        ),
    )
    .await;

    assert_eq!(status, 200);
    let rendered: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(rendered["queryPeriodValue"], 90);
    assert_eq!(rendered["queryPeriodUnit"], "SECONDS");

    let snapshot = ctx.config.snapshot();
    assert_eq!(snapshot.replacement.original_text, "Class size is ");
    assert_eq!(snapshot.update_period, Duration::from_secs(7_200));
    assert_eq!(snapshot.query_period, Duration::from_secs(90));
}

#[tokio::test]
async fn invalid_configuration_is_rejected_and_not_applied() {
    let ctx = context(Arc::new(StubCalendars::default()), &[]);
    let before = ctx.config.snapshot();

    let (status, body) = send(
        &ctx,
        post_json(
            "/configuration",
            &json!({
                "originalText": "TBD",
                "replacementText": "Spots: TBD",
                "updatePeriodValue": 3,
                "updatePeriodUnit": "HOURS",
                "queryPeriodValue": 1,
                "queryPeriodUnit": "MINUTES"
            }),
        ),
    )
    .await;

    assert_eq!(status, 400);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "config");
    assert_eq!(ctx.config.snapshot(), before);
}

#[tokio::test]
async fn zero_period_is_rejected() {
    let ctx = context(Arc::new(StubCalendars::default()), &[]);

    let (status, _) = send(
        &ctx,
        post_json(
            "/configuration",
            &json!({
                "originalText": "TBD",
                "replacementText": "Spots:",
                "updatePeriodValue": 0,
                "updatePeriodUnit": "MILLIS",
                "queryPeriodValue": 1,
                "queryPeriodUnit": "MINUTES"
            }),
        ),
    )
    .await;

    assert_eq!(status, 400);
}

#[tokio::test]
async fn unusable_update_period_is_rejected_and_not_applied() {
    let ctx = context(Arc::new(StubCalendars::default()), &[]);
    let before = ctx.config.snapshot();

    let (status, body) = send(
        &ctx,
        post_json(
            "/configuration",
            &json!({
                "originalText": "TBD",
                "replacementText": "Spots:",
                "updatePeriodValue": 5_124_095_576_030_u64,
                "updatePeriodUnit": "HOURS",
                "queryPeriodValue": 1,
                "queryPeriodUnit": "MINUTES"
            }),
        ),
    )
    .await;

    assert_eq!(status, 400);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "config");
    assert_eq!(ctx.config.snapshot(), before);
}
