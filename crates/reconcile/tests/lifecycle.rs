//! Source and endpoint lifecycles against an in-memory API.

mod common;

use common::FakeApi;
use logflare_model::{EndpointRecord, JsonText, NotificationSettings, SourceRecord};
use pretty_assertions::assert_eq;
use reconcile::{LifecycleState, Reconciler};
use serde_json::json;
use value_core::Severity;

fn live_source() -> SourceRecord {
    SourceRecord {
        id: Some(42),
        favorite: Some(true),
        api_quota: Some(25),
        token: Some("tok-1".into()),
        ..SourceRecord::new("my-cool-source")
    }
}

#[tokio::test]
async fn test_create_source_assigns_identity() {
    let api = FakeApi::new().respond_json(
        201,
        json!({"id": 42, "name": "my-cool-source", "favorite": true, "token": "tok-1"}),
    );
    let reconciler = Reconciler::new(&api);

    let desired = SourceRecord {
        favorite: Some(true),
        ..SourceRecord::new("my-cool-source")
    };
    let outcome = reconciler.create(LifecycleState::Absent, desired).await;

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.state, LifecycleState::Live);
    assert_eq!(outcome.record.id, Some(42));
    assert_eq!(outcome.record.favorite, Some(true));
    assert_eq!(outcome.record.token.as_ref().map(|t| t.as_str()), Some("tok-1"));
    assert_eq!(outcome.record.metrics, Some(JsonText::empty_object()));
    assert_eq!(outcome.record.notifications, None);

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    // Unset optional fields are omitted, not sent as null
    assert_eq!(
        calls[0].body,
        Some(json!({"name": "my-cool-source", "favorite": true}))
    );
}

#[tokio::test]
async fn test_create_rejects_non_201() {
    let api = FakeApi::new().respond(200, r#"{"id": 1}"#);
    let desired = SourceRecord::new("s");
    let outcome = Reconciler::new(&api)
        .create(LifecycleState::Planned, desired.clone())
        .await;

    assert_eq!(outcome.diagnostics.error_count(), 1);
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Client Error");
    assert_eq!(diag.detail, r#"Unable to create source, got status 200: {"id": 1}"#);
    assert_eq!(outcome.state, LifecycleState::Planned);
    assert_eq!(outcome.record, desired);
}

#[tokio::test]
async fn test_create_with_undecodable_body_is_a_single_error() {
    let api = FakeApi::new().respond(201, "<html>oops</html>");
    let outcome = Reconciler::new(&api)
        .create(LifecycleState::Absent, SourceRecord::new("s"))
        .await;

    assert_eq!(outcome.diagnostics.len(), 1);
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert!(diag.detail.starts_with("Unable to create source, got error: "));
}

#[tokio::test]
async fn test_create_from_live_makes_no_call() {
    let api = FakeApi::new();
    let outcome = Reconciler::new(&api)
        .create(LifecycleState::Live, SourceRecord::new("s"))
        .await;

    assert_eq!(api.call_count(), 0);
    assert_eq!(outcome.diagnostics.error_count(), 1);
    assert_eq!(
        outcome.diagnostics.iter().next().unwrap().summary,
        "Invalid Lifecycle Transition"
    );
}

#[tokio::test]
async fn test_update_failure_returns_prior_record() {
    let api = FakeApi::new().respond(500, "internal error");
    let prior = live_source();
    let desired = SourceRecord {
        favorite: Some(false),
        ..prior.clone()
    };

    let outcome = Reconciler::new(&api)
        .update(LifecycleState::Live, prior.clone(), desired)
        .await;

    assert_eq!(outcome.diagnostics.len(), 1);
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diag.severity, Severity::Error);
    assert!(diag.detail.contains("500"));
    assert!(diag.detail.contains("internal error"));
    assert_eq!(outcome.record, prior);
    assert_eq!(outcome.state, LifecycleState::Live);
}

#[tokio::test]
async fn test_update_resends_every_user_controlled_field() {
    let prior = SourceRecord {
        bq_table_id: Some("tbl".into()),
        metrics: Some(JsonText::new(r#"{"inserts":10}"#)),
        notifications: Some(NotificationSettings {
            user_email_notifications: Some(true),
            team_user_ids_for_email: Some(vec![]),
            ..Default::default()
        }),
        inserted_at: Some("2024-01-01T00:00:00Z".into()),
        ..live_source()
    };
    // Nothing changed since the last read
    let desired = prior.clone();
    let api = FakeApi::new().respond_json(
        200,
        json!({
            "id": 42,
            "name": "my-cool-source",
            "favorite": true,
            "api_quota": 25,
            "bq_table_id": "tbl",
            "metrics": {"inserts": 10},
            "notifications": {"user_email_notifications": true},
            "token": "tok-1",
            "inserted_at": "2024-01-01T00:00:00Z",
        }),
    );

    let outcome = Reconciler::new(&api)
        .update(LifecycleState::Live, prior.clone(), desired)
        .await;
    assert!(outcome.is_success(), "{:?}", outcome.diagnostics);

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "PUT");
    assert_eq!(calls[0].token.as_deref(), Some("tok-1"));
    assert_eq!(
        calls[0].body,
        Some(json!({
            "name": "my-cool-source",
            "favorite": true,
            "api_quota": 25,
            "bq_table_id": "tbl",
            "metrics": {"inserts": 10},
            "notifications": {
                "team_user_ids_for_email": [],
                "user_email_notifications": true,
            },
        }))
    );
    assert_eq!(
        outcome.record.notifications,
        Some(NotificationSettings {
            user_email_notifications: Some(true),
            team_user_ids_for_email: Some(vec![]),
            team_user_ids_for_schema_updates: Some(vec![]),
            team_user_ids_for_sms: Some(vec![]),
            ..Default::default()
        })
    );
}

#[tokio::test]
async fn test_update_with_empty_body_keeps_desired() {
    let api = FakeApi::new().respond(204, "");
    let prior = live_source();
    // Desired record from configuration carries no computed fields
    let desired = SourceRecord {
        favorite: Some(false),
        ..SourceRecord::new("my-cool-source")
    };

    let outcome = Reconciler::new(&api)
        .update(LifecycleState::Drifted, prior, desired)
        .await;

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.state, LifecycleState::Live);
    assert_eq!(outcome.record.favorite, Some(false));
    assert_eq!(outcome.record.id, Some(42));
    assert_eq!(api.calls()[0].token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_read_without_token_warns_and_makes_no_call() {
    let api = FakeApi::new();
    let record = SourceRecord::new("s");
    let outcome = Reconciler::new(&api)
        .read(LifecycleState::Live, record.clone())
        .await;

    assert_eq!(api.call_count(), 0);
    assert_eq!(outcome.diagnostics.len(), 1);
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.summary, "Resource Read Ignored");
    assert_eq!(diag.detail, "Source token is null, cannot read.");
    assert_eq!(outcome.record, record);
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_read_reports_drift_and_keeps_user_fields() {
    let api = FakeApi::new().respond_json(
        200,
        json!({
            "id": 42,
            "name": "renamed-upstream",
            "favorite": false,
            "api_quota": 50,
            "token": "tok-1",
        }),
    );
    let outcome = Reconciler::new(&api)
        .read(LifecycleState::Live, live_source())
        .await;

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.state, LifecycleState::Live);
    assert_eq!(outcome.record.name, "my-cool-source");
    assert_eq!(outcome.record.api_quota, Some(50));
    assert_eq!(outcome.drift, vec!["api_quota", "favorite", "metrics"]);
}

#[tokio::test]
async fn test_read_not_found_is_an_error() {
    let api = FakeApi::new().respond(404, "not found");
    let outcome = Reconciler::new(&api)
        .read(LifecycleState::Live, live_source())
        .await;

    assert_eq!(outcome.diagnostics.error_count(), 1);
    assert_eq!(
        outcome.diagnostics.iter().next().unwrap().detail,
        "Unable to read source, got status 404: not found"
    );
}

#[tokio::test]
async fn test_delete_without_token_is_a_no_op() {
    let api = FakeApi::new();
    let outcome = Reconciler::new(&api)
        .delete(LifecycleState::Live, SourceRecord::new("s"))
        .await;

    assert_eq!(api.call_count(), 0);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.state, LifecycleState::Destroyed);
}

#[tokio::test]
async fn test_delete_expects_no_content() {
    let api = FakeApi::new().respond(200, "{}");
    let outcome = Reconciler::new(&api)
        .delete(LifecycleState::Live, live_source())
        .await;
    assert_eq!(outcome.diagnostics.error_count(), 1);
    assert_eq!(outcome.state, LifecycleState::Live);

    let api = FakeApi::new().respond(204, "");
    let outcome = Reconciler::new(&api)
        .delete(LifecycleState::Live, live_source())
        .await;
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.state, LifecycleState::Destroyed);
    assert_eq!(api.calls()[0].method, "DELETE");
}

#[tokio::test]
async fn test_diagnostics_never_contain_sensitive_values() {
    let api = FakeApi::new().respond(403, "token tok-1 is not allowed for hook https://hooks.example/x");
    let prior = SourceRecord {
        slack_hook_url: Some("https://hooks.example/x".into()),
        ..live_source()
    };

    let outcome = Reconciler::new(&api)
        .update(LifecycleState::Live, prior.clone(), prior)
        .await;

    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(
        diag.detail,
        "Unable to update source, got status 403: token <sensitive> is not allowed for hook <sensitive>"
    );
}

#[tokio::test]
async fn test_short_token_keeps_status_code() {
    let api = FakeApi::new().respond(500, "internal error");
    let prior = SourceRecord {
        token: Some("5".into()),
        ..live_source()
    };

    let outcome = Reconciler::new(&api)
        .update(LifecycleState::Live, prior.clone(), prior)
        .await;

    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(
        diag.detail,
        "Unable to update source, got status 500: internal error"
    );
}

#[tokio::test]
async fn test_update_connection_failure() {
    let api = FakeApi::new().fail(common::connection_refused().await);
    let prior = live_source();
    let desired = SourceRecord {
        api_quota: Some(50),
        ..prior.clone()
    };

    let outcome = Reconciler::new(&api)
        .update(LifecycleState::Live, prior.clone(), desired)
        .await;

    assert_eq!(api.call_count(), 1);
    assert_eq!(outcome.diagnostics.len(), 1);
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.summary, "Client Error");
    assert!(
        diag.detail
            .starts_with("Unable to update source, got error: request failed: "),
        "{}",
        diag.detail
    );
    assert!(!diag.detail.contains("tok-1"));
    assert!(!diag.detail.contains("127.0.0.1"));
    assert_eq!(outcome.record, prior);
    assert_eq!(outcome.state, LifecycleState::Live);
}

#[tokio::test]
async fn test_create_transport_error_keeps_desired() {
    let decode_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let api = FakeApi::new().fail(decode_err.into());
    let desired = SourceRecord::new("my-cool-source").with_defaults();

    let outcome = Reconciler::new(&api)
        .create(LifecycleState::Absent, desired.clone())
        .await;

    assert_eq!(outcome.diagnostics.error_count(), 1);
    assert!(outcome.diagnostics.iter().next().unwrap().detail.starts_with(
        "Unable to create source, got error: response body could not be decoded: "
    ));
    assert_eq!(outcome.record, desired);
    assert_eq!(outcome.state, LifecycleState::Absent);
}

#[tokio::test]
async fn test_plan_validates_without_calling() {
    let api = FakeApi::new();
    let reconciler = Reconciler::new(&api);

    let planned = reconciler.plan(
        LifecycleState::Absent,
        EndpointRecord::new("errors", "select 1").with_defaults(),
    );
    assert!(planned.is_success());
    assert_eq!(planned.state, LifecycleState::Planned);

    let invalid = reconciler.plan(
        LifecycleState::Absent,
        EndpointRecord {
            source_mapping: Some(JsonText::new("[1]")),
            ..EndpointRecord::new("errors", "select 1")
        },
    );
    assert_eq!(invalid.diagnostics.error_count(), 1);
    assert_eq!(invalid.state, LifecycleState::Absent);
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_endpoint_create_then_update() {
    let api = FakeApi::new()
        .respond_json(
            201,
            json!({
                "id": 9,
                "name": "errors",
                "query": "select 1",
                "cache_duration_seconds": 3600,
                "enable_auth": true,
                "max_limit": 1000,
                "proactive_requerying_seconds": 1800,
                "sandboxable": false,
                "token": "ep-9",
            }),
        )
        .respond_json(
            200,
            json!({
                "id": 9,
                "name": "errors",
                "query": "select 2",
                "cache_duration_seconds": 60,
                "enable_auth": true,
                "max_limit": 1000,
                "proactive_requerying_seconds": 1800,
                "sandboxable": false,
                "source_mapping": {"logs": "abc"},
                "token": "ep-9",
            }),
        );
    let reconciler = Reconciler::new(&api);

    let desired = EndpointRecord::new("errors", "select 1").with_defaults();
    let created = reconciler.create(LifecycleState::Planned, desired).await;
    assert!(created.is_success());
    assert_eq!(created.record.source_mapping, Some(JsonText::empty_object()));

    let desired = EndpointRecord {
        query: "select 2".into(),
        cache_duration_seconds: Some(60),
        source_mapping: Some(JsonText::new(r#"{"logs": "abc"}"#)),
        ..created.record.clone()
    };
    let updated = reconciler
        .update(created.state, created.record, desired)
        .await;
    assert!(updated.is_success());
    assert_eq!(updated.record.query, "select 2");
    assert_eq!(updated.record.cache_duration_seconds, Some(60));
    assert_eq!(
        updated.record.source_mapping,
        Some(JsonText::new(r#"{"logs":"abc"}"#))
    );

    let calls = api.calls();
    assert_eq!(calls[1].token.as_deref(), Some("ep-9"));
    assert_eq!(
        calls[1].body.as_ref().and_then(|b| b.get("query")),
        Some(&json!("select 2"))
    );
}
