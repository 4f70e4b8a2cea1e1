//! Resource synchronizer behaviour against recorded collaborators.

use elastic_sync_config::ResourceRef;
use elastic_sync_core::{
    Endpoint, RequestOptions, ResourceKind, ResourceSynchronizer, SyncError, SyncOutcome,
};
use elastic_sync_test_utils::{RecordingTransport, StaticBodies};
use pretty_assertions::assert_eq;
use serde_json::json;

fn index_body(field: &str, field_type: &str) -> serde_json::Value {
    json!({ "mappings": { "properties": { field: { "type": field_type } } } })
}

fn bodies() -> StaticBodies {
    StaticBodies::new()
        .with_body("a.json", index_body("a", "keyword"))
        .with_body("b.json", index_body("b", "long"))
        .with_body("t.json", json!({ "index_patterns": ["logs-*"] }))
}

/// Valid indices are each put exactly once with their body and JSON header.
#[tokio::test]
async fn puts_each_index_once_with_its_body() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new();
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let outcomes = synchronizer
        .sync_indices(&[ResourceRef::new("A", "a.json"), ResourceRef::new("B", "b.json")])
        .await
        .expect("sync");

    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        transport.urls(),
        vec![
            "https://search.internal/A".to_string(),
            "https://search.internal/B".to_string(),
        ]
    );
    for call in transport.calls() {
        assert_eq!(
            call.request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        let expected = if call.url.ends_with("/A") {
            index_body("a", "keyword")
        } else {
            index_body("b", "long")
        };
        assert_eq!(call.request.body, expected);
    }
}

#[tokio::test]
async fn template_targets_template_path() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new();
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let outcomes = synchronizer
        .sync_templates(&[ResourceRef::new("T", "t.json")])
        .await
        .expect("sync");

    assert_eq!(
        outcomes,
        vec![SyncOutcome::Applied {
            kind: ResourceKind::Template,
            name: "T".to_string(),
        }]
    );
    assert_eq!(
        transport.urls(),
        vec!["https://search.internal/_template/T".to_string()]
    );
}

/// A nameless index fails the run, is never put, and does not stop siblings.
#[tokio::test]
async fn index_without_name_fails_without_put() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new();
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let nameless = ResourceRef {
        name: None,
        file: Some("a.json".to_string()),
    };
    let err = synchronizer
        .sync_indices(&[nameless, ResourceRef::new("B", "b.json")])
        .await
        .expect_err("nameless index");

    let SyncError::Validation(message) = err else {
        panic!("expected validation error");
    };
    assert_eq!(message, "Index does not have a name.");
    assert_eq!(
        transport.urls(),
        vec!["https://search.internal/B".to_string()]
    );
}

#[tokio::test]
async fn index_without_file_fails_without_put() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new();
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let fileless = ResourceRef {
        name: Some("A".to_string()),
        file: None,
    };
    let err = synchronizer
        .sync_indices(&[fileless])
        .await
        .expect_err("fileless index");

    assert_eq!(err.to_string(), "Index does not have a file location.");
    assert!(transport.calls().is_empty());
}

/// Validation of a later template entry does not prevent earlier dispatches.
#[tokio::test]
async fn invalid_template_still_dispatches_siblings() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new();
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let err = synchronizer
        .sync_templates(&[ResourceRef::new("T", "t.json"), ResourceRef::default()])
        .await
        .expect_err("nameless template");

    assert_eq!(err.to_string(), "Template does not have a name.");
    assert_eq!(
        transport.urls(),
        vec!["https://search.internal/_template/T".to_string()]
    );
}

/// An existing index is a silent no-op.
#[tokio::test]
async fn index_conflict_is_suppressed() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new()
        .with_error_type("https://search.internal/A", "resource_already_exists_exception");
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let outcomes = synchronizer
        .sync_indices(&[ResourceRef::new("A", "a.json"), ResourceRef::new("B", "b.json")])
        .await
        .expect("conflict tolerated");

    assert_eq!(
        outcomes,
        vec![
            SyncOutcome::SuppressedConflict {
                kind: ResourceKind::Index,
                name: "A".to_string(),
            },
            SyncOutcome::Applied {
                kind: ResourceKind::Index,
                name: "B".to_string(),
            },
        ]
    );
}

/// The same conflict on a template propagates.
#[tokio::test]
async fn template_conflict_propagates() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new().with_error_type(
        "https://search.internal/_template/T",
        "resource_already_exists_exception",
    );
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let err = synchronizer
        .sync_templates(&[ResourceRef::new("T", "t.json")])
        .await
        .expect_err("template conflict");

    let SyncError::Remote(failure) = err else {
        panic!("expected remote error");
    };
    assert_eq!(failure.error_type(), Some("resource_already_exists_exception"));
}

/// Other remote errors on indices propagate with their cause attached.
#[tokio::test]
async fn other_index_errors_propagate() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new()
        .with_error_type("https://search.internal/A", "mapper_parsing_exception")
        .with_transport_error("https://search.internal/B", "connection reset");
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let err = synchronizer
        .sync_indices(&[ResourceRef::new("A", "a.json"), ResourceRef::new("B", "b.json")])
        .await
        .expect_err("remote failure");

    let SyncError::Remote(failure) = err else {
        panic!("expected remote error");
    };
    assert_eq!(failure.error_type(), Some("mapper_parsing_exception"));
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn missing_body_fails_before_put() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new();
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let err = synchronizer
        .sync_indices(&[ResourceRef::new("A", "missing.json")])
        .await
        .expect_err("missing body");

    assert!(matches!(err, SyncError::Load { .. }));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn empty_collection_settles_immediately() {
    let endpoint = Endpoint::new("search.internal");
    let options = RequestOptions::default();
    let transport = RecordingTransport::new();
    let loader = bodies();
    let synchronizer = ResourceSynchronizer::new(&endpoint, &options, &transport, &loader);

    let outcomes = synchronizer.sync_indices(&[]).await.expect("sync");
    assert!(outcomes.is_empty());
}
