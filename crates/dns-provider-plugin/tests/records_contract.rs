//! Contract Test: Records
//!
//! Verifies `GET /records`:
//! - The request carries the versioned `Accept` header and no body
//! - Success bodies decode into one endpoint per array element
//! - Non-success statuses surface as "failed to get records with code <n>"
//! - Invalid JSON surfaces the parse error itself
//!
//! If this test fails, the engine's view of live records is wrong.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use dns_plugin_core::{CancellationToken, DnsProvider, Endpoint, Error};
use std::sync::Arc;

struct Case {
    name: &'static str,
    payload: &'static str,
    status: StatusCode,
    expected: Result<Vec<Endpoint>, String>,
}

fn full_endpoint() -> Endpoint {
    Endpoint::new("aDNSValue", "aRecordType", ["target1", "target2"])
        .with_set_identifier("anIdentifier")
        .with_ttl(3600)
        .with_label("firstLabel", "firstLabelValue")
        .with_label("secondLabel", "secondLabelValue")
        .with_provider_specific("name1Value", "value1value")
        .with_provider_specific("name2Value", "value2value")
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            name: "no records",
            payload: "[]",
            status: StatusCode::OK,
            expected: Ok(Vec::new()),
        },
        Case {
            name: "one record",
            payload: r#"[{ "dnsName" : "test.example.com" }]"#,
            status: StatusCode::OK,
            expected: Ok(vec![Endpoint::named("test.example.com")]),
        },
        Case {
            name: "multiple records",
            payload: r#"[{ "dnsName" : "test.example.com" }, { "dnsName" : "test2.example.com" }]"#,
            status: StatusCode::OK,
            expected: Ok(vec![
                Endpoint::named("test.example.com"),
                Endpoint::named("test2.example.com"),
            ]),
        },
        Case {
            name: "one record with all attributes",
            payload: r#"
[
    {
        "dnsName": "aDNSValue",
        "targets": ["target1", "target2"],
        "recordType": "aRecordType",
        "setIdentifier": "anIdentifier",
        "recordTTL": 3600,
        "labels": {
            "firstLabel": "firstLabelValue",
            "secondLabel": "secondLabelValue"
        },
        "providerSpecific": [
            { "name": "name1Value", "value": "value1value" },
            { "name": "name2Value", "value": "value2value" }
        ]
    }
]"#,
            status: StatusCode::OK,
            expected: Ok(vec![full_endpoint()]),
        },
        Case {
            name: "wrong json",
            payload: "[ invalid json",
            status: StatusCode::OK,
            expected: Err(serde_json::from_str::<Option<Vec<Endpoint>>>("[ invalid json")
                .unwrap_err()
                .to_string()),
        },
        Case {
            name: "server error",
            payload: r#"[ { "dnsName" : "test.example.com" } ]"#,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            expected: Err("failed to get records with code 500".to_string()),
        },
        Case {
            name: "not found",
            payload: "",
            status: StatusCode::NOT_FOUND,
            expected: Err("failed to get records with code 404".to_string()),
        },
        Case {
            name: "null body",
            payload: "null",
            status: StatusCode::OK,
            expected: Ok(Vec::new()),
        },
        Case {
            name: "null record attributes",
            payload: r#"[{ "dnsName" : "a.example.com", "targets" : null, "labels" : null, "providerSpecific" : null, "recordTTL" : null }]"#,
            status: StatusCode::OK,
            expected: Ok(vec![Endpoint::named("a.example.com")]),
        },
        Case {
            name: "unknown record attributes",
            payload: r#"[{ "unknownattribute" : "a value" }]"#,
            status: StatusCode::OK,
            expected: Ok(vec![Endpoint::default()]),
        },
    ]
}

#[tokio::test]
async fn records_covers_plugin_cases() {
    for case in cases() {
        let server = PluginServer::start(ScriptedReply::new(case.status, case.payload)).await;
        let provider = server.provider().await;

        let result = provider.records(&CancellationToken::new()).await;

        match (&case.expected, result) {
            (Ok(expected), Ok(records)) => {
                assert_eq!(&records, expected, "case '{}'", case.name);
            }
            (Err(expected), Err(err)) => {
                assert_eq!(&err.to_string(), expected, "case '{}'", case.name);
            }
            (expected, actual) => {
                panic!(
                    "case '{}': expected {:?}, got {:?}",
                    case.name, expected, actual
                );
            }
        }

        let request = server.only_operation_request();
        assert_eq!(request.method, Method::GET, "case '{}'", case.name);
        assert_eq!(request.path, "/records", "case '{}'", case.name);
        assert_eq!(request.header("accept"), Some(MEDIA_TYPE), "case '{}'", case.name);
        assert_eq!(request.body, "", "case '{}'", case.name);
    }
}

#[tokio::test]
async fn records_status_error_carries_status_code() {
    let server =
        PluginServer::start(ScriptedReply::new(StatusCode::SERVICE_UNAVAILABLE, "")).await;
    let provider = server.provider().await;

    let err = provider
        .records(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RemoteStatus {
            status: 503,
            ..
        }
    ));
}

#[tokio::test]
async fn records_decode_error_is_json_error() {
    let server = PluginServer::start(ScriptedReply::new(StatusCode::OK, "{}")).await;
    let provider = server.provider().await;

    let err = provider
        .records(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Json(_)), "got {:?}", err);
}

#[tokio::test]
async fn concurrent_records_calls_share_one_provider() {
    let server = PluginServer::start(ScriptedReply::new(
        StatusCode::OK,
        r#"[{"dnsName":"test.example.com"}]"#,
    ))
    .await;
    let provider = Arc::new(server.provider().await);

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let provider = Arc::clone(&provider);
        tasks.push(tokio::spawn(async move {
            provider.records(&CancellationToken::new()).await
        }));
    }

    for task in tasks {
        let records = task.await.unwrap().unwrap();
        assert_eq!(records, vec![Endpoint::named("test.example.com")]);
    }

    assert_eq!(server.operation_requests().len(), 8);
    assert_eq!(server.negotiation_requests().len(), 1);
}
