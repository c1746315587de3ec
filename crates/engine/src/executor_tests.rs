//! Tests for the item execution engine.
//!
//! These use `MockNode` and `MockTransport` so no network access is needed.

use std::sync::Arc;

use serde_json::json;

use nodes::cloudmersive::{CloudmersiveCredentials, CloudmersiveVirusScanNode, Environment};
use nodes::mock::{MockNode, MockTransport};
use nodes::{BinaryData, ExecutionContext, Item, NodeError, ParameterError};

use crate::{EngineError, ExecutorConfig, ItemExecutor, JobDefinition};

fn ctx() -> ExecutionContext {
    ExecutionContext::new(CloudmersiveCredentials::new("test-key", Environment::Test))
}

fn items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item { json: json!({ "n": i }), ..Item::default() })
        .collect()
}

fn api_error() -> NodeError {
    NodeError::Api { status: 401, message: "Invalid API key".into(), body: None }
}

// ============================================================
// Generic loop behaviour (MockNode)
// ============================================================

#[tokio::test]
async fn items_run_in_input_order_and_are_paired() {
    let node = MockNode::returning("scan", json!({ "CleanResult": true }));
    let executor = ItemExecutor::new(ExecutorConfig::default());

    let result = executor.run(&node, &items(3), &ctx()).await.expect("run should succeed");

    assert_eq!(node.seen(), vec![0, 1, 2]);
    assert_eq!(result.failed, 0);
    let paired: Vec<usize> = result.items.iter().map(|o| o.paired_item).collect();
    assert_eq!(paired, vec![0, 1, 2]);
    assert_eq!(result.items[2].json["CleanResult"], true);
    assert!(result.finished_at >= result.started_at);
}

#[tokio::test]
async fn first_failure_aborts_the_run_by_default() {
    let node = MockNode::failing_at("scan", [1], api_error());
    let executor = ItemExecutor::new(ExecutorConfig::default());

    let err = executor.run(&node, &items(3), &ctx()).await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::ItemFailed { index: 1, source: NodeError::Api { status: 401, .. } }
    ));
    // Item 2 was never executed.
    assert_eq!(node.seen(), vec![0, 1]);
}

#[tokio::test]
async fn continue_on_fail_records_error_and_keeps_going() {
    let node = MockNode::failing_at("scan", [0, 2], api_error());
    let executor = ItemExecutor::new(ExecutorConfig { continue_on_fail: true });

    let result = executor.run(&node, &items(3), &ctx()).await.expect("run should not abort");

    assert_eq!(node.call_count(), 3);
    assert_eq!(result.failed, 2);
    assert_eq!(result.items.len(), 3);
    assert_eq!(
        result.items[0].json,
        json!({ "error": "API request failed with status 401: Invalid API key" })
    );
    assert_eq!(result.items[1].json["echo"]["n"], 1);
    assert_eq!(result.items[2].paired_item, 2);
    assert!(result.items[2].json.get("error").is_some());
}

#[tokio::test]
async fn empty_input_produces_empty_output() {
    let node = MockNode::failing("scan", api_error());
    let executor = ItemExecutor::new(ExecutorConfig::default());

    let result = executor.run(&node, &[], &ctx()).await.unwrap();
    assert!(result.items.is_empty());
    assert_eq!(node.call_count(), 0);
}

// ============================================================
// End-to-end with the Cloudmersive node (MockTransport)
// ============================================================

#[tokio::test]
async fn file_job_scans_each_attachment() {
    let job = JobDefinition::from_json(
        r#"{
            "parameters": { "resource": "file", "operation": "scan" },
            "items": [
                { "json": {}, "binary": { "data": { "data": "UEsDBA==", "fileName": "test.docx" } } },
                { "json": {}, "binary": { "data": { "data": "aGVsbG8=" } } }
            ]
        }"#,
    )
    .unwrap();

    let transport = Arc::new(MockTransport::returning(json!({ "CleanResult": true })));
    let node = CloudmersiveVirusScanNode::from_config(job.parameters.clone(), transport.clone())
        .unwrap();
    let executor = ItemExecutor::new(ExecutorConfig { continue_on_fail: job.continue_on_fail });

    let result = executor.run(&node, &job.effective_items(), &ctx()).await.unwrap();

    assert_eq!(result.items.len(), 2);
    let sent = transport.requests();
    assert_eq!(sent.len(), 2);
    let first = &sent[0].form_parts().unwrap()["inputFile"];
    assert_eq!(first.bytes, b"PK\x03\x04".to_vec());
    assert_eq!(first.file_name, "test.docx");
    assert_eq!(sent[1].form_parts().unwrap()["inputFile"].file_name, "file");
}

#[tokio::test]
async fn missing_attachment_is_captured_per_item() {
    let transport = Arc::new(MockTransport::returning(json!({ "CleanResult": true })));
    let node =
        CloudmersiveVirusScanNode::from_config(json!({ "resource": "file" }), transport.clone())
            .unwrap();
    let executor = ItemExecutor::new(ExecutorConfig { continue_on_fail: true });

    let with_file = Item::empty().with_binary("data", BinaryData::new(vec![1, 2]));
    let without_file = Item::empty();

    let result = executor
        .run(&node, &[with_file, without_file], &ctx())
        .await
        .unwrap();

    assert_eq!(result.failed, 1);
    assert_eq!(result.items[0].json, json!({ "CleanResult": true }));
    assert_eq!(
        result.items[1].json["error"],
        format!("invalid parameters: {}", ParameterError::MissingBinary("data".into()))
    );
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn transport_failure_aborts_cloud_storage_job() {
    let transport = Arc::new(MockTransport::failing(NodeError::transport("connection refused")));
    let node = CloudmersiveVirusScanNode::from_config(
        json!({
            "resource": "azureBlob",
            "operation": "scanAdvancedBatchJob",
            "connectionString": "cs",
            "containerName": "c",
            "blobPath": "p"
        }),
        transport.clone(),
    )
    .unwrap();
    let executor = ItemExecutor::new(ExecutorConfig::default());

    let err = executor.run(&node, &[Item::empty()], &ctx()).await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::ItemFailed { index: 0, source: NodeError::Transport { .. } }
    ));
    assert_eq!(
        transport.requests()[0].path,
        "/virus/scan/cloud-storage/azure-blob/single/advanced/batch-job"
    );
}
