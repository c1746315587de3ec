//! `CloudmersiveVirusScanNode`: scans files, websites and cloud storage
//! objects through the Cloudmersive Virus Scan API.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use super::params::ScanParameters;
use super::request::ScanRequestDescriptor;
use super::resolver::resolve;
use super::transport::ScanTransport;
use crate::traits::ExecutionContext;
use crate::{ExecutableNode, Item, NodeError};

/// Node type name used when registering the node.
pub const NODE_TYPE: &str = "cloudmersiveVirusScanApi";

pub struct CloudmersiveVirusScanNode {
    parameters: ScanParameters,
    transport: Arc<dyn ScanTransport>,
}

impl CloudmersiveVirusScanNode {
    pub fn new(parameters: ScanParameters, transport: Arc<dyn ScanTransport>) -> Self {
        Self { parameters, transport }
    }

    /// Parse `config` as a parameter bag and build the node.
    pub fn from_config(config: Value, transport: Arc<dyn ScanTransport>) -> Result<Self, NodeError> {
        let parameters = ScanParameters::from_value(config)?;
        Ok(Self::new(parameters, transport))
    }

    /// Resolve the request for `item` without sending it.
    pub fn describe(&self, item: &Item) -> Result<ScanRequestDescriptor, NodeError> {
        let request = self.parameters.bind(item)?;
        Ok(resolve(&request))
    }
}

#[async_trait]
impl ExecutableNode for CloudmersiveVirusScanNode {
    #[instrument(skip_all, fields(item = index, execution_id = %ctx.execution_id))]
    async fn execute(
        &self,
        item: &Item,
        index: usize,
        ctx: &ExecutionContext,
    ) -> Result<Value, NodeError> {
        let request = self.parameters.bind(item)?;
        let descriptor = resolve(&request);

        info!(
            resource = request.resource(),
            operation = request.operation(),
            method = %descriptor.method,
            path = descriptor.path,
            "scanning item"
        );

        self.transport.send(&ctx.credentials, &descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudmersive::{CloudmersiveCredentials, Environment};
    use crate::mock::MockTransport;
    use crate::BinaryData;
    use serde_json::json;

    fn ctx() -> ExecutionContext {
        ExecutionContext::new(CloudmersiveCredentials::new("k", Environment::Test))
    }

    #[tokio::test]
    async fn execute_sends_resolved_descriptor_and_returns_response() {
        let transport = Arc::new(MockTransport::returning(json!({ "CleanResult": true })));
        let node = CloudmersiveVirusScanNode::from_config(
            json!({ "resource": "file", "operation": "scan" }),
            transport.clone(),
        )
        .unwrap();

        let item = Item::empty().with_binary(
            "data",
            BinaryData::new(b"PK\x03\x04".to_vec()).with_file_name("test.docx"),
        );
        let out = node.execute(&item, 0, &ctx()).await.unwrap();

        assert_eq!(out, json!({ "CleanResult": true }));
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/virus/scan/file");
        assert_eq!(sent[0].form_parts().unwrap()["inputFile"].file_name, "test.docx");
    }

    #[tokio::test]
    async fn missing_binary_fails_before_any_request() {
        let transport = Arc::new(MockTransport::returning(json!({})));
        let node =
            CloudmersiveVirusScanNode::from_config(json!({ "resource": "file" }), transport.clone())
                .unwrap();

        let err = node.execute(&Item::empty(), 0, &ctx()).await.unwrap_err();
        assert!(matches!(err, NodeError::Parameter(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let transport = Arc::new(MockTransport::returning(json!({})));
        let result = CloudmersiveVirusScanNode::from_config(
            json!({ "resource": "website", "url": "" }),
            transport,
        );
        assert!(matches!(result, Err(NodeError::Parameter(_))));
    }

    #[test]
    fn describe_does_not_touch_transport() {
        let transport = Arc::new(MockTransport::returning(json!({})));
        let node = CloudmersiveVirusScanNode::from_config(
            json!({ "resource": "website", "url": "https://example.com" }),
            transport.clone(),
        )
        .unwrap();

        let desc = node.describe(&Item::empty()).unwrap();
        assert_eq!(desc.path, "/virus/scan/website");
        assert!(transport.requests().is_empty());
    }
}
