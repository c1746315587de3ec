//! Sending request descriptors to the Cloudmersive API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::credentials::CloudmersiveCredentials;
use super::request::{Method, Payload, ScanRequestDescriptor};
use crate::NodeError;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "Apikey";

const MAX_ERROR_TEXT: usize = 512;

/// Executes one request and returns the response JSON.
#[async_trait]
pub trait ScanTransport: Send + Sync {
    async fn send(
        &self,
        credentials: &CloudmersiveCredentials,
        request: &ScanRequestDescriptor,
    ) -> Result<Value, NodeError>;
}

/// Tuning knobs for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            user_agent: concat!("cloudmersive-scan/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self, NodeError> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Turn a descriptor into a ready-to-send request.
    pub fn build_request(
        &self,
        credentials: &CloudmersiveCredentials,
        request: &ScanRequestDescriptor,
    ) -> Result<reqwest::Request, NodeError> {
        let url = format!("{}{}", credentials.base_url(), request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, credentials.api_key.expose());

        for (name, value) in request.all_headers() {
            builder = builder.header(name, value.render());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.payload {
            Payload::None => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Form(parts) => {
                let mut form = Form::new();
                for (field, part) in parts {
                    let file = Part::bytes(part.bytes.clone())
                        .file_name(part.file_name.clone())
                        .mime_str(&part.content_type)?;
                    form = form.part(field.clone(), file);
                }
                builder.multipart(form)
            }
        };

        Ok(builder.build()?)
    }
}

#[async_trait]
impl ScanTransport for HttpTransport {
    async fn send(
        &self,
        credentials: &CloudmersiveCredentials,
        request: &ScanRequestDescriptor,
    ) -> Result<Value, NodeError> {
        let http_request = self.build_request(credentials, request)?;
        debug!(method = %request.method, url = %http_request.url(), "sending request");

        let response = self.client.execute(http_request).await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "response received");

        parse_response(status, &text)
    }
}

/// Map a status + body to the node result.
pub(crate) fn parse_response(status: StatusCode, text: &str) -> Result<Value, NodeError> {
    if status.is_success() {
        return serde_json::from_str(text).map_err(|e| NodeError::InvalidResponse(e.to_string()));
    }

    let body: Option<Value> = serde_json::from_str(text).ok();
    Err(NodeError::Api {
        status: status.as_u16(),
        message: error_message(status, body.as_ref(), text),
        body,
    })
}

fn error_message(status: StatusCode, body: Option<&Value>, text: &str) -> String {
    let from_json = body.and_then(|b| {
        ["message", "Message", "error", "Error", "title"]
            .iter()
            .find_map(|key| b.get(*key).and_then(Value::as_str))
    });
    if let Some(msg) = from_json {
        return msg.to_owned();
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned();
    }
    trimmed.chars().take(MAX_ERROR_TEXT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cloudmersive::credentials::{Environment, Secret};
    use crate::cloudmersive::request::{CloudStorageCredential, FormPart};
    use serde_json::json;

    fn transport() -> HttpTransport {
        HttpTransport::new(TransportConfig::default()).expect("client should build")
    }

    fn creds(env: Environment) -> CloudmersiveCredentials {
        CloudmersiveCredentials::new("key-123", env)
    }

    #[test]
    fn json_request_targets_environment_host_with_api_key() {
        let desc = ScanRequestDescriptor::post_json(
            "/virus/scan/website",
            json!({ "Url": "https://example.com" }),
        );
        let req = transport().build_request(&creds(Environment::Prod), &desc).unwrap();

        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(req.url().as_str(), "https://api.cloudmersive.com/virus/scan/website");
        assert_eq!(req.headers()["apikey"], "key-123");
        assert_eq!(req.headers()["content-type"], "application/json");

        let body = req.body().and_then(|b| b.as_bytes()).expect("buffered json body");
        let parsed: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(parsed, json!({ "Url": "https://example.com" }));
    }

    #[test]
    fn get_request_carries_query_and_no_body() {
        let desc = ScanRequestDescriptor::get("/virus/scan/cloud-storage/batch-job/status")
            .query_param("AsyncJobID", "job 1");
        let req = transport().build_request(&creds(Environment::Test), &desc).unwrap();

        assert_eq!(req.method(), reqwest::Method::GET);
        assert_eq!(req.url().host_str(), Some("testapi.cloudmersive.com"));
        assert_eq!(req.url().query(), Some("AsyncJobID=job+1"));
        assert!(req.body().is_none());
    }

    #[test]
    fn form_request_merges_custom_and_credential_headers() {
        let desc = ScanRequestDescriptor::post_form("/virus/scan/file/advanced")
            .form_part(
                "inputFile",
                FormPart {
                    bytes: b"hello".to_vec(),
                    file_name: "a.txt".into(),
                    content_type: "text/plain".into(),
                },
            )
            .header("allowMacros", true)
            .credential(
                CloudStorageCredential::new()
                    .field("bucketName", "b")
                    .secret("secretKey", &Secret::new("SK1")),
            );
        let req = transport().build_request(&creds(Environment::Test), &desc).unwrap();

        let headers = req.headers();
        assert_eq!(headers["allowmacros"], "true");
        assert_eq!(headers["bucketname"], "b");
        assert_eq!(headers["secretkey"], "SK1");
        let content_type = headers["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn invalid_header_value_is_a_transport_error_with_source() {
        let desc = ScanRequestDescriptor::post_form("/x").header("fileName", "bad\nname");
        let err = transport().build_request(&creds(Environment::Test), &desc).unwrap_err();
        assert!(matches!(err, NodeError::Transport { source: Some(_), .. }));

        let source = std::error::Error::source(&err).expect("client error is kept");
        assert!(source.downcast_ref::<Arc<reqwest::Error>>().is_some());
        assert!(err.to_string().starts_with("transport error: "));
    }

    #[test]
    fn success_body_is_returned_verbatim() {
        let value = parse_response(StatusCode::OK, r#"{"CleanResult":true,"FoundViruses":null}"#)
            .unwrap();
        assert_eq!(value, json!({ "CleanResult": true, "FoundViruses": null }));
    }

    #[test]
    fn non_json_success_is_invalid_response() {
        let err = parse_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, NodeError::InvalidResponse(_)));
    }

    #[test]
    fn api_error_prefers_server_message() {
        let err = parse_response(StatusCode::UNAUTHORIZED, r#"{"Message":"Invalid API key"}"#)
            .unwrap_err();
        match err {
            NodeError::Api { status, message, body } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
                assert!(body.is_some());
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_text_then_reason() {
        let err = parse_response(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(matches!(err, NodeError::Api { ref message, .. } if message == "upstream down"));

        let err = parse_response(StatusCode::BAD_GATEWAY, "").unwrap_err();
        assert!(matches!(err, NodeError::Api { ref message, .. } if message == "Bad Gateway"));
    }
}
