//! The outbound request descriptor produced by the resolver.
//!
//! A [`ScanRequestDescriptor`] fully describes one HTTP call: method, path,
//! headers, query string and payload. It carries no base URL and no API
//! key; those are added by the transport.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Map, Value};

use super::credentials::Secret;

/// HTTP method. The API only needs these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A header value: advanced controls are booleans, everything else is text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Text(String),
    Flag(bool),
}

impl HeaderValue {
    /// Wire form of the value.
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Flag(b) => b.to_string(),
        }
    }
}

impl From<bool> for HeaderValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One multipart form field carrying a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// The request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No body at all (GET requests).
    None,
    /// `application/json` body.
    Json(Value),
    /// `multipart/form-data` body; may legitimately have zero parts.
    Form(BTreeMap<String, FormPart>),
}

#[derive(Clone, PartialEq, Eq)]
enum CredentialValue {
    Plain(String),
    Secret(Secret),
}

impl CredentialValue {
    fn expose(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Secret(s) => s.expose(),
        }
    }
}

/// Cloud-storage location and credential fields.
///
/// The API expects these as request headers, but they are kept apart from
/// the generic header map so secrets never end up in `Debug` output or in
/// [`ScanRequestDescriptor::to_redacted_json`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CloudStorageCredential {
    fields: Vec<(&'static str, CredentialValue)>,
}

impl CloudStorageCredential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-secret field (bucket, container, path, ...).
    pub fn field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, CredentialValue::Plain(value.into())));
        self
    }

    /// Add a field only when a value is present.
    pub fn optional_field(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.field(name, v),
            None => self,
        }
    }

    /// Add a secret field (keys, connection strings, client secrets).
    pub fn secret(mut self, name: &'static str, value: &Secret) -> Self {
        self.fields.push((name, CredentialValue::Secret(value.clone())));
        self
    }

    /// Header name/value pairs in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.fields.iter().map(|(name, value)| (*name, value.expose()))
    }

    fn redacted(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| {
                let shown = match value {
                    CredentialValue::Plain(s) => Value::String(s.clone()),
                    CredentialValue::Secret(_) => Value::String("***".into()),
                };
                ((*name).to_owned(), shown)
            })
            .collect()
    }
}

impl fmt::Debug for CloudStorageCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted()).finish()
    }
}

/// Everything needed to issue one API call, minus base URL and API key.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequestDescriptor {
    pub method: Method,
    pub path: &'static str,
    pub headers: BTreeMap<String, HeaderValue>,
    pub credential: Option<CloudStorageCredential>,
    pub query: BTreeMap<String, String>,
    pub payload: Payload,
}

impl ScanRequestDescriptor {
    /// A GET request: query parameters only, never a body.
    pub fn get(path: &'static str) -> Self {
        Self::with_payload(Method::Get, path, Payload::None)
    }

    /// A POST with a JSON object body.
    pub fn post_json(path: &'static str, body: Value) -> Self {
        Self::with_payload(Method::Post, path, Payload::Json(body))
    }

    /// A POST with a multipart body (possibly empty).
    pub fn post_form(path: &'static str) -> Self {
        Self::with_payload(Method::Post, path, Payload::Form(BTreeMap::new()))
    }

    fn with_payload(method: Method, path: &'static str, payload: Payload) -> Self {
        Self {
            method,
            path,
            headers: BTreeMap::new(),
            credential: None,
            query: BTreeMap::new(),
            payload,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(name.to_owned(), value.into());
        self
    }

    pub fn query_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.insert(name.to_owned(), value.into());
        self
    }

    pub fn credential(mut self, credential: CloudStorageCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Add a form part. Has no effect unless the payload is a form.
    pub fn form_part(mut self, field: &str, part: FormPart) -> Self {
        if let Payload::Form(parts) = &mut self.payload {
            parts.insert(field.to_owned(), part);
        }
        self
    }

    pub fn form_parts(&self) -> Option<&BTreeMap<String, FormPart>> {
        match &self.payload {
            Payload::Form(parts) => Some(parts),
            _ => None,
        }
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Json(body) => Some(body),
            _ => None,
        }
    }

    /// Generic headers merged with the credential headers, as sent on the
    /// wire. Credential fields win on a name clash.
    pub fn all_headers(&self) -> BTreeMap<String, HeaderValue> {
        let mut merged = self.headers.clone();
        if let Some(credential) = &self.credential {
            for (name, value) in credential.headers() {
                merged.insert(name.to_owned(), HeaderValue::Text(value.to_owned()));
            }
        }
        merged
    }

    /// A JSON summary safe to print: secrets masked, file parts reduced to
    /// their name, type and size.
    pub fn to_redacted_json(&self) -> Value {
        let headers: Map<String, Value> = self
            .headers
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    HeaderValue::Text(s) => Value::String(s.clone()),
                    HeaderValue::Flag(b) => Value::Bool(*b),
                };
                (k.clone(), value)
            })
            .collect();

        let payload = match &self.payload {
            Payload::None => Value::Null,
            Payload::Json(body) => json!({ "json": body }),
            Payload::Form(parts) => {
                let parts: Map<String, Value> = parts
                    .iter()
                    .map(|(field, part)| {
                        (
                            field.clone(),
                            json!({
                                "fileName": part.file_name,
                                "contentType": part.content_type,
                                "size": part.bytes.len(),
                            }),
                        )
                    })
                    .collect();
                json!({ "form": parts })
            }
        };

        json!({
            "method": self.method.to_string(),
            "path": self.path,
            "headers": headers,
            "credential": self.credential.as_ref().map(|c| Value::Object(c.redacted())),
            "query": self.query,
            "payload": payload,
        })
    }
}
