//! Node parameters: the untyped parameter bag parsed once into a typed,
//! validated value.
//!
//! The bag is a JSON object keyed like the workflow editor's fields:
//!
//! ```json
//! { "resource": "awsS3", "operation": "scanAdvanced",
//!   "accessKey": "AK1", "secretKey": "SK1", "bucketRegion": "us-east-1",
//!   "bucketName": "b", "keyName": "k.pdf",
//!   "advancedControls": { "allowMacros": true } }
//! ```
//!
//! `resource` defaults to `file` and every `operation` defaults to `scan`
//! (`getStatus` for `batchJob`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::controls::AdvancedControlSet;
use super::target::{
    empty_as_none, null_as_default, AwsS3Location, AzureBlobLocation, AzureBlobMode, FileMode,
    GcpStorageLocation, ScanRequest, SharePointLocation, StorageMode,
};
use crate::{Item, ParameterError};

const DEFAULT_BINARY_PROPERTY: &str = "data";

fn default_binary_property() -> String {
    DEFAULT_BINARY_PROPERTY.to_owned()
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileOperation {
    #[default]
    Scan,
    ScanAdvanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WebsiteOperation {
    #[default]
    Scan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AzureBlobOperation {
    #[default]
    Scan,
    ScanAdvanced,
    ScanAdvancedBatchJob,
}

/// Operations of the AWS S3, GCP Storage and SharePoint resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageOperation {
    #[default]
    Scan,
    ScanAdvanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchJobOperation {
    #[default]
    GetStatus,
}

// ---------------------------------------------------------------------------
// Per-resource parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileParameters {
    #[serde(default)]
    pub operation: FileOperation,
    /// Name of the item binary property holding the file.
    #[serde(default = "default_binary_property")]
    pub binary_property_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub override_file_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_controls: AdvancedControlSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteParameters {
    #[serde(default)]
    pub operation: WebsiteOperation,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBlobParameters {
    #[serde(default)]
    pub operation: AzureBlobOperation,
    #[serde(flatten)]
    pub location: AzureBlobLocation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_controls: AdvancedControlSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsS3Parameters {
    #[serde(default)]
    pub operation: StorageOperation,
    #[serde(flatten)]
    pub location: AwsS3Location,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_controls: AdvancedControlSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpStorageParameters {
    #[serde(default)]
    pub operation: StorageOperation,
    #[serde(flatten)]
    pub location: GcpStorageLocation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_controls: AdvancedControlSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePointParameters {
    #[serde(default)]
    pub operation: StorageOperation,
    #[serde(flatten)]
    pub location: SharePointLocation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_controls: AdvancedControlSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJobParameters {
    #[serde(default)]
    pub operation: BatchJobOperation,
    #[serde(rename = "asyncJobID")]
    pub async_job_id: String,
}

// ---------------------------------------------------------------------------
// ScanParameters
// ---------------------------------------------------------------------------

/// A validated parameter bag, one variant per resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "camelCase")]
pub enum ScanParameters {
    File(FileParameters),
    Website(WebsiteParameters),
    AzureBlob(AzureBlobParameters),
    AwsS3(AwsS3Parameters),
    GcpStorage(GcpStorageParameters),
    #[serde(rename = "sharepointSite")]
    SharePointSite(SharePointParameters),
    BatchJob(BatchJobParameters),
}

fn require(value: &str, name: &'static str) -> Result<(), ParameterError> {
    if value.trim().is_empty() {
        return Err(ParameterError::MissingField(name));
    }
    Ok(())
}

fn storage_mode(operation: StorageOperation, controls: &AdvancedControlSet) -> StorageMode {
    match operation {
        StorageOperation::Scan => StorageMode::Basic,
        StorageOperation::ScanAdvanced => StorageMode::Advanced(controls.clone()),
    }
}

impl ScanParameters {
    /// Parse and validate a parameter bag.
    ///
    /// # Errors
    /// - [`ParameterError::Malformed`] for unknown resources, operations the
    ///   resource does not offer, missing or mistyped fields.
    /// - [`ParameterError::MissingField`] for required fields left empty.
    pub fn from_value(mut value: Value) -> Result<Self, ParameterError> {
        if let Some(obj) = value.as_object_mut() {
            obj.entry("resource").or_insert_with(|| Value::String("file".into()));
        }

        let params: Self = serde_json::from_value(value)
            .map_err(|e| ParameterError::Malformed(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Check that every required field is non-empty.
    pub fn validate(&self) -> Result<(), ParameterError> {
        match self {
            Self::File(p) => require(&p.binary_property_name, "binaryPropertyName"),
            Self::Website(p) => require(&p.url, "url"),
            Self::AzureBlob(p) => {
                require(p.location.connection_string.expose(), "connectionString")?;
                require(&p.location.container_name, "containerName")?;
                require(&p.location.blob_path, "blobPath")
            }
            Self::AwsS3(p) => {
                require(&p.location.access_key, "accessKey")?;
                require(p.location.secret_key.expose(), "secretKey")?;
                require(&p.location.bucket_region, "bucketRegion")?;
                require(&p.location.bucket_name, "bucketName")?;
                require(&p.location.key_name, "keyName")
            }
            Self::GcpStorage(p) => {
                require(&p.location.bucket_name, "bucketName")?;
                require(&p.location.object_name, "objectName")?;
                require(p.location.json_credential_file.expose(), "jsonCredentialFile")
            }
            Self::SharePointSite(p) => {
                require(&p.location.client_id, "clientID")?;
                require(p.location.client_secret.expose(), "clientSecret")?;
                require(&p.location.sharepoint_domain_name, "sharepointDomainName")?;
                require(&p.location.site_id, "siteID")?;
                if p.location.file_path.is_none() && p.location.item_id.is_none() {
                    return Err(ParameterError::MissingField("filePath"));
                }
                Ok(())
            }
            Self::BatchJob(p) => require(&p.async_job_id, "asyncJobID"),
        }
    }

    /// Combine the parameters with one input item into a [`ScanRequest`].
    ///
    /// Only the file resource reads from the item (its binary attachment).
    pub fn bind(&self, item: &Item) -> Result<ScanRequest, ParameterError> {
        let request = match self {
            Self::File(p) => {
                let file = item
                    .binary
                    .get(&p.binary_property_name)
                    .cloned()
                    .ok_or_else(|| ParameterError::MissingBinary(p.binary_property_name.clone()))?;
                let mode = match p.operation {
                    FileOperation::Scan => FileMode::Basic,
                    FileOperation::ScanAdvanced => FileMode::Advanced {
                        controls: p.advanced_controls.clone(),
                        override_file_name: p.override_file_name.clone(),
                    },
                };
                ScanRequest::File { file, mode }
            }
            Self::Website(p) => ScanRequest::Website { url: p.url.clone() },
            Self::AzureBlob(p) => {
                let controls = p.advanced_controls.clone();
                let mode = match p.operation {
                    AzureBlobOperation::Scan => AzureBlobMode::Basic,
                    AzureBlobOperation::ScanAdvanced => AzureBlobMode::Advanced(controls),
                    AzureBlobOperation::ScanAdvancedBatchJob => {
                        AzureBlobMode::AdvancedBatchJob(controls)
                    }
                };
                ScanRequest::AzureBlob { location: p.location.clone(), mode }
            }
            Self::AwsS3(p) => ScanRequest::AwsS3 {
                location: p.location.clone(),
                mode: storage_mode(p.operation, &p.advanced_controls),
            },
            Self::GcpStorage(p) => ScanRequest::GcpStorage {
                location: p.location.clone(),
                mode: storage_mode(p.operation, &p.advanced_controls),
            },
            Self::SharePointSite(p) => ScanRequest::SharePointSite {
                location: p.location.clone(),
                mode: storage_mode(p.operation, &p.advanced_controls),
            },
            Self::BatchJob(p) => ScanRequest::BatchJobStatus {
                async_job_id: p.async_job_id.clone(),
            },
        };
        Ok(request)
    }
}
