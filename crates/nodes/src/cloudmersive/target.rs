//! Typed scan targets.
//!
//! A [`ScanRequest`] is a resource together with the operation to run on it
//! and everything that operation needs. Resource/operation pairs the API
//! does not offer cannot be constructed.

use serde::{Deserialize, Deserializer, Serialize};

use super::controls::AdvancedControlSet;
use super::credentials::Secret;
use crate::BinaryData;

/// Treat `""` the same as a missing optional field.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Treat `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Cloud storage locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBlobLocation {
    pub connection_string: Secret,
    pub container_name: String,
    pub blob_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsS3Location {
    pub access_key: String,
    pub secret_key: Secret,
    pub bucket_region: String,
    pub bucket_name: String,
    pub key_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub role_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpStorageLocation {
    pub bucket_name: String,
    pub object_name: String,
    /// Service-account key file contents (JSON text).
    pub json_credential_file: Secret,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePointLocation {
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub client_secret: Secret,
    pub sharepoint_domain_name: String,
    #[serde(rename = "siteID")]
    pub site_id: String,
    #[serde(rename = "tenantID", default, deserialize_with = "empty_as_none")]
    pub tenant_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub file_path: Option<String>,
    #[serde(rename = "itemID", default, deserialize_with = "empty_as_none")]
    pub item_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMode {
    Basic,
    Advanced {
        controls: AdvancedControlSet,
        override_file_name: Option<String>,
    },
}

/// Modes offered by the single-object cloud storage endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    Basic,
    Advanced(AdvancedControlSet),
}

/// Azure Blob additionally supports submitting the advanced scan as an
/// asynchronous batch job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AzureBlobMode {
    Basic,
    Advanced(AdvancedControlSet),
    AdvancedBatchJob(AdvancedControlSet),
}

// ---------------------------------------------------------------------------
// ScanRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    File { file: BinaryData, mode: FileMode },
    Website { url: String },
    AzureBlob { location: AzureBlobLocation, mode: AzureBlobMode },
    AwsS3 { location: AwsS3Location, mode: StorageMode },
    GcpStorage { location: GcpStorageLocation, mode: StorageMode },
    SharePointSite { location: SharePointLocation, mode: StorageMode },
    BatchJobStatus { async_job_id: String },
}

impl ScanRequest {
    /// Resource tag, as used in parameter bags.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::Website { .. } => "website",
            Self::AzureBlob { .. } => "azureBlob",
            Self::AwsS3 { .. } => "awsS3",
            Self::GcpStorage { .. } => "gcpStorage",
            Self::SharePointSite { .. } => "sharepointSite",
            Self::BatchJobStatus { .. } => "batchJob",
        }
    }

    /// Operation tag, as used in parameter bags.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::File { mode: FileMode::Basic, .. }
            | Self::Website { .. }
            | Self::AzureBlob { mode: AzureBlobMode::Basic, .. }
            | Self::AwsS3 { mode: StorageMode::Basic, .. }
            | Self::GcpStorage { mode: StorageMode::Basic, .. }
            | Self::SharePointSite { mode: StorageMode::Basic, .. } => "scan",
            Self::File { mode: FileMode::Advanced { .. }, .. }
            | Self::AzureBlob { mode: AzureBlobMode::Advanced(_), .. }
            | Self::AwsS3 { mode: StorageMode::Advanced(_), .. }
            | Self::GcpStorage { mode: StorageMode::Advanced(_), .. }
            | Self::SharePointSite { mode: StorageMode::Advanced(_), .. } => "scanAdvanced",
            Self::AzureBlob { mode: AzureBlobMode::AdvancedBatchJob(_), .. } => {
                "scanAdvancedBatchJob"
            }
            Self::BatchJobStatus { .. } => "getStatus",
        }
    }
}
