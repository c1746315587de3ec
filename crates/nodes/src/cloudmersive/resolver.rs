//! Request-shape resolution: [`ScanRequest`] → [`ScanRequestDescriptor`].
//!
//! Pure and infallible. Required fields were validated when the parameters
//! were parsed; optional fields that are absent are left out of the request
//! entirely rather than sent empty.

use serde_json::json;

use super::controls::AdvancedControlSet;
use super::request::{CloudStorageCredential, FormPart, ScanRequestDescriptor};
use super::target::{
    AwsS3Location, AzureBlobLocation, AzureBlobMode, FileMode, GcpStorageLocation,
    ScanRequest, SharePointLocation, StorageMode,
};

pub const FILE_SCAN_PATH: &str = "/virus/scan/file";
pub const FILE_SCAN_ADVANCED_PATH: &str = "/virus/scan/file/advanced";
pub const WEBSITE_SCAN_PATH: &str = "/virus/scan/website";
pub const AZURE_BLOB_PATH: &str = "/virus/scan/cloud-storage/azure-blob/single";
pub const AZURE_BLOB_ADVANCED_PATH: &str = "/virus/scan/cloud-storage/azure-blob/single/advanced";
pub const AZURE_BLOB_BATCH_JOB_PATH: &str =
    "/virus/scan/cloud-storage/azure-blob/single/advanced/batch-job";
pub const AWS_S3_PATH: &str = "/virus/scan/cloud-storage/aws-s3/single";
pub const AWS_S3_ADVANCED_PATH: &str = "/virus/scan/cloud-storage/aws-s3/single/advanced";
pub const GCP_STORAGE_PATH: &str = "/virus/scan/cloud-storage/gcp-storage/single";
pub const GCP_STORAGE_ADVANCED_PATH: &str = "/virus/scan/cloud-storage/gcp-storage/single/advanced";
pub const SHAREPOINT_PATH: &str = "/virus/scan/cloud-storage/sharepoint-online/site/single";
pub const SHAREPOINT_ADVANCED_PATH: &str = "/virus/scan/cloud-storage/sharepoint-online/site/advanced";
pub const BATCH_JOB_STATUS_PATH: &str = "/virus/scan/cloud-storage/batch-job/status";

const DEFAULT_FILE_NAME: &str = "file";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Build the request descriptor for `request`.
pub fn resolve(request: &ScanRequest) -> ScanRequestDescriptor {
    match request {
        ScanRequest::File { file, mode } => {
            let part = FormPart {
                bytes: file.data.clone(),
                file_name: file
                    .file_name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned()),
                content_type: file
                    .mime_type
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
            };
            match mode {
                FileMode::Basic => {
                    ScanRequestDescriptor::post_form(FILE_SCAN_PATH).form_part("inputFile", part)
                }
                FileMode::Advanced { controls, override_file_name } => {
                    let mut desc = ScanRequestDescriptor::post_form(FILE_SCAN_ADVANCED_PATH)
                        .form_part("inputFile", part);
                    if let Some(name) = override_file_name {
                        desc = desc.header("fileName", name.as_str());
                    }
                    controls.apply(desc)
                }
            }
        }

        ScanRequest::Website { url } => {
            ScanRequestDescriptor::post_json(WEBSITE_SCAN_PATH, json!({ "Url": url }))
        }

        ScanRequest::AzureBlob { location, mode } => {
            let (path, controls) = match mode {
                AzureBlobMode::Basic => (AZURE_BLOB_PATH, None),
                AzureBlobMode::Advanced(c) => (AZURE_BLOB_ADVANCED_PATH, Some(c)),
                AzureBlobMode::AdvancedBatchJob(c) => (AZURE_BLOB_BATCH_JOB_PATH, Some(c)),
            };
            cloud_storage(path, azure_blob_credential(location), controls)
        }

        ScanRequest::AwsS3 { location, mode } => {
            let (path, controls) = storage_path(mode, AWS_S3_PATH, AWS_S3_ADVANCED_PATH);
            cloud_storage(path, aws_s3_credential(location), controls)
        }

        ScanRequest::GcpStorage { location, mode } => {
            let (path, controls) = storage_path(mode, GCP_STORAGE_PATH, GCP_STORAGE_ADVANCED_PATH);
            cloud_storage(path, gcp_storage_credential(location), controls).form_part(
                "jsonCredentialFile",
                FormPart {
                    bytes: location.json_credential_file.expose().as_bytes().to_vec(),
                    file_name: "credentials.json".to_owned(),
                    content_type: "application/json".to_owned(),
                },
            )
        }

        ScanRequest::SharePointSite { location, mode } => {
            let (path, controls) = storage_path(mode, SHAREPOINT_PATH, SHAREPOINT_ADVANCED_PATH);
            cloud_storage(path, sharepoint_credential(location), controls)
        }

        ScanRequest::BatchJobStatus { async_job_id } => {
            ScanRequestDescriptor::get(BATCH_JOB_STATUS_PATH)
                .query_param("AsyncJobID", async_job_id.as_str())
        }
    }
}

fn storage_path<'a>(
    mode: &'a StorageMode,
    basic: &'static str,
    advanced: &'static str,
) -> (&'static str, Option<&'a AdvancedControlSet>) {
    match mode {
        StorageMode::Basic => (basic, None),
        StorageMode::Advanced(c) => (advanced, Some(c)),
    }
}

/// Cloud storage scans POST an empty multipart body; the object location
/// travels in headers.
fn cloud_storage(
    path: &'static str,
    credential: CloudStorageCredential,
    controls: Option<&AdvancedControlSet>,
) -> ScanRequestDescriptor {
    let desc = ScanRequestDescriptor::post_form(path).credential(credential);
    match controls {
        Some(c) => c.apply(desc),
        None => desc,
    }
}

fn azure_blob_credential(loc: &AzureBlobLocation) -> CloudStorageCredential {
    CloudStorageCredential::new()
        .secret("connectionString", &loc.connection_string)
        .field("containerName", loc.container_name.as_str())
        .field("blobPath", loc.blob_path.as_str())
}

fn aws_s3_credential(loc: &AwsS3Location) -> CloudStorageCredential {
    CloudStorageCredential::new()
        .field("accessKey", loc.access_key.as_str())
        .secret("secretKey", &loc.secret_key)
        .field("bucketRegion", loc.bucket_region.as_str())
        .field("bucketName", loc.bucket_name.as_str())
        .field("keyName", loc.key_name.as_str())
        .optional_field("roleArn", loc.role_arn.as_deref())
}

fn gcp_storage_credential(loc: &GcpStorageLocation) -> CloudStorageCredential {
    CloudStorageCredential::new()
        .field("bucketName", loc.bucket_name.as_str())
        .field("objectName", loc.object_name.as_str())
}

fn sharepoint_credential(loc: &SharePointLocation) -> CloudStorageCredential {
    CloudStorageCredential::new()
        .field("clientID", loc.client_id.as_str())
        .secret("clientSecret", &loc.client_secret)
        .field("sharepointDomainName", loc.sharepoint_domain_name.as_str())
        .field("siteID", loc.site_id.as_str())
        .optional_field("tenantID", loc.tenant_id.as_deref())
        .optional_field("filePath", loc.file_path.as_deref())
        .optional_field("itemID", loc.item_id.as_deref())
}
