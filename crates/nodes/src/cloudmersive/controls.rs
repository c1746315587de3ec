//! Advanced scan controls and their projection onto request headers.

use serde::{Deserialize, Serialize};

use super::request::ScanRequestDescriptor;

/// Extra switches accepted by the `options` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOption {
    #[serde(rename = "blockInvalidUris")]
    BlockInvalidUris,
    #[serde(rename = "blockOfficeXmlOleEmbeddedFile")]
    BlockOfficeXmlOleEmbeddedFile,
    #[serde(rename = "permitAuthenticodeSignedExecutables")]
    PermitAuthenticodeSignedExecutables,
    #[serde(rename = "permitJavascriptAndHtmlInPDFs")]
    PermitJavascriptAndHtmlInPdfs,
    #[serde(rename = "scanMultipartFile")]
    ScanMultipartFile,
}

impl ScanOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlockInvalidUris => "blockInvalidUris",
            Self::BlockOfficeXmlOleEmbeddedFile => "blockOfficeXmlOleEmbeddedFile",
            Self::PermitAuthenticodeSignedExecutables => "permitAuthenticodeSignedExecutables",
            Self::PermitJavascriptAndHtmlInPdfs => "permitJavascriptAndHtmlInPDFs",
            Self::ScanMultipartFile => "scanMultipartFile",
        }
    }
}

/// The advanced-scan control collection.
///
/// Every flag is optional: an unset flag is not sent at all, which lets the
/// server apply its own default. Sending `false` is a different request.
/// Keys this struct does not know are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedControlSet {
    pub allow_executables: Option<bool>,
    pub allow_invalid_files: Option<bool>,
    pub allow_scripts: Option<bool>,
    pub allow_password_protected_files: Option<bool>,
    pub allow_macros: Option<bool>,
    pub allow_xml_external_entities: Option<bool>,
    pub allow_insecure_deserialization: Option<bool>,
    pub allow_html: Option<bool>,
    pub allow_unsafe_archives: Option<bool>,
    pub allow_ole_embedded_object: Option<bool>,
    #[serde(default)]
    pub options_list: Vec<ScanOption>,
    /// Comma-separated extension allowlist, e.g. `.pdf,.docx`.
    pub restrict_file_types: Option<String>,
}

impl AdvancedControlSet {
    /// The ten boolean flags keyed by their header name.
    pub fn flags(&self) -> [(&'static str, Option<bool>); 10] {
        [
            ("allowExecutables", self.allow_executables),
            ("allowInvalidFiles", self.allow_invalid_files),
            ("allowScripts", self.allow_scripts),
            ("allowPasswordProtectedFiles", self.allow_password_protected_files),
            ("allowMacros", self.allow_macros),
            ("allowXmlExternalEntities", self.allow_xml_external_entities),
            ("allowInsecureDeserialization", self.allow_insecure_deserialization),
            ("allowHtml", self.allow_html),
            ("allowUnsafeArchives", self.allow_unsafe_archives),
            ("allowOleEmbeddedObject", self.allow_ole_embedded_object),
        ]
    }

    /// Comma-joined options list, or `None` when the list is empty.
    pub fn options_header(&self) -> Option<String> {
        if self.options_list.is_empty() {
            return None;
        }
        let joined: Vec<&str> = self.options_list.iter().map(|o| o.as_str()).collect();
        Some(joined.join(","))
    }

    /// Copy the controls onto `descriptor` as headers.
    pub fn apply(&self, mut descriptor: ScanRequestDescriptor) -> ScanRequestDescriptor {
        for (name, value) in self.flags() {
            if let Some(v) = value {
                descriptor = descriptor.header(name, v);
            }
        }
        if let Some(types) = self.restrict_file_types.as_deref().filter(|t| !t.is_empty()) {
            descriptor = descriptor.header("restrictFileTypes", types);
        }
        if let Some(options) = self.options_header() {
            descriptor = descriptor.header("options", options);
        }
        descriptor
    }
}
