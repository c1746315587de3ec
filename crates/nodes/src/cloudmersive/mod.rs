//! The Cloudmersive Virus Scan node.
//!
//! Flow per item: [`ScanParameters`] (validated once) are bound to the item
//! into a [`ScanRequest`], the resolver turns that into a
//! [`ScanRequestDescriptor`], and a [`ScanTransport`] sends it.

pub mod controls;
pub mod credentials;
pub mod node;
pub mod params;
pub mod request;
pub mod resolver;
pub mod target;
pub mod transport;

pub use controls::{AdvancedControlSet, ScanOption};
pub use credentials::{CloudmersiveCredentials, Environment, Secret};
pub use node::{CloudmersiveVirusScanNode, NODE_TYPE};
pub use params::ScanParameters;
pub use request::{
    CloudStorageCredential, FormPart, HeaderValue, Method, Payload, ScanRequestDescriptor,
};
pub use resolver::resolve;
pub use target::ScanRequest;
pub use transport::{HttpTransport, ScanTransport, TransportConfig};
