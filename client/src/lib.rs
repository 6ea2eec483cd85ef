//! Client for the storage viewer HTTP API
//!
//! [`StorageApiClient`] wraps the four calls the viewer exposes (bucket
//! listing, image listing, image lookup with a signed URL and signed URL
//! generation) plus the service's health and banner endpoints. Payloads are
//! decoded into the types from `common-types`, which are re-exported here.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Storage API client and the trait it implements
pub mod client;

/// Error types
pub mod error;

/// Configuration
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
pub use client::{StorageApi, StorageApiClient};
pub use common_types::{
    BucketInfo, HealthStatus, ImageInfo, ImageWithSignedUrl, ServiceEndpoints, ServiceInfo,
    DEFAULT_EXPIRATION_MINUTES,
};
pub use error::{ClientError, ClientResult};
pub use types::{ClientConfig, Environment};
