//! HTTP client for the storage viewer API

use common_types::{
    ApiErrorBody, BucketInfo, HealthStatus, ImageInfo, ImageWithSignedUrl, ServiceInfo,
    SignedUrlRequest, SignedUrlResponse, DEFAULT_EXPIRATION_MINUTES,
};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::error::{ClientError, ClientResult};
use crate::types::{ClientConfig, Environment};

/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// Operations exposed by the storage viewer API
#[async_trait::async_trait]
pub trait StorageApi: Send + Sync {
    /// Lists every bucket visible to the service
    async fn list_buckets(&self) -> ClientResult<Vec<BucketInfo>>;

    /// Lists the images stored in `bucket_name`.
    ///
    /// An absent or empty `prefix` lists the whole bucket.
    async fn list_images(
        &self,
        bucket_name: &str,
        prefix: Option<&str>,
    ) -> ClientResult<Vec<ImageInfo>>;

    /// Fetches an image's metadata together with a signed URL valid for
    /// `expiration_minutes` (60 when `None`)
    async fn get_image_signed_url(
        &self,
        bucket_name: &str,
        blob_name: &str,
        expiration_minutes: Option<u32>,
    ) -> ClientResult<ImageWithSignedUrl>;

    /// Asks the service to sign a URL for `blob_name` and returns only the URL
    async fn generate_signed_url(
        &self,
        bucket_name: &str,
        blob_name: &str,
        expiration_minutes: Option<u32>,
    ) -> ClientResult<String>;

    /// Service health check
    async fn health(&self) -> ClientResult<HealthStatus>;

    /// API banner with version and endpoint templates
    async fn service_info(&self) -> ClientResult<ServiceInfo>;
}

/// HTTP implementation of [`StorageApi`]
///
/// Every call is a single request against the base URL the client was
/// built with. Nothing is cached between calls.
pub struct StorageApiClient {
    base_url: String,
    http_client: ClientWithMiddleware,
}

impl StorageApiClient {
    /// Creates a new storage API client
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the base URL is invalid or the HTTP
    /// client cannot be built
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = config.normalized_base_url()?;

        let reqwest_client = Client::builder()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .user_agent(format!("storage-api-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {e}")))?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        debug!(
            "Initialized storage API client for {} with {:?} timeout",
            base_url, config.request_timeout
        );

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Creates a client configured from `APP_ENV` and `STORAGE_API_URL`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the environment is invalid
    pub fn from_env() -> ClientResult<Self> {
        Self::new(Environment::from_env()?.client_config()?)
    }

    /// Base URL every request is resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn images_url(&self, bucket_name: &str) -> String {
        format!("{}/api/images/{bucket_name}", self.base_url)
    }

    // Bucket names go in verbatim, only the blob is percent-encoded.
    // `.` and `..` (escaped or not) are dot segments and would be resolved
    // away by URL parsing, retargeting the request.
    fn image_url(&self, bucket_name: &str, blob_name: &str) -> ClientResult<String> {
        if matches!(blob_name, "." | "..") {
            return Err(ClientError::InvalidInput(format!(
                "Blob name {blob_name:?} cannot be addressed in a URL path"
            )));
        }

        Ok(format!(
            "{}/{}",
            self.images_url(bucket_name),
            urlencoding::encode(blob_name)
        ))
    }

    fn signed_url_endpoint(&self, bucket_name: &str) -> String {
        format!("{}/api/signed-url/{bucket_name}", self.base_url)
    }

    /// Sends the request, checks the status and decodes the JSON body
    async fn execute<T>(&self, request: RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            error!("Storage API request failed: {}", e);
            ClientError::from(e)
        })?;

        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ApiErrorBody>(&body)
                .ok()
                .map(|envelope| envelope.detail);

            warn!(
                "Storage API returned {} for {}: {}",
                status,
                url,
                detail.as_deref().unwrap_or("no detail")
            );

            return Err(ClientError::Status { status, detail });
        }

        debug!("Storage API returned {} for {}", status, url);

        serde_json::from_slice(&body).map_err(|e| {
            warn!("Unexpected response body from {}: {}", url, e);
            ClientError::MalformedResponse(format!("{url}: {e}"))
        })
    }
}

#[async_trait::async_trait]
impl StorageApi for StorageApiClient {
    async fn list_buckets(&self) -> ClientResult<Vec<BucketInfo>> {
        let url = format!("{}/api/buckets", self.base_url);
        debug!("Listing buckets");

        self.execute(self.http_client.get(url)).await
    }

    async fn list_images(
        &self,
        bucket_name: &str,
        prefix: Option<&str>,
    ) -> ClientResult<Vec<ImageInfo>> {
        debug!("Listing images in {} with prefix {:?}", bucket_name, prefix);

        let mut request = self.http_client.get(self.images_url(bucket_name));
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            request = request.query(&[("prefix", prefix)]);
        }

        self.execute(request).await
    }

    async fn get_image_signed_url(
        &self,
        bucket_name: &str,
        blob_name: &str,
        expiration_minutes: Option<u32>,
    ) -> ClientResult<ImageWithSignedUrl> {
        let expiration_minutes = expiration_minutes.unwrap_or(DEFAULT_EXPIRATION_MINUTES);
        debug!(
            "Fetching image {}/{} with a {} minute signed URL",
            bucket_name, blob_name, expiration_minutes
        );

        let request = self
            .http_client
            .get(self.image_url(bucket_name, blob_name)?)
            .query(&[("expiration_minutes", expiration_minutes)]);

        self.execute(request).await
    }

    async fn generate_signed_url(
        &self,
        bucket_name: &str,
        blob_name: &str,
        expiration_minutes: Option<u32>,
    ) -> ClientResult<String> {
        let body = SignedUrlRequest {
            blob_name: blob_name.to_string(),
            expiration_minutes: expiration_minutes.unwrap_or(DEFAULT_EXPIRATION_MINUTES),
        };
        debug!(
            "Generating signed URL for {}/{} valid for {} minutes",
            bucket_name, body.blob_name, body.expiration_minutes
        );

        let request = self
            .http_client
            .post(self.signed_url_endpoint(bucket_name))
            .json(&body);

        let response: SignedUrlResponse = self.execute(request).await?;
        Ok(response.signed_url)
    }

    async fn health(&self) -> ClientResult<HealthStatus> {
        let url = format!("{}/api/health", self.base_url);
        self.execute(self.http_client.get(url)).await
    }

    async fn service_info(&self) -> ClientResult<ServiceInfo> {
        let url = format!("{}/", self.base_url);
        self.execute(self.http_client.get(url)).await
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! In-memory [`StorageApi`] for tests

    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use common_types::{
        BucketInfo, HealthStatus, ImageInfo, ImageWithSignedUrl, ServiceEndpoints, ServiceInfo,
        DEFAULT_EXPIRATION_MINUTES,
    };
    use reqwest::StatusCode;

    use super::{ClientError, ClientResult, StorageApi};

    /// Answers every call from canned buckets and images
    #[derive(Default)]
    pub struct MockStorageApi {
        buckets: Vec<BucketInfo>,
        images: BTreeMap<String, Vec<ImageInfo>>,
        calls: AtomicUsize,
    }

    impl MockStorageApi {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds an empty bucket
        #[must_use]
        pub fn with_bucket(mut self, name: &str, location: &str) -> Self {
            self.buckets.push(BucketInfo {
                name: name.to_string(),
                location: location.to_string(),
            });
            self.images.entry(name.to_string()).or_default();
            self
        }

        /// Adds an image to an existing bucket
        ///
        /// # Panics
        ///
        /// If the bucket was not registered with [`Self::with_bucket`]
        #[must_use]
        pub fn with_image(mut self, bucket_name: &str, image: ImageInfo) -> Self {
            self.images
                .get_mut(bucket_name)
                .expect("bucket must be added before its images")
                .push(image);
            self
        }

        /// Number of calls answered so far
        #[must_use]
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// URL the mock hands out for a blob
        #[must_use]
        pub fn signed_url_for(bucket_name: &str, blob_name: &str, expiration_minutes: u32) -> String {
            format!(
                "https://storage.example.com/{bucket_name}/{}?expires_in={expiration_minutes}m",
                urlencoding::encode(blob_name)
            )
        }

        fn record_call(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn bucket_images(&self, bucket_name: &str) -> ClientResult<&[ImageInfo]> {
            self.images
                .get(bucket_name)
                .map(Vec::as_slice)
                .ok_or_else(|| not_found(format!("Bucket {bucket_name} not found")))
        }
    }

    fn not_found(detail: String) -> ClientError {
        ClientError::Status {
            status: StatusCode::NOT_FOUND,
            detail: Some(detail),
        }
    }

    #[async_trait::async_trait]
    impl StorageApi for MockStorageApi {
        async fn list_buckets(&self) -> ClientResult<Vec<BucketInfo>> {
            self.record_call();
            Ok(self.buckets.clone())
        }

        async fn list_images(
            &self,
            bucket_name: &str,
            prefix: Option<&str>,
        ) -> ClientResult<Vec<ImageInfo>> {
            self.record_call();
            let prefix = prefix.unwrap_or_default();

            Ok(self
                .bucket_images(bucket_name)?
                .iter()
                .filter(|image| image.name.starts_with(prefix))
                .cloned()
                .collect())
        }

        async fn get_image_signed_url(
            &self,
            bucket_name: &str,
            blob_name: &str,
            expiration_minutes: Option<u32>,
        ) -> ClientResult<ImageWithSignedUrl> {
            self.record_call();
            let image = self
                .bucket_images(bucket_name)?
                .iter()
                .find(|image| image.name == blob_name)
                .ok_or_else(|| {
                    not_found(format!("Blob {blob_name} not found in bucket {bucket_name}"))
                })?;

            Ok(ImageWithSignedUrl {
                name: image.name.clone(),
                size: image.size,
                content_type: image.content_type.clone(),
                updated: image.updated,
                signed_url: Self::signed_url_for(
                    bucket_name,
                    blob_name,
                    expiration_minutes.unwrap_or(DEFAULT_EXPIRATION_MINUTES),
                ),
            })
        }

        async fn generate_signed_url(
            &self,
            bucket_name: &str,
            blob_name: &str,
            expiration_minutes: Option<u32>,
        ) -> ClientResult<String> {
            self.record_call();
            self.bucket_images(bucket_name)?;

            Ok(Self::signed_url_for(
                bucket_name,
                blob_name,
                expiration_minutes.unwrap_or(DEFAULT_EXPIRATION_MINUTES),
            ))
        }

        async fn health(&self) -> ClientResult<HealthStatus> {
            self.record_call();
            Ok(HealthStatus {
                status: "healthy".to_string(),
            })
        }

        async fn service_info(&self) -> ClientResult<ServiceInfo> {
            self.record_call();
            Ok(ServiceInfo {
                message: "Storage Viewer API".to_string(),
                version: "0.1.0".to_string(),
                endpoints: ServiceEndpoints {
                    buckets: "/api/buckets".to_string(),
                    images: "/api/images/{bucket_name}".to_string(),
                    signed_url: "/api/signed-url/{bucket_name}".to_string(),
                },
            })
        }
    }
}
