//! Wire types shared between the storage viewer API and its clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed URL lifetime used when the caller does not pick one
pub const DEFAULT_EXPIRATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    pub name: String,
    pub location: String,
}

/// Image metadata as returned by the bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Full blob name, including any "directory" prefix
    pub name: String,
    /// Object size in bytes
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Last modification time of the blob.
    ///
    /// The service sends an RFC 3339 string (or null); any other format fails
    /// decoding of the whole payload.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub public_url: Option<String>,
    /// Short-lived signed URL suitable for rendering a preview
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Image metadata together with a freshly issued signed URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageWithSignedUrl {
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Same format contract as [`ImageInfo::updated`]
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    pub signed_url: String,
}

/// Body of `POST /api/signed-url/{bucket}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlRequest {
    pub blob_name: String,
    pub expiration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlResponse {
    pub signed_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    /// Whether the service reported itself as healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Banner returned by the API root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: ServiceEndpoints,
}

/// Path templates advertised by the API root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub buckets: String,
    pub images: String,
    pub signed_url: String,
}

/// Error envelope the service returns on non-success responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_image_info_optional_fields_default_to_none() {
        let image: ImageInfo =
            serde_json::from_str(r#"{"name": "cats/tom.png", "size": 2048}"#).unwrap();

        assert_eq!(image.name, "cats/tom.png");
        assert_eq!(image.size, 2048);
        assert_eq!(image.content_type, None);
        assert_eq!(image.updated, None);
        assert_eq!(image.public_url, None);
        assert_eq!(image.thumbnail_url, None);
    }

    #[test]
    fn test_image_info_parses_isoformat_timestamp() {
        let image: ImageInfo = serde_json::from_str(
            r#"{
                "name": "tom.png",
                "size": 1,
                "content_type": "image/png",
                "updated": "2024-05-01T12:30:00.250000+00:00",
                "public_url": null
            }"#,
        )
        .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(image.updated, Some(expected));
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_image_info_rejects_non_rfc3339_timestamp() {
        let result = serde_json::from_str::<ImageInfo>(
            r#"{"name": "tom.png", "size": 1, "updated": "01/05/2024 12:30"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_image_with_signed_url_requires_signed_url() {
        let result =
            serde_json::from_str::<ImageWithSignedUrl>(r#"{"name": "tom.png", "size": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_signed_url_request_field_order() {
        let body = serde_json::to_string(&SignedUrlRequest {
            blob_name: "x.png".to_string(),
            expiration_minutes: 15,
        })
        .unwrap();

        assert_eq!(body, r#"{"blob_name":"x.png","expiration_minutes":15}"#);
    }

    #[test]
    fn test_signed_url_response_ignores_extra_fields() {
        let response: SignedUrlResponse =
            serde_json::from_str(r#"{"signed_url": "https://example.com/x", "other": 1}"#)
                .unwrap();
        assert_eq!(response.signed_url, "https://example.com/x");
    }

    #[test]
    fn test_health_status() {
        let healthy = HealthStatus {
            status: "healthy".to_string(),
        };
        let degraded = HealthStatus {
            status: "degraded".to_string(),
        };

        assert!(healthy.is_healthy());
        assert!(!degraded.is_healthy());
    }
}
