//! Image targets within a target collection.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wikitude_manager_core::client::ManagerClient;
//! use wikitude_manager_recognition::target::{self, TargetCreateRequest};
//!
//! # async fn example(client: &ManagerClient) -> Result<(), Box<dyn std::error::Error>> {
//! let request = TargetCreateRequest::builder()
//!     .name("surfer")
//!     .image_url("https://example.com/surfer.jpeg")
//!     .build()?;
//!
//! let created = target::add(client, "tc_123", &request).await?;
//! println!("Created target: {}", created.id);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use wikitude_manager_core::client::{ManagerClient, NO_PAYLOAD};
use wikitude_manager_core::endpoint::{Endpoint, PathParams};
use wikitude_manager_core::error::{ManagerError, ManagerResult};

use crate::models::{require_id, JobStatus};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A request to add an image target.
///
/// ```rust
/// use wikitude_manager_recognition::target::TargetCreateRequest;
///
/// let request = TargetCreateRequest::builder()
///     .name("biker")
///     .image_url("https://example.com/biker.jpeg")
///     .physical_height(200)
///     .build()
///     .expect("valid request");
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCreateRequest {
    /// Name of the target, unique within its collection.
    pub name: String,

    /// Publicly reachable URL of the target image.
    pub image_url: String,

    /// Physical height of the printed target in millimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_height: Option<u32>,

    /// Arbitrary metadata returned on recognition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TargetCreateRequest {
    /// Creates a new builder for a target.
    pub fn builder() -> TargetCreateRequestBuilder {
        TargetCreateRequestBuilder::default()
    }
}

/// Builder for [`TargetCreateRequest`].
#[derive(Debug, Default)]
pub struct TargetCreateRequestBuilder {
    name: Option<String>,
    image_url: Option<String>,
    physical_height: Option<u32>,
    metadata: Option<serde_json::Value>,
}

impl TargetCreateRequestBuilder {
    /// Set the target name. **Required.**
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the image URL. **Required.**
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set the physical height in millimeters.
    pub fn physical_height(mut self, height: u32) -> Self {
        self.physical_height = Some(height);
        self
    }

    /// Attach metadata.
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Builder`] if `name` or `image_url` is missing
    /// or empty, or `physical_height` is zero.
    pub fn build(self) -> ManagerResult<TargetCreateRequest> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ManagerError::Builder("name is required".into()))?;

        let image_url = self
            .image_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ManagerError::Builder("image_url is required".into()))?;

        if self.physical_height == Some(0) {
            return Err(ManagerError::Builder(
                "physical_height must be greater than 0".into(),
            ));
        }

        Ok(TargetCreateRequest {
            name,
            image_url,
            physical_height: self.physical_height,
            metadata: self.metadata,
        })
    }
}

/// Properties of a target to change. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetUpdateRequest {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// New physical height in millimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_height: Option<u32>,

    /// New metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// An image target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Unique identifier of the target.
    pub id: String,

    /// Name of the target.
    pub name: String,

    /// URL of the target image.
    pub image_url: Option<String>,

    /// Physical height in millimeters.
    pub physical_height: Option<u32>,

    /// Recognition quality rating reported by the service.
    pub rating: Option<i32>,

    /// Thumbnail URLs keyed by size.
    pub thumbnails: Option<serde_json::Value>,

    /// Arbitrary metadata.
    pub metadata: Option<serde_json::Value>,

    /// Unix timestamp in milliseconds when the target was created.
    pub creation_timestamp: Option<u64>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// List all targets of a target collection.
///
/// # Tracing
///
/// Emits a span named `wikitude::targets::list` with field `tc_id`.
#[tracing::instrument(name = "wikitude::targets::list", skip(client), fields(tc_id = %tc_id))]
pub async fn list(client: &ManagerClient, tc_id: &str) -> ManagerResult<Vec<Target>> {
    tracing::debug!("listing targets");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let response = client
        .execute(Endpoint::ListTargets, &params, NO_PAYLOAD)
        .await?;
    let targets = response.json::<Vec<Target>>()?;

    tracing::debug!(count = targets.len(), "targets listed");
    Ok(targets)
}

/// Add a single target to a target collection.
///
/// # Tracing
///
/// Emits a span named `wikitude::targets::add` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::targets::add",
    skip(client, request),
    fields(tc_id = %tc_id)
)]
pub async fn add(
    client: &ManagerClient,
    tc_id: &str,
    request: &TargetCreateRequest,
) -> ManagerResult<Target> {
    tracing::debug!("adding target");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let response = client
        .execute(Endpoint::AddTarget, &params, Some(request))
        .await?;
    let target = response.json::<Target>()?;

    tracing::debug!(target_id = %target.id, "target added");
    Ok(target)
}

/// Add several targets to a target collection and wait for the batch job to
/// complete.
///
/// Depending on the number of targets this can take seconds to minutes.
///
/// # Tracing
///
/// Emits a span named `wikitude::targets::add_batch` with fields `tc_id` and
/// `count`.
#[tracing::instrument(
    name = "wikitude::targets::add_batch",
    skip(client, targets),
    fields(tc_id = %tc_id, count = targets.len())
)]
pub async fn add_batch(
    client: &ManagerClient,
    tc_id: &str,
    targets: &[TargetCreateRequest],
) -> ManagerResult<JobStatus> {
    tracing::debug!("adding targets");
    require_id("tc_id", tc_id)?;
    if targets.is_empty() {
        return Err(ManagerError::Builder("targets cannot be empty".into()));
    }

    let params = PathParams::new().collection(tc_id);
    client
        .execute_job(Endpoint::AddTargets, &params, Some(targets))
        .await
}

/// Get a target.
///
/// # Tracing
///
/// Emits a span named `wikitude::targets::get` with fields `tc_id` and `target_id`.
#[tracing::instrument(
    name = "wikitude::targets::get",
    skip(client),
    fields(tc_id = %tc_id, target_id = %target_id)
)]
pub async fn get(client: &ManagerClient, tc_id: &str, target_id: &str) -> ManagerResult<Target> {
    tracing::debug!("getting target");
    require_id("tc_id", tc_id)?;
    require_id("target_id", target_id)?;

    let params = PathParams::new().collection(tc_id).target(target_id);
    let response = client
        .execute(Endpoint::GetTarget, &params, NO_PAYLOAD)
        .await?;
    response.json::<Target>()
}

/// Update properties of a target.
///
/// # Tracing
///
/// Emits a span named `wikitude::targets::update` with fields `tc_id` and `target_id`.
#[tracing::instrument(
    name = "wikitude::targets::update",
    skip(client, update),
    fields(tc_id = %tc_id, target_id = %target_id)
)]
pub async fn update(
    client: &ManagerClient,
    tc_id: &str,
    target_id: &str,
    update: &TargetUpdateRequest,
) -> ManagerResult<Target> {
    tracing::debug!("updating target");
    require_id("tc_id", tc_id)?;
    require_id("target_id", target_id)?;

    let params = PathParams::new().collection(tc_id).target(target_id);
    let response = client
        .execute(Endpoint::UpdateTarget, &params, Some(update))
        .await?;
    response.json::<Target>()
}

/// Delete a target from its collection.
///
/// # Tracing
///
/// Emits a span named `wikitude::targets::delete` with fields `tc_id` and `target_id`.
#[tracing::instrument(
    name = "wikitude::targets::delete",
    skip(client),
    fields(tc_id = %tc_id, target_id = %target_id)
)]
pub async fn delete(client: &ManagerClient, tc_id: &str, target_id: &str) -> ManagerResult<()> {
    tracing::debug!("deleting target");
    require_id("tc_id", tc_id)?;
    require_id("target_id", target_id)?;

    let params = PathParams::new().collection(tc_id).target(target_id);
    client
        .execute(Endpoint::DeleteTarget, &params, NO_PAYLOAD)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikitude_manager_core::test_support::setup_mock_client;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const IMAGE_URL: &str = "https://example.com/surfer.jpeg";

    fn target_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "surfer",
            "imageUrl": IMAGE_URL,
            "physicalHeight": 200,
            "rating": 3,
            "metadata": {"tag": "beach"}
        })
    }

    // --- builder ---

    #[test]
    fn test_builder_requires_name() {
        let err = TargetCreateRequest::builder()
            .image_url(IMAGE_URL)
            .build()
            .expect_err("should require name");
        assert!(err.to_string().contains("name"), "error: {err}");
    }

    #[test]
    fn test_builder_requires_image_url() {
        let err = TargetCreateRequest::builder()
            .name("surfer")
            .image_url("  ")
            .build()
            .expect_err("should require image_url");
        assert!(err.to_string().contains("image_url"), "error: {err}");
    }

    #[test]
    fn test_builder_rejects_zero_height() {
        let err = TargetCreateRequest::builder()
            .name("surfer")
            .image_url(IMAGE_URL)
            .physical_height(0)
            .build()
            .expect_err("should reject zero height");
        assert!(err.to_string().contains("physical_height"), "error: {err}");
    }

    #[test]
    fn test_request_serializes_camel_case_and_skips_unset() {
        let request = TargetCreateRequest::builder()
            .name("surfer")
            .image_url(IMAGE_URL)
            .build()
            .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"name": "surfer", "imageUrl": IMAGE_URL}));
    }

    #[test]
    fn test_update_request_only_sends_set_fields() {
        let update = TargetUpdateRequest {
            physical_height: Some(250),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"physicalHeight": 250}));
    }

    // --- API ---

    #[tokio::test]
    async fn test_add_target() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cloudrecognition/targetCollection/tc_1/target"))
            .and(body_json(serde_json::json!({
                "name": "surfer",
                "imageUrl": IMAGE_URL,
                "physicalHeight": 200
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(target_json("t_1")))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = TargetCreateRequest::builder()
            .name("surfer")
            .image_url(IMAGE_URL)
            .physical_height(200)
            .build()
            .unwrap();

        let target = add(&client, "tc_1", &request).await.expect("should succeed");
        assert_eq!(target.id, "t_1");
        assert_eq!(target.rating, Some(3));
        assert_eq!(target.image_url.as_deref(), Some(IMAGE_URL));
    }

    #[tokio::test]
    async fn test_list_targets() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/targetCollection/tc_1/target"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([target_json("t_1"), target_json("t_2")])),
            )
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let targets = list(&client, "tc_1").await.expect("should succeed");
        assert_eq!(targets.len(), 2);
    }

    #[tokio::test]
    async fn test_get_target_encodes_ids() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/targetCollection/tc%2F1/target/t%3F1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(target_json("t?1")))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let target = get(&client, "tc/1", "t?1").await.expect("should succeed");
        assert_eq!(target.id, "t?1");
    }

    #[tokio::test]
    async fn test_update_target() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cloudrecognition/targetCollection/tc_1/target/t_1"))
            .and(body_json(serde_json::json!({"physicalHeight": 300})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t_1",
                "name": "surfer",
                "physicalHeight": 300
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let update_request = TargetUpdateRequest {
            physical_height: Some(300),
            ..Default::default()
        };
        let target = update(&client, "tc_1", "t_1", &update_request)
            .await
            .expect("should succeed");
        assert_eq!(target.physical_height, Some(300));
    }

    #[tokio::test]
    async fn test_delete_target() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/cloudrecognition/targetCollection/tc_1/target/t_1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        delete(&client, "tc_1", "t_1").await.expect("should succeed");
    }

    #[tokio::test]
    async fn test_delete_target_plain_error() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/cloudrecognition/targetCollection/tc_1/target/t_1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = delete(&client, "tc_1", "t_1").await.expect_err("should fail");

        match err {
            ManagerError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream failure");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_batch_polls_job() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cloudrecognition/targetCollection/tc_1/targets"))
            .and(body_json(serde_json::json!([
                {"name": "a", "imageUrl": IMAGE_URL},
                {"name": "b", "imageUrl": IMAGE_URL}
            ])))
            .respond_with(
                ResponseTemplate::new(202)
                    .append_header("Location", "/cloudrecognition/targetCollection/tc_1/targets/job_7"),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/targetCollection/tc_1/targets/job_7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "job_7",
                "status": "COMPLETED",
                "succeeded": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let targets = ["a", "b"]
            .iter()
            .map(|name| {
                TargetCreateRequest::builder()
                    .name(*name)
                    .image_url(IMAGE_URL)
                    .build()
                    .unwrap()
            })
            .collect::<Vec<_>>();

        let status = add_batch(&client, "tc_1", &targets)
            .await
            .expect("should succeed");
        assert!(status.is_completed());
        assert_eq!(status.get("succeeded").unwrap(), 2);
    }

    #[tokio::test]
    async fn test_add_batch_rejects_empty() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = add_batch(&client, "tc_1", &[]).await.expect_err("should fail");
        assert!(matches!(err, ManagerError::Builder(_)));
    }
}
