//! Object targets within an object target collection.
//!
//! Object targets are created in batches from a video or image resource. The
//! batch is processed as a job that this crate waits for.

use serde::{Deserialize, Serialize};
use wikitude_manager_core::client::{ManagerClient, NO_PAYLOAD};
use wikitude_manager_core::endpoint::{Endpoint, PathParams};
use wikitude_manager_core::error::{ManagerError, ManagerResult};

use crate::models::{require_id, JobStatus};

/// Source material of an object target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectTargetResource {
    /// URL of the video or image archive.
    pub uri: String,

    /// Field of view of the recording camera, in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fov: Option<u32>,
}

/// A request to create an object target.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectTargetCreateRequest {
    /// Name of the target.
    pub name: String,

    /// Source material.
    pub resource: ObjectTargetResource,

    /// Arbitrary metadata returned on recognition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ObjectTargetCreateRequest {
    /// Creates a new builder for an object target.
    pub fn builder() -> ObjectTargetCreateRequestBuilder {
        ObjectTargetCreateRequestBuilder::default()
    }
}

/// Builder for [`ObjectTargetCreateRequest`].
#[derive(Debug, Default)]
pub struct ObjectTargetCreateRequestBuilder {
    name: Option<String>,
    uri: Option<String>,
    fov: Option<u32>,
    metadata: Option<serde_json::Value>,
}

impl ObjectTargetCreateRequestBuilder {
    /// Set the target name. **Required.**
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the resource URI. **Required.**
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the camera field of view in degrees (1 to 179).
    pub fn fov(mut self, fov: u32) -> Self {
        self.fov = Some(fov);
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
    /// Returns [`ManagerError::Builder`] if `name` or `uri` is missing or
    /// empty, or `fov` is outside 1 to 179 degrees.
    pub fn build(self) -> ManagerResult<ObjectTargetCreateRequest> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ManagerError::Builder("name is required".into()))?;

        let uri = self
            .uri
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ManagerError::Builder("uri is required".into()))?;

        if let Some(fov) = self.fov {
            if !(1..180).contains(&fov) {
                return Err(ManagerError::Builder(format!(
                    "fov must be between 1 and 179, got {fov}"
                )));
            }
        }

        Ok(ObjectTargetCreateRequest {
            name,
            resource: ObjectTargetResource { uri, fov: self.fov },
            metadata: self.metadata,
        })
    }
}

/// An object target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTarget {
    /// Unique identifier of the target.
    pub id: String,

    /// Name of the target.
    pub name: String,

    /// Source material the target was built from.
    pub resource: Option<ObjectTargetResource>,

    /// Arbitrary metadata.
    pub metadata: Option<serde_json::Value>,

    /// Unix timestamp in milliseconds when the target was created.
    pub creation_timestamp: Option<u64>,
}

/// Create up to ten object targets and wait for the creation job to complete.
///
/// Depending on the resources this can take minutes.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_targets::create_batch` with fields
/// `tc_id` and `count`.
#[tracing::instrument(
    name = "wikitude::object_targets::create_batch",
    skip(client, targets),
    fields(tc_id = %tc_id, count = targets.len())
)]
pub async fn create_batch(
    client: &ManagerClient,
    tc_id: &str,
    targets: &[ObjectTargetCreateRequest],
) -> ManagerResult<JobStatus> {
    tracing::debug!("creating object targets");
    require_id("tc_id", tc_id)?;
    if targets.is_empty() {
        return Err(ManagerError::Builder("targets cannot be empty".into()));
    }

    let params = PathParams::new().collection(tc_id);
    client
        .execute_job(Endpoint::CreateObjectTargets, &params, Some(targets))
        .await
}

/// List all object targets of a collection.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_targets::list` with field `tc_id`.
#[tracing::instrument(name = "wikitude::object_targets::list", skip(client), fields(tc_id = %tc_id))]
pub async fn list(client: &ManagerClient, tc_id: &str) -> ManagerResult<Vec<ObjectTarget>> {
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let response = client
        .execute(Endpoint::ListObjectTargets, &params, NO_PAYLOAD)
        .await?;
    response.json::<Vec<ObjectTarget>>()
}

/// Get an object target.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_targets::get` with fields `tc_id` and `target_id`.
#[tracing::instrument(
    name = "wikitude::object_targets::get",
    skip(client),
    fields(tc_id = %tc_id, target_id = %target_id)
)]
pub async fn get(
    client: &ManagerClient,
    tc_id: &str,
    target_id: &str,
) -> ManagerResult<ObjectTarget> {
    require_id("tc_id", tc_id)?;
    require_id("target_id", target_id)?;

    let params = PathParams::new().collection(tc_id).target(target_id);
    let response = client
        .execute(Endpoint::GetObjectTarget, &params, NO_PAYLOAD)
        .await?;
    response.json::<ObjectTarget>()
}

/// Delete an object target.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_targets::delete` with fields `tc_id` and `target_id`.
#[tracing::instrument(
    name = "wikitude::object_targets::delete",
    skip(client),
    fields(tc_id = %tc_id, target_id = %target_id)
)]
pub async fn delete(client: &ManagerClient, tc_id: &str, target_id: &str) -> ManagerResult<()> {
    tracing::debug!("deleting object target");
    require_id("tc_id", tc_id)?;
    require_id("target_id", target_id)?;

    let params = PathParams::new().collection(tc_id).target(target_id);
    client
        .execute(Endpoint::DeleteObjectTarget, &params, NO_PAYLOAD)
        .await?;
    Ok(())
}

/// Get the status of a scheduled object target creation without waiting for it.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_targets::generation_info` with fields
/// `tc_id` and `generation_id`.
#[tracing::instrument(
    name = "wikitude::object_targets::generation_info",
    skip(client),
    fields(tc_id = %tc_id, generation_id = %generation_id)
)]
pub async fn get_generation_info(
    client: &ManagerClient,
    tc_id: &str,
    generation_id: &str,
) -> ManagerResult<JobStatus> {
    require_id("tc_id", tc_id)?;
    require_id("generation_id", generation_id)?;

    let params = PathParams::new().collection(tc_id).generation(generation_id);
    let response = client
        .execute(Endpoint::GetObjectTargetGenerationInfo, &params, NO_PAYLOAD)
        .await?;
    response.json::<JobStatus>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikitude_manager_core::test_support::setup_mock_client;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIDEO: &str = "https://example.com/fireextinguisher.mp4";

    #[test]
    fn test_builder_nests_resource() {
        let request = ObjectTargetCreateRequest::builder()
            .name("extinguisher")
            .uri(VIDEO)
            .fov(60)
            .metadata(serde_json::json!({"my": "meta data"}))
            .build()
            .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "extinguisher",
                "resource": {"uri": VIDEO, "fov": 60},
                "metadata": {"my": "meta data"}
            })
        );
    }

    #[test]
    fn test_builder_validation() {
        let err = ObjectTargetCreateRequest::builder()
            .uri(VIDEO)
            .build()
            .expect_err("should require name");
        assert!(err.to_string().contains("name"));

        let err = ObjectTargetCreateRequest::builder()
            .name("x")
            .build()
            .expect_err("should require uri");
        assert!(err.to_string().contains("uri"));

        let err = ObjectTargetCreateRequest::builder()
            .name("x")
            .uri(VIDEO)
            .fov(180)
            .build()
            .expect_err("should reject fov");
        assert!(err.to_string().contains("fov"));
    }

    #[tokio::test]
    async fn test_create_batch_polls_until_completed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cloudrecognition/objectTargetCollection/otc_1/targets"))
            .and(body_json(serde_json::json!([
                {"name": "extinguisher", "resource": {"uri": VIDEO}}
            ])))
            .respond_with(ResponseTemplate::new(202).append_header(
                "Location",
                "/cloudrecognition/objectTargetCollection/otc_1/generation/target/gen_9",
            ))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/objectTargetCollection/otc_1/generation/target/gen_9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "gen_9",
                "status": "RUNNING"
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/objectTargetCollection/otc_1/generation/target/gen_9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "gen_9",
                "status": "COMPLETED",
                "targets": [{"id": "ot_1"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let targets = vec![ObjectTargetCreateRequest::builder()
            .name("extinguisher")
            .uri(VIDEO)
            .build()
            .unwrap()];

        let status = create_batch(&client, "otc_1", &targets)
            .await
            .expect("should succeed");
        assert!(status.is_completed());
        assert_eq!(status.get("targets").unwrap()[0]["id"], "ot_1");
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/objectTargetCollection/otc_1/target"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "ot_1", "name": "a", "resource": {"uri": VIDEO, "fov": 60}}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/objectTargetCollection/otc_1/target/ot_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "ot_1",
                "name": "a"
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;

        let targets = list(&client, "otc_1").await.expect("list should succeed");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].resource.as_ref().unwrap().fov, Some(60));

        let target = get(&client, "otc_1", "ot_1").await.expect("get should succeed");
        assert_eq!(target.name, "a");
        assert!(target.resource.is_none());
    }

    #[tokio::test]
    async fn test_delete_object_target() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/cloudrecognition/objectTargetCollection/otc_1/target/ot_1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        delete(&client, "otc_1", "ot_1").await.expect("should succeed");
    }

    #[tokio::test]
    async fn test_generation_info() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/objectTargetCollection/otc_1/generation/target/gen_9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "gen_9",
                "status": "RUNNING",
                "estimatedLatency": 30000
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let status = get_generation_info(&client, "otc_1", "gen_9")
            .await
            .expect("should succeed");
        assert_eq!(status.estimated_latency, Some(30_000.0));
        assert!(!status.is_completed());
    }

    #[tokio::test]
    async fn test_get_requires_target_id() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = get(&client, "otc_1", "").await.expect_err("should fail");
        assert!(matches!(err, ManagerError::Builder(_)));
    }
}
