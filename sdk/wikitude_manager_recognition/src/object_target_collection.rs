//! Object target collection management and WTO generation.
//!
//! Object target collections hold object targets built from videos or image
//! sequences. Once the targets exist, the collection is compiled into a WTO
//! file for a given SDK version.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wikitude_manager_core::client::ManagerClient;
//! use wikitude_manager_recognition::object_target_collection::{self, WtoRequest};
//!
//! # async fn example(client: &ManagerClient) -> Result<(), Box<dyn std::error::Error>> {
//! let collection = object_target_collection::create(client, "Objects").await?;
//!
//! let request = WtoRequest::new("7.0").with_email("dev@example.com");
//! let status = object_target_collection::generate_wto(client, &collection.id, &request).await?;
//! println!("WTO generation: {}", status.status);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use wikitude_manager_core::client::{ManagerClient, NO_PAYLOAD};
use wikitude_manager_core::endpoint::{Endpoint, PathParams};
use wikitude_manager_core::error::{ManagerError, ManagerResult};

use crate::models::{require_id, JobStatus, NameRequest};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of an object target collection update.
///
/// The service replaces both fields, so both are always sent.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectTargetCollectionUpdate {
    /// New name of the collection.
    pub name: String,

    /// Arbitrary metadata stored with the collection.
    pub metadata: serde_json::Value,
}

/// Parameters of a WTO generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WtoRequest {
    /// Wikitude SDK version the file is generated for, e.g. `"7.0"`.
    pub sdk_version: String,

    /// Address notified once generation finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl WtoRequest {
    /// A generation request for the given SDK version.
    pub fn new(sdk_version: impl Into<String>) -> Self {
        Self {
            sdk_version: sdk_version.into(),
            email: None,
        }
    }

    /// Send a notification to `email` when the generation finished.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// An object target collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTargetCollection {
    /// Unique identifier of the collection.
    pub id: String,

    /// Name of the collection.
    pub name: String,

    /// Unix timestamp in milliseconds when the collection was created.
    pub creation_timestamp: Option<u64>,

    /// Unix timestamp in milliseconds of the last modification.
    pub modification_timestamp: Option<u64>,

    /// Ids of the apps the collection is linked to.
    #[serde(default)]
    pub app_ids: Vec<String>,

    /// Arbitrary metadata.
    pub metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Create an empty object target collection.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_target_collections::create`.
#[tracing::instrument(name = "wikitude::object_target_collections::create", skip(client))]
pub async fn create(client: &ManagerClient, name: &str) -> ManagerResult<ObjectTargetCollection> {
    tracing::debug!("creating object target collection");

    let request = NameRequest { name };
    let response = client
        .execute(
            Endpoint::CreateObjectTargetCollection,
            &PathParams::new(),
            Some(&request),
        )
        .await?;
    let collection = response.json::<ObjectTargetCollection>()?;

    tracing::debug!(tc_id = %collection.id, "object target collection created");
    Ok(collection)
}

/// List all object target collections of the account.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_target_collections::list`.
#[tracing::instrument(name = "wikitude::object_target_collections::list", skip(client))]
pub async fn list(client: &ManagerClient) -> ManagerResult<Vec<ObjectTargetCollection>> {
    tracing::debug!("listing object target collections");

    let response = client
        .execute(
            Endpoint::ListObjectTargetCollections,
            &PathParams::new(),
            NO_PAYLOAD,
        )
        .await?;
    response.json::<Vec<ObjectTargetCollection>>()
}

/// Get an object target collection by id.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_target_collections::get` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::object_target_collections::get",
    skip(client),
    fields(tc_id = %tc_id)
)]
pub async fn get(client: &ManagerClient, tc_id: &str) -> ManagerResult<ObjectTargetCollection> {
    tracing::debug!("getting object target collection");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let response = client
        .execute(Endpoint::GetObjectTargetCollection, &params, NO_PAYLOAD)
        .await?;
    response.json::<ObjectTargetCollection>()
}

/// Replace the name and metadata of an object target collection.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_target_collections::update` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::object_target_collections::update",
    skip(client, update),
    fields(tc_id = %tc_id)
)]
pub async fn update(
    client: &ManagerClient,
    tc_id: &str,
    update: &ObjectTargetCollectionUpdate,
) -> ManagerResult<ObjectTargetCollection> {
    tracing::debug!("updating object target collection");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let response = client
        .execute(Endpoint::UpdateObjectTargetCollection, &params, Some(update))
        .await?;
    response.json::<ObjectTargetCollection>()
}

/// Delete an object target collection and all of its object targets.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_target_collections::delete` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::object_target_collections::delete",
    skip(client),
    fields(tc_id = %tc_id)
)]
pub async fn delete(client: &ManagerClient, tc_id: &str) -> ManagerResult<()> {
    tracing::debug!("deleting object target collection");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    client
        .execute(Endpoint::DeleteObjectTargetCollection, &params, NO_PAYLOAD)
        .await?;

    tracing::debug!("object target collection deleted");
    Ok(())
}

/// Generate a WTO file from the collection and wait for the job to complete.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_target_collections::generate_wto`
/// with fields `tc_id` and `sdk_version`.
#[tracing::instrument(
    name = "wikitude::object_target_collections::generate_wto",
    skip(client, request),
    fields(tc_id = %tc_id, sdk_version = %request.sdk_version)
)]
pub async fn generate_wto(
    client: &ManagerClient,
    tc_id: &str,
    request: &WtoRequest,
) -> ManagerResult<JobStatus> {
    tracing::debug!("generating wto");
    require_id("tc_id", tc_id)?;
    if request.sdk_version.trim().is_empty() {
        return Err(ManagerError::Builder("sdk_version cannot be empty".into()));
    }

    let params = PathParams::new().collection(tc_id);
    let status = client
        .execute_job(Endpoint::GenerateWto, &params, Some(request))
        .await?;

    tracing::debug!("wto generation completed");
    Ok(status)
}

/// Get the status of a scheduled WTO generation without waiting for it.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_target_collections::wto_status` with
/// fields `tc_id` and `generation_id`.
#[tracing::instrument(
    name = "wikitude::object_target_collections::wto_status",
    skip(client),
    fields(tc_id = %tc_id, generation_id = %generation_id)
)]
pub async fn get_wto_generation_status(
    client: &ManagerClient,
    tc_id: &str,
    generation_id: &str,
) -> ManagerResult<JobStatus> {
    require_id("tc_id", tc_id)?;
    require_id("generation_id", generation_id)?;

    let params = PathParams::new().collection(tc_id).generation(generation_id);
    let response = client
        .execute(Endpoint::GetWtoGenerationStatus, &params, NO_PAYLOAD)
        .await?;
    response.json::<JobStatus>()
}

/// List the asynchronous jobs of a collection, sorted by creation date.
///
/// # Tracing
///
/// Emits a span named `wikitude::object_target_collections::list_jobs` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::object_target_collections::list_jobs",
    skip(client),
    fields(tc_id = %tc_id)
)]
pub async fn list_jobs(client: &ManagerClient, tc_id: &str) -> ManagerResult<Vec<JobStatus>> {
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let response = client
        .execute(Endpoint::ListObjectTargetCollectionJobs, &params, NO_PAYLOAD)
        .await?;
    let jobs = response.json::<Vec<JobStatus>>()?;

    tracing::debug!(count = jobs.len(), "jobs listed");
    Ok(jobs)
}
