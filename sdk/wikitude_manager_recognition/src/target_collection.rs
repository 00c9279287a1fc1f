//! Image target collection management.
//!
//! A target collection groups image targets. After adding or changing
//! targets, the collection must be generated into a cloud archive before the
//! changes are used for recognition.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wikitude_manager_core::client::ManagerClient;
//! use wikitude_manager_core::auth::ManagerToken;
//! use wikitude_manager_recognition::target_collection;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ManagerClient::builder()
//!     .token(ManagerToken::new("your-manager-token"))
//!     .build()?;
//!
//! let collection = target_collection::create(&client, "My Collection").await?;
//! println!("Created collection: {}", collection.id);
//!
//! let status = target_collection::generate(&client, &collection.id).await?;
//! println!("Generation finished: {}", status.status);
//!
//! target_collection::delete(&client, &collection.id).await?;
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;
use wikitude_manager_core::client::{ManagerClient, NO_PAYLOAD};
use wikitude_manager_core::endpoint::{Endpoint, PathParams};
use wikitude_manager_core::error::ManagerResult;

use crate::models::{require_id, JobStatus, NameRequest};

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// An image target collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCollection {
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

    /// Arbitrary metadata attached to the collection.
    pub metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Create a target collection with the given name.
///
/// The returned collection's `id` identifies it in all further calls.
///
/// # Tracing
///
/// Emits a span named `wikitude::target_collections::create`.
#[tracing::instrument(name = "wikitude::target_collections::create", skip(client))]
pub async fn create(client: &ManagerClient, name: &str) -> ManagerResult<TargetCollection> {
    tracing::debug!("creating target collection");

    let request = NameRequest { name };
    let response = client
        .execute(Endpoint::CreateTargetCollection, &PathParams::new(), Some(&request))
        .await?;
    let collection = response.json::<TargetCollection>()?;

    tracing::debug!(tc_id = %collection.id, "target collection created");
    Ok(collection)
}

/// List all target collections of the account.
///
/// # Tracing
///
/// Emits a span named `wikitude::target_collections::list`.
#[tracing::instrument(name = "wikitude::target_collections::list", skip(client))]
pub async fn list(client: &ManagerClient) -> ManagerResult<Vec<TargetCollection>> {
    tracing::debug!("listing target collections");

    let response = client
        .execute(Endpoint::ListTargetCollections, &PathParams::new(), NO_PAYLOAD)
        .await?;
    let collections = response.json::<Vec<TargetCollection>>()?;

    tracing::debug!(count = collections.len(), "target collections listed");
    Ok(collections)
}

/// Get a target collection by id.
///
/// # Tracing
///
/// Emits a span named `wikitude::target_collections::get` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::target_collections::get",
    skip(client),
    fields(tc_id = %tc_id)
)]
pub async fn get(client: &ManagerClient, tc_id: &str) -> ManagerResult<TargetCollection> {
    tracing::debug!("getting target collection");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let response = client
        .execute(Endpoint::GetTargetCollection, &params, NO_PAYLOAD)
        .await?;
    response.json::<TargetCollection>()
}

/// Rename a target collection.
///
/// # Tracing
///
/// Emits a span named `wikitude::target_collections::rename` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::target_collections::rename",
    skip(client, name),
    fields(tc_id = %tc_id)
)]
pub async fn rename(
    client: &ManagerClient,
    tc_id: &str,
    name: &str,
) -> ManagerResult<TargetCollection> {
    tracing::debug!("renaming target collection");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let request = NameRequest { name };
    let response = client
        .execute(Endpoint::RenameTargetCollection, &params, Some(&request))
        .await?;
    response.json::<TargetCollection>()
}

/// Delete a target collection and all of its targets. This cannot be undone.
///
/// Success is the absence of an error; the response body is ignored.
///
/// # Tracing
///
/// Emits a span named `wikitude::target_collections::delete` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::target_collections::delete",
    skip(client),
    fields(tc_id = %tc_id)
)]
pub async fn delete(client: &ManagerClient, tc_id: &str) -> ManagerResult<()> {
    tracing::debug!("deleting target collection");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    client
        .execute(Endpoint::DeleteTargetCollection, &params, NO_PAYLOAD)
        .await?;

    tracing::debug!("target collection deleted");
    Ok(())
}

/// Generate the cloud archive of a target collection and wait for the job to
/// complete.
///
/// Targets added since the last generation are only used for recognition
/// after this call. Depending on the number of targets this can take seconds
/// to minutes.
///
/// # Tracing
///
/// Emits a span named `wikitude::target_collections::generate` with field `tc_id`.
#[tracing::instrument(
    name = "wikitude::target_collections::generate",
    skip(client),
    fields(tc_id = %tc_id)
)]
pub async fn generate(client: &ManagerClient, tc_id: &str) -> ManagerResult<JobStatus> {
    tracing::debug!("generating cloud archive");
    require_id("tc_id", tc_id)?;

    let params = PathParams::new().collection(tc_id);
    let status = client
        .execute_job(Endpoint::GenerateTargetCollection, &params, NO_PAYLOAD)
        .await?;

    tracing::debug!(status = %status.status, "cloud archive generated");
    Ok(status)
}
