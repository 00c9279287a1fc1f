//! Heatmap generation.
//!
//! A heatmap is a greyscale copy of an image where the areas relevant for
//! recognition and tracking are highlighted in color.

use serde::Serialize;
use wikitude_manager_core::client::ManagerClient;
use wikitude_manager_core::endpoint::{Endpoint, PathParams};
use wikitude_manager_core::error::ManagerResult;

use crate::models::{require_id, JobStatus};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeatmapRequest<'a> {
    image_url: &'a str,
}

/// Generate a heatmap for the image at `image_url` and wait for the job.
///
/// The completed status document carries the URL of the generated image.
///
/// # Tracing
///
/// Emits a span named `wikitude::heatmap::generate`.
#[tracing::instrument(name = "wikitude::heatmap::generate", skip(client))]
pub async fn generate(client: &ManagerClient, image_url: &str) -> ManagerResult<JobStatus> {
    tracing::debug!("generating heatmap");
    require_id("image_url", image_url)?;

    let request = HeatmapRequest { image_url };
    let status = client
        .execute_job(Endpoint::GenerateHeatmap, &PathParams::new(), Some(&request))
        .await?;

    tracing::debug!("heatmap generated");
    Ok(status)
}
