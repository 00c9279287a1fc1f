//! The fixed table of Cloud Manager endpoints.
//!
//! Each [`Endpoint`] is a `(method, path template, response shape)` tuple.
//! Templates contain named placeholders (`{tc_id}`, `{target_id}`,
//! `{generation_id}`) that [`Endpoint::path`] replaces with percent-encoded
//! values from [`PathParams`].

use crate::error::{ManagerError, ManagerResult};
use reqwest::Method;

/// What a successful response to an endpoint carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A JSON document.
    Json,
    /// No meaningful body; success is the absence of an error.
    Empty,
    /// An accepted asynchronous job to be polled until `COMPLETED`.
    Job,
}

/// Every operation exposed by the Cloud Manager API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CreateTargetCollection,
    ListTargetCollections,
    GetTargetCollection,
    RenameTargetCollection,
    DeleteTargetCollection,
    ListTargets,
    AddTarget,
    AddTargets,
    GetTarget,
    UpdateTarget,
    DeleteTarget,
    GenerateTargetCollection,
    CreateObjectTargetCollection,
    ListObjectTargetCollections,
    GetObjectTargetCollection,
    UpdateObjectTargetCollection,
    DeleteObjectTargetCollection,
    CreateObjectTargets,
    ListObjectTargets,
    GetObjectTarget,
    DeleteObjectTarget,
    GetObjectTargetGenerationInfo,
    GenerateWto,
    GetWtoGenerationStatus,
    ListObjectTargetCollectionJobs,
    ListProjects,
    GenerateHeatmap,
}

impl Endpoint {
    /// All endpoints, in declaration order.
    pub const ALL: [Endpoint; 27] = [
        Self::CreateTargetCollection,
        Self::ListTargetCollections,
        Self::GetTargetCollection,
        Self::RenameTargetCollection,
        Self::DeleteTargetCollection,
        Self::ListTargets,
        Self::AddTarget,
        Self::AddTargets,
        Self::GetTarget,
        Self::UpdateTarget,
        Self::DeleteTarget,
        Self::GenerateTargetCollection,
        Self::CreateObjectTargetCollection,
        Self::ListObjectTargetCollections,
        Self::GetObjectTargetCollection,
        Self::UpdateObjectTargetCollection,
        Self::DeleteObjectTargetCollection,
        Self::CreateObjectTargets,
        Self::ListObjectTargets,
        Self::GetObjectTarget,
        Self::DeleteObjectTarget,
        Self::GetObjectTargetGenerationInfo,
        Self::GenerateWto,
        Self::GetWtoGenerationStatus,
        Self::ListObjectTargetCollectionJobs,
        Self::ListProjects,
        Self::GenerateHeatmap,
    ];

    /// The HTTP method used by this endpoint.
    pub fn method(&self) -> Method {
        match self {
            Self::ListTargetCollections
            | Self::GetTargetCollection
            | Self::ListTargets
            | Self::GetTarget
            | Self::ListObjectTargetCollections
            | Self::GetObjectTargetCollection
            | Self::ListObjectTargets
            | Self::GetObjectTarget
            | Self::GetObjectTargetGenerationInfo
            | Self::GetWtoGenerationStatus
            | Self::ListObjectTargetCollectionJobs
            | Self::ListProjects => Method::GET,
            Self::UpdateObjectTargetCollection => Method::PUT,
            Self::DeleteTargetCollection
            | Self::DeleteTarget
            | Self::DeleteObjectTargetCollection
            | Self::DeleteObjectTarget => Method::DELETE,
            Self::CreateTargetCollection
            | Self::RenameTargetCollection
            | Self::AddTarget
            | Self::AddTargets
            | Self::UpdateTarget
            | Self::GenerateTargetCollection
            | Self::CreateObjectTargetCollection
            | Self::CreateObjectTargets
            | Self::GenerateWto
            | Self::GenerateHeatmap => Method::POST,
        }
    }

    /// The path template, relative to the API root.
    pub fn template(&self) -> &'static str {
        match self {
            Self::CreateTargetCollection | Self::ListTargetCollections => {
                "/cloudrecognition/targetCollection"
            }
            Self::GetTargetCollection
            | Self::RenameTargetCollection
            | Self::DeleteTargetCollection => {
                "/cloudrecognition/targetCollection/{tc_id}"
            }
            Self::ListTargets | Self::AddTarget => "/cloudrecognition/targetCollection/{tc_id}/target",
            Self::AddTargets => "/cloudrecognition/targetCollection/{tc_id}/targets",
            Self::GetTarget | Self::UpdateTarget | Self::DeleteTarget => {
                "/cloudrecognition/targetCollection/{tc_id}/target/{target_id}"
            }
            Self::GenerateTargetCollection => {
                "/cloudrecognition/targetCollection/{tc_id}/generation/cloudarchive"
            }
            Self::CreateObjectTargetCollection | Self::ListObjectTargetCollections => {
                "/cloudrecognition/objectTargetCollection/"
            }
            Self::GetObjectTargetCollection
            | Self::UpdateObjectTargetCollection
            | Self::DeleteObjectTargetCollection => "/cloudrecognition/objectTargetCollection/{tc_id}",
            Self::CreateObjectTargets => "/cloudrecognition/objectTargetCollection/{tc_id}/targets",
            Self::ListObjectTargets => "/cloudrecognition/objectTargetCollection/{tc_id}/target",
            Self::GetObjectTarget | Self::DeleteObjectTarget => {
                "/cloudrecognition/objectTargetCollection/{tc_id}/target/{target_id}"
            }
            Self::GetObjectTargetGenerationInfo => {
                "/cloudrecognition/objectTargetCollection/{tc_id}/generation/target/{generation_id}"
            }
            Self::GenerateWto => "/cloudrecognition/objectTargetCollection/{tc_id}/generation/wto",
            Self::GetWtoGenerationStatus => {
                "/cloudrecognition/objectTargetCollection/{tc_id}/generation/wto/{generation_id}"
            }
            Self::ListObjectTargetCollectionJobs => {
                "/cloudrecognition/objectTargetCollection/{tc_id}/jobs"
            }
            Self::ListProjects => "/cloudrecognition/projects",
            Self::GenerateHeatmap => "/cloudrecognition/heatmap",
        }
    }

    /// What a successful response carries.
    pub fn shape(&self) -> ResponseShape {
        match self {
            Self::DeleteTargetCollection
            | Self::DeleteTarget
            | Self::DeleteObjectTargetCollection
            | Self::DeleteObjectTarget => ResponseShape::Empty,
            Self::AddTargets
            | Self::GenerateTargetCollection
            | Self::CreateObjectTargets
            | Self::GenerateWto
            | Self::GenerateHeatmap => ResponseShape::Job,
            _ => ResponseShape::Json,
        }
    }

    /// Resolve the template into a concrete path.
    ///
    /// Every placeholder is replaced by the percent-encoded value from
    /// `params`; a placeholder without a value is an error.
    pub fn path(&self, params: &PathParams<'_>) -> ManagerResult<String> {
        let template = self.template();
        let mut path = String::with_capacity(template.len() + 32);
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            path.push_str(&rest[..start]);
            let end = rest[start..]
                .find('}')
                .map(|offset| start + offset)
                .ok_or_else(|| ManagerError::invalid_endpoint("unterminated path placeholder"))?;

            let (name, value) = match &rest[start + 1..end] {
                "tc_id" => ("tc_id", params.tc_id),
                "target_id" => ("target_id", params.target_id),
                "generation_id" => ("generation_id", params.generation_id),
                _ => return Err(ManagerError::invalid_endpoint("unknown path placeholder")),
            };
            let value = value.ok_or(ManagerError::MissingPathParameter(name))?;
            path.push_str(&urlencoding::encode(value));

            rest = &rest[end + 1..];
        }
        path.push_str(rest);

        Ok(path)
    }
}

/// Values substituted into an endpoint's path template.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParams<'a> {
    tc_id: Option<&'a str>,
    target_id: Option<&'a str>,
    generation_id: Option<&'a str>,
}

impl<'a> PathParams<'a> {
    /// No parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target collection id (`{tc_id}`).
    pub fn collection(mut self, tc_id: &'a str) -> Self {
        self.tc_id = Some(tc_id);
        self
    }

    /// Set the target id (`{target_id}`).
    pub fn target(mut self, target_id: &'a str) -> Self {
        self.target_id = Some(target_id);
        self
    }

    /// Set the generation id (`{generation_id}`).
    pub fn generation(mut self, generation_id: &'a str) -> Self {
        self.generation_id = Some(generation_id);
        self
    }
}
