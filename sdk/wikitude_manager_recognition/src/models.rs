//! Shared types for the Cloud Manager recognition API.

use serde::Serialize;

pub use wikitude_manager_core::job::JobStatus;

/// Body of requests that only carry a collection name.
#[derive(Debug, Serialize)]
pub(crate) struct NameRequest<'a> {
    pub name: &'a str,
}

/// Reject empty identifiers before they reach a path template.
pub(crate) fn require_id(field: &str, value: &str) -> wikitude_manager_core::ManagerResult<()> {
    if value.trim().is_empty() {
        return Err(wikitude_manager_core::ManagerError::Builder(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(())
}
