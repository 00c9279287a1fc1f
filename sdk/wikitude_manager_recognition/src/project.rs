//! Projects of the account.

use serde::Deserialize;
use wikitude_manager_core::client::{ManagerClient, NO_PAYLOAD};
use wikitude_manager_core::endpoint::{Endpoint, PathParams};
use wikitude_manager_core::error::ManagerResult;

/// A project grouping collections and apps.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier of the project.
    pub id: String,

    /// Name of the project.
    pub name: String,

    /// Ids of the target collections in the project.
    #[serde(default)]
    pub target_collection_ids: Vec<String>,

    /// Any further fields reported by the service.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// List all projects of the account.
///
/// # Tracing
///
/// Emits a span named `wikitude::projects::list`.
#[tracing::instrument(name = "wikitude::projects::list", skip(client))]
pub async fn list(client: &ManagerClient) -> ManagerResult<Vec<Project>> {
    tracing::debug!("listing projects");

    let response = client
        .execute(Endpoint::ListProjects, &PathParams::new(), NO_PAYLOAD)
        .await?;
    let projects = response.json::<Vec<Project>>()?;

    tracing::debug!(count = projects.len(), "projects listed");
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikitude_manager_core::test_support::{setup_mock_client, TEST_TOKEN};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_projects() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/projects"))
            .and(header("X-Token", TEST_TOKEN))
            .and(header("X-Version", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "p_1", "name": "Demo", "targetCollectionIds": ["tc_1"], "region": "eu"},
                {"id": "p_2", "name": "Empty"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let projects = list(&client).await.expect("should succeed");

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].target_collection_ids, vec!["tc_1".to_string()]);
        assert_eq!(projects[0].details["region"], "eu");
        assert!(projects[1].target_collection_ids.is_empty());
    }

    #[tokio::test]
    async fn test_list_projects_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cloudrecognition/projects"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": 401,
                "reason": "Unauthorized",
                "message": "invalid token"
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = list(&client).await.expect_err("should fail");

        assert_eq!(err.code(), Some(401));
        assert_eq!(err.reason(), Some("Unauthorized"));
    }
}
