//! Integration tests for wikitude_manager_recognition.
//!
//! These tests require a live Cloud Manager account.
//! Run with: `cargo test --features integration-tests`
//!
//! Required environment variables:
//! - `WIKITUDE_MANAGER_TOKEN`: The Cloud Manager API token
//!
//! Optional environment variables:
//! - `WIKITUDE_MANAGER_ENDPOINT`: API root, defaults to `https://api.wikitude.com`
//! - `WIKITUDE_TEST_IMAGE_URL`: Publicly reachable image for target creation

#![cfg(feature = "integration-tests")]

use std::time::Duration;
use wikitude_manager_core::auth::ManagerToken;
use wikitude_manager_core::client::ManagerClient;
use wikitude_manager_recognition::target::{self, TargetCreateRequest};
use wikitude_manager_recognition::{project, target_collection};

fn get_client() -> ManagerClient {
    let token = ManagerToken::from_env().expect("WIKITUDE_MANAGER_TOKEN not set");

    ManagerClient::builder()
        .token(token)
        .poll_interval(Duration::from_secs(2))
        .poll_timeout(Duration::from_secs(300))
        .build()
        .expect("Failed to build client")
}

fn get_image_url() -> String {
    std::env::var("WIKITUDE_TEST_IMAGE_URL").unwrap_or_else(|_| {
        "http://s3-eu-west-1.amazonaws.com/web-api-hosting/examples_data/surfer.jpeg".to_string()
    })
}

#[tokio::test]
async fn test_target_collection_lifecycle() {
    let client = get_client();

    // Create a collection
    let collection = target_collection::create(&client, "integration test collection")
        .await
        .expect("create collection");
    assert!(!collection.id.is_empty());

    // Add a target
    let request = TargetCreateRequest::builder()
        .name("surfer")
        .image_url(get_image_url())
        .physical_height(200)
        .build()
        .expect("valid request");
    let created = target::add(&client, &collection.id, &request)
        .await
        .expect("add target");

    let targets = target::list(&client, &collection.id)
        .await
        .expect("list targets");
    assert!(targets.iter().any(|t| t.id == created.id));

    // Publish
    let status = target_collection::generate(&client, &collection.id)
        .await
        .expect("generate collection");
    assert!(status.is_completed());

    // Clean up
    target_collection::delete(&client, &collection.id)
        .await
        .expect("delete collection");
}

#[tokio::test]
async fn test_list_projects() {
    let client = get_client();

    project::list(&client).await.expect("list projects");
}
