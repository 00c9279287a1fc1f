//! # Wikitude Cloud Manager Recognition
//!
//! Cloud recognition resources for the Wikitude Cloud Manager Rust SDK.
//!
//! This crate provides typed operations for image target collections,
//! targets, object target collections, object targets, projects and
//! heatmaps. Long-running operations (cloud archive generation, batch target
//! creation, WTO generation, heatmap generation) return once the service
//! reports the job as `COMPLETED`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wikitude_manager_core::auth::ManagerToken;
//! use wikitude_manager_core::client::ManagerClient;
//! use wikitude_manager_recognition::target::{self, TargetCreateRequest};
//! use wikitude_manager_recognition::target_collection;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ManagerClient::builder()
//!         .token(ManagerToken::new("your-manager-token"))
//!         .build()?;
//!
//!     let collection = target_collection::create(&client, "My Collection").await?;
//!
//!     let request = TargetCreateRequest::builder()
//!         .name("surfer")
//!         .image_url("https://example.com/surfer.jpeg")
//!         .build()?;
//!     target::add(&client, &collection.id, &request).await?;
//!
//!     // Publish the collection so it can be used for recognition
//!     let status = target_collection::generate(&client, &collection.id).await?;
//!     println!("Generation {}", status.status);
//!
//!     target_collection::delete(&client, &collection.id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! - **Target collection**: A set of image targets, published as a cloud archive.
//! - **Target**: A single image to be recognized.
//! - **Object target collection**: A set of object targets, published as a WTO file.
//! - **Job**: A server-side operation that is polled until it completes.
//!
//! ## Modules
//!
//! - [`target_collection`] - Create, list, rename, delete and generate target collections
//! - [`target`] - Add, list, update and delete image targets
//! - [`object_target_collection`] - Manage object target collections and WTO generation
//! - [`object_target`] - Create and inspect object targets
//! - [`project`] - List projects
//! - [`heatmap`] - Generate recognition heatmaps

pub mod heatmap;
pub mod models;
pub mod object_target;
pub mod object_target_collection;
pub mod project;
pub mod target;
pub mod target_collection;

pub use models::JobStatus;
