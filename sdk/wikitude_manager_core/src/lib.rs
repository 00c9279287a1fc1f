#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod job;

pub use error::{ErrorKind, ManagerError, ManagerResult};

/// Helpers for testing code built on this crate against a mock server.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use crate::auth::ManagerToken;
    use crate::client::ManagerClient;
    use std::time::Duration;
    use wiremock::MockServer;

    /// Test token (not a real token).
    pub const TEST_TOKEN: &str = "test-token";

    /// Poll interval used by test clients.
    pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(10);

    /// Create a test client connected to a mock server.
    pub async fn setup_mock_client(server: &MockServer) -> ManagerClient {
        ManagerClient::builder()
            .endpoint(server.uri())
            .token(ManagerToken::new(TEST_TOKEN))
            .api_version(3)
            .poll_interval(TEST_POLL_INTERVAL)
            .build()
            .expect("should build client")
    }
}
