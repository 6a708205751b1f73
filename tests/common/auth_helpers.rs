//! Authentication test helpers

use std::time::Duration;
use notes_collab::backend::auth::TokenVerifier;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Mint a valid token for the test secret
pub fn test_token(user_id: &str) -> String {
    TokenVerifier::new(TEST_JWT_SECRET)
        .issue(user_id, &format!("{}@example.com", user_id), Duration::from_secs(3600))
        .expect("Failed to create test token")
}
