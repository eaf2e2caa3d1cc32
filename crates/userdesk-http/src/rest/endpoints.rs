//! Endpoint paths and response bodies.

use serde::Deserialize;

use userdesk_core::UserId;

// ============================================================================
// Paths
// ============================================================================

/// Credential issuance from username and password.
pub const SIGN_IN: &str = "/auth/sign-in";

/// Account creation.
pub const SIGN_UP: &str = "/auth/sign-up";

/// New credential from the refresh cookie.
pub const REFRESH: &str = "/auth/refresh";

/// Admin user collection.
pub const ADMIN_USERS: &str = "/admin/users";

/// Self-service view of a user record.
pub fn user_path(id: UserId) -> String {
    format!("/api/users/{}", id)
}

/// Admin view of a user record.
pub fn admin_user_path(id: UserId) -> String {
    format!("{}/{}", ADMIN_USERS, id)
}

// ============================================================================
// Response Types
// ============================================================================

/// Response from sign-in and refresh.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}

/// Response from sign-up and admin user creation.
#[derive(Debug, Deserialize)]
pub struct CreatedResponse {
    pub id: UserId,
}

/// Error body returned with every non-success status.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
