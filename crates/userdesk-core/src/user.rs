//! User records and the request bodies that create or change them.

use serde::{Deserialize, Serialize};

use crate::credentials::Password;
use crate::types::{Role, UserId};

/// A user record as returned by the API.
///
/// Some endpoints emit capitalised keys (`ID`, `Name`, ...), others lower-case
/// ones; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "ID", alias = "Id")]
    pub id: UserId,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "City", deserialize_with = "empty_as_none")]
    pub city: Option<String>,
    #[serde(default, alias = "Role")]
    pub role: Role,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Body of `POST /auth/sign-up`.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: Password,
    pub city: String,
}

/// Body of `POST /admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: Password,
    pub city: String,
    pub role: Role,
}

/// Body of `PUT /api/users/{id}` and `PUT /admin/users/{id}`.
///
/// Only the fields that are set are sent; the server keeps the others.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Password>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserUpdate {
    /// Returns true when no field would be changed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.city.is_none()
            && self.role.is_none()
    }
}
