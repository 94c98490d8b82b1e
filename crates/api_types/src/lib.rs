use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role flag carried by every account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

pub mod user {
    use super::*;

    /// Public view of an account. The password hash never leaves the server.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct User {
        pub id: Uuid,
        pub email: String,
        pub username: String,
        pub role: Role,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub bio: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SetRole {
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserResponse {
        pub success: bool,
        pub user: User,
    }
}

pub mod auth {
    use super::*;
    use crate::user::User;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Signup {
        pub email: String,
        pub username: String,
        pub password: String,
        /// Defaults to `student` when omitted.
        #[serde(default)]
        pub role: Role,
        #[serde(default)]
        pub first_name: Option<String>,
        #[serde(default)]
        pub last_name: Option<String>,
        #[serde(default)]
        pub bio: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    /// Returned by every endpoint that (re-)issues a token.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub success: bool,
        pub message: String,
        pub token: String,
        /// Token lifetime in seconds.
        pub expires_in: i64,
        pub user: User,
    }
}

/// Body of every failed request, and of endpoints that only acknowledge.
#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    pub success: bool,
    pub message: String,
}
