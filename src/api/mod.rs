// API module: request/response shapes of the Combat Critters user service
// and the `UserApi` trait the shell talks to. `client` holds the real HTTP
// implementation, `mock` an in-memory one used by tests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod client;
pub mod mock;

pub use client::ApiClient;
pub use mock::MockApi;

/// Endpoint paths, relative to the configured base address.
pub mod paths {
    pub const REGISTER: &str = "/users/auth/register";
    pub const LOGIN: &str = "/users/auth/login";
    pub const ADMIN_USERS: &str = "/admin/users";

    pub fn admin_user(user_id: i64) -> String {
        format!("{ADMIN_USERS}/{user_id}")
    }

    pub fn friends(user_id: i64) -> String {
        format!("/users/{user_id}/friends")
    }

    pub fn pending_friends(user_id: i64) -> String {
        format!("/users/{user_id}/friends/pending")
    }
}

/// Body of the register and login calls. Fields are sent exactly as typed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of a friend request: the username of the user to befriend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FriendRequest {
    pub username: String,
}

/// A user as returned by the admin and friends listings. Any extra fields
/// the server sends are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// What a successful login returns. Only the id is guaranteed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Method, URL and HTTP version of a request that actually went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub url: String,
    pub version: String,
}

impl RequestLine {
    pub fn new(method: impl Into<String>, url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.url, self.version)
    }
}

/// A successful call: what was sent and the decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent<T> {
    pub request: RequestLine,
    pub body: T,
}

/// Operations offered by the user service.
///
/// Each method issues exactly one request. Non-success statuses come back
/// as `CritterError::Remote`, everything else that goes wrong as
/// `CritterError::Transport`.
pub trait UserApi {
    fn register(&mut self, credentials: &Credentials) -> Result<Sent<()>>;

    fn login(&mut self, credentials: &Credentials) -> Result<Sent<LoginResponse>>;

    fn list_users(&mut self) -> Result<Sent<Vec<User>>>;

    fn remove_user(&mut self, user_id: i64) -> Result<Sent<()>>;

    fn list_friends(&mut self, user_id: i64) -> Result<Sent<Vec<User>>>;

    fn list_pending_friends(&mut self, user_id: i64) -> Result<Sent<Vec<User>>>;

    fn send_friend_request(&mut self, user_id: i64, request: &FriendRequest) -> Result<Sent<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_credentials_survive_json() {
        let creds = Credentials {
            username: "u".into(),
            password: "p".into(),
        };
        let json = serde_json::to_string(&creds).unwrap();
        let decoded: Credentials = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, creds);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({"password": "p", "username": "u"}));
    }

    #[test]
    fn test_credentials_are_not_trimmed() {
        let creds = Credentials {
            username: "Alice".into(),
            password: "P@ss word".into(),
        };
        let value = serde_json::to_value(&creds).unwrap();
        assert_eq!(value["username"], "Alice");
        assert_eq!(value["password"], "P@ss word");
    }

    #[test]
    fn test_user_ignores_extra_fields() {
        let user: User =
            serde_json::from_str(r#"{"id": 42, "username": "alice", "joined": "2024-01-01"}"#)
                .unwrap();
        assert_eq!(
            user,
            User {
                id: 42,
                username: "alice".into()
            }
        );
    }

    #[test]
    fn test_login_response_needs_only_id() {
        let login: LoginResponse = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(
            login,
            LoginResponse {
                id: 42,
                username: None
            }
        );
        assert!(serde_json::from_str::<LoginResponse>(r#"{"username": "alice"}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"id": 42}"#).is_err());
    }

    #[test]
    fn test_paths_embed_ids() {
        assert_eq!(paths::admin_user(9), "/admin/users/9");
        assert_eq!(paths::friends(42), "/users/42/friends");
        assert_eq!(paths::pending_friends(42), "/users/42/friends/pending");
    }

    #[test]
    fn test_request_line_display() {
        let line = RequestLine::new("DELETE", "http://localhost:4000/admin/users/3", "HTTP/1.1");
        assert_eq!(line.to_string(), "DELETE http://localhost:4000/admin/users/3 HTTP/1.1");
    }
}
