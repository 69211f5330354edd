// In-memory `UserApi` for tests.
//
// Records every call it receives and answers from canned data, so tests
// can assert both what the shell printed and what it would have sent.

use serde::Serialize;

use super::{
    paths, Credentials, FriendRequest, LoginResponse, RequestLine, Sent, User, UserApi,
};
use crate::error::{CritterError, Result};

pub const MOCK_BASE_URL: &str = "http://mock.critters.local";

/// A request the mock received, with its JSON body if any.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub request: RequestLine,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
enum Failure {
    Remote {
        status: u16,
        reason: String,
        body: String,
    },
    Transport(String),
}

#[derive(Debug, Clone, Default)]
pub struct MockApi {
    calls: Vec<MockCall>,
    login_id: i64,
    login_omits_username: bool,
    users: Vec<User>,
    friends: Vec<User>,
    pending: Vec<User>,
    failure: Option<Failure>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id handed back by a successful login.
    pub fn with_login_id(mut self, id: i64) -> Self {
        self.login_id = id;
        self
    }

    /// Login answers carry only the id, without a username.
    pub fn with_id_only_login(mut self) -> Self {
        self.login_omits_username = true;
        self
    }

    pub fn set_login_id(&mut self, id: i64) {
        self.login_id = id;
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn with_friends(mut self, friends: Vec<User>) -> Self {
        self.friends = friends;
        self
    }

    pub fn with_pending(mut self, pending: Vec<User>) -> Self {
        self.pending = pending;
        self
    }

    /// Every call is answered with this status and body.
    pub fn failing_with(
        mut self,
        status: u16,
        reason: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.failure = Some(Failure::Remote {
            status,
            reason: reason.into(),
            body: body.into(),
        });
        self
    }

    /// Every call fails before reaching a server.
    pub fn offline(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(Failure::Transport(message.into()));
        self
    }

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn last_call(&self) -> Option<&MockCall> {
        self.calls.last()
    }

    fn record<B: Serialize>(
        &mut self,
        method: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<RequestLine> {
        let request = RequestLine::new(method, format!("{MOCK_BASE_URL}{path}"), "HTTP/1.1");
        let body = body.and_then(|b| serde_json::to_value(b).ok());
        self.calls.push(MockCall {
            request: request.clone(),
            body,
        });

        match &self.failure {
            None => Ok(request),
            Some(Failure::Remote {
                status,
                reason,
                body,
            }) => Err(CritterError::Remote {
                request,
                status: *status,
                reason: reason.clone(),
                body: body.clone(),
            }),
            Some(Failure::Transport(message)) => Err(CritterError::transport(message.clone())),
        }
    }
}

impl UserApi for MockApi {
    fn register(&mut self, credentials: &Credentials) -> Result<Sent<()>> {
        let request = self.record("POST", paths::REGISTER, Some(credentials))?;
        Ok(Sent { request, body: () })
    }

    fn login(&mut self, credentials: &Credentials) -> Result<Sent<LoginResponse>> {
        let request = self.record("POST", paths::LOGIN, Some(credentials))?;
        let username = (!self.login_omits_username).then(|| credentials.username.clone());
        Ok(Sent {
            request,
            body: LoginResponse {
                id: self.login_id,
                username,
            },
        })
    }

    fn list_users(&mut self) -> Result<Sent<Vec<User>>> {
        let request = self.record::<()>("GET", paths::ADMIN_USERS, None)?;
        Ok(Sent {
            request,
            body: self.users.clone(),
        })
    }

    fn remove_user(&mut self, user_id: i64) -> Result<Sent<()>> {
        let request = self.record::<()>("DELETE", &paths::admin_user(user_id), None)?;
        self.users.retain(|u| u.id != user_id);
        Ok(Sent { request, body: () })
    }

    fn list_friends(&mut self, user_id: i64) -> Result<Sent<Vec<User>>> {
        let request = self.record::<()>("GET", &paths::friends(user_id), None)?;
        Ok(Sent {
            request,
            body: self.friends.clone(),
        })
    }

    fn list_pending_friends(&mut self, user_id: i64) -> Result<Sent<Vec<User>>> {
        let request = self.record::<()>("GET", &paths::pending_friends(user_id), None)?;
        Ok(Sent {
            request,
            body: self.pending.clone(),
        })
    }

    fn send_friend_request(&mut self, user_id: i64, request: &FriendRequest) -> Result<Sent<()>> {
        let request = self.record("POST", &paths::friends(user_id), Some(request))?;
        Ok(Sent { request, body: () })
    }
}
