use crate::r#static::API_VERSION;
use crate::{UserCreationParams, UserListResponse, UserResponse, UserUpdateParams};
use serde_json::{json, Value};
use std::marker::PhantomData;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

/// The user operations offered by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEndpoint {
    CreateUser(UserCreationParams),
    UpdateUser(UserUpdateParams),
    GetUser { user_id: String },
    GetUsers { nickname: String, limit: usize },
}

impl UserEndpoint {
    pub fn method(&self) -> HttpMethod {
        match self {
            UserEndpoint::CreateUser(_) => HttpMethod::Post,
            UserEndpoint::UpdateUser(_) => HttpMethod::Put,
            UserEndpoint::GetUser { .. } | UserEndpoint::GetUsers { .. } => HttpMethod::Get,
        }
    }

    pub fn version(&self) -> &'static str {
        API_VERSION
    }

    pub fn path(&self) -> String {
        match self {
            UserEndpoint::GetUser { user_id } => format!("users/{}", user_id),
            UserEndpoint::UpdateUser(params) => format!("users/{}", params.user_id()),
            UserEndpoint::CreateUser(_) | UserEndpoint::GetUsers { .. } => "users".to_string(),
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            UserEndpoint::GetUser { user_id } => vec![("userId", user_id.clone())],
            UserEndpoint::UpdateUser(params) => vec![("userId", params.user_id().clone())],
            UserEndpoint::GetUsers { nickname, limit } => {
                vec![("limit", limit.to_string()), ("nickname", nickname.clone())]
            }
            UserEndpoint::CreateUser(_) => vec![],
        }
    }

    /// JSON body sent with the request, if any. Missing optional fields are sent as empty strings.
    pub fn body(&self) -> Option<Value> {
        match self {
            UserEndpoint::CreateUser(params) => Some(json!({
                "user_id": params.user_id(),
                "nickname": params.nickname(),
                "profile_url": params.profile_url().clone().unwrap_or_default(),
            })),
            UserEndpoint::UpdateUser(params) => Some(json!({
                "nickname": params.nickname().clone().unwrap_or_default(),
                "profile_url": params.profile_url().clone().unwrap_or_default(),
            })),
            UserEndpoint::GetUser { .. } | UserEndpoint::GetUsers { .. } => None,
        }
    }

    /// Whether the call is scheduled after the create delay.
    pub fn is_delayed(&self) -> bool {
        matches!(self, UserEndpoint::CreateUser(_))
    }

    /// Identifier used to tag failures: the user id, or the nickname for list calls.
    pub fn target(&self) -> &str {
        match self {
            UserEndpoint::CreateUser(params) => params.user_id(),
            UserEndpoint::UpdateUser(params) => params.user_id(),
            UserEndpoint::GetUser { user_id } => user_id,
            UserEndpoint::GetUsers { nickname, .. } => nickname,
        }
    }
}

/// An endpoint paired with the type its response decodes into.
#[derive(Debug, Clone)]
pub struct Request<R> {
    endpoint: UserEndpoint,
    _response: PhantomData<fn() -> R>,
}

impl<R> Request<R> {
    pub fn endpoint(&self) -> &UserEndpoint {
        &self.endpoint
    }

    pub fn into_endpoint(self) -> UserEndpoint {
        self.endpoint
    }
}

impl Request<UserResponse> {
    pub fn create_user(params: UserCreationParams) -> Self {
        Self::typed(UserEndpoint::CreateUser(params))
    }

    pub fn update_user(params: UserUpdateParams) -> Self {
        Self::typed(UserEndpoint::UpdateUser(params))
    }

    pub fn get_user(user_id: String) -> Self {
        Self::typed(UserEndpoint::GetUser { user_id })
    }
}

impl Request<UserListResponse> {
    pub fn get_users(nickname: String, limit: usize) -> Self {
        Self::typed(UserEndpoint::GetUsers { nickname, limit })
    }
}

impl<R> Request<R> {
    fn typed(endpoint: UserEndpoint) -> Self {
        Self {
            endpoint,
            _response: PhantomData,
        }
    }
}
