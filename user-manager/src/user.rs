use getset::Getters;
use serde::{Deserialize, Serialize};

/// A user record as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct User {
    user_id: String,
    nickname: Option<String>,
    profile_url: Option<String>,
}

impl User {
    pub fn new(user_id: String, nickname: Option<String>, profile_url: Option<String>) -> Self {
        Self {
            user_id,
            nickname,
            profile_url,
        }
    }

    /// Builds a user from a response, provided it carries a non-empty id.
    pub fn from_response(response: UserResponse) -> Option<Self> {
        match response.user_id {
            Some(user_id) if !user_id.is_empty() => Some(Self {
                user_id,
                nickname: response.nickname,
                profile_url: response.profile_url,
            }),
            _ => None,
        }
    }
}

/// Parameters for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct UserCreationParams {
    user_id: String,
    nickname: String,
    profile_url: Option<String>,
}

impl UserCreationParams {
    pub fn new(user_id: String, nickname: String, profile_url: Option<String>) -> Self {
        Self {
            user_id,
            nickname,
            profile_url,
        }
    }
}

/// Parameters for updating an existing user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct UserUpdateParams {
    user_id: String,
    nickname: Option<String>,
    profile_url: Option<String>,
}

impl UserUpdateParams {
    pub fn new(user_id: String, nickname: Option<String>, profile_url: Option<String>) -> Self {
        Self {
            user_id,
            nickname,
            profile_url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: Option<String>,
    pub nickname: Option<String>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Option<Vec<UserResponse>>,
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_decoding() {
        let json = r#"{"user_id":"u1","nickname":"Neo","profile_url":"","is_online":false}"#;
        let response: UserResponse = serde_json::from_str(json).unwrap();
        let user = User::from_response(response).unwrap();

        assert_eq!(user.user_id(), "u1");
        assert_eq!(user.nickname().as_deref(), Some("Neo"));
        assert_eq!(user.profile_url().as_deref(), Some(""));
    }

    #[test]
    fn test_response_without_id_is_rejected() {
        assert!(User::from_response(UserResponse::default()).is_none());

        let empty = UserResponse {
            user_id: Some(String::new()),
            ..Default::default()
        };
        assert!(User::from_response(empty).is_none());
    }

    #[test]
    fn test_list_response_tolerates_missing_fields() {
        let list: UserListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.users.is_none());

        let list: UserListResponse =
            serde_json::from_str(r#"{"users":[{"user_id":"a"},{"nickname":"x"}],"next":""}"#).unwrap();
        assert_eq!(list.users.unwrap().len(), 2);
    }
}
