use serde::{Deserialize, Serialize};

/// The User struct represents the profile returned by the identity service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Construct a new User with just the required fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        User {
            id: None,
            name: name.into(),
            email: email.into(),
            avatar: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Envelope of the profile endpoint: `{ "data": { ... } }`.
/// A missing or null `data` means the service knows of no current user.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UserResponse {
    #[serde(default)]
    pub data: Option<User>,
}
