use serde::{Deserialize, Serialize};

use super::UserId;

/// A registered user.
///
/// Users are created once at registration and never updated. The credential
/// is opaque to the store; hashing and verification happen elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique, compared case-sensitively.
    pub username: String,
    /// Unique, compared case-insensitively.
    pub email: String,
    /// Never written out by serde so it can't leak into JSON output.
    #[serde(skip_serializing, default)]
    pub password_credential: String,
}

/// Registration input for [`Store::create_user`](crate::Store::create_user).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_credential: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_credential: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_credential: password_credential.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_is_not_serialized() {
        let user = User {
            id: UserId::new(1),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_credential: "secret-hash".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"username\":\"ada\""));
    }
}
