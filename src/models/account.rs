use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, alias = "displayName")]
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Validate for Account {
    const ENTITY: &'static str = "account";

    fn validate(&self) -> Result<(), String> {
        require(&self.email, "email")
    }
}

/// Body for `PUT /users`, sent after every sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpsert {
    pub email: String,
    pub name: String,
    pub photo: Option<String>,
    pub last_login: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_user() {
        let account: Account = serde_json::from_str(r#"{"email":"ana@example.com"}"#).unwrap();
        assert_eq!(account.role, Role::User);
        assert!(account.validate().is_ok());
    }

    #[test]
    fn test_role_order() {
        assert!(Role::Admin > Role::Member);
        assert!(Role::Member > Role::User);
    }

    #[test]
    fn test_unknown_role_fails_fast() {
        let json = r#"{"email":"ana@example.com","role":"owner"}"#;
        assert!(serde_json::from_str::<Account>(json).is_err());
    }
}
