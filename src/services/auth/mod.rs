pub mod firebase;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::services::session::Session;

/// Fields a signed-in user may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// A token obtained from a federated identity provider, e.g. Google.
#[derive(Debug, Clone, PartialEq)]
pub struct FederatedCredential {
    pub provider_id: String,
    pub id_token: String,
}

impl FederatedCredential {
    pub fn google(id_token: impl Into<String>) -> Self {
        Self {
            provider_id: "google.com".to_string(),
            id_token: id_token.into(),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn create_account(&self, email: &str, password: &str) -> AppResult<Session>;

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session>;

    async fn sign_in_with_provider(&self, credential: &FederatedCredential) -> AppResult<Session>;

    async fn sign_out(&self, session: &Session) -> AppResult<()>;

    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> AppResult<Session>;
}
