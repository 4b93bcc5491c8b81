use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{AuthProvider, FederatedCredential, ProfileUpdate};
use crate::errors::{AppError, AppResult};
use crate::services::session::Session;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Email/password and federated sign-in over the Identity Toolkit REST API.
pub struct FirebaseAuthProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    #[serde(alias = "profilePicture")]
    photo_url: Option<String>,
    id_token: Option<String>,
}

impl FirebaseAuthProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, IDENTITY_TOOLKIT_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn call(&self, method: &str, body: Value) -> AppResult<AccountResponse> {
        if self.api_key.is_empty() {
            return Err(AppError::Config("FIREBASE_API_KEY must be set".to_string()));
        }
        let url = format!("{}/accounts:{method}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let data: Value = resp.json().await?;
        if !status.is_success() {
            let code = data["error"]["message"].as_str().unwrap_or("UNKNOWN");
            tracing::warn!(%status, code, method, "identity provider rejected request");
            return Err(AppError::Auth(describe_error(code)));
        }

        serde_json::from_value(data).map_err(|e| AppError::Decode {
            entity: "identity response",
            message: e.to_string(),
        })
    }
}

fn into_session(resp: AccountResponse, fallback_token: Option<&str>) -> AppResult<Session> {
    let id_token = resp
        .id_token
        .or_else(|| fallback_token.map(str::to_string))
        .ok_or_else(|| AppError::Auth("identity provider returned no token".to_string()))?;
    let email = resp
        .email
        .ok_or_else(|| AppError::Auth("account has no email address".to_string()))?;
    Ok(Session {
        uid: resp.local_id,
        email,
        display_name: resp.display_name.filter(|n| !n.is_empty()),
        photo_url: resp.photo_url.filter(|p| !p.is_empty()),
        id_token,
    })
}

/// Maps Identity Toolkit error codes to messages a user can act on.
fn describe_error(code: &str) -> String {
    let code = code.split(':').next().unwrap_or(code).trim();
    match code {
        "EMAIL_EXISTS" => "An account with this email already exists.".to_string(),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password.".to_string()
        }
        "USER_DISABLED" => "This account has been disabled.".to_string(),
        "WEAK_PASSWORD" => "Password should be at least 6 characters.".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Try again later.".to_string(),
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" => "Session expired. Please sign in again.".to_string(),
        other => format!("Sign-in failed ({other})."),
    }
}

/// Form-encoded `postBody` for `signInWithIdp`.
fn idp_post_body(credential: &FederatedCredential) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("id_token", &credential.id_token)
        .append_pair("providerId", &credential.provider_id)
        .finish()
}

#[async_trait]
impl AuthProvider for FirebaseAuthProvider {
    async fn create_account(&self, email: &str, password: &str) -> AppResult<Session> {
        let resp = self
            .call(
                "signUp",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        tracing::info!(email, "account created");
        into_session(resp, None)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let resp = self
            .call(
                "signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        into_session(resp, None)
    }

    async fn sign_in_with_provider(&self, credential: &FederatedCredential) -> AppResult<Session> {
        let post_body = idp_post_body(credential);
        let resp = self
            .call(
                "signInWithIdp",
                json!({
                    "postBody": post_body,
                    "requestUri": "http://localhost",
                    "returnIdpCredential": true,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        into_session(resp, None)
    }

    async fn sign_out(&self, session: &Session) -> AppResult<()> {
        // Identity Toolkit sessions are stateless; dropping the token is enough.
        tracing::info!(email = %session.email, "signed out");
        Ok(())
    }

    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> AppResult<Session> {
        let mut body = json!({ "idToken": session.id_token, "returnSecureToken": true });
        if let Some(name) = &update.display_name {
            body["displayName"] = json!(name);
        }
        if let Some(photo) = &update.photo_url {
            body["photoUrl"] = json!(photo);
        }
        let resp = self.call("update", body).await?;
        into_session(resp, Some(&session.id_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idp_post_body_is_form_encoded() {
        let credential = FederatedCredential::google("a+b/c=d&e f");
        let body = idp_post_body(&credential);
        assert_eq!(body, "id_token=a%2Bb%2Fc%3Dd%26e+f&providerId=google.com");

        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(pairs[0], ("id_token".to_string(), "a+b/c=d&e f".to_string()));
    }

    #[test]
    fn test_describe_error_strips_detail() {
        assert_eq!(
            describe_error("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password should be at least 6 characters."
        );
        assert_eq!(describe_error("EMAIL_EXISTS"), "An account with this email already exists.");
        assert_eq!(describe_error("SOMETHING_NEW"), "Sign-in failed (SOMETHING_NEW).");
    }

    #[test]
    fn test_into_session_keeps_previous_token() {
        let resp = AccountResponse {
            local_id: "u1".into(),
            email: Some("ana@example.com".into()),
            display_name: Some(String::new()),
            photo_url: None,
            id_token: None,
        };
        let session = into_session(resp, Some("old-token")).unwrap();
        assert_eq!(session.id_token, "old-token");
        assert!(session.display_name.is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let provider = FirebaseAuthProvider::new(String::new());
        let err = provider.sign_in("a@b.com", "secret").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
