use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::AppResult;

/// The single bearer token the client keeps between runs.
pub struct TokenStore {
    path: Option<PathBuf>,
    token: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            token: RwLock::new(None),
        }
    }

    /// Opens the token file, discarding a token that has already expired.
    pub fn load(path: PathBuf) -> AppResult<Self> {
        let token = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let raw = raw.trim().to_string();
                let expired = claims(&raw)
                    .and_then(|c| c.expires_at())
                    .is_some_and(|exp| exp <= Utc::now());
                if raw.is_empty() || expired {
                    tracing::info!(path = %path.display(), "discarding expired bearer token");
                    None
                } else {
                    Some(raw)
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            token: RwLock::new(token),
        })
    }

    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, token: &str) -> AppResult<()> {
        if let Some(path) = &self.path {
            std::fs::write(path, token)?;
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    pub fn clear(&self) -> AppResult<()> {
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Claims carried in the identity provider's ID token.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenClaims {
    #[serde(default, alias = "user_id")]
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Reads the payload segment of a JWT without verifying it; the backend
/// does verification.
pub fn claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
pub(crate) fn fake_jwt(claims: &serde_json::Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.sig",
        engine.encode(r#"{"alg":"RS256"}"#),
        engine.encode(claims.to_string())
    )
}
