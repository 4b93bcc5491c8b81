use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Validate, SCHEMA_VERSION};
use crate::services::cache::{QueryCache, QueryKey};
use crate::services::token::TokenStore;

/// Typed client for the Elite Arena REST backend.
///
/// Every request carries the stored bearer token and the schema version.
/// Responses are decoded into the model types and validated before they
/// reach a caller; list reads go through the query cache.
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    tokens: Arc<TokenStore>,
    cache: QueryCache,
}

impl ApiClient {
    pub fn new(config: &AppConfig, tokens: Arc<TokenStore>) -> AppResult<Self> {
        Self::build(&config.api_url, tokens, config.cache_ttl, config.http_timeout)
    }

    pub fn build(
        base_url: &str,
        tokens: Arc<TokenStore>,
        cache_ttl: Duration,
        timeout: Duration,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid API URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("API URL {base_url} cannot be a base")));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("arena/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url,
            http,
            tokens,
            cache: QueryCache::new(cache_ttl),
        })
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header("x-arena-schema", SCHEMA_VERSION.to_string());
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> AppResult<String> {
        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = server_message(&body);
            tracing::warn!(%status, message = %message, "API request failed");
            if status == reqwest::StatusCode::NOT_FOUND && message.is_empty() {
                return Err(AppError::NotFound("resource".to_string()));
            }
            return Err(AppError::Api { status, message });
        }
        Ok(body)
    }

    pub(crate) async fn fetch_one<T>(&self, url: Url) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let body = self.execute(self.request(Method::GET, url)).await?;
        let item: T = decode(&body, T::ENTITY)?;
        check(&item)?;
        Ok(item)
    }

    pub(crate) async fn fetch_list<T>(&self, url: Url) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned + Validate,
    {
        let body = self.execute(self.request(Method::GET, url)).await?;
        let items: Vec<T> = decode(&body, T::ENTITY)?;
        for item in &items {
            check(item)?;
        }
        Ok(items)
    }

    /// Reads a list through the query cache.
    pub(crate) async fn cached_list<T>(&self, key: QueryKey, url: Url) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned + Validate + Clone + Send + Sync + 'static,
    {
        if let Some(items) = self.cache.get::<Vec<T>>(&key) {
            tracing::debug!(resource = key.resource, params = %key.params, "cache hit");
            return Ok(items);
        }
        let items: Vec<T> = self.fetch_list(url).await?;
        self.cache.put(key, items.clone());
        Ok(items)
    }

    pub(crate) async fn fetch_value(&self, url: Url) -> AppResult<Value> {
        let body = self.execute(self.request(Method::GET, url)).await?;
        decode_value(&body)
    }

    /// Sends a mutation and drops cached reads of `invalidates`.
    pub(crate) async fn write<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        invalidates: &[&str],
    ) -> AppResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let result = self.execute(builder).await;
        // A failed write may still have landed server-side.
        for resource in invalidates {
            self.cache.invalidate(resource);
        }
        decode_value(&result?)
    }
}

fn decode<T: DeserializeOwned>(body: &str, entity: &'static str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| AppError::Decode {
        entity,
        message: e.to_string(),
    })
}

fn decode_value(body: &str) -> AppResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| AppError::Decode {
        entity: "response",
        message: e.to_string(),
    })
}

fn check<T: Validate>(item: &T) -> AppResult<()> {
    item.validate().map_err(|message| AppError::Schema {
        entity: T::ENTITY,
        message,
    })
}

/// Extracts `message` or `error` from an error body, else the raw text.
fn server_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default(),
        Err(_) => body.trim().to_string(),
    }
}

/// Id of a freshly inserted document, as returned by the backend's
/// `{ "insertedId": ... }` acknowledgement.
pub(crate) fn inserted_id(value: &Value) -> Option<String> {
    let id = value
        .get("insertedId")
        .or_else(|| value.get("_id"))
        .or_else(|| value.get("id"))?;
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(o) => o.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Deletes report `deletedCount`; zero means nothing matched.
pub(crate) fn ensure_deleted(value: &Value, what: &str) -> AppResult<()> {
    match value.get("deletedCount").and_then(Value::as_u64) {
        Some(0) => Err(AppError::NotFound(what.to_string())),
        _ => Ok(()),
    }
}
