use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub token_path: PathBuf,
    pub firebase_api_key: String,
    pub stripe_publishable_key: String,
    pub cache_ttl: Duration,
    pub http_timeout: Duration,
    pub page_size: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("ARENA_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string())
                .trim_end_matches('/')
                .to_string(),
            token_path: env::var("ARENA_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".arena-token")),
            firebase_api_key: env::var("FIREBASE_API_KEY").unwrap_or_default(),
            stripe_publishable_key: env::var("STRIPE_PUBLISHABLE_KEY").unwrap_or_default(),
            cache_ttl: Duration::from_secs(parse_var("ARENA_CACHE_TTL_SECS").unwrap_or(30)),
            http_timeout: Duration::from_secs(parse_var("ARENA_HTTP_TIMEOUT_SECS").unwrap_or(30)),
            page_size: parse_var("ARENA_PAGE_SIZE")
                .map(|v: u64| v as usize)
                .filter(|v| *v > 0)
                .unwrap_or(6),
        }
    }
}

fn parse_var(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
