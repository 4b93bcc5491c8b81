use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::services::token::claims;

/// The signed-in identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub id_token: String,
}

impl Session {
    /// Rebuilds a session from a stored ID token's claims.
    pub fn from_id_token(token: &str) -> Option<Self> {
        let c = claims(token)?;
        Some(Self {
            uid: c.sub,
            email: c.email?,
            display_name: c.name,
            photo_url: c.picture,
            id_token: token.to_string(),
        })
    }
}

/// Observable holder of the current session.
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn set(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    /// Yields the current value first, then every change.
    pub fn subscribe(&self) -> WatchStream<Option<Session>> {
        WatchStream::new(self.tx.subscribe())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}
