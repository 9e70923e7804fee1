use std::sync::Arc;

use crate::config::Config;
use crate::session::SessionVerifier;
use crate::store::EventStore;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub sessions: Arc<SessionVerifier>,
    pub sign_in_url: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, config: &Config) -> Self {
        Self {
            store,
            sessions: Arc::new(SessionVerifier::new(config.session_secret.as_deref())),
            sign_in_url: Arc::from(config.sign_in_url.as_str()),
        }
    }
}
