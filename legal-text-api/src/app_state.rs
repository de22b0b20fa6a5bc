use std::sync::Arc;

use crate::{config::Settings, domain::ports::inbound::LibraryService};

/// Who may run mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Auth disabled, every request acts anonymously.
    Open,
    /// Requests must present this bearer token.
    BearerToken(String),
    /// Auth enabled but no token configured, so nobody may mutate.
    Deny,
}

impl AccessPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.application.disable_auth {
            return Self::Open;
        }

        match settings.auth.api_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Self::BearerToken(token.to_string()),
            _ => Self::Deny,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub library: Arc<dyn LibraryService>,
    pub access: AccessPolicy,
}

impl AppState {
    pub fn new(library: Arc<dyn LibraryService>, access: AccessPolicy) -> Self {
        Self { library, access }
    }
}
