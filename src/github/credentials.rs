// Volatile bearer-token holder.
// Shared by every request; never written to storage.

use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct Credentials {
    token: RwLock<Option<String>>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token. Whitespace is trimmed; an empty token is ignored.
    pub fn set(&self, token: &str) {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(trimmed.to_string());
        }
        tracing::debug!("Bearer token set");
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        tracing::debug!("Bearer token cleared");
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_set(&self) -> bool {
        self.token.read().is_ok_and(|guard| guard.is_some())
    }
}
