//! Per-user language sessions
//!
//! Sessions live for the lifetime of the process and are never persisted.
//! The store is owned by the single message-handling task and mutated only
//! through `&mut self`, so it needs no locking.

use crate::i18n::Language;
use std::collections::HashMap;

/// Platform user identifier
pub type UserId = i64;

/// State kept for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSession {
    pub language: Language,
}

/// In-memory map from user to session
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<UserId, UserSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session of `user_id`, created with the default language on first contact
    pub fn get_or_create(&mut self, user_id: UserId) -> UserSession {
        *self.sessions.entry(user_id).or_insert_with(|| {
            tracing::debug!(user_id, "Creating session");
            UserSession::default()
        })
    }

    /// Language of an existing session
    pub fn language(&self, user_id: UserId) -> Option<Language> {
        self.sessions.get(&user_id).map(|s| s.language)
    }

    /// Set the language of `user_id`, leaving every other session untouched
    pub fn set_language(&mut self, user_id: UserId, language: Language) {
        self.sessions.entry(user_id).or_default().language = language;
    }

    /// Number of known users
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
