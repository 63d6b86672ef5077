//! Session identity and character selection

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// One playable character owned by the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "CID", default)]
    pub cid: String,
}

/// Response from the login endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "UID", default)]
    pub uid: i64,
    /// Points balance at login time; the balance projection takes over
    /// from the first refresh on
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub chars: Vec<Character>,
}

/// Session-scoped identity read by every coordinator.
///
/// The account UID is fixed at login. The selected character can change
/// while the session runs, so it sits behind a lock; write operations are
/// gated on a character being selected.
#[derive(Debug)]
pub struct SessionContext {
    uid: i64,
    characters: RwLock<Vec<Character>>,
    selected: RwLock<Option<String>>,
}

impl SessionContext {
    pub fn new(uid: i64) -> Self {
        Self {
            uid,
            characters: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
        }
    }

    /// Build a session from a successful login, selecting the first
    /// roster character when one exists.
    pub fn from_login(login: &LoginResponse) -> Self {
        let session = Self::new(login.uid);
        session.set_characters(login.chars.clone());
        session
    }

    pub fn uid(&self) -> i64 {
        self.uid
    }

    /// Replace the roster. Keeps the current selection when it is still
    /// present, otherwise falls back to the first character.
    pub fn set_characters(&self, chars: Vec<Character>) {
        let fallback = chars.first().map(|c| c.cid.clone());
        if let Ok(mut roster) = self.characters.write() {
            *roster = chars;
        }
        if let Ok(mut selected) = self.selected.write() {
            let still_there = selected
                .as_deref()
                .map(|cid| self.roster_contains(cid))
                .unwrap_or(false);
            if !still_there {
                *selected = fallback;
            }
        }
    }

    pub fn characters(&self) -> Vec<Character> {
        self.characters
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Select a character by id; the id must be in the roster
    pub fn select_character(&self, cid: &str) -> Result<()> {
        if !self.roster_contains(cid) {
            return Err(Error::ValidationRejected(
                "Character not found. Please try again.".to_string(),
            ));
        }
        if let Ok(mut selected) = self.selected.write() {
            *selected = Some(cid.to_string());
        }
        Ok(())
    }

    pub fn clear_selection(&self) {
        if let Ok(mut selected) = self.selected.write() {
            *selected = None;
        }
    }

    pub fn selected_character(&self) -> Option<String> {
        self.selected.read().ok().and_then(|s| s.clone())
    }

    pub fn has_character(&self) -> bool {
        self.selected_character().is_some()
    }

    fn roster_contains(&self, cid: &str) -> bool {
        self.characters
            .read()
            .map(|r| r.iter().any(|c| c.cid == cid))
            .unwrap_or(false)
    }
}
