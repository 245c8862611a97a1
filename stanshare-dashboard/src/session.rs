//! Signed-in user session
//!
//! The dashboard never reads ambient storage. A [`Session`] is loaded once
//! from a [`SessionStore`] and handed to the controller; logout clears the
//! same keys from the store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const KEY_USER_NAME: &str = "userName";
pub const KEY_USER_EMAIL: &str = "userEmail";
pub const KEY_IS_GUEST: &str = "isGuest";
pub const KEY_API_URL: &str = "apiUrl";
pub const KEY_AUTH_TOKEN: &str = "authToken";
pub const KEY_LOGIN_PROVIDER: &str = "loginProvider";
pub const KEY_LOGIN_TIME: &str = "loginTime";

/// Keys removed on logout
pub const LOGOUT_KEYS: [&str; 6] = [
    KEY_AUTH_TOKEN,
    KEY_USER_EMAIL,
    KEY_USER_NAME,
    KEY_LOGIN_PROVIDER,
    KEY_LOGIN_TIME,
    KEY_IS_GUEST,
];

const DEFAULT_NAME: &str = "User";
const DEFAULT_EMAIL: &str = "user@example.com";
const GUEST_NAME: &str = "Guest User";
const GUEST_EMAIL: &str = "guest@stanshareai.local";

/// String key/value storage for session fields
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStore {
    /// Open a store; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Identity of the dashboard user. Absent fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub is_guest: bool,
    pub api_url: Option<String>,
    pub auth_token: Option<String>,
    pub login_provider: Option<String>,
    pub login_time: Option<String>,
}

/// What the sidebar shows for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub avatar: char,
}

impl Session {
    pub fn load(store: &dyn SessionStore) -> Self {
        let get = |key: &str| store.get(key).filter(|v| !v.is_empty());

        Self {
            user_name: get(KEY_USER_NAME),
            user_email: get(KEY_USER_EMAIL),
            is_guest: get(KEY_IS_GUEST).is_some_and(|v| v == "true"),
            api_url: get(KEY_API_URL),
            auth_token: get(KEY_AUTH_TOKEN),
            login_provider: get(KEY_LOGIN_PROVIDER),
            login_time: get(KEY_LOGIN_TIME),
        }
    }

    pub fn guest() -> Self {
        Self {
            is_guest: true,
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        if self.is_guest {
            GUEST_NAME
        } else {
            self.user_name.as_deref().unwrap_or(DEFAULT_NAME)
        }
    }

    pub fn display_email(&self) -> &str {
        if self.is_guest {
            GUEST_EMAIL
        } else {
            self.user_email.as_deref().unwrap_or(DEFAULT_EMAIL)
        }
    }

    /// First letter of the stored name, even for guests
    pub fn avatar_initial(&self) -> char {
        self.user_name
            .as_deref()
            .unwrap_or(DEFAULT_NAME)
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }

    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            name: self.display_name().to_string(),
            email: self.display_email().to_string(),
            avatar: self.avatar_initial(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_uses_defaults() {
        let session = Session::load(&MemoryStore::new());
        let info = session.user_info();
        assert_eq!(info.name, "User");
        assert_eq!(info.email, "user@example.com");
        assert_eq!(info.avatar, 'U');
        assert_eq!(session.api_url, None);
    }

    #[test]
    fn test_stored_identity() {
        let mut store = MemoryStore::new();
        store.set(KEY_USER_NAME, "morgan").unwrap();
        store.set(KEY_USER_EMAIL, "morgan@fund.example").unwrap();
        store.set(KEY_API_URL, "https://edgar.internal").unwrap();

        let session = Session::load(&store);
        assert_eq!(session.display_name(), "morgan");
        assert_eq!(session.display_email(), "morgan@fund.example");
        assert_eq!(session.avatar_initial(), 'M');
        assert_eq!(session.api_url.as_deref(), Some("https://edgar.internal"));
    }

    #[test]
    fn test_guest_identity() {
        let mut store = MemoryStore::new();
        store.set(KEY_IS_GUEST, "true").unwrap();
        store.set(KEY_USER_NAME, "alex").unwrap();

        let session = Session::load(&store);
        assert_eq!(session.display_name(), "Guest User");
        assert_eq!(session.display_email(), "guest@stanshareai.local");
        // Avatar still comes from the stored name
        assert_eq!(session.avatar_initial(), 'A');

        store.set(KEY_IS_GUEST, "yes").unwrap();
        assert!(!Session::load(&store).is_guest);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(KEY_USER_NAME), None);
        store.set(KEY_USER_NAME, "sam").unwrap();
        store.set(KEY_AUTH_TOKEN, "tok").unwrap();

        let mut reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_USER_NAME).as_deref(), Some("sam"));

        reopened.remove(KEY_AUTH_TOKEN).unwrap();
        reopened.remove("neverSet").unwrap();
        assert_eq!(FileStore::open(&path).unwrap().get(KEY_AUTH_TOKEN), None);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).is_err());
    }
}
