// ABOUTME: Durable local state: editor buffers, split positions, tutorial flag and the project cookie
// ABOUTME: Memory, JSON-file and unavailable backends behind one fallible trait

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub const KEY_JS: &str = "closure_kitchen_js";
pub const KEY_HTML: &str = "closure_kitchen_html";
pub const KEY_HPOS: &str = "closure_kitchen_hpos";
pub const KEY_VPOS: &str = "closure_kitchen_vpos";
pub const KEY_TUTORIAL: &str = "closure_kitchen_tutorial";

/// Cookie remembering the last opened project
pub const COOKIE_PROJECT_ID: &str = "ck_pid";

/// Lifetime of the project cookie
pub const COOKIE_MAX_AGE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Local storage is not available")]
    Unavailable,

    #[error("Failed to access local state at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Local state at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }
}

/// Key/value storage plus cookies that survive a session
pub trait DurableStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Cookie value, `None` when absent or expired
    fn cookie(&self, name: &str) -> Result<Option<String>>;

    fn set_cookie(&self, name: &str, value: &str, max_age: Duration) -> Result<()>;

    fn remove_cookie(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Cookie {
    value: String,
    /// Seconds since the unix epoch
    expires_at: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredState {
    #[serde(default)]
    items: BTreeMap<String, String>,
    #[serde(default)]
    cookies: BTreeMap<String, Cookie>,
}

impl StoredState {
    fn cookie(&self, name: &str) -> Option<String> {
        let now = unix_now();
        self.cookies
            .get(name)
            .filter(|cookie| cookie.expires_at > now)
            .map(|cookie| cookie.value.clone())
    }

    fn set_cookie(&mut self, name: &str, value: &str, max_age: Duration) {
        self.cookies.insert(
            name.to_string(),
            Cookie {
                value: value.to_string(),
                expires_at: unix_now().saturating_add(max_age.as_secs()),
            },
        );
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// In-memory store; clones share state
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoredState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.lock().items.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.state
            .lock()
            .items
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.state.lock().items.remove(key);
        Ok(())
    }

    fn cookie(&self, name: &str) -> Result<Option<String>> {
        Ok(self.state.lock().cookie(name))
    }

    fn set_cookie(&self, name: &str, value: &str, max_age: Duration) -> Result<()> {
        self.state.lock().set_cookie(name, value, max_age);
        Ok(())
    }

    fn remove_cookie(&self, name: &str) -> Result<()> {
        self.state.lock().cookies.remove(name);
        Ok(())
    }
}

/// Store backed by a single JSON file, rewritten on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: Mutex<StoredState>,
}

impl FileStore {
    /// Open the file at `path`, starting empty when it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| StoreError::corrupt(&path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredState::default(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        kitchen_logging::debug!(path = %path.display(), "Opened local state file");
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Default location under the user's config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("closure-kitchen").join("local-state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, change: impl FnOnce(&mut StoredState)) -> Result<()> {
        let mut state = self.state.lock();
        change(&mut state);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let text =
            serde_json::to_string_pretty(&*state).map_err(|e| StoreError::corrupt(&self.path, e))?;
        std::fs::write(&self.path, text).map_err(|e| StoreError::io(&self.path, e))
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.lock().items.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|state| {
            state.items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|state| {
            state.items.remove(key);
        })
    }

    fn cookie(&self, name: &str) -> Result<Option<String>> {
        Ok(self.state.lock().cookie(name))
    }

    fn set_cookie(&self, name: &str, value: &str, max_age: Duration) -> Result<()> {
        self.update(|state| state.set_cookie(name, value, max_age))
    }

    fn remove_cookie(&self, name: &str) -> Result<()> {
        self.update(|state| {
            state.cookies.remove(name);
        })
    }
}

/// Store for environments without local storage; every call fails
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl DurableStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(StoreError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StoreError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(StoreError::Unavailable)
    }

    fn cookie(&self, _name: &str) -> Result<Option<String>> {
        Err(StoreError::Unavailable)
    }

    fn set_cookie(&self, _name: &str, _value: &str, _max_age: Duration) -> Result<()> {
        Err(StoreError::Unavailable)
    }

    fn remove_cookie(&self, _name: &str) -> Result<()> {
        Err(StoreError::Unavailable)
    }
}
