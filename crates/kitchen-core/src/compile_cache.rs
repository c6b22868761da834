// ABOUTME: Small least-recently-used cache of compiled preview scripts
// ABOUTME: Keyed on the trimmed JS source with newlines canonicalized

use std::collections::VecDeque;

/// Default number of sources kept
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    source: String,
    compiled: String,
}

/// Compiled output per source, oldest use at the front
#[derive(Debug, Clone)]
pub struct CompileCache {
    entries: VecDeque<Entry>,
    capacity: usize,
}

impl Default for CompileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Cache key for a JS source
pub fn normalize_source(source: &str) -> String {
    source.trim().replace("\r\n", "\n").replace('\r', "\n")
}

impl CompileCache {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Compile cache capacity must be positive");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.source == key)
    }

    /// Compiled code for `source`, marking it most recently used
    pub fn get(&mut self, source: &str) -> Option<String> {
        let index = self.position(&normalize_source(source))?;
        let entry = self.entries.remove(index)?;
        let compiled = entry.compiled.clone();
        self.entries.push_back(entry);
        Some(compiled)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.position(&normalize_source(source)).is_some()
    }

    /// Remember `compiled` for `source`, evicting the least recently used entry when full
    pub fn insert(&mut self, source: &str, compiled: &str) {
        let key = normalize_source(source);
        if let Some(index) = self.position(&key) {
            kitchen_logging::debug!("Updating the existing compile cache entry");
            self.entries.remove(index);
        } else if self.entries.len() >= self.capacity {
            kitchen_logging::debug!("Evicting the oldest compile cache entry");
            self.entries.pop_front();
        }
        self.entries.push_back(Entry {
            source: key,
            compiled: compiled.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
