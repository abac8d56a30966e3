//! In-process client profile store
//!
//! Keyed by CIK, so a re-save for the same company replaces the previous
//! profile. The store is shared across tool invocations within one
//! process; persistence across restarts is out of scope.

use crate::schemas::ClientMemory;
use std::collections::HashMap;
use std::sync::RwLock;

/// Thread-safe store of client profiles keyed by CIK
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, ClientMemory>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a client profile, replacing any previous profile for the CIK
    pub fn save(&self, memory: ClientMemory) {
        let mut profiles = self.profiles.write().unwrap_or_else(|p| p.into_inner());
        profiles.insert(memory.cik.clone(), memory);
    }

    /// Look up a profile by CIK
    pub fn get(&self, cik: &str) -> Option<ClientMemory> {
        let profiles = self.profiles.read().unwrap_or_else(|p| p.into_inner());
        profiles.get(cik).cloned()
    }

    /// Number of stored profiles
    pub fn len(&self) -> usize {
        let profiles = self.profiles.read().unwrap_or_else(|p| p.into_inner());
        profiles.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
