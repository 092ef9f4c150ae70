//! Environment namespace: map-like access to process environment variables
//!
//! Every read and write round-trips through the operation bridge to the
//! host's authoritative store; no variable state is cached in-process.
//! Bulk readers return point-in-time snapshots, never live views.

use std::collections::HashMap;

use crate::bridge::OpBridge;
use crate::errors::Result;

/// The process environment, exposed as a single logical namespace.
///
/// Construction is crate-private; exactly one instance exists per
/// [`OsNs`](crate::facts::OsNs) root, so external code cannot mint a
/// second namespace over the same store.
pub struct Environ {
    bridge: OpBridge,
}

impl Environ {
    pub(crate) fn new(bridge: OpBridge) -> Self {
        Self { bridge }
    }

    /// Look up a variable. Absent exactly when [`has`](Self::has) is
    /// false; an empty-string value is distinct from absence. Keys are
    /// passed through without case or whitespace normalization.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.bridge.env_get(key)
    }

    /// Set a variable, silently overwriting any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.bridge.env_set(key, value)
    }

    /// Remove a variable. Removing an absent variable is not an error.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.bridge.env_delete(key)
    }

    /// Presence check, independent of the stored value.
    pub fn has(&self, key: &str) -> Result<bool> {
        self.bridge.env_has(key)
    }

    /// Snapshot of all variable names.
    pub fn keys(&self) -> Result<Vec<String>> {
        self.bridge.env_keys()
    }

    /// Snapshot of all variable values.
    pub fn values(&self) -> Result<Vec<String>> {
        self.bridge.env_values()
    }

    /// Snapshot of all variables as key-value pairs.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        self.bridge.env_entries()
    }

    /// Snapshot of all variables as a single mapping.
    pub fn record(&self) -> Result<HashMap<String, String>> {
        self.bridge.env_record()
    }

    /// Iterate over a fresh snapshot, in the same sequence as
    /// [`entries`](Self::entries).
    pub fn iter(&self) -> Result<std::vec::IntoIter<(String, String)>> {
        Ok(self.entries()?.into_iter())
    }
}
