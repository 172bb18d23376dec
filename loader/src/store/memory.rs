//! In-memory module store for tests.

use super::{ModuleStore, StoreError};
use crate::module_name::ModuleName;
use std::collections::{BTreeMap, HashSet};

/// One call received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `remove(name, cascade)`.
    Remove {
        /// Module addressed.
        name: ModuleName,
        /// Cascade flag passed.
        cascade: bool,
    },
    /// `install(payload, name, replace)`.
    Install {
        /// Module addressed.
        name: ModuleName,
        /// Payload size in bytes.
        bytes: usize,
        /// Replace flag passed.
        replace: bool,
    },
}

impl StoreCall {
    /// Module the call addressed.
    #[must_use]
    pub const fn name(&self) -> &ModuleName {
        match self {
            Self::Remove { name, .. } | Self::Install { name, .. } => name,
        }
    }
}

/// A module table held in memory.
///
/// Removing an absent module is rejected the way a real store rejects it.
/// Installs can be scripted to report failure or to fail the session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    modules: BTreeMap<String, Vec<u8>>,
    calls: Vec<StoreCall>,
    failing_installs: HashSet<String>,
    broken_removes: HashSet<String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `install` report failure (`Ok(false)`) for `name`.
    #[must_use]
    pub fn with_failing_install(mut self, name: &str) -> Self {
        self.failing_installs.insert(name.to_owned());
        self
    }

    /// Make `remove` fail with a connection error for `name`.
    #[must_use]
    pub fn with_broken_remove(mut self, name: &str) -> Self {
        self.broken_removes.insert(name.to_owned());
        self
    }

    /// Pre-populate a module.
    #[must_use]
    pub fn with_module(mut self, name: &str, content: &[u8]) -> Self {
        self.modules.insert(name.to_owned(), content.to_vec());
        self
    }

    /// Content of the module called `name`, if installed.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&[u8]> {
        self.modules.get(name).map(Vec::as_slice)
    }

    /// Names of all installed modules, sorted.
    #[must_use]
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// Every call received, in order.
    #[must_use]
    pub fn calls(&self) -> &[StoreCall] {
        &self.calls
    }
}

impl ModuleStore for MemoryStore {
    fn remove(&mut self, name: &ModuleName, cascade: bool) -> Result<(), StoreError> {
        self.calls.push(StoreCall::Remove {
            name: name.clone(),
            cascade,
        });
        if self.broken_removes.contains(name.as_str()) {
            return Err(StoreError::Connection {
                message: "connection reset".to_owned(),
            });
        }
        match self.modules.remove(name.as_str()) {
            Some(_) => Ok(()),
            None => Err(StoreError::Rejected {
                operation: "remove",
                name: name.clone(),
                message: format!("no jar named {name} is known"),
            }),
        }
    }

    fn install(
        &mut self,
        payload: &[u8],
        name: &ModuleName,
        replace: bool,
    ) -> Result<bool, StoreError> {
        self.calls.push(StoreCall::Install {
            name: name.clone(),
            bytes: payload.len(),
            replace,
        });
        if self.failing_installs.contains(name.as_str()) {
            return Ok(false);
        }
        if !replace && self.modules.contains_key(name.as_str()) {
            return Err(StoreError::Rejected {
                operation: "install",
                name: name.clone(),
                message: format!("jar {name} already exists"),
            });
        }
        self.modules.insert(name.as_str().to_owned(), payload.to_vec());
        Ok(true)
    }
}
