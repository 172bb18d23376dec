//! The remote module store.
//!
//! A store holds named modules and supports two calls: remove a module by
//! name and install a payload under a name. Each call takes effect as soon
//! as it returns.
//!
//! # Sub-modules
//!
//! - [`postgres`] - PL/Java `sqlj` schema over a single PostgreSQL session.
//! - `memory` - in-memory store for tests (feature `test-support`).

use crate::module_name::ModuleName;
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod postgres;

/// Errors reported by a module store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store refused the call (for example, removing a module that does
    /// not exist). The session is still usable.
    #[error("store rejected {operation} of {name}: {message}")]
    Rejected {
        /// The call that was rejected (`remove` or `install`).
        operation: &'static str,
        /// The module the call addressed.
        name: ModuleName,
        /// The store's explanation.
        message: String,
    },

    /// The store could not be reached or the session broke.
    #[error("store connection failed: {message}")]
    Connection {
        /// Description of the failure.
        message: String,
    },
}

impl StoreError {
    /// Returns `true` for failures of the session itself rather than of a
    /// single call.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Remote store of named modules.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleStore {
    /// Remove the module called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] when the store refuses (including
    /// when no such module exists) and [`StoreError::Connection`] when the
    /// session fails.
    fn remove(&mut self, name: &ModuleName, cascade: bool) -> Result<(), StoreError>;

    /// Install `payload` under `name`, replacing an existing module when
    /// `replace` is set. Returns `false` when the store reports the install
    /// did not succeed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the call itself fails.
    fn install(
        &mut self,
        payload: &[u8],
        name: &ModuleName,
        replace: bool,
    ) -> Result<bool, StoreError>;
}
