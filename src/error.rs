//! Error types.

use thiserror::Error;

/// Result alias for staging operations.
pub type Result<T> = std::result::Result<T, StagingError>;

/// Errors returned by lookups, resolution and hosts-file management.
#[derive(Debug, Error)]
pub enum StagingError {
    /// Filesystem I/O failed (typically `PermissionDenied` on `/etc/hosts`).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The DNS lookup facility itself failed. Aborts a build.
    #[error("DNS lookup failed for {name}: {reason}")]
    Lookup {
        /// The name being looked up.
        name: String,
        /// What went wrong (spawn error, exit status, resolver error).
        reason: String,
    },

    /// The derived staging hostname did not resolve to an address.
    #[error("staging hostname {staging} for {hostname} resolved to no address")]
    EmptyStagingResult {
        /// The production hostname.
        hostname: String,
        /// The derived staging edge hostname.
        staging: String,
    },

    /// The hostname list file is missing.
    #[error("hostname list not found: {path}")]
    HostnamesNotFound {
        /// The expected path.
        path: String,
    },

    /// `apply` was run before `build`.
    #[error("no configuration has been built yet ({path}), run `build` first")]
    NotBuilt {
        /// The expected built hosts file.
        path: String,
    },

    /// `reset` was run before `init`.
    #[error("default hosts file has not been saved yet ({path}), run `init` first")]
    NotInitialized {
        /// The expected snapshot path.
        path: String,
    },

    /// Invalid configuration values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl StagingError {
    /// Returns `true` if the underlying I/O error is `PermissionDenied`.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }

    /// Returns `true` for failures of the lookup facility itself.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Lookup { .. })
    }

    pub(crate) fn lookup(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::Lookup {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
