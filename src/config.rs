//! File layout configuration.

use std::path::{Path, PathBuf};

/// Hostname list, one production hostname per line.
pub const HOSTNAMES_LIST_FILE: &str = "staging-hostnames-list.txt";

/// Mappings produced by `build`.
pub const BUILD_HOSTS_FILE: &str = "hosts.staging";

/// Snapshot of the system hosts file taken by `init`.
pub const DEFAULT_HOSTS_FILE: &str = "hosts.default";

/// Hand-maintained entries appended on every `apply`.
pub const STATIC_HOSTS_FILE: &str = "staging-static-config.txt";

/// Default system hosts file.
pub const SYSTEM_HOSTS_FILE: &str = "/etc/hosts";

/// Where the staging tool reads and writes its files.
///
/// # Example
///
/// ```
/// use staging_hosts::StagingConfig;
///
/// let config = StagingConfig::new("/srv/staging").with_system_hosts("/tmp/hosts");
///
/// assert_eq!(config.built_hosts, std::path::Path::new("/srv/staging/hosts.staging"));
/// assert_eq!(config.system_hosts, std::path::Path::new("/tmp/hosts"));
/// ```
#[derive(Debug, Clone)]
pub struct StagingConfig {
    /// Production hostnames to redirect.
    pub hostnames_list: PathBuf,

    /// Output of `build`, `<ip>\t<hostname>` per line.
    pub built_hosts: PathBuf,

    /// Pristine copy of the system hosts file.
    pub default_hosts: PathBuf,

    /// Optional static entries, appended verbatim on `apply`.
    pub static_hosts: PathBuf,

    /// The hosts file being managed.
    pub system_hosts: PathBuf,
}

impl StagingConfig {
    /// Creates a config with every working file under `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base = base_dir.as_ref();
        Self {
            hostnames_list: base.join(HOSTNAMES_LIST_FILE),
            built_hosts: base.join(BUILD_HOSTS_FILE),
            default_hosts: base.join(DEFAULT_HOSTS_FILE),
            static_hosts: base.join(STATIC_HOSTS_FILE),
            system_hosts: PathBuf::from(SYSTEM_HOSTS_FILE),
        }
    }

    /// Creates a config rooted at the current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::Io`](crate::StagingError::Io) if the working
    /// directory cannot be determined.
    pub fn from_current_dir() -> crate::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Overrides the managed hosts file.
    #[must_use]
    pub fn with_system_hosts(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_hosts = path.into();
        self
    }

    /// Overrides the hostname list file.
    #[must_use]
    pub fn with_hostnames_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.hostnames_list = path.into();
        self
    }
}
