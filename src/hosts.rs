//! Hosts file lifecycle.
//!
//! The system hosts file is snapshotted once by [`HostsManager::init`].
//! Every [`apply`](HostsManager::apply) restores that snapshot and appends
//! the static entries and the built staging mappings, so repeated applies
//! never accumulate duplicate lines.

use crate::config::StagingConfig;
use crate::error::{Result, StagingError};
use crate::lookup::ShortLookup;
use crate::resolver::{BuildReport, StagingMapping, StagingResolver};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Reads the hostname list.
///
/// Blank lines, `#` comments and repeated hostnames are dropped. Order is
/// preserved.
///
/// # Errors
///
/// Returns [`StagingError::HostnamesNotFound`] if the file does not exist,
/// or [`StagingError::Io`] if it cannot be read.
pub fn load_hostnames(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(StagingError::HostnamesNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(parse_hostnames(&std::fs::read_to_string(path)?))
}

fn parse_hostnames(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .filter_map(|line| line.split('#').next())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

/// Appends mappings to `path`, one `<ip>\t<hostname>` per line.
///
/// # Errors
///
/// Returns [`StagingError::Io`] if the file cannot be opened or written.
pub fn append_mappings(path: &Path, mappings: &[StagingMapping]) -> Result<()> {
    let mut out = String::new();
    for mapping in mappings {
        out.push_str(&mapping.to_string());
        out.push('\n');
    }
    append_file(path, &out)
}

/// Appends `content`, first terminating an unfinished last line in `path`.
fn append_file(path: &Path, content: &str) -> Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    let unterminated = match std::fs::read(path) {
        Ok(existing) => existing.last().is_some_and(|&b| b != b'\n'),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if unterminated {
        file.write_all(b"\n")?;
    }
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Drives `init`, `clean`, `build`, `reset` and `apply` over one
/// [`StagingConfig`].
///
/// # Permissions
///
/// `init` only reads the system hosts file; `reset` and `apply` write it and
/// usually require root.
#[derive(Debug, Clone)]
pub struct HostsManager {
    config: StagingConfig,
}

impl HostsManager {
    /// Creates a manager for the given file layout.
    #[must_use]
    pub const fn new(config: StagingConfig) -> Self {
        Self { config }
    }

    /// Returns the file layout.
    #[must_use]
    pub const fn config(&self) -> &StagingConfig {
        &self.config
    }

    /// Saves the system hosts file as the default snapshot and clears any
    /// built output.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::Io`] if either file cannot be copied/written.
    pub fn init(&self) -> Result<()> {
        std::fs::copy(&self.config.system_hosts, &self.config.default_hosts)?;
        tracing::info!(
            from = %self.config.system_hosts.display(),
            to = %self.config.default_hosts.display(),
            "Saved default hosts file"
        );
        self.clean()
    }

    /// Truncates the built hosts file, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::Io`] if the file cannot be written.
    pub fn clean(&self) -> Result<()> {
        std::fs::write(&self.config.built_hosts, "")?;
        tracing::info!(path = %self.config.built_hosts.display(), "Built hosts file was cleared");
        Ok(())
    }

    /// Clears previous output, resolves every listed hostname and appends
    /// the mappings to the built hosts file.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::HostnamesNotFound`] if the list is missing,
    /// [`StagingError::Lookup`] if DNS fails (nothing is written in that
    /// case), or [`StagingError::Io`] on write failure.
    pub fn build<L: ShortLookup>(&self, resolver: &StagingResolver<L>) -> Result<BuildReport> {
        let hostnames = load_hostnames(&self.config.hostnames_list)?;
        self.clean()?;

        let report = resolver.build(&hostnames)?;
        append_mappings(&self.config.built_hosts, &report.mappings)?;
        tracing::info!(
            path = %self.config.built_hosts.display(),
            mapped = report.mappings.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Built staging hosts"
        );
        Ok(report)
    }

    /// Restores the default snapshot over the system hosts file.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::NotInitialized`] if [`init`](Self::init) has
    /// not been run, or [`StagingError::Io`] on copy failure.
    pub fn reset(&self) -> Result<()> {
        if !self.config.default_hosts.is_file() {
            return Err(StagingError::NotInitialized {
                path: self.config.default_hosts.display().to_string(),
            });
        }
        std::fs::copy(&self.config.default_hosts, &self.config.system_hosts)?;
        tracing::info!(path = %self.config.system_hosts.display(), "Restored default hosts file");
        Ok(())
    }

    /// Resets the system hosts file, then appends the static entries (if
    /// any) and the built mappings.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::NotBuilt`] if no build output exists,
    /// [`StagingError::NotInitialized`] if no snapshot exists, or
    /// [`StagingError::Io`] on write failure.
    pub fn apply(&self) -> Result<()> {
        if !self.config.built_hosts.is_file() {
            return Err(StagingError::NotBuilt {
                path: self.config.built_hosts.display().to_string(),
            });
        }
        self.reset()?;

        if self.config.static_hosts.is_file() {
            let content = std::fs::read_to_string(&self.config.static_hosts)?;
            append_file(&self.config.system_hosts, &content)?;
            tracing::info!(
                path = %self.config.static_hosts.display(),
                "Added the static configuration"
            );
        }

        let content = std::fs::read_to_string(&self.config.built_hosts)?;
        append_file(&self.config.system_hosts, &content)?;
        tracing::info!(
            path = %self.config.system_hosts.display(),
            entries = content.lines().filter(|l| !l.trim().is_empty()).count(),
            "Added the built hosts"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_filters_comments_blanks_and_duplicates() {
        let content = "\
# production hosts
www.example.com

  shop.example.com
#disabled.example.com
app.example.com # checkout
www.example.com
";
        assert_eq!(
            parse_hostnames(content),
            vec!["www.example.com", "shop.example.com", "app.example.com"]
        );
    }

    #[test]
    fn load_missing_list() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_hostnames(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, StagingError::HostnamesNotFound { .. }));
    }

    #[test]
    fn append_mappings_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.staging");
        let m = |ip: &str, host: &str| StagingMapping {
            ip: ip.to_string(),
            hostname: host.to_string(),
        };

        append_mappings(&path, &[m("9.9.9.9", "shop.example.com")]).unwrap();
        append_mappings(&path, &[m("8.8.4.4", "app.example.com")]).unwrap();
        append_mappings(&path, &[]).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "9.9.9.9\tshop.example.com\n8.8.4.4\tapp.example.com\n"
        );
    }

    fn manager(dir: &Path) -> HostsManager {
        std::fs::write(dir.join("system-hosts"), "127.0.0.1\tlocalhost\n").unwrap();
        HostsManager::new(StagingConfig::new(dir).with_system_hosts(dir.join("system-hosts")))
    }

    #[test]
    fn init_snapshots_and_cleans() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        std::fs::write(&m.config().built_hosts, "1.1.1.1\told.example.com\n").unwrap();

        m.init().unwrap();
        assert_eq!(
            std::fs::read_to_string(&m.config().default_hosts).unwrap(),
            "127.0.0.1\tlocalhost\n"
        );
        assert_eq!(std::fs::read_to_string(&m.config().built_hosts).unwrap(), "");
    }

    #[test]
    fn reset_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        assert!(matches!(m.reset().unwrap_err(), StagingError::NotInitialized { .. }));
    }

    #[test]
    fn apply_requires_build() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        m.init().unwrap();
        std::fs::remove_file(&m.config().built_hosts).unwrap();

        assert!(matches!(m.apply().unwrap_err(), StagingError::NotBuilt { .. }));
        assert_eq!(
            std::fs::read_to_string(&m.config().system_hosts).unwrap(),
            "127.0.0.1\tlocalhost\n"
        );
    }

    #[test]
    fn append_terminates_unfinished_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        std::fs::write(&path, "127.0.0.1\tlocalhost").unwrap();

        append_file(&path, "10.0.0.1\tapi.example.com").unwrap();
        append_file(&path, "").unwrap();
        append_file(&path, "9.9.9.9\tshop.example.com\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "127.0.0.1\tlocalhost\n10.0.0.1\tapi.example.com\n9.9.9.9\tshop.example.com\n"
        );
    }

    #[test]
    fn apply_without_trailing_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        std::fs::write(&m.config().system_hosts, "127.0.0.1\tlocalhost").unwrap();
        m.init().unwrap();
        std::fs::write(&m.config().static_hosts, "10.0.0.1\tapi.example.com").unwrap();
        std::fs::write(&m.config().built_hosts, "9.9.9.9\tshop.example.com\n").unwrap();

        m.apply().unwrap();

        assert_eq!(
            std::fs::read_to_string(&m.config().system_hosts).unwrap(),
            "127.0.0.1\tlocalhost\n10.0.0.1\tapi.example.com\n9.9.9.9\tshop.example.com\n"
        );
    }

    #[test]
    fn apply_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        m.init().unwrap();
        std::fs::write(&m.config().static_hosts, "10.0.0.1\tstatic.example.com\n").unwrap();
        std::fs::write(&m.config().built_hosts, "9.9.9.9\tshop.example.com\n").unwrap();

        m.apply().unwrap();
        m.apply().unwrap();

        assert_eq!(
            std::fs::read_to_string(&m.config().system_hosts).unwrap(),
            "127.0.0.1\tlocalhost\n10.0.0.1\tstatic.example.com\n9.9.9.9\tshop.example.com\n"
        );
    }
}
