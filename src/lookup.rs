//! Short DNS lookups.
//!
//! A short lookup returns the answer chain for a name the way `dig +short`
//! prints it: CNAME targets first, then the terminal addresses.

use crate::error::{Result, StagingError};
use hickory_resolver::Resolver;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::{RData, RecordType};
use std::path::PathBuf;
use std::process::Command;

/// Resolves a name to its ordered CNAME/address chain.
///
/// An empty chain means the name has no answer. `Err` is reserved for
/// failures of the lookup facility itself and aborts a build.
pub trait ShortLookup {
    /// Looks up `name` and returns its chain.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::Lookup`] when the lookup cannot be performed.
    fn lookup_short(&self, name: &str) -> Result<Vec<String>>;
}

impl<T: ShortLookup + ?Sized> ShortLookup for &T {
    fn lookup_short(&self, name: &str) -> Result<Vec<String>> {
        (**self).lookup_short(name)
    }
}

impl<T: ShortLookup + ?Sized> ShortLookup for Box<T> {
    fn lookup_short(&self, name: &str) -> Result<Vec<String>> {
        (**self).lookup_short(name)
    }
}

/// Runs `dig <name> +short`.
#[derive(Debug, Clone)]
pub struct DigLookup {
    program: PathBuf,
    server: Option<String>,
}

impl DigLookup {
    /// Uses `dig` from `PATH` and the system nameservers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("dig"),
            server: None,
        }
    }

    /// Overrides the `dig` executable.
    #[must_use]
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Queries a specific nameserver (`dig @server`).
    #[must_use]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }
}

impl Default for DigLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortLookup for DigLookup {
    fn lookup_short(&self, name: &str) -> Result<Vec<String>> {
        let mut cmd = Command::new(&self.program);
        if let Some(server) = &self.server {
            cmd.arg(format!("@{server}"));
        }
        cmd.arg(name).arg("+short");

        let output = cmd.output().map_err(|e| {
            StagingError::lookup(name, format_args!("{}: {e}", self.program.display()))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = [stderr.trim(), stdout.trim()]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or("no output");
            return Err(StagingError::lookup(
                name,
                format_args!("{} ({detail})", output.status),
            ));
        }

        let chain = parse_short_output(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(name = %name, chain = ?chain, "dig +short");
        Ok(chain)
    }
}

/// Splits `dig +short` output into chain entries.
///
/// Blank lines (including the trailing terminator) and `;;` diagnostics are
/// dropped.
#[must_use]
pub fn parse_short_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(';'))
        .map(str::to_string)
        .collect()
}

/// Resolves in-process with the system resolver configuration.
pub struct SystemLookup {
    resolver: Resolver,
}

impl SystemLookup {
    /// Reads `/etc/resolv.conf` (or the platform equivalent).
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::Io`] if the system configuration cannot be
    /// loaded.
    pub fn from_system_conf() -> Result<Self> {
        Ok(Self {
            resolver: Resolver::from_system_conf()?,
        })
    }
}

impl std::fmt::Debug for SystemLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemLookup").finish_non_exhaustive()
    }
}

impl ShortLookup for SystemLookup {
    fn lookup_short(&self, name: &str) -> Result<Vec<String>> {
        let fqdn = if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{name}.")
        };

        let lookup = match self.resolver.lookup(fqdn.as_str(), RecordType::A) {
            Ok(lookup) => lookup,
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                tracing::debug!(name = %name, "No records");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StagingError::lookup(name, e)),
        };

        let chain: Vec<String> = lookup
            .iter()
            .filter(|rdata| matches!(rdata, RData::CNAME(_) | RData::A(_) | RData::AAAA(_)))
            .map(ToString::to_string)
            .collect();
        tracing::debug!(name = %name, chain = ?chain, "system lookup");
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_terminator() {
        let out = "x1.example.globalredir.akadns.net.\ne1.dscx.akamaiedge.net.\n1.2.3.4\n";
        assert_eq!(
            parse_short_output(out),
            vec![
                "x1.example.globalredir.akadns.net.",
                "e1.dscx.akamaiedge.net.",
                "1.2.3.4"
            ]
        );
    }

    #[test]
    fn parse_empty_output() {
        assert!(parse_short_output("").is_empty());
        assert!(parse_short_output("\n").is_empty());
    }

    #[test]
    fn parse_drops_diagnostics() {
        let out = ";; Warning: query response not set\n9.9.9.9\n";
        assert_eq!(parse_short_output(out), vec!["9.9.9.9"]);
    }

    #[test]
    fn missing_program_is_transport_error() {
        let dig = DigLookup::new().program("/nonexistent/dig-binary");
        let err = dig.lookup_short("www.example.com").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn failing_program_is_transport_error() {
        let dig = DigLookup::new().program("false");
        let err = dig.lookup_short("www.example.com").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn program_output_is_parsed() {
        // `echo <name> +short` stands in for dig.
        let dig = DigLookup::new().program("echo");
        assert_eq!(
            dig.lookup_short("www.example.com").unwrap(),
            vec!["www.example.com +short"]
        );
    }

    #[test]
    fn server_is_passed_first() {
        let dig = DigLookup::new().program("echo").server("8.8.8.8");
        assert_eq!(
            dig.lookup_short("www.example.com").unwrap(),
            vec!["@8.8.8.8 www.example.com +short"]
        );
    }
}
