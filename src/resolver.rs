//! Production hostname to staging address resolution.

use crate::classify::classify_chain;
use crate::derive::{EdgeRoute, derive_staging};
use crate::error::{Result, StagingError};
use crate::lookup::ShortLookup;
use std::net::IpAddr;

/// A hosts-file line mapping a staging address to a production hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingMapping {
    /// Last entry of the staging edge's chain.
    pub ip: String,
    /// The production hostname being redirected.
    pub hostname: String,
}

impl std::fmt::Display for StagingMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.ip, self.hostname)
    }
}

/// Result of a [`StagingResolver::build`] run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// One mapping per resolved hostname, in input order.
    pub mappings: Vec<StagingMapping>,
    /// Hostnames with no recognizable edge in their chain.
    pub skipped: Vec<String>,
    /// Hostnames whose staging edge resolved to no address.
    pub failures: Vec<StagingError>,
}

/// Resolves production hostnames to their staging edge addresses.
///
/// # Example
///
/// ```rust,ignore
/// use staging_hosts::{DigLookup, StagingResolver};
///
/// let resolver = StagingResolver::new(DigLookup::new());
/// if let Some(mapping) = resolver.resolve("www.example.com")? {
///     println!("{mapping}");
/// }
/// ```
#[derive(Debug)]
pub struct StagingResolver<L> {
    lookup: L,
}

impl<L: ShortLookup> StagingResolver<L> {
    /// Creates a resolver over the given lookup facility.
    #[must_use]
    pub const fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolves one hostname.
    ///
    /// Returns `Ok(None)` when the chain has no recognizable edge.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::Lookup`] if either lookup fails, or
    /// [`StagingError::EmptyStagingResult`] if the staging chain does not end
    /// in an address.
    pub fn resolve(&self, hostname: &str) -> Result<Option<StagingMapping>> {
        Ok(self
            .resolve_routed(hostname)?
            .map(|(_, mapping)| mapping))
    }

    fn resolve_routed(&self, hostname: &str) -> Result<Option<(EdgeRoute, StagingMapping)>> {
        let chain = self.lookup.lookup_short(hostname)?;
        let classes = classify_chain(&chain);
        tracing::debug!(
            hostname = %hostname,
            chain = ?chain,
            classes = ?classes,
            "Classified chain"
        );

        let Some(target) = derive_staging(&chain, &classes) else {
            return Ok(None);
        };

        let staging_chain = self.lookup.lookup_short(&target.hostname)?;
        let Some(ip) = staging_chain
            .last()
            .filter(|entry| entry.parse::<IpAddr>().is_ok())
        else {
            return Err(StagingError::EmptyStagingResult {
                hostname: hostname.to_string(),
                staging: target.hostname,
            });
        };

        Ok(Some((
            target.route,
            StagingMapping {
                ip: ip.clone(),
                hostname: hostname.to_string(),
            },
        )))
    }

    /// Resolves every hostname in order.
    ///
    /// Hostnames whose staging edge has no address are collected in
    /// [`BuildReport::failures`] and the run continues.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::Lookup`] on the first lookup failure.
    pub fn build<S: AsRef<str>>(&self, hostnames: &[S]) -> Result<BuildReport> {
        let total = hostnames.len();
        tracing::info!(total, "Found hostnames in the list");

        let mut report = BuildReport::default();
        for (i, hostname) in hostnames.iter().enumerate() {
            let hostname = hostname.as_ref();
            let progress = format!("{}/{total}", i + 1);

            match self.resolve_routed(hostname) {
                Ok(Some((route, mapping))) => {
                    tracing::info!(
                        progress = %progress,
                        hostname = %hostname,
                        route = %route,
                        ip = %mapping.ip,
                        "Resolved staging address"
                    );
                    report.mappings.push(mapping);
                }
                Ok(None) => {
                    tracing::info!(progress = %progress, hostname = %hostname, "Skipping");
                    report.skipped.push(hostname.to_string());
                }
                Err(e @ StagingError::EmptyStagingResult { .. }) => {
                    tracing::warn!(
                        progress = %progress,
                        hostname = %hostname,
                        error = %e,
                        "No staging address"
                    );
                    report.failures.push(e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }
}
