//! Staging edge hostname derivation.

use crate::classify::EdgeClass;

/// Which rule produced a staging hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRoute {
    /// Global redirect through `akadns.net` onto an `akamaiedge.net` edge.
    AkaDnsEdge,
    /// Direct `edgekey.net` / `edgesuite.net` edge.
    EdgeKey,
}

impl std::fmt::Display for EdgeRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AkaDnsEdge => "Akamai with Akadns",
            Self::EdgeKey => "Akamai",
        })
    }
}

/// A staging edge hostname to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingTarget {
    /// The rule that matched.
    pub route: EdgeRoute,
    /// The rewritten edge hostname, e.g. `e1.dscx.akamaiedge-staging.net.`.
    pub hostname: String,
}

/// `(production suffix, staging suffix)` pairs.
const EDGE_REWRITE: (&str, &str) = (".akamaiedge.net.", ".akamaiedge-staging.net.");
const EDGEKEY_REWRITES: &[(&str, &str)] = &[
    (".edgekey.net.", ".edgekey-staging.net."),
    (".edgesuite.net.", ".edgesuite-staging.net."),
];

/// Derives the staging edge hostname from a classified chain.
///
/// An `akadns` redirect together with an `akamaiedge` edge takes priority
/// over an `edgekey`/`edgesuite` entry. The first matching entry is used.
/// Returns `None` when neither rule applies.
#[must_use]
pub fn derive_staging<S: AsRef<str>>(chain: &[S], classes: &[EdgeClass]) -> Option<StagingTarget> {
    let first = |wanted: EdgeClass| {
        chain
            .iter()
            .zip(classes)
            .find(|&(_, &class)| class == wanted)
            .map(|(entry, _)| entry.as_ref())
    };

    if classes.contains(&EdgeClass::AkaDns) {
        if let Some(edge) = first(EdgeClass::Edge) {
            return rewrite_suffix(edge, &[EDGE_REWRITE]).map(|hostname| StagingTarget {
                route: EdgeRoute::AkaDnsEdge,
                hostname,
            });
        }
    }

    first(EdgeClass::EdgeKey)
        .and_then(|edgekey| rewrite_suffix(edgekey, EDGEKEY_REWRITES))
        .map(|hostname| StagingTarget {
            route: EdgeRoute::EdgeKey,
            hostname,
        })
}

fn rewrite_suffix(entry: &str, rewrites: &[(&str, &str)]) -> Option<String> {
    rewrites.iter().find_map(|(from, to)| {
        entry
            .strip_suffix(from)
            .map(|prefix| format!("{prefix}{to}"))
    })
}
