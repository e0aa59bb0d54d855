//! CNAME chain classification.
//!
//! Every entry of a short lookup is matched against the Akamai edge naming
//! conventions. Entries are expected to be fully qualified (trailing dot);
//! address literals never match.

/// Which edge naming convention a chain entry follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// `*.edgekey.net.` or `*.edgesuite.net.`
    EdgeKey,
    /// `*.globalredir.akadns.net.`
    AkaDns,
    /// `*.akamaiedge.net.`
    Edge,
    /// No known convention.
    Unmatched,
}

/// Checked in order, first match wins.
const SUFFIXES: &[(&str, EdgeClass)] = &[
    (".edgekey.net.", EdgeClass::EdgeKey),
    (".edgesuite.net.", EdgeClass::EdgeKey),
    (".globalredir.akadns.net.", EdgeClass::AkaDns),
    (".akamaiedge.net.", EdgeClass::Edge),
];

/// Classifies a single chain entry. Case-sensitive.
#[must_use]
pub fn classify(entry: &str) -> EdgeClass {
    SUFFIXES
        .iter()
        .find(|(suffix, _)| entry.ends_with(suffix))
        .map_or(EdgeClass::Unmatched, |&(_, class)| class)
}

/// Classifies every entry, preserving order and length.
#[must_use]
pub fn classify_chain<S: AsRef<str>>(chain: &[S]) -> Vec<EdgeClass> {
    chain.iter().map(|entry| classify(entry.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edgekey_and_edgesuite() {
        assert_eq!(classify("www.example.com.edgekey.net."), EdgeClass::EdgeKey);
        assert_eq!(classify("a1.g.edgesuite.net."), EdgeClass::EdgeKey);
    }

    #[test]
    fn akadns() {
        assert_eq!(
            classify("shop.example.com.globalredir.akadns.net."),
            EdgeClass::AkaDns
        );
    }

    #[test]
    fn akamaiedge() {
        assert_eq!(classify("e123.dscx.akamaiedge.net."), EdgeClass::Edge);
    }

    #[test]
    fn other_entries_are_unmatched() {
        assert_eq!(classify("23.45.67.89"), EdgeClass::Unmatched);
        assert_eq!(classify("2001:db8::1"), EdgeClass::Unmatched);
        assert_eq!(classify("www.example.com."), EdgeClass::Unmatched);
        assert_eq!(classify(""), EdgeClass::Unmatched);
    }

    #[test]
    fn requires_trailing_dot() {
        assert_eq!(classify("e1.dscx.akamaiedge.net"), EdgeClass::Unmatched);
        assert_eq!(classify("foo.edgekey.net"), EdgeClass::Unmatched);
    }

    #[test]
    fn requires_label_before_suffix() {
        assert_eq!(classify("edgekey.net."), EdgeClass::Unmatched);
        assert_eq!(classify("akamaiedge.net."), EdgeClass::Unmatched);
    }

    #[test]
    fn case_sensitive() {
        assert_eq!(classify("E1.DSCX.AKAMAIEDGE.NET."), EdgeClass::Unmatched);
    }

    #[test]
    fn staging_names_are_not_production_edges() {
        assert_eq!(classify("e1.dscx.akamaiedge-staging.net."), EdgeClass::Unmatched);
        assert_eq!(classify("foo.edgekey-staging.net."), EdgeClass::Unmatched);
    }

    #[test]
    fn chain_is_parallel() {
        let chain = [
            "x1.example.globalredir.akadns.net.",
            "e1.dscx.akamaiedge.net.",
            "1.2.3.4",
        ];
        assert_eq!(
            classify_chain(&chain),
            vec![EdgeClass::AkaDns, EdgeClass::Edge, EdgeClass::Unmatched]
        );
        assert!(classify_chain::<&str>(&[]).is_empty());
    }
}
