//! # staging-hosts
//!
//! Point a hosts file at Akamai staging edges.
//!
//! For each production hostname the public CNAME chain is looked up and
//! matched against Akamai's edge naming conventions. A recognized edge name
//! is rewritten to its staging twin (`edgekey.net` → `edgekey-staging.net`,
//! `edgesuite.net` → `edgesuite-staging.net`, `akamaiedge.net` →
//! `akamaiedge-staging.net`), resolved, and the resulting address is written
//! as a hosts-file line for the original hostname.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use staging_hosts::{DigLookup, HostsManager, StagingConfig, StagingResolver};
//!
//! let manager = HostsManager::new(StagingConfig::from_current_dir()?);
//! manager.init()?;
//!
//! let report = manager.build(&StagingResolver::new(DigLookup::new()))?;
//! println!("{} hostnames mapped", report.mappings.len());
//!
//! // Requires root.
//! manager.apply()?;
//! ```
//!
//! ## Matching rules
//!
//! | chain contains                                  | staging name from            |
//! |-------------------------------------------------|------------------------------|
//! | `*.globalredir.akadns.net.` and `*.akamaiedge.net.` | first `akamaiedge.net` entry |
//! | `*.edgekey.net.` or `*.edgesuite.net.`          | first such entry             |
//! | anything else                                   | skipped                      |
//!
//! An `akamaiedge.net` edge without the `akadns` redirect is not enough.
//!
//! ## Permissions
//!
//! `apply` and `reset` write the system hosts file and usually require root.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod derive;
pub mod error;
pub mod hosts;
pub mod lookup;
pub mod resolver;
pub mod util;

pub use classify::{EdgeClass, classify, classify_chain};
pub use config::StagingConfig;
pub use derive::{EdgeRoute, StagingTarget, derive_staging};
pub use error::{Result, StagingError};
pub use hosts::{HostsManager, append_mappings, load_hostnames};
pub use lookup::{DigLookup, ShortLookup, SystemLookup, parse_short_output};
pub use resolver::{BuildReport, StagingMapping, StagingResolver};
