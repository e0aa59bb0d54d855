//! Internal utilities.

/// Returns `true` if the process runs with an effective UID of 0.
#[must_use]
pub fn is_root() -> bool {
    // SAFETY: `geteuid` has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}
