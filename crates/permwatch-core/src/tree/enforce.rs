//! Mode enforcement for a single filesystem entry

use crate::error::Result;
use crate::policy::{Policy, MODE_BITS};
use std::fs::{self, Metadata, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::info;

/// Outcome of an enforcement pass over one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// The mode differed from the target and was corrected
    Applied,
    /// The mode already matched the target; nothing was touched
    Unchanged,
}

/// Bring one entry's permission bits to the policy target.
///
/// Compliant entries are left entirely alone: no chmod call, no log line.
/// The caller supplies freshly stat'ed metadata; the entry may still have
/// vanished in between, in which case the chmod surfaces as `Error::Io`.
pub fn enforce_mode(path: &Path, metadata: &Metadata, policy: &Policy) -> Result<Enforcement> {
    let target = policy.target_mode(metadata.is_dir());
    let observed = metadata.permissions().mode() & MODE_BITS;

    if observed == target {
        return Ok(Enforcement::Unchanged);
    }

    info!(
        "{} has mode {:04o}, changing to {:04o}",
        path.display(),
        observed,
        target
    );
    fs::set_permissions(path, Permissions::from_mode(target))?;

    Ok(Enforcement::Applied)
}
