//! Tree supervision: enforcement, sweeps and directory watches
//!
//! This module provides:
//! - Mode enforcement for a single filesystem entry
//! - Recursive sweeps that normalize a whole subtree
//! - Per-directory watches that keep the tree compliant as it mutates

mod enforce;
mod sweep;
mod watch;

pub use enforce::{enforce_mode, Enforcement};
pub use sweep::sweep;
pub use watch::watch_dir;
