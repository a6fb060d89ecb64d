//! Target permission policy shared by every enforcement site

use serde::{Deserialize, Serialize};

/// Permission bits PermWatch manages: rwx for user/group/other plus the
/// setuid, setgid and sticky bits. File-type bits from `st_mode` are
/// masked off before any comparison.
pub const MODE_BITS: u32 = 0o7777;

const SETUID: u32 = 0o4000;
const SETGID: u32 = 0o2000;

/// Target modes applied uniformly across the watched tree.
///
/// Built once at startup and handed by copy to every sweep and every
/// watch task; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Mode applied to directories
    pub directory_mode: u32,
    /// Mode applied to regular files
    pub file_mode: u32,
}

impl Policy {
    pub fn new(directory_mode: u32, file_mode: u32) -> Self {
        Self {
            directory_mode: directory_mode & MODE_BITS,
            file_mode: file_mode & MODE_BITS,
        }
    }

    /// OR the set-group-ID bit into both modes
    pub fn with_setgid(self) -> Self {
        Self {
            directory_mode: self.directory_mode | SETGID,
            file_mode: self.file_mode | SETGID,
        }
    }

    /// OR the set-user-ID bit into both modes
    pub fn with_setuid(self) -> Self {
        Self {
            directory_mode: self.directory_mode | SETUID,
            file_mode: self.file_mode | SETUID,
        }
    }

    /// Target mode for an entry of the given kind
    pub fn target_mode(&self, is_directory: bool) -> u32 {
        if is_directory {
            self.directory_mode
        } else {
            self.file_mode
        }
    }
}
