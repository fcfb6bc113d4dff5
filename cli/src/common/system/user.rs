//! # Host Identity
//!
//! File: cli/src/common/system/user.rs
//!
//! Containers that bind-mount project directories should write files as the
//! developer, not as root. `init` records the host ids in `.env` as
//! `USER_ID` / `GROUP_ID` for the compose file to pick up.
//!

/// Host uid and gid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostIds {
    pub uid: u32,
    pub gid: u32,
}

impl HostIds {
    /// The `.env` lines describing these ids.
    pub fn env_lines(&self) -> String {
        format!("USER_ID={}\nGROUP_ID={}\n", self.uid, self.gid)
    }
}

/// The ids of the current process, when the platform has them.
#[cfg(unix)]
pub fn host_ids() -> Option<HostIds> {
    Some(HostIds {
        uid: nix::unistd::getuid().as_raw(),
        gid: nix::unistd::getgid().as_raw(),
    })
}

#[cfg(not(unix))]
pub fn host_ids() -> Option<HostIds> {
    None
}
