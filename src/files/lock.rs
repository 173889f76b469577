//! Lock file for the version ledger.
//!
//! The engine assumes exclusive ownership of a version store during a run.
//! For the file ledger that exclusion comes from a `<ledger>.lock` file
//! holding the owner's PID; locks left behind by dead processes are treated
//! as stale and removed.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Metadata stored in a lock file to identify the owning process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    pub pid: u32,
    pub started: String,
}

/// Get the lock file path for a given ledger.
///
/// The lock path is the original path with `.lock` appended.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock = path.as_os_str().to_owned();
    lock.push(".lock");
    PathBuf::from(lock)
}

/// Read lock info if the lock file exists and the owning PID is still alive.
///
/// Returns `None` if the lock file is missing, malformed, or the PID is dead.
pub fn read_lock(path: &Path) -> Option<LockInfo> {
    let lock_path = lock_path_for(path);
    let contents = fs::read_to_string(&lock_path).ok()?;
    let info: LockInfo = serde_json::from_str(&contents).ok()?;
    if !is_pid_alive(info.pid) {
        return None;
    }
    Some(info)
}

/// Held lock on a ledger. Dropping it removes the lock file.
#[derive(Debug)]
pub struct LedgerLock {
    lock_path: PathBuf,
}

impl LedgerLock {
    /// Take the lock for `path`.
    ///
    /// Stale lock files are cleaned up first. Fails with `StoreError::Locked`
    /// if a live process holds the lock, including this one through another
    /// store instance.
    pub fn acquire(path: &Path) -> Result<Self, StoreError> {
        let lock_path = lock_path_for(path);

        if let Some(info) = read_lock(path) {
            return Err(StoreError::Locked {
                path: path.to_path_buf(),
                pid: info.pid,
                started: info.started,
            });
        }
        // Dead owner or malformed content
        if lock_path.exists() {
            tracing::debug!("Removing stale ledger lock {}", lock_path.display());
            let _ = fs::remove_file(&lock_path);
        }

        let info = LockInfo {
            pid: std::process::id(),
            started: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_string(&info).map_err(|source| StoreError::Json {
            path: lock_path.clone(),
            source,
        })?;

        // create_new so two processes racing past the check cannot both win
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .map_err(|source| {
                if source.kind() == ErrorKind::AlreadyExists {
                    let owner = read_lock(path);
                    StoreError::Locked {
                        path: path.to_path_buf(),
                        pid: owner.as_ref().map(|o| o.pid).unwrap_or_default(),
                        started: owner.map(|o| o.started).unwrap_or_default(),
                    }
                } else {
                    StoreError::Io {
                        path: lock_path.clone(),
                        source,
                    }
                }
            })?;
        file.write_all(json.as_bytes())
            .map_err(|source| StoreError::Io {
                path: lock_path.clone(),
                source,
            })?;

        Ok(Self { lock_path })
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Check whether a process with the given PID is still running.
///
/// Uses `kill(pid, 0)` which checks for process existence without sending a signal.
/// Returns `true` if the process exists (even if owned by another user, EPERM).
#[cfg(unix)]
pub(crate) fn is_pid_alive(pid: u32) -> bool {
    // 0 and negative values address process groups, not a single process
    let pid = match libc::pid_t::try_from(pid) {
        Ok(pid) if pid > 0 => pid,
        _ => return false,
    };
    // SAFETY: kill with signal 0 only checks process existence, no signal is sent.
    let ret = unsafe { libc::kill(pid, 0) };
    if ret == 0 {
        return true;
    }
    // EPERM means the process exists but belongs to another user
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
pub(crate) fn is_pid_alive(_pid: u32) -> bool {
    false
}
