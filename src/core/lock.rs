//! Exclusive run lock for a data directory.
//!
//! Only one run may touch the canonical paths at a time. The lock is an
//! advisory `flock` on a file inside the data directory, released when the
//! guard is dropped (or the process dies).

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

use fs2::FileExt;
use tracing::debug;

use crate::config::paths::DataLayout;

use super::error::OrchestrationError;

/// Held for the duration of a run
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Take the lock without waiting
    ///
    /// Fails with `RunInProgress` when another run holds it, and with `Lock`
    /// when the lock file cannot be opened or locked at all.
    pub fn acquire(layout: &DataLayout) -> Result<Self, OrchestrationError> {
        let path = layout.lock_file();

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| OrchestrationError::Lock {
                path: path.clone(),
                source,
            })?;

        if let Err(e) = file.try_lock_exclusive() {
            if is_contended(&e) {
                return Err(OrchestrationError::RunInProgress {
                    data_dir: layout.data_dir().to_path_buf(),
                });
            }
            return Err(OrchestrationError::Lock { path, source: e });
        }

        debug!(path = %path.display(), "Acquired run lock");
        Ok(Self { file, path })
    }
}

/// Whether a failed lock attempt means another holder, not an I/O fault
fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl Drop for RunLock {
    fn drop(&mut self) {
        // Closing the file releases the lock as well
        let _ = self.file.unlock();
        debug!(path = %self.path.display(), "Released run lock");
    }
}
