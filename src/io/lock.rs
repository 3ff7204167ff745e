use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

/// Name of the lock file inside the store directory
pub const LOCK_FILE: &str = ".lock";

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Error type for the store write lock
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("could not lock {path}: {source}")]
    Flock { path: PathBuf, source: io::Error },
    #[error("timed out after {waited_ms} ms waiting for {path}: another smartdo process may be writing")]
    Timeout { path: PathBuf, waited_ms: u128 },
}

/// Exclusive advisory lock (flock) held across one read-modify-write of
/// the store. Released when dropped.
///
/// The lock file is left on disk. Deleting it on release would let a
/// waiter lock the old inode while a newcomer locks a fresh one.
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Lock `<store_dir>/.lock`, retrying until `timeout` has passed
    pub fn acquire(store_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = store_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let start = Instant::now();
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let locked = try_lock(&file).map_err(|source| LockError::Flock {
                path: path.clone(),
                source,
            })?;
            if locked {
                if attempts > 1 {
                    debug!(
                        attempts,
                        waited = ?start.elapsed(),
                        "store lock acquired after waiting"
                    );
                }
                return Ok(FileLock { file });
            }
            if start.elapsed() >= timeout {
                return Err(LockError::Timeout {
                    path,
                    waited_ms: start.elapsed().as_millis(),
                });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        unlock(&self.file);
    }
}

/// Non-blocking exclusive flock. Ok(false) means someone else holds it.
#[cfg(unix)]
fn try_lock(file: &File) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(unix)]
fn unlock(file: &File) {
    use std::os::unix::io::AsRawFd;
    unsafe {
        libc::flock(file.as_raw_fd(), libc::LOCK_UN);
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> io::Result<bool> {
    Ok(true)
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn release_on_drop_allows_relock() {
        let tmp = TempDir::new().unwrap();
        let lock = FileLock::acquire(tmp.path(), Duration::from_secs(1)).unwrap();
        drop(lock);
        assert!(FileLock::acquire(tmp.path(), Duration::from_secs(1)).is_ok());
        // The file itself stays put
        assert!(tmp.path().join(LOCK_FILE).exists());
    }

    #[cfg(unix)]
    #[test]
    fn held_lock_times_out_second_caller() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire(tmp.path(), Duration::from_secs(1)).unwrap();
        let second = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn waiter_gets_lock_once_released() {
        let tmp = TempDir::new().unwrap();
        let held = FileLock::acquire(tmp.path(), Duration::from_secs(1)).unwrap();
        let releaser = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            drop(held);
        });
        assert!(FileLock::acquire(tmp.path(), Duration::from_secs(5)).is_ok());
        releaser.join().unwrap();
    }

    #[test]
    fn missing_directory_is_an_open_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            FileLock::acquire(&missing, Duration::from_millis(10)),
            Err(LockError::Open { .. })
        ));
    }
}
