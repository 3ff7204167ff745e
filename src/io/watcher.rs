use std::ffi::OsString;
use std::path::Path;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::trace;

/// Watches one file inside a directory.
///
/// Atomic writes replace the file by rename, so the directory is watched
/// rather than the file itself. Dropping the watcher stops it.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Call `on_change` (on the watcher's thread) whenever `file_name`
    /// in `dir` is created, modified, renamed into place, or removed.
    pub fn start<F>(dir: &Path, file_name: &str, on_change: F) -> Result<Self, notify::Error>
    where
        F: Fn() + Send + 'static,
    {
        let target = OsString::from(file_name);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                // Temp files from atomic writes and the .lock file are skipped
                let relevant = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(target.as_os_str()));
                if relevant {
                    trace!(kind = ?event.kind, "watched file changed");
                    on_change();
                }
            },
            Config::default(),
        )?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(FileWatcher { _watcher: watcher })
    }
}
