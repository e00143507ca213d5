//! Exclusively owned temporary files.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Attempts before giving up on finding an unused file name.
const CREATE_ATTEMPTS: usize = 32;

/// A temporary file removed from disk when released or dropped.
///
/// Every `TempFile` owns a distinct path; two owners never point at the same file.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    released: bool,
}

impl TempFile {
    /// Create a new empty temporary file in `dir`, or in the system temp directory.
    ///
    /// Returns the owner together with a handle opened for writing.
    pub fn create(dir: Option<&Path>) -> io::Result<(Self, File)> {
        let dir = dir.map_or_else(std::env::temp_dir, Path::to_path_buf);
        let ts_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();

        for _ in 0..CREATE_ATTEMPTS {
            let counter = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = dir.join(format!(
                "bodykit-upload-{}-{ts_nanos}-{counter}.tmp",
                std::process::id()
            ));

            match OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&candidate)
            {
                Ok(file) => {
                    let owner = Self {
                        path: candidate,
                        released: false,
                    };
                    return Ok((owner, file));
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
                Err(err) => return Err(err),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "failed to allocate unique temporary file",
        ))
    }

    /// Location of the file on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file for reading.
    pub fn open(&self) -> io::Result<File> {
        if self.released {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "temporary file already released",
            ));
        }
        File::open(&self.path)
    }

    /// Returns true once the file has been removed.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Remove the file. Releasing twice is a no-op.
    pub fn release(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
        self.released = true;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove temporary file"
            );
        }
    }
}
