//! Append-only file sink

use crate::core::{LoggerError, Result, Sink};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Permission bits for newly created log files.
pub const DEFAULT_FILE_MODE: u32 = 0o640;
/// Permission bits for newly created log directories.
pub const DEFAULT_DIR_MODE: u32 = 0o750;

/// Log file opened in append mode.
///
/// Writes go straight to the file handle; every line written by a channel
/// logger is a single `write` call.
pub struct FileSink {
    path: PathBuf,
    file: File,
    label: String,
}

impl FileSink {
    /// Open with the default permission bits.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_modes(path, DEFAULT_FILE_MODE, DEFAULT_DIR_MODE)
    }

    /// Create missing parent directories with `dir_mode`, then open or
    /// create the file for appending with `file_mode`.
    pub fn open_with_modes(path: impl Into<PathBuf>, file_mode: u32, dir_mode: u32) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent, dir_mode)
                .map_err(|e| LoggerError::sink_open("file", parent.display().to_string(), e))?;
        }

        let file = open_append(&path, file_mode)
            .map_err(|e| LoggerError::sink_open("file", path.display().to_string(), e))?;

        Ok(Self {
            label: format!("file:{}", path.display()),
            path,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn create_dir_all(dir: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(mode).create(dir)
}

#[cfg(not(unix))]
fn create_dir_all(dir: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn open_append(path: &Path, mode: u32) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new().create(true).append(true).mode(mode).open(path)
}

#[cfg(not(unix))]
fn open_append(path: &Path, _mode: u32) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.label
    }
}
