//! Writing launchers under temporary names and renaming them into place, so an interrupted or
//! failed generation never leaves a partially written launcher at its destination.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use tempfile::{Builder, NamedTempFile, TempDir};
use tracing::{debug, warn};

use crate::{
    error::{LauncherError, LauncherResult},
    utils::set_mode,
};

const COMPONENT: &str = "Generator";

pub const MODE_FILE: u32 = 0o644;
pub const MODE_EXECUTABLE: u32 = 0o755;

fn split_path(path: &Path) -> (&Path, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    (dir, file_name)
}

/// Hidden temporary file in the same directory as `path`
fn temp_file_beside(path: &Path) -> LauncherResult<NamedTempFile> {
    let (dir, file_name) = split_path(path);

    Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| LauncherError::from_io(e, dir))
}

fn finish_temp_file(temp: &NamedTempFile, mode: u32) -> io::Result<()> {
    temp.as_file().sync_all()?;
    set_mode(temp.path(), mode)
}

fn persist(temp: NamedTempFile, path: &Path) -> LauncherResult<()> {
    temp.persist(path)
        .map_err(|e| LauncherError::from_io(e.error, path))?;
    Ok(())
}

/// Writes `content` to a temporary file beside `path`, then renames it over `path`
pub fn write_atomic(path: &Path, content: &[u8], mode: u32) -> LauncherResult<()> {
    let mut temp = temp_file_beside(path)?;

    temp.write_all(content)
        .and_then(|()| finish_temp_file(&temp, mode))
        .map_err(|e| LauncherError::from_io(e, temp.path()))?;

    persist(temp, path)
}

/// Copies `source` to a temporary file beside `destination`, then renames it over `destination`
pub fn copy_atomic(source: &Path, destination: &Path, mode: u32) -> LauncherResult<()> {
    let mut file_source = File::open(source).map_err(|e| LauncherError::from_io(e, source))?;
    let mut temp = temp_file_beside(destination)?;

    io::copy(&mut file_source, &mut temp)
        .and_then(|_| finish_temp_file(&temp, mode))
        .map_err(|e| LauncherError::from_io(e, temp.path()))?;

    persist(temp, destination)
}

/// Removes a file or directory tree, without following symlinks
fn remove_path(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn get_backup_path(destination: &Path) -> PathBuf {
    let (dir, file_name) = split_path(destination);
    dir.join(format!(".{file_name}.{}.backup", process::id()))
}

#[derive(Debug)]
enum Staged {
    Bundle(TempDir),
    File(NamedTempFile),
}

/// A launcher assembled under a temporary name in its output directory.
///
/// Dropping it without calling [`StagedLauncher::commit`] removes everything staged so far.
#[derive(Debug)]
pub struct StagedLauncher {
    staged: Staged,
    destination: PathBuf,
}

impl StagedLauncher {
    /// Creates an empty, hidden bundle directory beside `destination`
    pub fn bundle(destination: &Path) -> LauncherResult<Self> {
        let (dir, file_name) = split_path(destination);

        let staging = Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".staging")
            .tempdir_in(dir)
            .map_err(|e| LauncherError::from_io(e, dir))?;

        set_mode(staging.path(), MODE_EXECUTABLE)
            .map_err(|e| LauncherError::from_io(e, staging.path()))?;

        debug!("{COMPONENT} - Staging {destination:?} at {:?}", staging.path());

        Ok(Self {
            staged: Staged::Bundle(staging),
            destination: destination.to_path_buf(),
        })
    }

    /// Writes a single file launcher to a hidden file beside `destination`
    pub fn file(destination: &Path, content: &[u8], mode: u32) -> LauncherResult<Self> {
        let mut temp = temp_file_beside(destination)?;

        temp.write_all(content)
            .and_then(|()| finish_temp_file(&temp, mode))
            .map_err(|e| LauncherError::from_io(e, temp.path()))?;

        debug!("{COMPONENT} - Staging {destination:?} at {:?}", temp.path());

        Ok(Self {
            staged: Staged::File(temp),
            destination: destination.to_path_buf(),
        })
    }

    /// Where the launcher is currently staged
    pub fn path(&self) -> &Path {
        match &self.staged {
            Staged::Bundle(dir) => dir.path(),
            Staged::File(file) => file.path(),
        }
    }

    /// Renames the staged launcher to its destination.
    ///
    /// An existing destination is only replaced if `overwrite` is set. It is moved aside first
    /// and restored if the rename fails, so the destination always holds either the previous
    /// launcher or the complete new one.
    pub fn commit(self, overwrite: bool) -> LauncherResult<()> {
        let staged_path = self.path();
        let destination = self.destination.as_path();

        if fs::symlink_metadata(destination).is_err() {
            fs::rename(staged_path, destination)
                .map_err(|e| LauncherError::from_io(e, destination))?;
            debug!("{COMPONENT} - Committed {destination:?}");
            return Ok(());
        }

        if !overwrite {
            return Err(LauncherError::DestinationExists(destination.to_path_buf()));
        }

        let path_backup = get_backup_path(destination);
        fs::rename(destination, &path_backup)
            .map_err(|e| LauncherError::from_io(e, destination))?;

        if let Err(e) = fs::rename(staged_path, destination) {
            warn!("{COMPONENT} - Restoring {destination:?} after failed commit: {e}");
            if let Err(restore_error) = fs::rename(&path_backup, destination) {
                warn!(
                    "{COMPONENT} - Could not restore {destination:?} from {path_backup:?}: {restore_error}"
                );
            }
            return Err(LauncherError::from_io(e, destination));
        }

        if let Err(e) = remove_path(&path_backup) {
            warn!("{COMPONENT} - Could not remove replaced launcher at {path_backup:?}: {e}");
        }

        debug!("{COMPONENT} - Replaced {destination:?}");

        Ok(())
    }
}
