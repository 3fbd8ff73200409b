//! Error types used by this crate.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Custom error type returned when detecting bundles or generating launchers fails.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// The given target application does not exist
    #[error("Target not found: {0:?}")]
    TargetNotFound(PathBuf),

    /// The given target exists, but is not a bundle built with Electron
    #[error("Not a recognised Electron application: {0:?}")]
    NotFrameworkBundle(PathBuf),

    /// The directory to scan does not exist, or is not a directory
    #[error("Directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    /// The bundle does not declare an executable, or the declared executable is missing
    #[error("No executable found for {bundle:?}{}", executable_suffix(.executable))]
    ExecutableNotFound {
        bundle: PathBuf,
        executable: Option<PathBuf>,
    },

    /// The target executable exists but cannot be executed
    #[error("Target is not executable: {0:?}")]
    TargetNotExecutable(PathBuf),

    /// A launcher already exists at the destination and overwriting was not requested
    #[error("Destination already exists: {0:?} (use --overwrite to replace it)")]
    DestinationExists(PathBuf),

    /// The file system refused access to a path
    #[error("Permission denied: {path:?}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The display name contains nothing usable as a file name
    #[error("Launcher name {0:?} is empty after removing illegal characters")]
    SanitizationFailure(String),

    /// A bundle's metadata could not be parsed
    #[error("Could not parse bundle metadata: {0}")]
    MetadataParse(String),

    /// Error originating from [`io::Error`]
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn executable_suffix(executable: &Option<PathBuf>) -> String {
    executable
        .as_ref()
        .map(|e| format!(" (expected at {e:?})"))
        .unwrap_or_default()
}

impl From<nom::Err<nom::error::Error<&str>>> for LauncherError {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Self::MetadataParse(err.map_input(ToOwned::to_owned).to_string())
    }
}

impl LauncherError {
    /// Wraps an [`io::Error`], attaching `path` when access was denied
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
                source: err,
            }
        } else {
            Self::Io(err)
        }
    }

    /// Whether a scan should warn about this error and continue with the next candidate
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::ExecutableNotFound { .. }
                | Self::PermissionDenied { .. }
                | Self::MetadataParse(_)
        )
    }

    /// Process exit code reported by the command line front-end
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TargetNotFound(_) | Self::DirectoryNotFound(_) => 3,
            Self::NotFrameworkBundle(_)
            | Self::ExecutableNotFound { .. }
            | Self::TargetNotExecutable(_) => 4,
            Self::DestinationExists(_) => 5,
            Self::PermissionDenied { .. } => 6,
            Self::SanitizationFailure(_) => 7,
            Self::MetadataParse(_) | Self::Io(_) => 1,
        }
    }
}

/// Custom Result type for this crate
pub type LauncherResult<T> = Result<T, LauncherError>;
