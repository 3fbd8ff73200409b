use std::{
    io,
    path::{Path, PathBuf},
};

use crate::config::BUNDLE_EXTENSION;

/// Returns an Option containing the given `PathBuf`, if the `PathBuf` points to an actual file
pub fn some_if_file(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Expands a leading `~` to the current user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Whether the path's name ends in `.app`
pub fn has_bundle_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BUNDLE_EXTENSION))
}

/// Name of a bundle as shown by Finder, i.e. the directory name without `.app`
pub fn get_bundle_name(path: &Path) -> Option<String> {
    let name = if has_bundle_extension(path) {
        path.file_stem()?
    } else {
        path.file_name()?
    };

    Some(name.to_string_lossy().into_owned())
}

pub fn get_contents_dir(path_bundle: &Path) -> PathBuf {
    path_bundle.join("Contents")
}

pub fn get_info_plist_path(path_bundle: &Path) -> PathBuf {
    get_contents_dir(path_bundle).join("Info.plist")
}

pub fn get_executables_dir(path_bundle: &Path) -> PathBuf {
    get_contents_dir(path_bundle).join("MacOS")
}

pub fn get_resources_dir(path_bundle: &Path) -> PathBuf {
    get_contents_dir(path_bundle).join("Resources")
}

/// Whether the path is a regular file any user may execute
#[cfg(unix)]
pub fn is_executable(path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = path.metadata()?;
    Ok(metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
}

/// Whether the path is a regular file. There are no execute bits to check on this platform.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> io::Result<bool> {
    Ok(path.metadata()?.is_file())
}

/// Sets the Unix permission bits of a path. Does nothing on other platforms.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::{fs::Permissions, os::unix::fs::PermissionsExt};

    std::fs::set_permissions(path, Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Marks a file as executable and readable by everyone, writable by its owner
pub fn set_executable(path: &Path) -> io::Result<()> {
    set_mode(path, 0o755)
}
