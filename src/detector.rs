//! Detection of Electron application bundles.
//!
//! A bundle is considered to be built with Electron if any of [`ELECTRON_MARKERS`] appears
//! beneath its `Contents/Frameworks` or `Contents/Resources` directories. The executable is
//! then resolved from the bundle's `Info.plist`.

use std::{
    fs::{self, ReadDir},
    io,
    path::{self, Path, PathBuf},
};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::{
    config::LauncherConfig,
    data::{ApplicationBundle, Classification},
    error::{LauncherError, LauncherResult},
    macros::logs::{debug_path, warn_no_bundles, warn_skipped},
    parsers::find_value_plist,
    utils::{
        get_bundle_name, get_contents_dir, get_executables_dir, get_info_plist_path,
        get_resources_dir, has_bundle_extension, some_if_file,
    },
};

const COMPONENT: &str = "Detector";

/// File and directory names which only exist inside Electron applications
pub const ELECTRON_MARKERS: [&str; 3] = ["Electron Framework.framework", "electron.asar", "app.asar"];

/// Directories directly under `Contents` which may hold a marker
const MARKER_PARENT_DIRS: [&str; 2] = ["Frameworks", "Resources"];

/// Maximum depth below `Contents` searched for markers
const MARKER_SEARCH_DEPTH: usize = 3;

const KEY_EXECUTABLE: &str = "CFBundleExecutable";
const KEY_ICON: &str = "CFBundleIconFile";

/// Values read from a bundle's `Info.plist`
#[derive(Debug, Default)]
struct BundleInfo {
    executable: Option<String>,
    icon_file: Option<String>,
}

impl BundleInfo {
    fn parse(file_content: &str) -> Self {
        let read = |key| {
            find_value_plist(file_content, key)
                .ok()
                .map(|(_, value)| value)
                .filter(|value| !value.is_empty())
        };

        Self {
            executable: read(KEY_EXECUTABLE),
            icon_file: read(KEY_ICON),
        }
    }
}

/// Reads and parses `Contents/Info.plist`
#[tracing::instrument(level = "trace")]
fn read_bundle_info(path_bundle: &Path) -> LauncherResult<BundleInfo> {
    let path_info = get_info_plist_path(path_bundle);

    let bytes = fs::read(&path_info).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LauncherError::ExecutableNotFound {
            bundle: path_bundle.to_path_buf(),
            executable: None,
        },
        _ => LauncherError::from_io(e, &path_info),
    })?;

    if bytes.starts_with(b"bplist") {
        return Err(LauncherError::MetadataParse(format!(
            "binary property lists are not supported: {path_info:?}"
        )));
    }

    let file_content = String::from_utf8(bytes)
        .map_err(|e| LauncherError::MetadataParse(format!("{path_info:?} is not UTF-8: {e}")))?;

    Ok(BundleInfo::parse(&file_content))
}

fn executable_from_info(path_bundle: &Path, info: &BundleInfo) -> LauncherResult<PathBuf> {
    let Some(executable) = &info.executable else {
        debug!("{COMPONENT} - {KEY_EXECUTABLE} not declared for {path_bundle:?}");
        return Err(LauncherError::ExecutableNotFound {
            bundle: path_bundle.to_path_buf(),
            executable: None,
        });
    };

    let path_executable = get_executables_dir(path_bundle).join(executable);
    debug_path!("declared executable", path_executable);

    some_if_file(path_executable.clone()).ok_or_else(|| LauncherError::ExecutableNotFound {
        bundle: path_bundle.to_path_buf(),
        executable: Some(path_executable),
    })
}

/// Icons may be declared with or without their `.icns` extension
fn icon_from_info(path_bundle: &Path, info: &BundleInfo) -> Option<PathBuf> {
    let icon_file = info.icon_file.as_ref()?;
    let path_resources = get_resources_dir(path_bundle);

    some_if_file(path_resources.join(icon_file))
        .or_else(|| some_if_file(path_resources.join(format!("{icon_file}.icns"))))
}

/// Returns the path of the binary declared by a bundle's `CFBundleExecutable`.
///
/// Fails with [`LauncherError::ExecutableNotFound`] if no executable is declared, or the
/// declared one does not exist. No other locations are guessed.
pub fn resolve_executable(path_bundle: &Path) -> LauncherResult<PathBuf> {
    let info = read_bundle_info(path_bundle)?;
    executable_from_info(path_bundle, &info)
}

/// Returns the icon declared by a bundle's `CFBundleIconFile`, if it exists in its resources
pub fn resolve_icon(path_bundle: &Path) -> LauncherResult<Option<PathBuf>> {
    let info = read_bundle_info(path_bundle)?;
    Ok(icon_from_info(path_bundle, &info))
}

/// Returns the first Electron marker found within the bundle's `Contents` directory
#[tracing::instrument(level = "trace")]
fn find_marker(path_contents: &Path) -> LauncherResult<Option<PathBuf>> {
    let walker = WalkDir::new(path_contents)
        .max_depth(MARKER_SEARCH_DEPTH)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() != 1
                || entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| MARKER_PARENT_DIRS.contains(&name))
        });

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(path_contents).to_path_buf();
                match e.into_io_error() {
                    Some(io_error) => return Err(LauncherError::from_io(io_error, &path)),
                    None => {
                        trace!("{COMPONENT} - Symlink loop ignored at {path:?}");
                        continue;
                    }
                }
            }
        };

        let is_marker = entry
            .file_name()
            .to_str()
            .is_some_and(|name| ELECTRON_MARKERS.contains(&name));

        if is_marker {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}

/// Determines whether `path` is an Electron application bundle.
///
/// Paths which exist but are not bundles, or bundles without any Electron markers, are
/// [`Classification::NotApplicable`]. Electron bundles whose executable cannot be resolved are
/// an error. Paths in the returned bundle are absolute.
#[tracing::instrument(level = "trace")]
pub fn classify(path: &Path) -> LauncherResult<Classification> {
    let path = &path::absolute(path).map_err(|e| LauncherError::from_io(e, path))?;

    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LauncherError::TargetNotFound(path.to_path_buf()),
        _ => LauncherError::from_io(e, path),
    })?;

    let path_contents = get_contents_dir(path);
    if !metadata.is_dir() || !path_contents.is_dir() {
        trace!("{COMPONENT} - Not a bundle: {path:?}");
        return Ok(Classification::NotApplicable);
    }

    let Some(path_marker) = find_marker(&path_contents)? else {
        trace!("{COMPONENT} - No Electron markers found in {path:?}");
        return Ok(Classification::NotApplicable);
    };
    debug!("{COMPONENT} - Electron marker found: {path_marker:?}");

    let info = read_bundle_info(path)?;
    let executable_path = executable_from_info(path, &info)?;
    let icon_path = icon_from_info(path, &info);

    let name = get_bundle_name(path).unwrap_or_else(|| path.display().to_string());

    trace!("{COMPONENT} - Executable for '{name}': {executable_path:?}");
    trace!("{COMPONENT} - Icon for '{name}': {icon_path:?}");

    Ok(Classification::Framework(ApplicationBundle::new(
        path.to_path_buf(),
        name,
        executable_path,
        icon_path,
    )))
}

/// Enumerates the immediate children of `directory` which are Electron application bundles.
///
/// The directory is read lazily as the returned iterator is advanced. Calling this again reads
/// the directory again.
pub fn scan(directory: &Path) -> LauncherResult<Scan> {
    if !directory.is_dir() {
        return Err(LauncherError::DirectoryNotFound(directory.to_path_buf()));
    }

    let entries = fs::read_dir(directory).map_err(|e| LauncherError::from_io(e, directory))?;
    debug!("{COMPONENT} - Scanning {directory:?}");

    Ok(Scan {
        directory: directory.to_path_buf(),
        entries: Some(entries),
        detected: 0,
    })
}

/// Lazy sequence of the Electron bundles within a directory, see [`scan`].
///
/// Candidates which cannot be read, or whose executable cannot be resolved, are logged and
/// skipped. Any other error is yielded to the caller.
#[derive(Debug)]
pub struct Scan {
    directory: PathBuf,
    entries: Option<ReadDir>,
    detected: usize,
}

impl Scan {
    fn finish(&mut self) {
        if self.entries.take().is_some() && self.detected == 0 {
            warn_no_bundles!(self.directory);
        }
    }
}

impl Iterator for Scan {
    type Item = LauncherResult<ApplicationBundle>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(entry) = self.entries.as_mut()?.next() else {
                self.finish();
                return None;
            };

            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn_skipped!(self.directory, e);
                    continue;
                }
            };

            if !has_bundle_extension(&path) {
                trace!("{COMPONENT} - Not an application bundle: {path:?}");
                continue;
            }

            match classify(&path) {
                Ok(Classification::Framework(bundle)) => {
                    self.detected += 1;
                    return Some(Ok(bundle));
                }
                Ok(Classification::NotApplicable) => {}
                // Dangling symlinks, or entries removed since the directory was read
                Err(e @ LauncherError::TargetNotFound(_)) => {
                    warn_skipped!(path, e);
                }
                Err(e) if e.is_skippable() => {
                    warn_skipped!(path, e);
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Detects Electron bundles using the directories of a [`LauncherConfig`]
#[derive(Debug, Clone)]
pub struct Detector {
    config: LauncherConfig,
}

impl Detector {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn classify(&self, path: &Path) -> LauncherResult<Classification> {
        classify(path)
    }

    /// Scans the given directory, or the configured scan directory if `None`
    pub fn scan(&self, directory: Option<&Path>) -> LauncherResult<Scan> {
        scan(directory.unwrap_or(&self.config.scan_directory))
    }

    /// Classifies a single target, treating a negative classification as an error
    pub fn resolve_target(&self, path: &Path) -> LauncherResult<ApplicationBundle> {
        classify(path)?
            .into_bundle()
            .ok_or_else(|| LauncherError::NotFrameworkBundle(path.to_path_buf()))
    }
}
