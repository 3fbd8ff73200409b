//! Defaults used when detecting bundles and generating launchers.

use std::path::PathBuf;

use cfg_if::cfg_if;

use crate::data::LauncherKind;

/// Argument forcing Chromium's ANGLE layer to use the OpenGL backend
pub const FORCE_OPENGL_ARGUMENT: &str = "--use-angle=gl";

/// Extension of an application bundle directory
pub const BUNDLE_EXTENSION: &str = "app";

/// Extension of a double-clickable shell script launcher
pub const COMMAND_EXTENSION: &str = "command";

/// Configuration shared by the detector and generator.
///
/// Nothing in this crate reads global state; pass a modified copy of this struct to change
/// any default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Where launchers are written when no output directory is given
    pub output_directory: PathBuf,
    /// Directory scanned when none is given
    pub scan_directory: PathBuf,
    /// Appended to the bundle name to form the default launcher name
    pub name_suffix: String,
    /// Argument inserted before any forwarded arguments
    pub extra_argument: String,
    /// Value of `CFBundleVersion` in generated bundles
    pub bundle_version: String,
    /// Reverse-DNS prefix of generated bundle identifiers
    pub identifier_prefix: String,
    pub launcher_kind: LauncherKind,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            scan_directory: default_scan_directory(),
            name_suffix: String::from(" with OpenGL"),
            extra_argument: String::from(FORCE_OPENGL_ARGUMENT),
            bundle_version: String::from("1.0"),
            identifier_prefix: String::from("com.user"),
            launcher_kind: LauncherKind::AppBundle,
        }
    }
}

impl LauncherConfig {
    pub fn with_output_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_directory = path.into();
        self
    }

    pub fn with_scan_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_directory = path.into();
        self
    }

    pub fn with_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.name_suffix = suffix.into();
        self
    }

    pub fn with_launcher_kind(mut self, kind: LauncherKind) -> Self {
        self.launcher_kind = kind;
        self
    }

    /// Default launcher name for an application, e.g. `Slack with OpenGL`
    pub fn default_display_name(&self, app_name: &str) -> String {
        format!("{app_name}{}", self.name_suffix)
    }
}

/// The user's desktop, falling back to their home directory and then the working directory
fn default_output_directory() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

cfg_if! {
    if #[cfg(target_os = "macos")] {
        fn default_scan_directory() -> PathBuf {
            PathBuf::from("/Applications")
        }
    } else {
        /// `~/Applications` on hosts other than macOS
        fn default_scan_directory() -> PathBuf {
            dirs::home_dir()
                .map(|home| home.join("Applications"))
                .unwrap_or_else(|| PathBuf::from("/Applications"))
        }
    }
}
