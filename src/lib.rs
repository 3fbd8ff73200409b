//! A Rust library for generating launchers which start Electron applications with OpenGL
//! rendering forced on.
//!
//! # Description
//!
//! Electron applications render through Chromium's ANGLE layer, which can be told which graphics
//! backend to use with a command line flag. This crate finds Electron application bundles (e.g.
//! in `/Applications`), and writes small double-clickable launchers for them which run the
//! original executable with `--use-angle=gl` followed by any arguments given to the launcher.
//!
//! The original bundle is never modified, and nothing is kept running: the generated launcher
//! replaces itself with the application when opened.
//!
//! # Usage
//!
//! ```no_run
//! use electron_launcher::{data::LauncherSpec, get_detector, get_generator};
//!
//! # fn main() -> Result<(), electron_launcher::error::LauncherError> {
//! let detector = get_detector();
//! let generator = get_generator();
//!
//! for bundle in detector.scan(None)? {
//!     let spec = LauncherSpec::for_bundle(&bundle?, generator.config());
//!     let launcher = generator.generate(&spec)?;
//!     println!("{:?}", launcher.path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Detection
//!
//! A directory is treated as an Electron application if it is a `.app` bundle containing any of
//! [`detector::ELECTRON_MARKERS`] within `Contents/Frameworks` or `Contents/Resources`. The
//! executable is the one named by the bundle's `CFBundleExecutable`.

use cfg_if::cfg_if;

pub mod config;
pub mod data;
pub mod detector;
pub mod error;
pub mod generator;
mod macros;
mod parsers;
#[cfg(test)]
mod test_utils;
mod utils;

pub use utils::{expand_home, sanitize_launcher_name};

use config::LauncherConfig;
use detector::Detector;
use generator::Generator;

cfg_if! {
    if #[cfg(target_os = "macos")] {
        /// Whether launchers generated on this platform can be opened from the desktop
        pub const IS_HOST_SUPPORTED: bool = true;
    } else {
        /// Whether launchers generated on this platform can be opened from the desktop
        pub const IS_HOST_SUPPORTED: bool = false;
    }
}

/// Returns a [`Detector`] using the default configuration
pub fn get_detector() -> Detector {
    Detector::new(LauncherConfig::default())
}

/// Returns a [`Generator`] using the default configuration, writing `Info.plist` metadata
pub fn get_generator() -> Generator {
    Generator::new(LauncherConfig::default())
}
