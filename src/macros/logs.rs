macro_rules! debug_path {
    ($description: expr, $path: ident) => {
        tracing::debug!(
            "{COMPONENT} - {} exists at {:?}: {}",
            $description,
            $path,
            $path.exists()
        );
    };
}
pub(crate) use debug_path;

macro_rules! warn_skipped {
    ($path: expr, $reason: expr) => {
        tracing::warn!("{COMPONENT} - Skipping {:?}: {}", $path, $reason);
    };
}
pub(crate) use warn_skipped;

macro_rules! warn_no_bundles {
    ($directory: expr) => {
        tracing::warn!(
            "{COMPONENT} - No Electron applications found in {:?}",
            $directory
        );
    };
}
pub(crate) use warn_no_bundles;
