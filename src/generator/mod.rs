//! Generation of launchers which re-invoke an application with an extra argument.
//!
//! Each call to [`Generator::generate`] is independent and goes through the same phases:
//! the [`LauncherSpec`] is validated, the launcher is staged under a temporary name beside its
//! destination, and the staged launcher is renamed into place. A failure in any phase drops the
//! staged files.

mod metadata;
mod script;
mod staging;

use std::{
    fs, io,
    path::{self, Path, PathBuf},
    time::SystemTime,
};

use tracing::{debug, info, trace};

pub use metadata::{BundleMetadata, MetadataSerializer, PlistSerializer, generate_identifier};
pub use script::{quote_shell, render_launch_script};

use crate::{
    config::LauncherConfig,
    data::{GeneratedLauncher, LauncherKind, LauncherSpec},
    error::{LauncherError, LauncherResult},
    macros::logs::{debug_path, warn_skipped},
    utils::{
        get_contents_dir, get_executables_dir, get_resources_dir, is_executable,
        sanitize_launcher_name, some_if_file,
    },
};
use staging::{MODE_EXECUTABLE, MODE_FILE, StagedLauncher, copy_atomic, write_atomic};

const COMPONENT: &str = "Generator";

/// Outcome of validating a [`LauncherSpec`]
#[derive(Debug)]
struct LaunchPlan {
    /// Absolute path of the target executable
    target: PathBuf,
    name: String,
    destination: PathBuf,
}

/// Writes launchers to disk
#[derive(Debug, Clone)]
pub struct Generator<S = PlistSerializer> {
    config: LauncherConfig,
    serializer: S,
}

impl Generator<PlistSerializer> {
    pub fn new(config: LauncherConfig) -> Self {
        Self::with_serializer(config, PlistSerializer)
    }
}

impl<S: MetadataSerializer> Generator<S> {
    /// Generator writing bundle metadata with a custom serializer
    pub fn with_serializer(config: LauncherConfig, serializer: S) -> Self {
        Self { config, serializer }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Writes the launcher described by `spec`.
    ///
    /// Nothing is left at the destination if this fails, and an existing launcher is only
    /// replaced when `spec.overwrite` is set.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn generate(&self, spec: &LauncherSpec) -> LauncherResult<GeneratedLauncher> {
        let plan = self.validate(spec)?;

        let (staged, identifier) = match spec.kind {
            LauncherKind::AppBundle => {
                let (staged, identifier) = self.stage_bundle(spec, &plan)?;
                (staged, Some(identifier))
            }
            LauncherKind::CommandScript => (self.stage_command_script(spec, &plan)?, None),
        };

        staged.commit(spec.overwrite)?;

        info!("{COMPONENT} - Created launcher {:?}", plan.destination);

        Ok(GeneratedLauncher {
            path: plan.destination,
            created_at: SystemTime::now(),
            identifier,
            kind: spec.kind,
        })
    }

    /// Generates a launcher for each spec, continuing with the remaining specs when one fails.
    ///
    /// Results are returned in the order of `specs`, and each failure is logged as it happens.
    pub fn generate_all<'a>(
        &self,
        specs: impl IntoIterator<Item = &'a LauncherSpec>,
    ) -> Vec<LauncherResult<GeneratedLauncher>> {
        specs
            .into_iter()
            .map(|spec| {
                let result = self.generate(spec);
                if let Err(e) = &result {
                    warn_skipped!(spec.launcher_display_name, e);
                }
                result
            })
            .collect()
    }

    fn validate(&self, spec: &LauncherSpec) -> LauncherResult<LaunchPlan> {
        // Launchers may be started from any working directory
        let target = path::absolute(&spec.target_executable_path)
            .map_err(|e| LauncherError::from_io(e, &spec.target_executable_path))?;

        let is_target_executable = is_executable(&target).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LauncherError::TargetNotFound(target.clone()),
            _ => LauncherError::from_io(e, &target),
        })?;
        if !is_target_executable {
            return Err(LauncherError::TargetNotExecutable(target));
        }

        let name = sanitize_launcher_name(&spec.launcher_display_name).ok_or_else(|| {
            LauncherError::SanitizationFailure(spec.launcher_display_name.clone())
        })?;
        trace!(
            "{COMPONENT} - Sanitized {:?} to {name:?}",
            spec.launcher_display_name
        );

        let output_directory = &spec.output_directory;
        if !output_directory.is_dir() {
            debug!("{COMPONENT} - Creating output directory {output_directory:?}");
            fs::create_dir_all(output_directory)
                .map_err(|e| LauncherError::from_io(e, output_directory))?;
        }

        let destination = output_directory.join(format!("{name}.{}", spec.kind.extension()));
        debug_path!("destination", destination);

        if !spec.overwrite && fs::symlink_metadata(&destination).is_ok() {
            return Err(LauncherError::DestinationExists(destination));
        }

        Ok(LaunchPlan {
            target,
            name,
            destination,
        })
    }

    fn stage_bundle(
        &self,
        spec: &LauncherSpec,
        plan: &LaunchPlan,
    ) -> LauncherResult<(StagedLauncher, String)> {
        let staged = StagedLauncher::bundle(&plan.destination)?;
        let path_bundle = staged.path();

        for dir in [get_executables_dir(path_bundle), get_resources_dir(path_bundle)] {
            fs::create_dir_all(&dir).map_err(|e| LauncherError::from_io(e, &dir))?;
        }

        // SCRIPT
        let script = render_launch_script(&plan.target, &spec.extra_argument);
        write_atomic(
            &get_executables_dir(path_bundle).join(&plan.name),
            &script,
            MODE_EXECUTABLE,
        )?;

        // ICON
        let icon_file = self.stage_icon(spec, path_bundle)?;

        // METADATA
        let identifier =
            generate_identifier(&self.config.identifier_prefix, &plan.name, &plan.target);
        let metadata = BundleMetadata {
            display_name: plan.name.clone(),
            executable_name: plan.name.clone(),
            identifier: identifier.clone(),
            version: self.config.bundle_version.clone(),
            icon_file,
        };
        trace!("{COMPONENT} - Metadata for {:?}: {metadata:?}", plan.destination);

        write_atomic(
            &get_contents_dir(path_bundle).join(self.serializer.file_name()),
            &self.serializer.serialize(&metadata)?,
            MODE_FILE,
        )?;

        Ok((staged, identifier))
    }

    /// Copies the requested icon into the bundle's resources, returning its file name
    fn stage_icon(&self, spec: &LauncherSpec, path_bundle: &Path) -> LauncherResult<Option<String>> {
        let Some(path_icon) = spec.icon_source.clone().and_then(some_if_file) else {
            debug!("{COMPONENT} - No icon to copy for {:?}", spec.launcher_display_name);
            return Ok(None);
        };

        let Some(icon_file) = path_icon.file_name() else {
            return Ok(None);
        };

        copy_atomic(
            &path_icon,
            &get_resources_dir(path_bundle).join(icon_file),
            MODE_FILE,
        )?;

        Ok(Some(icon_file.to_string_lossy().into_owned()))
    }

    fn stage_command_script(
        &self,
        spec: &LauncherSpec,
        plan: &LaunchPlan,
    ) -> LauncherResult<StagedLauncher> {
        if spec.icon_source.is_some() {
            trace!("{COMPONENT} - Icons are not supported for command scripts");
        }

        let script = render_launch_script(&plan.target, &spec.extra_argument);

        StagedLauncher::file(&plan.destination, &script, MODE_EXECUTABLE)
    }
}
