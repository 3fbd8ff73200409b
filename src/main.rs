//! Command line front-end for creating Electron launchers

use std::{io, path::Path, process::ExitCode};

use clap::{CommandFactory, Parser, error::ErrorKind};
use electron_launcher::{
    IS_HOST_SUPPORTED,
    config::LauncherConfig,
    data::{ApplicationBundle, LauncherSpec},
    detector::Detector,
    error::LauncherResult,
    expand_home, get_detector,
    generator::Generator,
};
use is_terminal::IsTerminal;
use itertools::Itertools;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Commands, CreateArgs, ListArgs, OutputArgs, ScanArgs};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .without_time()
                .with_line_number(true)
                .with_writer(io::stderr)
                // Don't output colours for logs not being printed to a terminal
                .with_ansi(io::stderr().is_terminal()),
        )
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn get_config(output: &OutputArgs) -> LauncherConfig {
    let mut config = LauncherConfig::default().with_launcher_kind(output.format.into());
    if let Some(path) = &output.output {
        config = config.with_output_directory(expand_home(path));
    }
    config
}

fn get_spec(bundle: &ApplicationBundle, config: &LauncherConfig, output: &OutputArgs) -> LauncherSpec {
    LauncherSpec::for_bundle(bundle, config).with_overwrite(output.overwrite)
}

/// Scans a directory, ordering the detected bundles by name. Entries which fail to be classified
/// are logged and left out.
fn get_sorted_bundles(
    detector: &Detector,
    directory: Option<&Path>,
) -> LauncherResult<Vec<ApplicationBundle>> {
    Ok(detector
        .scan(directory.map(expand_home).as_deref())?
        .filter_map(|bundle| {
            bundle
                .inspect_err(|e| warn!("Skipping application: {e}"))
                .ok()
        })
        .sorted_by(|a, b| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .collect())
}

fn print_bundles(bundles: &[ApplicationBundle]) {
    for (i, bundle) in bundles.iter().enumerate() {
        println!("{}. {bundle}", i + 1);
    }
}

fn run_create(args: CreateArgs) -> LauncherResult<()> {
    let config = get_config(&args.output);
    let detector = Detector::new(config.clone());

    let bundle = detector.resolve_target(&expand_home(&args.app))?;
    debug!("Resolved {bundle} to {:?}", bundle.executable_path());

    let mut spec = get_spec(&bundle, &config, &args.output);
    if let Some(name) = args.name {
        spec = spec.with_display_name(name);
    }

    let launcher = Generator::new(config).generate(&spec)?;

    println!("Created {}", launcher.path.display());

    Ok(())
}

fn run_scan(args: ScanArgs) -> LauncherResult<()> {
    let config = get_config(&args.output);
    let detector = Detector::new(config.clone());
    let directory = args
        .directory
        .unwrap_or_else(|| config.scan_directory.clone());

    let bundles = get_sorted_bundles(&detector, Some(&directory))?;
    if bundles.is_empty() {
        println!("No Electron applications found in {}", directory.display());
        return Ok(());
    }

    println!("Found {} Electron applications:", bundles.len());
    print_bundles(&bundles);

    let selected = match args.select.apply(bundles) {
        Ok(selected) => selected,
        Err(message) => Cli::command().error(ErrorKind::InvalidValue, message).exit(),
    };

    let specs = selected
        .iter()
        .map(|bundle| get_spec(bundle, &config, &args.output))
        .collect_vec();

    // Every selected application is attempted, the first hard failure sets the exit code
    let mut failure = None;
    for result in Generator::new(config).generate_all(&specs) {
        match result {
            Ok(launcher) => println!("Created {}", launcher.path.display()),
            Err(e) if e.is_skippable() => {}
            Err(e) => {
                failure.get_or_insert(e);
            }
        }
    }

    failure.map_or(Ok(()), Err)
}

fn run_list(args: ListArgs) -> LauncherResult<()> {
    let detector = get_detector();
    let directory = args
        .directory
        .unwrap_or_else(|| detector.config().scan_directory.clone());

    let bundles = get_sorted_bundles(&detector, Some(&directory))?;

    #[cfg(feature = "serde")]
    {
        if args.json {
            let json = serde_json::to_string_pretty(&bundles).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }
    }

    if bundles.is_empty() {
        println!("No Electron applications found in {}", directory.display());
        return Ok(());
    }

    println!("Found {} Electron applications:", bundles.len());
    print_bundles(&bundles);

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !IS_HOST_SUPPORTED {
        warn!("Launchers can only be opened on macOS, they will be created but not be launchable here");
    }

    let result = match cli.command {
        Commands::Create(args) => run_create(args),
        Commands::Scan(args) => run_scan(args),
        Commands::List(args) => run_list(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
