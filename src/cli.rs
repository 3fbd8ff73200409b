//! Command line definitions using the clap derive API

use std::{path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand, ValueEnum};
use electron_launcher::data::LauncherKind;
use itertools::Itertools;

/// Create launchers which start Electron applications with OpenGL rendering
#[derive(Parser, Debug)]
#[command(
    name = "electron-launcher",
    author,
    version,
    about = "Create launchers which start Electron applications with OpenGL rendering",
    long_about = "Detects applications built with Electron and creates launchers for them which \
                  pass --use-angle=gl, forcing rendering through OpenGL. The original applications \
                  are not modified.",
    after_help = "Examples:\n  \
                  electron-launcher create \"/Applications/Visual Studio Code.app\"\n  \
                  electron-launcher create /Applications/Slack.app --name \"Slack GL\" --output ~/Desktop\n  \
                  electron-launcher scan /Applications --select 1,3\n  \
                  electron-launcher list"
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a launcher for a single application
    Create(CreateArgs),

    /// Create launchers for the Electron applications in a directory
    Scan(ScanArgs),

    /// List the Electron applications in a directory without creating launchers
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Path to the application bundle (.app)
    pub app: PathBuf,

    /// Name of the launcher [default: "<application> with OpenGL"]
    #[arg(long, short)]
    pub name: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan [default: /Applications]
    pub directory: Option<PathBuf>,

    /// Applications to create launchers for: "all", or comma separated numbers from the listing
    #[arg(long, short, default_value = "all")]
    pub select: Selection,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory to scan [default: /Applications]
    pub directory: Option<PathBuf>,

    /// Print the detected applications as JSON
    #[cfg(feature = "serde")]
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Directory the launcher is written to [default: Desktop]
    #[arg(long, short, env = "ELECTRON_LAUNCHER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Replace existing launchers
    #[arg(long)]
    pub overwrite: bool,

    /// Kind of launcher to create
    #[arg(long, value_enum, default_value_t = FormatArg::App)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Application bundle (.app)
    #[default]
    App,
    /// Shell script (.command)
    Command,
}

impl From<FormatArg> for LauncherKind {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::App => LauncherKind::AppBundle,
            FormatArg::Command => LauncherKind::CommandScript,
        }
    }
}

/// Which of the listed applications to act on
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    All,
    /// 1-based positions in the listing, without duplicates
    Numbers(Vec<usize>),
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }

        let numbers = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                match part.parse::<usize>() {
                    Ok(0) | Err(_) => Err(format!("invalid application number: {part:?}")),
                    Ok(n) => Ok(n),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Selection::Numbers(numbers.into_iter().unique().collect()))
    }
}

impl Selection {
    /// Picks the selected items, failing if a number is beyond the end of `items`
    pub fn apply<T>(&self, items: Vec<T>) -> Result<Vec<T>, String> {
        let Selection::Numbers(numbers) = self else {
            return Ok(items);
        };

        if let Some(n) = numbers.iter().find(|&&n| n > items.len()) {
            return Err(format!(
                "application number {n} is out of range (1-{})",
                items.len()
            ));
        }

        Ok(items
            .into_iter()
            .enumerate()
            .filter(|(i, _)| numbers.contains(&(i + 1)))
            .map(|(_, item)| item)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test_case("all", Selection::All)]
    #[test_case(" ALL ", Selection::All)]
    #[test_case("1", Selection::Numbers(vec![1]))]
    #[test_case("3, 1,3", Selection::Numbers(vec![3, 1]))]
    fn test_parse_selection(input: &str, expected: Selection) {
        assert_eq!(input.parse::<Selection>(), Ok(expected));
    }

    #[test_case(""; "empty")]
    #[test_case("0"; "zero")]
    #[test_case("1,x"; "not a number")]
    #[test_case("-1"; "negative")]
    fn test_parse_selection_fails(input: &str) {
        assert!(input.parse::<Selection>().is_err());
    }

    #[test]
    fn test_apply_selection() {
        let items = vec!["a", "b", "c"];

        assert_eq!(Selection::All.apply(items.clone()), Ok(vec!["a", "b", "c"]));
        assert_eq!(
            Selection::Numbers(vec![3, 1]).apply(items.clone()),
            Ok(vec!["a", "c"])
        );
        assert!(Selection::Numbers(vec![4]).apply(items).is_err());
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::parse_from([
            "electron-launcher",
            "create",
            "/Applications/Slack.app",
            "--name",
            "Slack GL",
            "--output",
            "/tmp/out",
            "--overwrite",
            "--format",
            "command",
        ]);

        let Commands::Create(args) = cli.command else {
            panic!("expected create command");
        };
        assert_eq!(args.app, PathBuf::from("/Applications/Slack.app"));
        assert_eq!(args.name.as_deref(), Some("Slack GL"));
        assert_eq!(args.output.output, Some(PathBuf::from("/tmp/out")));
        assert!(args.output.overwrite);
        assert_eq!(
            LauncherKind::from(args.output.format),
            LauncherKind::CommandScript
        );
    }

    #[test]
    fn test_parse_scan_defaults() {
        let cli = Cli::parse_from(["electron-launcher", "scan"]);

        let Commands::Scan(args) = cli.command else {
            panic!("expected scan command");
        };
        assert_eq!(args.directory, None);
        assert_eq!(args.select, Selection::All);
        assert!(!args.output.overwrite);
        assert_eq!(args.output.format, FormatArg::App);
    }
}
