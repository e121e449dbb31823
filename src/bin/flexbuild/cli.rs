//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use flexbuild::core::packaging::{AndroidPackageType, IosPackageType};
use flexbuild::resolver::{MobileRunTarget, RunTarget};

/// flexbuild - resolve, validate and compile Flex build configurations
#[derive(Parser)]
#[command(name = "flexbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a flexbuild project in an existing directory
    Init(InitArgs),

    /// Compile build configurations
    Build(BuildArgs),

    /// Validate build configurations without compiling
    Check(CheckArgs),

    /// Display the build configuration dependency tree
    Tree(TreeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

/// What to compile. Without any selector the whole project is used.
#[derive(Args, Clone, Default)]
pub struct ScopeArgs {
    /// Compile every configuration of these modules
    #[arg(short, long, value_name = "MODULE")]
    pub module: Vec<String>,

    /// Compile these configurations with their debug flag forced
    #[arg(short, long, value_name = "MODULE:CONFIG", conflicts_with = "module")]
    pub config: Vec<RunTarget>,

    /// Compile a run target and everything it depends on
    #[arg(long, value_name = "MODULE:CONFIG", conflicts_with_all = ["module", "config"])]
    pub run: Option<RunTarget>,

    /// Where the run target is launched (mobile applications)
    #[arg(long, requires = "run", value_name = "TARGET")]
    pub mobile: Option<MobileRunTarget>,

    /// Android package type used to force the debug flag
    #[arg(long, value_parser = parse_android_package_type, value_name = "TYPE")]
    pub android_package: Option<AndroidPackageType>,

    /// iOS package type used to force the debug flag
    #[arg(long, value_parser = parse_ios_package_type, value_name = "TYPE")]
    pub ios_package: Option<IosPackageType>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Emit build plan as JSON (no build)
    #[arg(long)]
    pub plan: bool,

    /// Print the compiler command lines instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum number of parallel compilations
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Also validate AIR packaging options
    #[arg(long)]
    pub packaging: bool,

    /// Also report dependencies with illegal linkage
    #[arg(long)]
    pub dependency_types: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Module to show the tree for (defaults to every module)
    pub module: Option<String>,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

fn parse_android_package_type(s: &str) -> Result<AndroidPackageType, String> {
    match s {
        "release" => Ok(AndroidPackageType::Release),
        "debug" => Ok(AndroidPackageType::Debug),
        "debug-over-network" => Ok(AndroidPackageType::DebugOverNetwork),
        other => Err(format!(
            "unknown Android package type `{}` (expected release, debug or debug-over-network)",
            other
        )),
    }
}

fn parse_ios_package_type(s: &str) -> Result<IosPackageType, String> {
    match s {
        "test" => Ok(IosPackageType::Test),
        "debug-over-network" => Ok(IosPackageType::DebugOverNetwork),
        "ad-hoc" => Ok(IosPackageType::AdHoc),
        "app-store" => Ok(IosPackageType::AppStore),
        other => Err(format!(
            "unknown iOS package type `{}` (expected test, debug-over-network, ad-hoc or app-store)",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_run_target() {
        let cli = Cli::try_parse_from([
            "flexbuild",
            "build",
            "--run",
            "app:Mobile",
            "--mobile",
            "android-device",
            "--android-package",
            "debug",
        ])
        .unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.scope.run, Some(RunTarget::new("app", "Mobile")));
        assert_eq!(args.scope.mobile, Some(MobileRunTarget::AndroidDevice));
        assert_eq!(args.scope.android_package, Some(AndroidPackageType::Debug));
    }

    #[test]
    fn test_run_conflicts_with_module() {
        assert!(Cli::try_parse_from(["flexbuild", "build", "--run", "a:B", "--module", "a"]).is_err());
        assert!(Cli::try_parse_from(["flexbuild", "check", "--config", "nocolon"]).is_err());
        assert!(Cli::try_parse_from(["flexbuild", "build", "--mobile", "emulator"]).is_err());
    }
}
