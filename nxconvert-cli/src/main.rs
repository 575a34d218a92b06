mod config;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use nxconvert_core::adapters::FsWritePort;
use nxconvert_core::{
    ConvertError, ConvertSettings, GENERIC_FAILURE_MESSAGE, run_convert, write_plan_artifacts,
};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "nxconvert",
    version,
    about = "Converts an Angular CLI workspace into an Nx workspace."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a package to the workspace. Adding @nrwl/workspace converts it to Nx.
    Add(AddArgs),
}

#[derive(Debug, Parser)]
struct AddArgs {
    /// Package to add (only @nrwl/workspace is supported).
    package: String,

    /// npm scope written to nx.json (default: the workspace's default project).
    #[arg(long = "npm-scope", alias = "npmScope", env = "NXCONVERT_NPM_SCOPE")]
    npm_scope: Option<String>,

    /// Accepted for compatibility; nxconvert never installs packages.
    #[arg(long, default_value_t = false)]
    skip_install: bool,

    /// Workspace root (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Plan and print the patch without touching the workspace.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Write plan.json, plan.md, patch.diff and the apply report here.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Add(args) => cmd_add(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            if err.wants_generic_banner() {
                error!("{}", GENERIC_FAILURE_MESSAGE);
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn cmd_add(args: AddArgs) -> Result<(), ConvertError> {
    let file_config = config::load_or_default(&args.repo_root)?;
    let merged = ConfigMerger::new(file_config).merge_add_args(args.npm_scope.as_deref());
    debug!(
        "merged config: npm_scope={:?}, source_dir={}, versions={:?}",
        merged.npm_scope, merged.source_dir, merged.versions
    );

    let settings = ConvertSettings {
        repo_root: args.repo_root,
        package: args.package,
        npm_scope: merged.npm_scope,
        source_dir: merged.source_dir,
        versions: merged.versions,
        dry_run: args.dry_run,
        skip_install: args.skip_install,
        out_dir: args.out_dir,
    };

    let outcome = run_convert(&settings)?;

    if settings.dry_run {
        print!("{}", outcome.patch);
    }

    if let Some(out_dir) = &settings.out_dir {
        write_plan_artifacts(&outcome, out_dir, &FsWritePort)?;
        info!("wrote artifacts to {}", out_dir);
    }

    info!(
        moved = outcome.apply.summary.moved,
        written = outcome.apply.summary.written,
        npm_scope = %outcome.plan.npm_scope,
        "conversion finished"
    );
    Ok(())
}
