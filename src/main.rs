use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use git_release::boundary::BoundaryWarning;
use git_release::cli::{self, ReleaseEnv, ReleaseMachine, ReleaseOptions};
use git_release::config::{self, Config};
use git_release::domain::BumpKind;
use git_release::git::Git2Repository;
use git_release::store::{ChangelogFile, JsonManifest};
use git_release::{logging, ui};

#[derive(Parser)]
#[command(
    name = "git-release",
    version,
    about = "Cut releases from conventional commits: version, changelog, tag"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "More diagnostics (-v debug, -vv trace)"
    )]
    verbose: u8,

    #[arg(short, long, global = true, help = "Only print errors")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bump the version, write the changelog, commit, tag and push
    Release {
        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(long, value_enum, help = "Override the bump derived from commits")]
        force: Option<BumpKind>,

        #[arg(long, help = "Create the tag but do not push it")]
        no_push: bool,
    },
    /// Preview the next version and its changelog section
    Changelog {
        #[arg(long, help = "Print a JSON object instead of text")]
        json: bool,
    },
    /// Compute the next version and write it to the manifest
    Bump {
        #[arg(long, help = "Compute the version without writing it")]
        dry_run: bool,

        #[arg(long, value_enum, help = "Override the bump derived from commits")]
        force: Option<BumpKind>,
    },
    /// Check that the repository is ready for a release
    Check,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.quiet, args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = config::load_config(args.config.as_deref())?;
    let repo = Git2Repository::open(".")?;
    let manifest = JsonManifest::new(&config.manifest_path);

    match args.command {
        Command::Release {
            dry_run,
            force,
            no_push,
        } => {
            let changelog = ChangelogFile::new(&config.changelog_path);
            let options = ReleaseOptions {
                dry_run,
                force,
                push: !no_push,
            };
            release(&repo, &manifest, &changelog, &config, options)
        }
        Command::Changelog { json } => {
            let preview = cli::preview(&repo, &manifest, &config, None)?;
            if json {
                ui::print_json(&preview)?;
            } else {
                show_warnings(&preview.warnings);
                ui::display_heading(&format!(
                    "Next version: {} ({})",
                    preview.version, preview.bump_type
                ));
                ui::display_changelog(&preview.changelog);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Bump { dry_run, force } => {
            let outcome = cli::bump(&repo, &manifest, force, dry_run)?;
            ui::display_bump_outcome(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let report = cli::check_readiness(&repo, &config);
            ui::display_readiness(&report);
            Ok(if report.ready {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn release(
    repo: &Git2Repository,
    manifest: &JsonManifest,
    changelog: &ChangelogFile,
    config: &Config,
    options: ReleaseOptions,
) -> Result<ExitCode> {
    let env = ReleaseEnv {
        repo,
        manifest,
        changelog,
        config,
    };
    let mut machine = ReleaseMachine::new(env, options);
    let outcome = machine.run();

    show_warnings(machine.warnings());
    let report = machine.report();

    match outcome {
        Ok(()) => {
            ui::display_release_report(&report);
            if report.dry_run {
                ui::display_status("Dry run: no changes were made");
            } else if let Some(tag) = &report.tag {
                ui::display_success(&format!("Released {}", tag));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Err(anyhow::Error::new(e).context(ui::format_stopped(&report))),
    }
}

fn show_warnings(warnings: &[BoundaryWarning]) {
    for warning in warnings {
        ui::display_boundary_warning(warning);
    }
}
