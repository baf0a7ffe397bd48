use anyhow::Result;
use clap::Parser;

use tint2_release::config;
use tint2_release::domain::Bump;
use tint2_release::git::Git2Repository;
use tint2_release::logging;
use tint2_release::release::{self, ReleaseOutcome, ReleaseWorkflow};
use tint2_release::runner::ShellRunner;
use tint2_release::ui::{self, StdinPrompter};

#[derive(clap::Parser)]
#[command(
    name = "tint2-release",
    about = "Bump the version, build, verify and publish a tint2 release"
)]
struct Args {
    #[arg(long, help = "Patch-level bump: bug fixes only")]
    fix: bool,

    #[arg(long, help = "Minor-level bump: backward-compatible features")]
    feature: bool,

    #[arg(long, help = "Major-level bump: incompatible changes")]
    breakage: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Log every command, its output and exit code")]
    verbose: bool,

    #[arg(long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("tint2-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(bump) = Bump::from_flags(args.fix, args.feature, args.breakage) else {
        ui::display_missing_bump();
        std::process::exit(1);
    };

    logging::init(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };
    let root = repo.workdir()?.to_path_buf();

    let runner = ShellRunner::new(&root);
    let prompter = StdinPrompter;
    let workflow = ReleaseWorkflow::new(&config, &repo, &runner, &prompter, &root);

    let outcome = match workflow.run(bump, &release::today()) {
        Ok(outcome) => outcome,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    match &outcome {
        ReleaseOutcome::Published { tag, remotes } => {
            ui::display_success(&format!("Published {} to {}", tag, remotes.join(", ")));
        }
        ReleaseOutcome::RolledBack { tag } => {
            ui::display_status(&format!("Release {} rolled back", tag));
        }
        ReleaseOutcome::NotPublished { tag } => {
            ui::display_status(&format!(
                "Release {} tagged locally but not published",
                tag
            ));
        }
    }

    std::process::exit(outcome.exit_code());
}
