//! depfetch - dependency acquisition for the OCR plugin bundle
//!
//! Usage:
//!   depfetch fetch            Fetch everything that is missing
//!   depfetch status           Show which artifacts are in place
//!
//! The bundle root defaults to `bin` in the current directory; override
//! with `--root` or `DEPFETCH_ROOT`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use decky_depfetch::context::FetchContext;
use decky_depfetch::layout::Layout;
use decky_depfetch::output;
use decky_depfetch::pipeline;
use decky_depfetch::platform::Platform;
use decky_depfetch::runner::SystemRunner;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depfetch")]
#[command(about = "Fetch the OCR plugin's bundled dependencies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bundle root the artifacts are placed under
    #[arg(long, global = true, env = "DEPFETCH_ROOT", default_value = "bin")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the five acquisition steps, skipping what is already present
    Fetch,

    /// Check the bundle tree without touching the network
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let layout = Layout::new(&cli.root);

    match cli.command {
        Commands::Fetch => {
            let runner = SystemRunner;
            let platform = Platform::detect(&runner);
            if !platform.can_run_linux_commands {
                output::warning(
                    "no Linux environment found (native or WSL); \
                     AppImage extraction and pip install will be skipped",
                );
            } else if platform.uses_wsl {
                output::info("using WSL for extraction and pip");
            }
            output::action(&format!(
                "Fetching dependencies into {}",
                layout.root().display()
            ));

            let ctx = FetchContext::new(layout, platform);
            let report = pipeline::run(&ctx, &runner);
            pipeline::print_summary(&report);
            // Partial progress is still progress; `status` is the gate.
        }

        Commands::Status => {
            let artifacts = pipeline::check_artifacts(&layout);
            output::action(&format!("Bundle status for {}", layout.root().display()));
            for (artifact, present) in &artifacts {
                output::artifact_row(artifact.label(), *present);
            }
            if artifacts.iter().any(|(_, present)| !present) {
                output::warning("bundle incomplete");
                std::process::exit(1);
            }
            output::success("all dependencies in place");
        }
    }

    Ok(())
}
