mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use goinst_commands::{run_install, InstallPlan};
use goinst_core::config::InstallConfig;
use goinst_core::observability;

fn main() {
    observability::init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Errors go to stdout, next to the progress report they interrupt.
        println!("{:#}", e);
        std::process::exit(-1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(package) = cli.package else {
        anyhow::bail!("No command specified!");
    };

    let config = InstallConfig::from_env().with_cli_overrides(cli.bin_dir, cli.go, cli.share_host_bin);
    let plan = InstallPlan::new(package, config);
    tracing::debug!(?plan, "install plan");

    let report = run_install(&plan)?;
    tracing::info!(
        package = %report.package,
        installed = report.installed.len(),
        "install complete"
    );
    Ok(())
}
