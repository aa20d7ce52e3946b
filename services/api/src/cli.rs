use crate::demo::{run_demo, run_report, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleetcare::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fleetcare",
    about = "Serve and render fleet maintenance reports from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render the fleet report for a snapshot on disk
    Report(ReportArgs),
    /// Render the fleet report for a built-in sample fleet
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["fleetcare"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_accepts_a_combined_snapshot() {
        let cli = Cli::try_parse_from([
            "fleetcare",
            "report",
            "--snapshot",
            "fleet.json",
            "--sort-by-date",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.snapshot, Some(PathBuf::from("fleet.json")));
                assert!(args.sort_by_date);
                assert!(args.export_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn report_requires_all_three_collections_without_snapshot() {
        let err = Cli::try_parse_from([
            "fleetcare",
            "report",
            "--vehicles",
            "vehiculos.json",
            "--services",
            "servicios.json",
        ])
        .expect_err("workshops are missing");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn report_rejects_snapshot_combined_with_collections() {
        let err = Cli::try_parse_from([
            "fleetcare",
            "report",
            "--snapshot",
            "fleet.json",
            "--vehicles",
            "vehiculos.json",
        ])
        .expect_err("sources conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
