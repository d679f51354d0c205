use crate::demo::{run_demo, run_preview, DemoArgs, PreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rentpro::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "RentPro",
    about = "Run the RentPro preference and recommendation service from the command line",
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
    /// Compute the live AHP preview and submit gate for a set of judgments
    Preview(PreviewArgs),
    /// Run an end-to-end preview, submit and recommend walk-through
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
    /// Load the property catalog from a CSV export instead of the sample listings
    #[arg(long)]
    pub(crate) properties_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Preview(args) => run_preview(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_threshold_is_validated_at_parse_time() {
        for raw in ["--threshold=0", "--threshold=-1", "--threshold=1.2"] {
            assert!(
                Cli::try_parse_from(["rentpro", "preview", raw]).is_err(),
                "{raw} accepted"
            );
        }

        let cli = Cli::try_parse_from(["rentpro", "preview", "--threshold", "0.05"])
            .expect("valid threshold");
        match cli.command {
            Some(Command::Preview(args)) => assert_eq!(args.threshold, Some(0.05)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
