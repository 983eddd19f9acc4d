use crate::demo::{run_classify_lmh, run_classify_scorecard, run_demo, run_export};
use crate::demo::{ClassifyLmhArgs, ClassifyScorecardArgs, DemoArgs, ExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use road_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Road Risk Assessor",
    about = "Classify forest road landslide and erosion risk, and serve saved assessments",
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
    /// Classify a site from the command line without saving it
    Classify {
        #[command(subcommand)]
        command: ClassifyCommand,
    },
    /// Export saved assessments as JSON, CSV or GeoJSON
    Export(ExportArgs),
    /// Walk through scorecard, matrix and override flows against a local store
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ClassifyCommand {
    /// Hazard x consequence scorecard
    Scorecard(ClassifyScorecardArgs),
    /// Likelihood x consequence lookup matrix
    Lmh(ClassifyLmhArgs),
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
        Command::Classify {
            command: ClassifyCommand::Scorecard(args),
        } => run_classify_scorecard(args),
        Command::Classify {
            command: ClassifyCommand::Lmh(args),
        } => run_classify_lmh(args),
        Command::Export(args) => run_export(args),
        Command::Demo(args) => run_demo(args),
    }
}
