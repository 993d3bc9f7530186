use crate::demo::{run_demo, run_import_preview, DemoArgs, ImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rental_crm::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Rental CRM",
    about = "Run the rental CRM service or walk through its workflows from the command line",
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
    /// Run an end-to-end demo: listing search, application wizard, approval, dashboard
    Demo(DemoArgs),
    /// Parse a property CSV export and print what an import would create
    ImportProperties(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store from a property CSV export before serving
    #[arg(long)]
    pub(crate) properties: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::ImportProperties(args) => run_import_preview(args).await,
    }
}
