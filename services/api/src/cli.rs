use crate::demo::{run_demo, run_orders_report, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use orderpulse::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "OrderPulse",
    about = "Run the order analytics service and batch reports from the command line",
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
    /// Analyze order batches from the command line
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },
    /// Run the analytics pipeline over an embedded sample batch
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum OrdersCommand {
    /// Produce a business health report for an order batch export
    Report(ReportArgs),
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
        Command::Orders {
            command: OrdersCommand::Report(args),
        } => run_orders_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
