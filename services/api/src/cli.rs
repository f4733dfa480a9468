use crate::check::{run_check, CheckArgs};
use crate::server;
use backoffice_guard::error::AppError;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// Exit status for a check whose candidate would be rejected.
const REJECTED_EXIT_CODE: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "Back Office Write Guard",
    about = "Serve or exercise the back-office write validation engine",
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
    /// Validate a candidate record file without storing it
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Tax id known to the in-memory catalog; enables the tax existence check
    #[arg(long = "known-tax-id")]
    pub(crate) known_tax_ids: Vec<Uuid>,
    /// Expense category id known to the in-memory catalog
    #[arg(long = "known-category-id")]
    pub(crate) known_category_ids: Vec<Uuid>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => {
            if !run_check(args)? {
                std::process::exit(REJECTED_EXIT_CODE);
            }
            Ok(())
        }
    }
}
