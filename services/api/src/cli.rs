use crate::render::{run_grant_show, run_grants_list, run_pricing, GrantsListArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grantboard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Grantboard",
    about = "Browse grants and pricing plans from the catalog API, or serve them over HTTP",
    version
)]
struct Cli {
    /// Bearer token for the catalog API (overrides API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List or inspect available grants
    Grants {
        #[command(subcommand)]
        command: GrantsCommand,
    },
    /// Show the pricing plans in their page layout
    Pricing,
}

#[derive(Subcommand, Debug)]
enum GrantsCommand {
    /// Print the grant listing
    List(GrantsListArgs),
    /// Print a single grant with its attachments
    Show {
        /// Grant identifier
        id: String,
    },
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
    let token = cli.token;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, token).await,
        Command::Grants {
            command: GrantsCommand::List(args),
        } => run_grants_list(args, token).await,
        Command::Grants {
            command: GrantsCommand::Show { id },
        } => run_grant_show(id, token).await,
        Command::Pricing => run_pricing(token).await,
    }
}
