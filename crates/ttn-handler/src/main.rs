mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ttn_handler_api::ApplicationClient;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a handler connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "ttn-handler", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the handler
        cmd => {
            let (profile, settings) = config::resolve_settings(&cli.global)?;
            let ctx = Context {
                profile,
                app_id: settings.app_id.clone(),
                address: settings.announcement.net_address.clone(),
            };

            let client = ApplicationClient::with_transport(
                settings.app_id,
                &settings.access_key,
                &settings.announcement,
                &settings.transport,
            )
            .map_err(|e| ctx.api_error(e))?;

            tracing::debug!(
                command = ?cmd,
                app_id = %ctx.app_id,
                address = %ctx.address,
                insecure = client.credential().is_some_and(ttn_handler_api::Credential::is_insecure),
                "dispatching command"
            );
            commands::dispatch(cmd, &client, &cli.global, &ctx).await
        }
    }
}
