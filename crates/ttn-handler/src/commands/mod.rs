//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod app;
pub mod config_cmd;
pub mod util;

use ttn_handler_api::{ApplicationClient, Error as ApiError};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Names the failing call's target in error messages.
#[derive(Debug)]
pub struct Context {
    pub profile: String,
    pub app_id: String,
    pub address: String,
}

impl Context {
    pub fn api_error(&self, err: ApiError) -> CliError {
        CliError::from_api(err, &self.app_id, &self.address, &self.profile)
    }
}

/// Dispatch a handler-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &ApplicationClient,
    global: &GlobalOpts,
    ctx: &Context,
) -> Result<(), CliError> {
    match cmd {
        Command::App(args) => app::handle(client, args, global, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
