//! Clap derive structures for the `ttn-handler` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ttn-handler -- manage an application on a The Things Network handler
#[derive(Debug, Parser)]
#[command(
    name = "ttn-handler",
    version,
    about = "Manage applications on a The Things Network handler",
    long_about = "Reads and updates an application's handler settings (payload format,\n\
        custom payload functions) over the handler's gRPC application manager.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "TTN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Application id (overrides profile)
    #[arg(long, env = "TTN_APP_ID", global = true)]
    pub app_id: Option<String>,

    /// Handler gRPC address, host:port (overrides profile)
    #[arg(long, short = 'a', env = "TTN_HANDLER_ADDRESS", global = true)]
    pub address: Option<String>,

    /// PEM certificate announced by the handler (overrides profile)
    #[arg(long, global = true)]
    pub certificate: Option<PathBuf>,

    /// Application access key
    #[arg(long, env = "TTN_ACCESS_KEY", global = true, hide_env_values = true)]
    pub access_key: Option<String>,

    /// How the announced certificate selects the transport credential
    #[arg(long, global = true)]
    pub credential_policy: Option<CredentialPolicyArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TTN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CredentialPolicyArg {
    /// TLS with the announced certificate; insecure when none is announced
    VerifyAnnounced,
    /// Insecure when a certificate is announced; TLS with system roots otherwise
    LegacyInverted,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PayloadFormatArg {
    /// Custom JavaScript payload functions
    Custom,
    /// Cayenne LPP
    Cayenne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadFunctionArg {
    Decoder,
    Converter,
    Validator,
    Encoder,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the application on the handler
    #[command(alias = "application")]
    App(AppArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Application ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AppArgs {
    #[command(subcommand)]
    pub command: AppCommand,
}

#[derive(Debug, Subcommand)]
pub enum AppCommand {
    /// Show the application's handler settings
    Get,

    /// Show or change the payload format
    #[command(alias = "pf")]
    PayloadFormat(PayloadFormatArgs),

    /// Show or change the custom payload functions
    #[command(alias = "fn")]
    Functions(FunctionsArgs),

    /// Delete the application from the handler
    #[command(alias = "rm")]
    Delete,
}

#[derive(Debug, Args)]
pub struct PayloadFormatArgs {
    #[command(subcommand)]
    pub command: Option<PayloadFormatCommand>,
}

#[derive(Debug, Subcommand)]
pub enum PayloadFormatCommand {
    /// Show the payload format (default)
    Get,

    /// Set the payload format
    Set {
        /// New payload format
        format: PayloadFormatArg,
    },
}

#[derive(Debug, Args)]
pub struct FunctionsArgs {
    #[command(subcommand)]
    pub command: Option<FunctionsCommand>,
}

#[derive(Debug, Subcommand)]
pub enum FunctionsCommand {
    /// Show all four payload functions (default)
    Get,

    /// Upload payload functions; only the given functions are changed
    Set(FunctionsSetArgs),
}

#[derive(Debug, Args)]
pub struct FunctionsSetArgs {
    /// File containing the decoder function
    #[arg(long, value_name = "FILE")]
    pub decoder: Option<PathBuf>,

    /// File containing the converter function
    #[arg(long, value_name = "FILE")]
    pub converter: Option<PathBuf>,

    /// File containing the validator function
    #[arg(long, value_name = "FILE")]
    pub validator: Option<PathBuf>,

    /// File containing the encoder function
    #[arg(long, value_name = "FILE")]
    pub encoder: Option<PathBuf>,

    /// Set a function to the empty string (repeatable)
    #[arg(long, value_name = "FUNCTION")]
    pub clear: Vec<PayloadFunctionArg>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the resolved profile (access key redacted)
    Show,

    /// Store the profile's access key in the system keyring
    SetKey,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
