//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::Password;
use serde::Serialize;

use ttn_handler_api::CredentialPolicy;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output::{self, DetailRow};

/// The resolved profile as shown by `config show`. Secrets are masked.
#[derive(Debug, Serialize)]
struct ProfileView {
    profile: String,
    app_id: String,
    net_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    certificate_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_key_env: Option<String>,
    credential_policy: CredentialPolicy,
}

impl ProfileView {
    fn new(name: String, profile: Profile, has_flag_key: bool) -> Self {
        Self {
            profile: name,
            app_id: profile.app_id,
            net_address: profile.net_address,
            certificate: profile
                .certificate
                .map(|pem| format!("<inline PEM, {} bytes>", pem.len())),
            certificate_path: profile.certificate_path,
            access_key: (has_flag_key || profile.access_key.is_some()).then_some("****"),
            access_key_env: profile.access_key_env,
            credential_policy: profile.credential_policy,
        }
    }
}

fn detail(v: &ProfileView) -> Vec<DetailRow> {
    let or_dash = |s: Option<String>| s.unwrap_or_else(|| "-".into());
    vec![
        DetailRow::new("Profile", v.profile.clone()),
        DetailRow::new("App ID", v.app_id.clone()),
        DetailRow::new("Net Address", v.net_address.clone()),
        DetailRow::new(
            "Certificate",
            or_dash(
                v.certificate.clone().or_else(|| {
                    v.certificate_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                }),
            ),
        ),
        DetailRow::new("Access Key", v.access_key.unwrap_or("-")),
        DetailRow::new("Access Key Env", or_dash(v.access_key_env.clone())),
        DetailRow::new("Credential Policy", v.credential_policy.to_string()),
    ]
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let (name, profile) = config::resolve_profile(global)?;
            let view = ProfileView::new(name, profile, global.access_key.is_some());
            let out = output::render_single(&global.output, &view, detail, |v| v.app_id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetKey => {
            let cfg = config::load_config()?;
            let name = config::active_profile_name(&cfg, global.profile.as_deref());

            let key = match global.access_key {
                Some(ref key) => key.clone(),
                None => Password::new()
                    .with_prompt(format!("Access key for profile '{name}'"))
                    .interact()
                    .map_err(prompt_err)?,
            };
            if key.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "access key".into(),
                    reason: "access key cannot be empty".into(),
                });
            }

            config::store_access_key(&name, key.trim())?;
            tracing::debug!(profile = %name, "access key stored in keyring");
            if !global.quiet {
                eprintln!("✓ Access key for profile '{name}' stored in system keyring");
            }
            Ok(())
        }
    }
}
