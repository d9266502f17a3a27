//! CLI configuration: thin wrapper around `ttn_handler_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--app-id, --address, --certificate, --access-key, ...).

use secrecy::SecretString;

use ttn_handler_api::CredentialPolicy;

use crate::cli::{CredentialPolicyArg, GlobalOpts};
use crate::error::CliError;

pub use ttn_handler_config::{
    ClientSettings, Profile, active_profile_name, config_path, load_config, profile_to_settings,
    settings_with_access_key, store_access_key,
};

impl From<CredentialPolicyArg> for CredentialPolicy {
    fn from(arg: CredentialPolicyArg) -> Self {
        match arg {
            CredentialPolicyArg::VerifyAnnounced => Self::VerifyAnnounced,
            CredentialPolicyArg::LegacyInverted => Self::LegacyInverted,
        }
    }
}

/// Find the active profile and layer the global flags over it.
///
/// Without a stored profile the flags alone must name the application and
/// the handler address. A config file that exists but fails to parse is an
/// error, not an empty config.
pub fn resolve_profile(global: &GlobalOpts) -> Result<(String, Profile), CliError> {
    let cfg = load_config()?;
    let name = active_profile_name(&cfg, global.profile.as_deref());

    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.app_id.is_some() || global.address.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref app_id) = global.app_id {
        profile.app_id.clone_from(app_id);
    }
    if let Some(ref address) = global.address {
        profile.net_address.clone_from(address);
    }
    if let Some(ref path) = global.certificate {
        profile.certificate = None;
        profile.certificate_path = Some(path.clone());
    }
    if let Some(policy) = global.credential_policy {
        profile.credential_policy = policy.into();
    }

    Ok((name, profile))
}

/// Resolve everything an `ApplicationClient` needs. `--access-key` wins
/// over the profile's credential chain.
pub fn resolve_settings(global: &GlobalOpts) -> Result<(String, ClientSettings), CliError> {
    let (name, profile) = resolve_profile(global)?;

    let settings = match global.access_key {
        Some(ref key) => settings_with_access_key(&profile, &name, SecretString::from(key.clone()))?,
        None => profile_to_settings(&profile, &name)?,
    };

    Ok((name, settings))
}
