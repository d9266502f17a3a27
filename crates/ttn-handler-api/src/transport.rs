// Channel construction for the handler connection.
//
// Turns an `Announcement` into exactly one lazily-connected tonic
// `Channel`. The credential is picked by a named `CredentialPolicy` so the
// certificate-to-trust mapping is a visible decision, not an inline branch.

use serde::{Deserialize, Serialize};
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};
use tracing::{debug, warn};

use crate::announcement::Announcement;
use crate::error::Error;

/// Transport trust configuration, fixed when the channel is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Plaintext HTTP/2, no server verification.
    Insecure,
    /// TLS. Verifies against `ca_certificate` (PEM) when given,
    /// otherwise against the platform trust store.
    Tls { ca_certificate: Option<String> },
}

impl Credential {
    pub fn is_insecure(&self) -> bool {
        matches!(self, Self::Insecure)
    }

    fn scheme(&self) -> &'static str {
        match self {
            Self::Insecure => "http",
            Self::Tls { .. } => "https",
        }
    }
}

/// Rule mapping an announced certificate to a [`Credential`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CredentialPolicy {
    /// Certificate announced: TLS pinned to it. No certificate: insecure.
    #[default]
    VerifyAnnounced,
    /// Rule used by earlier SDKs: an announced certificate selects the
    /// insecure path, no certificate selects TLS with platform roots.
    ///
    /// Kept for handlers deployed against that behaviour; it downgrades
    /// every certificate-announcing handler to plaintext.
    LegacyInverted,
}

impl CredentialPolicy {
    /// Pick the credential for an announced certificate.
    pub fn select(self, certificate: Option<&str>) -> Credential {
        match (self, certificate) {
            (Self::VerifyAnnounced, Some(pem)) => Credential::Tls {
                ca_certificate: Some(pem.to_owned()),
            },
            (Self::VerifyAnnounced, None) | (Self::LegacyInverted, Some(_)) => {
                Credential::Insecure
            }
            (Self::LegacyInverted, None) => Credential::Tls {
                ca_certificate: None,
            },
        }
    }
}

/// Shared transport configuration for building handler channels.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub policy: CredentialPolicy,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            policy: CredentialPolicy::default(),
            user_agent: concat!("ttn-handler/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    pub fn with_policy(mut self, policy: CredentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The credential this config selects for `announcement`.
    pub fn credential_for(&self, announcement: &Announcement) -> Credential {
        self.policy.select(announcement.certificate.as_deref())
    }

    /// Build the one channel a client owns for its lifetime.
    ///
    /// The channel connects lazily on first use, so this never touches the
    /// network. Must be called from within a Tokio runtime.
    pub fn build_channel(&self, announcement: &Announcement) -> Result<(Channel, Credential), Error> {
        let credential = self.credential_for(announcement);
        if self.policy == CredentialPolicy::LegacyInverted && credential.is_insecure() {
            warn!(
                address = %announcement.net_address,
                "legacy credential policy: announced certificate ignored, using insecure channel"
            );
        }

        let invalid = |e: &dyn std::fmt::Display| Error::InvalidAddress {
            address: announcement.net_address.clone(),
            message: e.to_string(),
        };

        let uri = endpoint_uri(&announcement.net_address, &credential).map_err(|e| invalid(&e))?;
        debug!(%uri, insecure = credential.is_insecure(), "building handler channel");

        let mut endpoint = Endpoint::from_shared(uri)
            .map_err(|e| invalid(&e))?
            .user_agent(self.user_agent.clone())
            .map_err(|e| invalid(&e))?;

        if let Credential::Tls { ca_certificate } = &credential {
            let tls = match ca_certificate {
                Some(pem) => ClientTlsConfig::new().ca_certificate(Certificate::from_pem(pem)),
                None => ClientTlsConfig::new().with_native_roots(),
            };
            endpoint = endpoint
                .tls_config(tls)
                .map_err(|e| Error::Tls(format!("failed to configure TLS: {e}")))?;
        }

        Ok((endpoint.connect_lazy(), credential))
    }
}

/// Prefix a bare `host:port` with the scheme matching the credential.
///
/// An explicit scheme must agree with the credential: tonic only runs TLS
/// for `https`, so `http://` under a TLS credential would go out as
/// plaintext.
fn endpoint_uri(net_address: &str, credential: &Credential) -> Result<String, String> {
    let expected = credential.scheme();
    match net_address.split_once("://") {
        None => Ok(format!("{expected}://{net_address}")),
        Some((scheme, _)) if scheme.eq_ignore_ascii_case(expected) => Ok(net_address.to_owned()),
        Some((scheme, _)) => Err(format!(
            "scheme {scheme:?} does not match the {} credential (expected {expected:?})",
            if credential.is_insecure() { "insecure" } else { "TLS" }
        )),
    }
}
