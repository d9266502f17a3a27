// Announcement record handed over by service discovery.
//
// Discovery itself is not part of this crate: callers resolve the handler
// first and pass the address and (optional) certificate here.

use serde::{Deserialize, Serialize};

/// Where a handler can be reached and which certificate it announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// `host:port` of the handler's gRPC endpoint. A full URI is accepted
    /// if its scheme matches the selected credential (`https` for TLS).
    pub net_address: String,

    /// PEM-encoded certificate announced by the handler, if any.
    #[serde(default)]
    pub certificate: Option<String>,
}

impl Announcement {
    pub fn new(net_address: impl Into<String>, certificate: Option<String>) -> Self {
        Self {
            net_address: net_address.into(),
            certificate,
        }
    }
}
