// Application resource client.
//
// Owns one channel, one application id and one access key, all fixed at
// construction. Every operation builds its request from that identity plus
// the call's arguments, awaits a single RPC through the `ApplicationManager`
// seam, and normalizes the response. Failures propagate unchanged.

use secrecy::{ExposeSecret, SecretString};
use tonic::Request;
use tonic::metadata::AsciiMetadataValue;
use tracing::debug;

use crate::announcement::Announcement;
use crate::error::Error;
use crate::proto;
use crate::rpc::{ApplicationManager, GrpcApplicationManager};
use crate::transport::{Credential, TransportConfig};

use super::models::{Application, Device, PayloadFormat, PayloadFunctions};
use super::update::ApplicationUpdate;

/// gRPC metadata entry carrying the application access key.
pub const ACCESS_KEY_METADATA: &str = "key";

/// Manages one application on a handler.
///
/// Methods take `&self` and hold no locks, so any number of operations may
/// be in flight at once; the channel multiplexes them.
#[derive(Debug)]
pub struct ApplicationClient<M = GrpcApplicationManager> {
    manager: M,
    app_id: String,
    access_key: AsciiMetadataValue,
    credential: Option<Credential>,
}

impl ApplicationClient<GrpcApplicationManager> {
    /// Connect to the announced handler with the default transport config.
    ///
    /// The channel is created lazily, so no network I/O happens here. Must
    /// be called from within a Tokio runtime.
    pub fn new(
        app_id: impl Into<String>,
        access_key: &SecretString,
        announcement: &Announcement,
    ) -> Result<Self, Error> {
        Self::with_transport(app_id, access_key, announcement, &TransportConfig::default())
    }

    /// Connect to the announced handler with an explicit transport config.
    pub fn with_transport(
        app_id: impl Into<String>,
        access_key: &SecretString,
        announcement: &Announcement,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let (channel, credential) = transport.build_channel(announcement)?;
        let mut client = Self::with_manager(
            app_id,
            access_key,
            GrpcApplicationManager::new(channel),
        )?;
        client.credential = Some(credential);
        Ok(client)
    }
}

impl<M: ApplicationManager> ApplicationClient<M> {
    /// Wrap an existing [`ApplicationManager`].
    pub fn with_manager(
        app_id: impl Into<String>,
        access_key: &SecretString,
        manager: M,
    ) -> Result<Self, Error> {
        let mut access_key = AsciiMetadataValue::try_from(access_key.expose_secret())
            .map_err(|e| Error::InvalidAccessKey(format!("not a valid metadata value: {e}")))?;
        access_key.set_sensitive(true);

        Ok(Self {
            manager,
            app_id: app_id.into(),
            access_key,
            credential: None,
        })
    }

    /// The application this client manages.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The credential the channel was built with.
    ///
    /// `None` when the client wraps a caller-supplied manager.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request
            .metadata_mut()
            .insert(ACCESS_KEY_METADATA, self.access_key.clone());
        request
    }

    fn identifier(&self) -> proto::ApplicationIdentifier {
        proto::ApplicationIdentifier {
            app_id: self.app_id.clone(),
        }
    }

    // ── Application ──────────────────────────────────────────────────

    /// Fetch the application record.
    pub async fn get(&self) -> Result<Application, Error> {
        debug!(app_id = %self.app_id, "getting application");
        let message = self
            .manager
            .get_application(self.request(self.identifier()))
            .await?;
        Application::try_from(message)
    }

    pub async fn payload_format(&self) -> Result<PayloadFormat, Error> {
        Ok(self.get().await?.payload_format)
    }

    pub async fn set_payload_format(&self, format: PayloadFormat) -> Result<(), Error> {
        self.set(ApplicationUpdate::new().payload_format(format)).await
    }

    /// All four payload functions, read from a single `get`.
    pub async fn custom_payload_functions(&self) -> Result<PayloadFunctions, Error> {
        Ok(self.get().await?.payload_functions())
    }

    /// Update the functions that are `Some`; `None` entries are left alone.
    pub async fn set_custom_payload_functions(
        &self,
        functions: PayloadFunctions,
    ) -> Result<(), Error> {
        self.set(ApplicationUpdate::from(functions)).await
    }

    /// Apply a partial update.
    ///
    /// Exactly the fields present in `update` are sent, whatever their
    /// values. An empty update still issues the call.
    pub async fn set(&self, update: ApplicationUpdate) -> Result<(), Error> {
        debug!(app_id = %self.app_id, fields = ?update.field_names(), "updating application");
        let message = update.into_message(&self.app_id);
        self.manager.set_application(self.request(message)).await?;
        Ok(())
    }

    /// Delete the application from the handler.
    pub async fn delete(&self) -> Result<(), Error> {
        debug!(app_id = %self.app_id, "deleting application");
        self.manager
            .delete_application(self.request(self.identifier()))
            .await?;
        Ok(())
    }

    // ── Devices ──────────────────────────────────────────────────────
    //
    // Declared for API completeness. The handler's device RPC contract is
    // not pinned down, so these fail locally without issuing a call.

    #[allow(clippy::unused_async)]
    pub async fn devices(&self) -> Result<Vec<Device>, Error> {
        Err(Error::UnsupportedOperation("list devices"))
    }

    #[allow(clippy::unused_async)]
    pub async fn register_device(&self, _device: &Device) -> Result<(), Error> {
        Err(Error::UnsupportedOperation("register device"))
    }

    #[allow(clippy::unused_async)]
    pub async fn get_device(&self, _dev_id: &str) -> Result<Device, Error> {
        Err(Error::UnsupportedOperation("get device"))
    }

    #[allow(clippy::unused_async)]
    pub async fn set_device(&self, _dev_id: &str, _device: &Device) -> Result<(), Error> {
        Err(Error::UnsupportedOperation("set device"))
    }

    #[allow(clippy::unused_async)]
    pub async fn delete_device(&self, _dev_id: &str) -> Result<(), Error> {
        Err(Error::UnsupportedOperation("delete device"))
    }
}
