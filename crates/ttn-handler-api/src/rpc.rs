// Call adapter: one awaited result per unary RPC.
//
// `ApplicationManager` is the seam between the resource client and the
// wire. Each method issues exactly one call and hands back either the
// response message or the `tonic::Status` it failed with, untouched.

use std::future::Future;

use tonic::transport::Channel;
use tonic::{Request, Response, Status};
use tracing::trace;

use crate::proto::application_manager_client::ApplicationManagerClient;
use crate::proto::{Application, ApplicationIdentifier, Empty};

/// The application-manager RPCs the resource client depends on.
///
/// Implemented over gRPC by [`GrpcApplicationManager`]; tests supply their
/// own implementations.
pub trait ApplicationManager: Send + Sync {
    fn get_application(
        &self,
        request: Request<ApplicationIdentifier>,
    ) -> impl Future<Output = Result<Application, Status>> + Send;

    fn set_application(
        &self,
        request: Request<Application>,
    ) -> impl Future<Output = Result<Empty, Status>> + Send;

    fn delete_application(
        &self,
        request: Request<ApplicationIdentifier>,
    ) -> impl Future<Output = Result<Empty, Status>> + Send;
}

/// [`ApplicationManager`] backed by a tonic channel.
///
/// The stub is cloned per call: clones share the underlying channel, so
/// concurrent calls are multiplexed by the transport rather than queued
/// behind a `&mut` borrow.
#[derive(Debug, Clone)]
pub struct GrpcApplicationManager {
    stub: ApplicationManagerClient<Channel>,
}

impl GrpcApplicationManager {
    pub fn new(channel: Channel) -> Self {
        Self {
            stub: ApplicationManagerClient::new(channel),
        }
    }
}

impl ApplicationManager for GrpcApplicationManager {
    async fn get_application(
        &self,
        request: Request<ApplicationIdentifier>,
    ) -> Result<Application, Status> {
        trace!("GetApplication");
        let mut stub = self.stub.clone();
        stub.get_application(request)
            .await
            .map(Response::into_inner)
    }

    async fn set_application(&self, request: Request<Application>) -> Result<Empty, Status> {
        trace!("SetApplication");
        let mut stub = self.stub.clone();
        stub.set_application(request)
            .await
            .map(Response::into_inner)
    }

    async fn delete_application(
        &self,
        request: Request<ApplicationIdentifier>,
    ) -> Result<Empty, Status> {
        trace!("DeleteApplication");
        let mut stub = self.stub.clone();
        stub.delete_application(request)
            .await
            .map(Response::into_inner)
    }
}
