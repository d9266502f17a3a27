// ttn-handler-api: Async Rust client for the handler's application manager (gRPC)

pub mod announcement;
pub mod application;
pub mod error;
pub mod proto;
pub mod rpc;
pub mod transport;

pub use announcement::Announcement;
pub use application::{
    Application, ApplicationClient, ApplicationField, ApplicationUpdate, Device, PayloadFormat,
    PayloadFunctions,
};
pub use error::Error;
pub use rpc::{ApplicationManager, GrpcApplicationManager};
pub use transport::{Credential, CredentialPolicy, TransportConfig};
