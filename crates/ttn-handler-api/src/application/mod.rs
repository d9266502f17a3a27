// Application resource: plain records, partial updates, and the client
// that marshals them onto the application-manager RPCs.

mod client;
mod convert;
mod models;
mod update;

pub use client::{ACCESS_KEY_METADATA, ApplicationClient};
pub use models::{Application, Device, PayloadFormat, PayloadFunctions};
pub use update::{ApplicationField, ApplicationUpdate};
