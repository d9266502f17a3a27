// Response normalization: protobuf messages → plain records.

use crate::error::Error;
use crate::proto;

use super::models::{Application, PayloadFormat};

/// Handlers store an unset payload format as the empty string and treat it
/// as `custom`.
fn payload_format(raw: Option<&str>) -> Result<PayloadFormat, Error> {
    match raw {
        None | Some("") => Ok(PayloadFormat::Custom),
        Some(raw) => raw.parse().map_err(|_| Error::Decode {
            field: "payload_format",
            message: format!("unknown payload format {raw:?}"),
        }),
    }
}

impl TryFrom<proto::Application> for Application {
    type Error = Error;

    fn try_from(message: proto::Application) -> Result<Self, Self::Error> {
        Ok(Self {
            payload_format: payload_format(message.payload_format.as_deref())?,
            app_id: message.app_id,
            decoder: message.decoder,
            converter: message.converter,
            validator: message.validator,
            encoder: message.encoder,
            register_on_join_access_key: message.register_on_join_access_key,
        })
    }
}
