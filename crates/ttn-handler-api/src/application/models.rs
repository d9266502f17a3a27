// Plain records handed to callers. Nothing here knows about protobuf.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How the handler turns raw LoRaWAN payloads into fields.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayloadFormat {
    /// User-supplied decoder/converter/validator/encoder functions.
    #[default]
    Custom,
    /// Cayenne LPP.
    Cayenne,
}

/// An application as registered on the handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub app_id: String,
    pub payload_format: PayloadFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_on_join_access_key: Option<String>,
}

impl Application {
    /// The four custom payload functions, whether set or not.
    pub fn payload_functions(&self) -> PayloadFunctions {
        PayloadFunctions {
            decoder: self.decoder.clone(),
            converter: self.converter.clone(),
            validator: self.validator.clone(),
            encoder: self.encoder.clone(),
        }
    }
}

/// Source text of the custom payload functions.
///
/// Always serializes all four keys; an unset function is `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadFunctions {
    pub decoder: Option<String>,
    pub converter: Option<String>,
    pub validator: Option<String>,
    pub encoder: Option<String>,
}

/// A device registered under an application.
///
/// The handler's device RPCs are not wired up yet, so this record is only
/// the shape callers exchange with
/// [`ApplicationClient`](super::ApplicationClient)'s device methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub app_id: String,
    pub dev_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub app_eui: String,
    pub dev_eui: String,
    pub dev_addr: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nwk_s_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_s_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_cnt_up: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_cnt_down: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<i32>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_f_cnt_check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses32_bit_f_cnt: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_constraints: Option<String>,
    /// Nanoseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
}
