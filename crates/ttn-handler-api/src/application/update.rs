// Presence-based partial updates.
//
// A field is part of an update iff a variant for it was pushed. The value
// carried by the variant never affects presence, so `Decoder("")` clears
// the decoder on the handler instead of being skipped.

use crate::proto;

use super::models::{PayloadFormat, PayloadFunctions};

/// One field of an application update, carrying its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationField {
    PayloadFormat(PayloadFormat),
    RegisterOnJoinAccessKey(String),
    Decoder(String),
    Converter(String),
    Validator(String),
    Encoder(String),
}

impl ApplicationField {
    /// Wire name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PayloadFormat(_) => "payload_format",
            Self::RegisterOnJoinAccessKey(_) => "register_on_join_access_key",
            Self::Decoder(_) => "decoder",
            Self::Converter(_) => "converter",
            Self::Validator(_) => "validator",
            Self::Encoder(_) => "encoder",
        }
    }

    fn apply(self, message: &mut proto::Application) {
        match self {
            Self::PayloadFormat(format) => message.payload_format = Some(format.to_string()),
            Self::RegisterOnJoinAccessKey(key) => message.register_on_join_access_key = Some(key),
            Self::Decoder(source) => message.decoder = Some(source),
            Self::Converter(source) => message.converter = Some(source),
            Self::Validator(source) => message.validator = Some(source),
            Self::Encoder(source) => message.encoder = Some(source),
        }
    }
}

/// An ordered set of field updates. Later updates to the same field win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationUpdate {
    fields: Vec<ApplicationField>,
}

impl ApplicationUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: ApplicationField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn payload_format(self, format: PayloadFormat) -> Self {
        self.with(ApplicationField::PayloadFormat(format))
    }

    pub fn register_on_join_access_key(self, key: impl Into<String>) -> Self {
        self.with(ApplicationField::RegisterOnJoinAccessKey(key.into()))
    }

    pub fn decoder(self, source: impl Into<String>) -> Self {
        self.with(ApplicationField::Decoder(source.into()))
    }

    pub fn converter(self, source: impl Into<String>) -> Self {
        self.with(ApplicationField::Converter(source.into()))
    }

    pub fn validator(self, source: impl Into<String>) -> Self {
        self.with(ApplicationField::Validator(source.into()))
    }

    pub fn encoder(self, source: impl Into<String>) -> Self {
        self.with(ApplicationField::Encoder(source.into()))
    }

    pub fn fields(&self) -> &[ApplicationField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wire names of the fields present in this update, in push order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(ApplicationField::name).collect()
    }

    /// Build the `SetApplication` request for `app_id`.
    pub(crate) fn into_message(self, app_id: &str) -> proto::Application {
        let mut message = proto::Application {
            app_id: app_id.to_owned(),
            ..Default::default()
        };
        for field in self.fields {
            field.apply(&mut message);
        }
        message
    }
}

impl FromIterator<ApplicationField> for ApplicationUpdate {
    fn from_iter<I: IntoIterator<Item = ApplicationField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Extend<ApplicationField> for ApplicationUpdate {
    fn extend<I: IntoIterator<Item = ApplicationField>>(&mut self, iter: I) {
        self.fields.extend(iter);
    }
}

/// Every `Some` function becomes a present field; `None` is left out.
impl From<PayloadFunctions> for ApplicationUpdate {
    fn from(functions: PayloadFunctions) -> Self {
        [
            functions.decoder.map(ApplicationField::Decoder),
            functions.converter.map(ApplicationField::Converter),
            functions.validator.map(ApplicationField::Validator),
            functions.encoder.map(ApplicationField::Encoder),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
