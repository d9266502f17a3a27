#![allow(clippy::unwrap_used)]
// Integration tests for `ApplicationClient` against a recording manager.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use tokio::sync::Barrier;
use tonic::{Code, Request, Status};

use ttn_handler_api::proto;
use ttn_handler_api::{
    Announcement, ApplicationClient, ApplicationManager, ApplicationUpdate, Credential,
    CredentialPolicy, Error, PayloadFormat, PayloadFunctions, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Get(proto::ApplicationIdentifier),
    Set(proto::Application),
    Delete(proto::ApplicationIdentifier),
}

/// Records every request and answers from canned state.
#[derive(Default)]
struct RecordingManager {
    calls: Mutex<Vec<(Call, Option<String>)>>,
    application: Mutex<proto::Application>,
    failure: Mutex<Option<(Code, String)>>,
    /// Every RPC parks here until the expected number of calls are in flight.
    barrier: Option<Arc<Barrier>>,
}

impl RecordingManager {
    fn with_application(application: proto::Application) -> Self {
        Self {
            application: Mutex::new(application),
            ..Default::default()
        }
    }

    fn failing(code: Code, message: &str) -> Self {
        Self {
            failure: Mutex::new(Some((code, message.to_owned()))),
            ..Default::default()
        }
    }

    fn concurrent(calls: usize) -> Self {
        Self {
            barrier: Some(Arc::new(Barrier::new(calls))),
            ..Default::default()
        }
    }

    async fn rendezvous(&self) {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
    }

    fn record<T>(&self, request: &Request<T>, call: Call) -> Result<(), Status> {
        let key = request
            .metadata()
            .get("key")
            .map(|v| v.to_str().unwrap().to_owned());
        self.calls.lock().unwrap().push((call, key));
        match self.failure.lock().unwrap().clone() {
            Some((code, message)) => Err(Status::new(code, message)),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(call, _)| call.clone())
            .collect()
    }

    fn keys(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, key)| key.clone())
            .collect()
    }
}

impl ApplicationManager for RecordingManager {
    async fn get_application(
        &self,
        request: Request<proto::ApplicationIdentifier>,
    ) -> Result<proto::Application, Status> {
        self.record(&request, Call::Get(request.get_ref().clone()))?;
        self.rendezvous().await;
        Ok(self.application.lock().unwrap().clone())
    }

    async fn set_application(
        &self,
        request: Request<proto::Application>,
    ) -> Result<proto::Empty, Status> {
        self.record(&request, Call::Set(request.get_ref().clone()))?;
        self.rendezvous().await;
        Ok(proto::Empty {})
    }

    async fn delete_application(
        &self,
        request: Request<proto::ApplicationIdentifier>,
    ) -> Result<proto::Empty, Status> {
        self.record(&request, Call::Delete(request.get_ref().clone()))?;
        self.rendezvous().await;
        Ok(proto::Empty {})
    }
}

const APP_ID: &str = "my-app";
const ACCESS_KEY: &str = "ttn-account-v2.secret";

fn access_key() -> SecretString {
    SecretString::from(ACCESS_KEY.to_owned())
}

fn client(manager: RecordingManager) -> ApplicationClient<RecordingManager> {
    ApplicationClient::with_manager(APP_ID, &access_key(), manager).unwrap()
}

fn identifier() -> proto::ApplicationIdentifier {
    proto::ApplicationIdentifier {
        app_id: APP_ID.into(),
    }
}

fn update_request(build: impl FnOnce(&mut proto::Application)) -> proto::Application {
    let mut message = proto::Application {
        app_id: APP_ID.into(),
        ..Default::default()
    };
    build(&mut message);
    message
}

// ── Construction ────────────────────────────────────────────────────

#[tokio::test]
async fn test_new_without_certificate_is_insecure() {
    let announcement = Announcement::new("127.0.0.1:1904", None);
    let client = ApplicationClient::new(APP_ID, &access_key(), &announcement).unwrap();

    assert_eq!(client.app_id(), APP_ID);
    assert_eq!(client.credential(), Some(&Credential::Insecure));
}

#[tokio::test]
async fn test_legacy_policy_with_certificate_is_insecure() {
    let announcement = Announcement::new(
        "127.0.0.1:1904",
        Some("-----BEGIN CERTIFICATE-----\n-----END CERTIFICATE-----\n".into()),
    );
    let transport = TransportConfig::default().with_policy(CredentialPolicy::LegacyInverted);
    let client =
        ApplicationClient::with_transport(APP_ID, &access_key(), &announcement, &transport)
            .unwrap();

    assert_eq!(client.credential(), Some(&Credential::Insecure));
}

#[test]
fn test_access_key_must_be_valid_metadata() {
    let key = SecretString::from("line\nbreak".to_owned());
    let result = ApplicationClient::with_manager(APP_ID, &key, RecordingManager::default());

    assert!(
        matches!(result, Err(Error::InvalidAccessKey(_))),
        "expected InvalidAccessKey error"
    );
}

// ── get ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_sends_identifier_and_access_key() {
    let manager = RecordingManager::with_application(proto::Application {
        app_id: APP_ID.into(),
        payload_format: Some("cayenne".into()),
        register_on_join_access_key: Some("join-key".into()),
        ..Default::default()
    });
    let client = client(manager);

    let app = client.get().await.unwrap();

    assert_eq!(client.manager().calls(), vec![Call::Get(identifier())]);
    assert_eq!(client.manager().keys(), vec![Some(ACCESS_KEY.to_owned())]);
    assert_eq!(app.app_id, APP_ID);
    assert_eq!(app.payload_format, PayloadFormat::Cayenne);
    assert_eq!(app.register_on_join_access_key.as_deref(), Some("join-key"));
    assert_eq!(app.decoder, None);
}

#[tokio::test]
async fn test_get_plain_value_serializes_without_proto_types() {
    let client = client(RecordingManager::with_application(proto::Application {
        app_id: APP_ID.into(),
        payload_format: Some("custom".into()),
        decoder: Some("function Decoder(bytes) { return {}; }".into()),
        ..Default::default()
    }));

    let app = client.get().await.unwrap();
    let value = serde_json::to_value(&app).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "app_id": APP_ID,
            "payload_format": "custom",
            "decoder": "function Decoder(bytes) { return {}; }",
        })
    );
}

#[tokio::test]
async fn test_payload_format_reads_from_get() {
    let client = client(RecordingManager::with_application(proto::Application {
        app_id: APP_ID.into(),
        payload_format: Some("cayenne".into()),
        ..Default::default()
    }));

    assert_eq!(client.payload_format().await.unwrap(), PayloadFormat::Cayenne);
    assert_eq!(client.manager().calls(), vec![Call::Get(identifier())]);
}

#[tokio::test]
async fn test_custom_payload_functions_returns_all_four() {
    let client = client(RecordingManager::with_application(proto::Application {
        app_id: APP_ID.into(),
        decoder: Some("d".into()),
        validator: Some("v".into()),
        ..Default::default()
    }));

    let functions = client.custom_payload_functions().await.unwrap();

    assert_eq!(
        functions,
        PayloadFunctions {
            decoder: Some("d".into()),
            converter: None,
            validator: Some("v".into()),
            encoder: None,
        }
    );
    assert_eq!(client.manager().calls().len(), 1);
}

// ── set ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_populates_only_present_fields() {
    let client = client(RecordingManager::default());

    client
        .set(ApplicationUpdate::new().payload_format(PayloadFormat::Cayenne))
        .await
        .unwrap();
    client
        .set(
            ApplicationUpdate::new()
                .payload_format(PayloadFormat::Cayenne)
                .decoder(""),
        )
        .await
        .unwrap();

    assert_eq!(
        client.manager().calls(),
        vec![
            Call::Set(update_request(|m| {
                m.payload_format = Some("cayenne".into());
            })),
            Call::Set(update_request(|m| {
                m.payload_format = Some("cayenne".into());
                m.decoder = Some(String::new());
            })),
        ]
    );
}

#[tokio::test]
async fn test_set_payload_format_matches_set() {
    let via_helper = client(RecordingManager::default());
    let via_set = client(RecordingManager::default());

    via_helper
        .set_payload_format(PayloadFormat::Custom)
        .await
        .unwrap();
    via_set
        .set(ApplicationUpdate::new().payload_format(PayloadFormat::Custom))
        .await
        .unwrap();

    assert_eq!(via_helper.manager().calls(), via_set.manager().calls());
    assert_eq!(via_helper.manager().keys(), via_set.manager().keys());
}

#[tokio::test]
async fn test_set_custom_payload_functions_sends_defined_functions() {
    let client = client(RecordingManager::default());

    client
        .set_custom_payload_functions(PayloadFunctions {
            decoder: None,
            converter: Some(String::new()),
            validator: None,
            encoder: Some("function Encoder(obj) { return []; }".into()),
        })
        .await
        .unwrap();

    assert_eq!(
        client.manager().calls(),
        vec![Call::Set(update_request(|m| {
            m.converter = Some(String::new());
            m.encoder = Some("function Encoder(obj) { return []; }".into());
        }))]
    );
}

// ── delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_sends_identifier() {
    let client = client(RecordingManager::default());

    client.delete().await.unwrap();

    assert_eq!(client.manager().calls(), vec![Call::Delete(identifier())]);
    assert_eq!(client.manager().keys(), vec![Some(ACCESS_KEY.to_owned())]);
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_remote_error_propagates_unchanged() {
    let client = client(RecordingManager::failing(
        Code::NotFound,
        "application my-app not found",
    ));

    let result = client.delete().await;

    match result {
        Err(Error::Rpc(ref status)) => {
            assert_eq!(status.code(), Code::NotFound);
            assert_eq!(status.message(), "application my-app not found");
        }
        other => panic!("expected Rpc error, got: {other:?}"),
    }
    assert_eq!(client.manager().calls().len(), 1, "no retries expected");
}

#[tokio::test]
async fn test_failure_leaves_client_state_unchanged() {
    let client = client(RecordingManager::failing(Code::Unavailable, "connection refused"));

    let err = client.get().await.unwrap_err();
    assert!(err.is_transient());

    assert_eq!(client.app_id(), APP_ID);
    *client.manager().failure.lock().unwrap() = None;
    client.delete().await.unwrap();

    assert_eq!(
        client.manager().calls(),
        vec![Call::Get(identifier()), Call::Delete(identifier())]
    );
    assert_eq!(
        client.manager().keys(),
        vec![Some(ACCESS_KEY.to_owned()), Some(ACCESS_KEY.to_owned())]
    );
}

#[tokio::test]
async fn test_get_with_unknown_payload_format_fails() {
    let client = client(RecordingManager::with_application(proto::Application {
        app_id: APP_ID.into(),
        payload_format: Some("protobuf".into()),
        ..Default::default()
    }));

    let result = client.get().await;

    assert!(
        matches!(result, Err(Error::Decode { .. })),
        "expected Decode error, got: {result:?}"
    );
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_operations_run_concurrently_on_one_client() {
    // Each call only completes once all three are in flight at the same time.
    let client = client(RecordingManager::concurrent(3));

    let (get, set, delete) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(
            client.get(),
            client.set_payload_format(PayloadFormat::Cayenne),
            client.delete(),
        )
    })
    .await
    .expect("calls were serialized on the client");
    get.unwrap();
    set.unwrap();
    delete.unwrap();

    let calls = client.manager().calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.contains(&Call::Get(identifier())));
    assert!(calls.contains(&Call::Delete(identifier())));
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_operations_are_unsupported_and_offline() {
    let client = client(RecordingManager::default());
    let device = ttn_handler_api::Device {
        app_id: APP_ID.into(),
        dev_id: "sensor-1".into(),
        app_eui: "70B3D57EF0000001".into(),
        dev_eui: "0004A30B001C0530".into(),
        dev_addr: "26011CE4".into(),
        ..Default::default()
    };

    let results = [
        client.devices().await.map(|_| ()),
        client.register_device(&device).await,
        client.get_device("sensor-1").await.map(|_| ()),
        client.set_device("sensor-1", &device).await,
        client.delete_device("sensor-1").await,
    ];

    for result in results {
        assert!(
            matches!(result, Err(Error::UnsupportedOperation(_))),
            "expected UnsupportedOperation, got: {result:?}"
        );
    }
    assert!(client.manager().calls().is_empty());
}
