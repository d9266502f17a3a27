// Protobuf messages and the unary stub for `handler.ApplicationManager`.
//
// Kept in the shape `tonic-build` emits so the crate builds without protoc.
// Only the application RPCs the client issues are declared here.
//
// Every `Application` field except `app_id` uses explicit presence
// (`optional`): an update that sets a field to `""` puts the empty string
// on the wire instead of dropping it.

#![allow(clippy::all, clippy::pedantic)]

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApplicationIdentifier {
    #[prost(string, tag = "1")]
    pub app_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Application {
    #[prost(string, tag = "1")]
    pub app_id: ::prost::alloc::string::String,
    #[prost(string, optional, tag = "2")]
    pub decoder: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub converter: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "4")]
    pub validator: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "5")]
    pub encoder: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "6")]
    pub payload_format: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "7")]
    pub register_on_join_access_key: ::core::option::Option<::prost::alloc::string::String>,
}

/// `google.protobuf.Empty`
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Empty {}

pub mod application_manager_client {
    use tonic::codegen::http::Uri;
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct ApplicationManagerClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> ApplicationManagerClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }

        pub async fn get_application(
            &mut self,
            request: impl tonic::IntoRequest<super::ApplicationIdentifier>,
        ) -> std::result::Result<tonic::Response<super::Application>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/handler.ApplicationManager/GetApplication",
            );
            let mut req = request.into_request();
            req.extensions_mut().insert(tonic::GrpcMethod::new(
                "handler.ApplicationManager",
                "GetApplication",
            ));
            self.inner.unary(req, path, codec).await
        }

        pub async fn set_application(
            &mut self,
            request: impl tonic::IntoRequest<super::Application>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/handler.ApplicationManager/SetApplication",
            );
            let mut req = request.into_request();
            req.extensions_mut().insert(tonic::GrpcMethod::new(
                "handler.ApplicationManager",
                "SetApplication",
            ));
            self.inner.unary(req, path, codec).await
        }

        pub async fn delete_application(
            &mut self,
            request: impl tonic::IntoRequest<super::ApplicationIdentifier>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/handler.ApplicationManager/DeleteApplication",
            );
            let mut req = request.into_request();
            req.extensions_mut().insert(tonic::GrpcMethod::new(
                "handler.ApplicationManager",
                "DeleteApplication",
            ));
            self.inner.unary(req, path, codec).await
        }
    }
}
