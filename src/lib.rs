mod api;
mod client;
mod config;
mod error;
mod redact;
pub mod session;
pub mod types;

pub use client::{
    ApiClient, ApiRequest, ApiResponse, HttpRefresher, RefreshCapability, ReqwestTransport,
    RequestBody, Transport, TransportRequest, TransportResponse, UploadPart,
};
pub use config::ApiConfig;
pub use error::ApiError;
