//! HTTP-backed providers for the compscout collector.
//!
//! [`GatewayClient`] covers blog search, video search, crawling and
//! subtitles; [`ChatClient`] is the reasoning service.

pub mod chat;
pub mod error;
pub mod gateway;

mod http;

pub use chat::ChatClient;
pub use error::ClientError;
pub use gateway::GatewayClient;
