//! HTTP transport for the remote gateway

mod client;

pub use client::HttpGateway;
