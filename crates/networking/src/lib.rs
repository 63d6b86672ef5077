//! Webshop Networking - Remote gateway contract and HTTP implementation

pub mod gateway;
pub mod http;

pub use gateway::RemoteGateway;
pub use http::HttpGateway;
