pub mod config;
mod http;
pub mod logging;
pub mod protocol;
pub mod resources;
pub mod server;

pub use config::{ConfigError, ServerConfig, Transport};
pub use server::McpServer;
