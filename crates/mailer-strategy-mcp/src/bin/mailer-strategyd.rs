use std::io;

use mailer_strategy_mcp::logging::init_tracing;
use mailer_strategy_mcp::{McpServer, ServerConfig, Transport};
use tracing::{error, info};

fn main() -> io::Result<()> {
    init_tracing();

    let config = ServerConfig::from_env().map_err(|err| {
        error!(error = %err, "invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
    })?;
    info!(
        transport = ?config.transport,
        numeric_mode = ?config.numeric_mode,
        "starting mailer-strategyd"
    );

    let transport = config.transport;
    let addr = config.http_addr.clone();
    let server = McpServer::new(config);
    match transport {
        Transport::Stdio => server.serve_stdio(),
        Transport::Http => server.serve_http(&addr),
    }
}
