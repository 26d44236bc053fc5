use std::sync::Arc;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ServeArgs;
use crate::server;

/// Handle `issue-opener serve`.
pub async fn handle(args: &ServeArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut config = bootstrap::load_config(flags)?;
    if let Some(port) = args.port {
        config.receiver.port = port;
    }
    let dispatcher = bootstrap::dispatcher(&config)?;

    let addr = config.receiver.bind_addr();
    let server = tiny_http::Server::http(&addr)
        .map_err(|error| anyhow::anyhow!("failed to bind {addr}: {error}"))?;
    tracing::info!(
        %addr,
        event_type = %config.receiver.event_type,
        project = %config.jira.project,
        "listening for policy events"
    );

    server::run(
        Arc::new(server),
        Arc::new(dispatcher),
        config.receiver.max_body_bytes,
    )
    .await
}
