use anyhow::Context;
use opener_bridge::Dispatcher;
use opener_config::OpenerConfig;
use opener_jira::JiraClient;

use crate::cli::GlobalFlags;

/// Load `.env`, TOML and environment layers, then check the result is usable.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<OpenerConfig> {
    if let Some(path) = flags.config.as_deref().filter(|p| !p.exists()) {
        anyhow::bail!("config file {} does not exist", path.display());
    }
    OpenerConfig::load_with_dotenv(flags.config.as_deref()).map_err(anyhow::Error::from)
}

/// Build the process-wide Jira client and wrap it in a dispatcher.
pub fn dispatcher(config: &OpenerConfig) -> anyhow::Result<Dispatcher<JiraClient>> {
    config.validate()?;
    let client = JiraClient::new(&config.jira).context("unable to build Jira client")?;
    let target = config.jira.target()?;
    Ok(Dispatcher::new(
        client,
        target,
        config.receiver.event_type.clone(),
    ))
}
