use anyhow::Context;
use opener_bridge::{DispatchOutcome, InboundEvent};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReplayArgs;
use crate::server;

/// Handle `issue-opener replay <FILE>`.
///
/// Prints one line per opened issue key on stdout.
pub async fn handle(args: &ReplayArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags)?;
    let dispatcher = bootstrap::dispatcher(&config)?;

    let body = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let event = InboundEvent::from_structured(&body)
        .with_context(|| format!("{} is not a CloudEvent", args.file.display()))?;

    let result = dispatcher.handle(&event).await;
    server::report(&event, &result);
    match result? {
        DispatchOutcome::Filtered => {
            eprintln!(
                "event type '{}' is not handled (expected '{}')",
                event.event_type,
                dispatcher.event_type()
            );
        }
        DispatchOutcome::Processed { opened, .. } => {
            for handle in opened {
                println!("{}", handle.key);
            }
        }
    }
    Ok(())
}
