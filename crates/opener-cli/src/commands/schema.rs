use opener_core::entities::Occurrence;

/// Handle `issue-opener schema`.
pub fn handle() -> anyhow::Result<()> {
    println!("{}", render()?);
    Ok(())
}

fn render() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&schemars::schema_for!(
        Occurrence
    ))?)
}
