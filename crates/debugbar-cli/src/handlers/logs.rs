use anyhow::Result;
use debugbar_sdk::query::LogsViewModel;
use debugbar_sdk::{Client, to_pretty_json};

pub fn handle(
    client: &Client,
    ids: Vec<String>,
    limit: Option<usize>,
    sections: Option<Vec<String>>,
) -> Result<()> {
    let limit = limit.unwrap_or(client.config().defaults.logs_limit);
    let sections = sections.unwrap_or_else(debugbar_sdk::types::default_sections);

    let reports = client.reports(&ids, limit, sections.as_slice())?;
    println!("{}", to_pretty_json(&LogsViewModel::new(reports))?);

    Ok(())
}
