use crate::presentation::{FormatOptions, RequestTreeView};
use crate::types::OutputFormat;
use anyhow::Result;
use debugbar_sdk::{Client, LoadOptions, to_pretty_json};

pub fn handle(
    client: &Client,
    limit: Option<usize>,
    include_session: bool,
    include_cookies: bool,
    format: OutputFormat,
) -> Result<()> {
    let limit = limit.unwrap_or(client.config().defaults.tree_limit);
    let options = LoadOptions::new()
        .with_session(include_session)
        .with_cookies(include_cookies);

    let forest = client.request_tree(limit, options)?;

    match format {
        OutputFormat::Json => println!("{}", to_pretty_json(&forest)?),
        OutputFormat::Plain => {
            let display = FormatOptions::for_stdout();
            print!("{}", RequestTreeView::new(&forest, &display));
        }
    }

    Ok(())
}
