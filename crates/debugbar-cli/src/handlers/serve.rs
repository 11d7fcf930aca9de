use anyhow::Result;
use debugbar_sdk::Client;
use debugbar_sdk::mcp;

pub fn handle(client: Client) -> Result<()> {
    mcp::run_server(client)
}
