use anyhow::Result;
use debugbar_sdk::Client;

pub fn handle(client: &Client) -> Result<()> {
    let removed = client.clear()?;
    println!("Очищено файлов: {}", removed);
    Ok(())
}
