use anyhow::Result;
use chatroom::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
