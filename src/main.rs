use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    record_api_rust::app::run().await
}
