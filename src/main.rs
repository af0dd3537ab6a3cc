#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    snapstudio::run().await?;
    Ok(())
}
