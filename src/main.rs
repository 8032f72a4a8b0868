use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    hand_cricket::cli::run_cli().await
}
