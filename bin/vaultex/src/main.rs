#[tokio::main]
async fn main() -> Result<(), eyre::Report> {
    vaultex::run().await
}
