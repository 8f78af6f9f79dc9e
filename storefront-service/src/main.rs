use anyhow::Context;
use storefront_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config)?;

    let state = AppState::connect(config.clone())
        .await
        .context("connecting to the database")?;

    Server::new(config).serve(app(state)).await?;
    Ok(())
}
