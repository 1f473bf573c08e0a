use anyhow::Context;

use pizzeria_cart::{FileStore, StoredCartRepository};
use pizzeria_catalog::CatalogClient;
use pizzeria_pos::{PosConfig, PosSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PosConfig::from_env().context("invalid configuration")?;
    pizzeria_observability::init(config.log_format);

    tracing::info!(
        api_url = %config.api_url,
        data_dir = %config.data_dir.display(),
        "starting pizzeria pos"
    );

    let client = CatalogClient::new(config.api_url.as_str(), config.http_timeout)
        .context("failed to build catalog client")?;
    let catalog = client.fetch_catalog().await;
    if catalog.is_empty() {
        tracing::warn!("catalog is empty; check that the menu API is reachable");
    }

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create data directory at {:?}", config.data_dir))?;
    let repository = StoredCartRepository::new(FileStore::new(config.data_dir.clone()));
    let mut session = PosSession::new(repository, catalog);

    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        pizzeria_pos::run(&mut session, stdin.lock(), stdout.lock())
    })
    .await
    .context("shell task failed")?
    .context("terminal i/o failed")?;

    tracing::info!("pizzeria pos stopped");
    Ok(())
}
