use anyhow::Context;
use library_kernel::{settings::Settings, InitCtx};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load library settings")?;
    library_telemetry::init(&settings.telemetry).context("failed to initialize telemetry")?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        "library-app bootstrap starting"
    );

    let store = library_db::connect(&settings.database)
        .await
        .context("failed to connect to the document store")?;

    let registry = library_app::registry(store.clone());
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    library_app::ensure_indexes(&registry, store.as_ref()).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("library-app bootstrap complete");

    let served = library_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    store
        .close()
        .await
        .context("failed to close the document store")?;

    served
}
