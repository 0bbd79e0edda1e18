use std::sync::Arc;

use anyhow::Context;
use libris_app::core::CoreService;
use libris_kernel::settings::Settings;
use libris_kernel::{InitCtx, ModuleRegistry};
use libris_store::{DocumentStore, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, "libris bootstrap starting");

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let core = Arc::new(CoreService::new(store));

    let mut registry = ModuleRegistry::new();
    libris_app::modules::register_all(&mut registry, core);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    libris_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}
