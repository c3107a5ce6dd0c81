use sandbox_manager::handlers::AppState;
use sandbox_manager::jobs::JobRegistry;
use sandbox_manager::lifecycle::LifecycleCoordinator;
use sandbox_manager::models::config::SandboxManagerConfig;
use sandbox_manager::oracle::AzureCliOracle;
use sandbox_manager::provisioner::ScriptProvisioner;
use sandbox_manager::reconciler::StatusReconciler;
use sandbox_manager::server::router;
use sandbox_manager::store::MetadataStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // uses RUST_LOG
        .init();

    let cfg = SandboxManagerConfig::load()?;

    let store = Arc::new(MetadataStore::new(cfg.store.root.clone()));
    let oracle = Arc::new(AzureCliOracle::new(cfg.azure.clone()));
    let reconciler = Arc::new(StatusReconciler::new(oracle));
    let provisioner = Arc::new(ScriptProvisioner::new(&cfg.provisioner));
    let coordinator = Arc::new(LifecycleCoordinator::new(
        provisioner,
        cfg.provisioner.clone(),
    ));

    let state = AppState::new(store, reconciler, coordinator, JobRegistry::new());
    let app = router(state);

    info!("Starting Sandbox Manager Server...");
    info!("Metadata dir: {}", cfg.store.root.display());
    info!("Host: {}", cfg.server.host);
    info!("Port: {}", cfg.server.port);

    let listener = TcpListener::bind(cfg.server.bind_address()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
