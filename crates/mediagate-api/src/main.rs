use mediagate_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, remote store, routes)
    let (_state, router) = mediagate_api::setup::initialize_app(config.clone()).await?;

    mediagate_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
