use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is optional; real environment variables take precedence.
    let env_file = dotenvy::dotenv().ok();

    cloudctrl_core::init()?;
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let (config, _validation) = cloudctrl_core::Config::load_validated()?;
    tracing::info!("CloudCtrl weather service starting");

    cloudctrl_server::serve(&config).await
}
