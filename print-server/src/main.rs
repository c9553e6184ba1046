use print_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(
        vendor_id = %format!("{:04x}", config.printer_vendor_id),
        product_id = %format!("{:04x}", config.printer_product_id),
        "Print server starting"
    );

    if config.api_secret.is_none() {
        tracing::warn!("API_SECRET is not set, every print request will be rejected");
    }

    Server::new(config).run().await?;

    Ok(())
}
