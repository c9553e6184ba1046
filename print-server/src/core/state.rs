use std::sync::Arc;

use crate::auth::RateLimiter;
use crate::core::Config;
use crate::printing::{PrinterConnector, UsbConnector};

/// Shared application state
///
/// Cheap to clone; handlers receive a copy per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Opens a fresh printer handle per job
    pub connector: Arc<dyn PrinterConnector>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// State backed by the configured USB printer
    pub fn new(config: Config) -> Self {
        let connector = UsbConnector::new(config.printer_vendor_id, config.printer_product_id);
        Self::with_connector(config, Arc::new(connector))
    }

    /// State backed by a custom connector
    pub fn with_connector(config: Config, connector: Arc<dyn PrinterConnector>) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute);
        Self {
            config: Arc::new(config),
            connector,
            rate_limiter,
        }
    }
}
