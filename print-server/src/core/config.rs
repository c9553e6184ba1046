use std::fmt;
use std::path::PathBuf;

/// Epson USB vendor id
pub const DEFAULT_VENDOR_ID: u16 = 0x04b8;
/// TM-T20 series USB product id
pub const DEFAULT_PRODUCT_ID: u16 = 0x0202;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | API_SECRET | (unset) | Shared secret expected in `x-PrintRAPI-key` |
/// | HOST | 0.0.0.0 | Bind address |
/// | HTTP_PORT | 8899 | HTTP port |
/// | PRINTER_VENDOR_ID | 0x04b8 | USB vendor id (hex) |
/// | PRINTER_PRODUCT_ID | 0x0202 | USB product id (hex) |
/// | IMAGE_PATH | image.png | Image printed by `GET /image` |
/// | RATE_LIMIT_PER_MINUTE | 2 | Requests per route and client, 0 disables |
/// | TRUST_FORWARDED_FOR | false | Key the rate limiter on `X-Forwarded-For` |
/// | LOG_LEVEL | info | Log level |
/// | LOG_DIR | (unset) | Directory for daily rolling log files |
///
/// An unset or empty `API_SECRET` rejects every print request.
#[derive(Clone)]
pub struct Config {
    /// Shared secret; `None` fails closed
    pub api_secret: Option<String>,
    pub host: String,
    pub http_port: u16,
    pub printer_vendor_id: u16,
    pub printer_product_id: u16,
    /// Image asset for `GET /image`
    pub image_path: PathBuf,
    /// Requests per minute per route and client IP (0 = unlimited)
    pub rate_limit_per_minute: u32,
    /// Only set behind a proxy that overwrites `X-Forwarded-For`
    pub trust_forwarded_for: bool,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to [`Config::default`].
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_secret: std::env::var("API_SECRET").ok().filter(|s| !s.is_empty()),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.http_port),
            printer_vendor_id: std::env::var("PRINTER_VENDOR_ID")
                .ok()
                .and_then(|v| parse_usb_id(&v))
                .unwrap_or(defaults.printer_vendor_id),
            printer_product_id: std::env::var("PRINTER_PRODUCT_ID")
                .ok()
                .and_then(|v| parse_usb_id(&v))
                .unwrap_or(defaults.printer_product_id),
            image_path: std::env::var("IMAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.image_path),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_per_minute),
            trust_forwarded_for: std::env::var("TRUST_FORWARDED_FOR")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.trust_forwarded_for),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Socket address string to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_secret: None,
            host: "0.0.0.0".into(),
            http_port: 8899,
            printer_vendor_id: DEFAULT_VENDOR_ID,
            printer_product_id: DEFAULT_PRODUCT_ID,
            image_path: PathBuf::from("image.png"),
            rate_limit_per_minute: 2,
            trust_forwarded_for: false,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("http_port", &self.http_port)
            .field("printer_vendor_id", &format_args!("{:#06x}", self.printer_vendor_id))
            .field("printer_product_id", &format_args!("{:#06x}", self.printer_product_id))
            .field("image_path", &self.image_path)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

/// Parse a USB id written as hex, with or without a `0x` prefix
fn parse_usb_id(raw: &str) -> Option<u16> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u16::from_str_radix(digits, 16).ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_usb_id() {
        assert_eq!(parse_usb_id("0x04b8"), Some(0x04b8));
        assert_eq!(parse_usb_id("04B8"), Some(0x04b8));
        assert_eq!(parse_usb_id(" 0202\n"), Some(0x0202));
        assert_eq!(parse_usb_id("printer"), None);
        assert_eq!(parse_usb_id("0x1ffff"), None);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config {
            api_secret: Some("hunter2".into()),
            ..Config::default()
        };
        let shown = format!("{:?}", config);
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
        assert!(shown.contains("0x04b8"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.api_secret.is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:8899");
        assert_eq!(config.rate_limit_per_minute, 2);
        assert!(!config.trust_forwarded_for);
    }
}
