use std::{net::SocketAddr, path::PathBuf, time::Duration};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub static_dir: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub yahoo_base_url: String,
    pub okx_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .expect("Invalid PORT");
        let data_dir = std::env::var("MARTINGALE_DATA_DIR").unwrap_or_else(|_| ".".into());
        let static_dir = std::env::var("MARTINGALE_STATIC_DIR").unwrap_or_else(|_| ".".into());
        let cors_allow = std::env::var("MARTINGALE_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("MARTINGALE_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let yahoo_base_url = std::env::var("MARTINGALE_YAHOO_BASE_URL")
            .unwrap_or_else(|_| "https://query1.finance.yahoo.com".into());
        let okx_base_url =
            std::env::var("MARTINGALE_OKX_BASE_URL").unwrap_or_else(|_| "https://www.okx.com".into());
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            data_dir: PathBuf::from(data_dir),
            static_dir,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            yahoo_base_url,
            okx_base_url,
        }
    }
}
